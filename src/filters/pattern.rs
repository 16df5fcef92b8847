use regex::{Regex, RegexBuilder};

/// Vzor pro filtrování podle názvu
///
/// Nejdřív se zkusí jako case-insensitive regex. Pokud regex nejde
/// sestavit (např. `[invalid`), použije se obyčejné hledání podřetězce bez
/// ohledu na velikost písmen. Okolní mezery se ignorují.
#[derive(Debug, Clone, Default)]
pub struct NamePattern {
    text: String,
    regex: Option<Regex>,
}

impl NamePattern {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();

        let regex = if trimmed.is_empty() {
            None
        } else {
            match RegexBuilder::new(trimmed).case_insensitive(true).build() {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::debug!("Pattern {:?} is not a valid regex, using substring match: {}", trimmed, e);
                    None
                }
            }
        };

        Self { text, regex }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Prázdný vzor odpovídá všemu
    pub fn matches(&self, candidate: &str) -> bool {
        let needle = self.text.trim();
        if needle.is_empty() {
            return true;
        }

        match &self.regex {
            Some(re) => re.is_match(candidate),
            None => candidate.to_lowercase().contains(&needle.to_lowercase()),
        }
    }

    pub fn matches_any<'a>(&self, mut candidates: impl Iterator<Item = &'a str>) -> bool {
        candidates.any(|c| self.matches(c))
    }
}

impl PartialEq for NamePattern {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for NamePattern {}

impl From<&str> for NamePattern {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_matches_everything() {
        assert!(NamePattern::new("").matches("anything"));
        assert!(NamePattern::new("   ").matches("anything"));
        assert!(NamePattern::new("  ").is_empty());
    }

    #[test]
    fn test_regex_case_insensitive() {
        let pattern = NamePattern::new("TEST-.*");
        assert!(pattern.matches("test-index"));
        assert!(pattern.matches("my-test-index"));
        assert!(!pattern.matches("other"));

        assert!(NamePattern::new("^logs-\\d+$").matches("logs-2024"));
        assert!(!NamePattern::new("^logs-\\d+$").matches("logs-current"));
    }

    #[test]
    fn test_trimmed() {
        assert!(NamePattern::new("  test  ").matches("test-index"));
    }

    #[test]
    fn test_invalid_regex_falls_back_to_substring() {
        let pattern = NamePattern::new("[invalid");

        assert!(!pattern.matches("test-invalid-index"));
        assert!(pattern.matches("weird-[INVALID-name"));
    }

    #[test]
    fn test_matches_any() {
        let pattern = NamePattern::new("my-.*");
        assert!(pattern.matches_any(["a", "my-alias"].into_iter()));
        assert!(!pattern.matches_any(std::iter::empty()));
    }

    #[test]
    fn test_equality_by_text() {
        assert_eq!(NamePattern::new("abc"), NamePattern::from("abc"));
        assert_ne!(NamePattern::new("abc"), NamePattern::new(" abc"));
    }
}
