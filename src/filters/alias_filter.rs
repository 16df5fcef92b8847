use super::{Comparator, EntityFilter, NamePattern};
use crate::models::Index;

/// Filtr aliasů: vzor pro název indexu a vzor pro název aliasu
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasFilter {
    index: NamePattern,
    alias: NamePattern,
}

impl AliasFilter {
    pub fn new(index: &str, alias: &str) -> Self {
        Self {
            index: NamePattern::new(index),
            alias: NamePattern::new(alias),
        }
    }

    pub fn index(&self) -> &str {
        self.index.as_str()
    }

    pub fn alias(&self) -> &str {
        self.alias.as_str()
    }

    pub fn set_index(&mut self, index: &str) {
        self.index = NamePattern::new(index);
    }

    pub fn set_alias(&mut self, alias: &str) {
        self.alias = NamePattern::new(alias);
    }
}

impl EntityFilter<Index> for AliasFilter {
    fn matches(&self, index: &Index) -> bool {
        if self.is_blank() {
            return true;
        }
        if !self.index.matches(&index.name) {
            return false;
        }
        self.alias.is_empty() || self.alias.matches_any(index.aliases.iter().map(String::as_str))
    }

    fn is_blank(&self) -> bool {
        self.index.is_empty() && self.alias.is_empty()
    }

    fn sorting(&self) -> Option<Comparator<'_, Index>> {
        Some(Box::new(|a: &Index, b: &Index| a.name.cmp(&b.name)))
    }
}
