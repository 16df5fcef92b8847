use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

const SETTINGS_FILE: &str = "settings.json";
const LOCAL_SETTINGS_FILE: &str = "local_settings.json";

/// Kratší refresh už cluster jen zbytečně zatěžuje
const MIN_REFRESH_RATE: u64 = 500;

/// Vrací cestu k application data adresáři dle OS
pub fn get_app_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = if cfg!(target_os = "windows") {
        // Windows: %APPDATA%\kopf-console
        std::env::var("APPDATA")
            .map(|appdata| PathBuf::from(appdata).join("kopf-console"))
            .map_err(|_| ConfigError::NoHomeDir)?
    } else {
        // Linux/macOS: ~/.kopf-console
        let home = std::env::var("HOME").map_err(|_| ConfigError::NoHomeDir)?;
        PathBuf::from(home).join(".kopf-console")
    };

    Ok(base_dir)
}

/// Nastavení konzole: `settings.json` + lokální přepisy z `local_settings.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// URL clusteru
    pub location: String,
    pub opensearch_root_path: Option<String>,
    /// Starší název klíče, použije se jen když chybí `opensearch_root_path`
    pub elasticsearch_root_path: Option<String>,
    /// Perioda refreshe v ms
    pub refresh_rate: u64,
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            location: "http://localhost:9200".to_string(),
            opensearch_root_path: None,
            elasticsearch_root_path: None,
            refresh_rate: 5000,
            theme: "dark".to_string(),
        }
    }
}

/// Jediné klíče, které lze měnit za běhu a ukládat lokálně
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct LocalSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_rate: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    theme: Option<String>,
}

impl Settings {
    /// Načte nastavení z application data adresáře
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&get_app_dir()?)
    }

    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(SETTINGS_FILE);

        let mut settings = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?
        } else {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            Settings::default()
        };

        if let Some(local) = read_local(dir) {
            settings.apply_local(local);
        }

        Ok(settings)
    }

    fn apply_local(&mut self, local: LocalSettings) {
        if let Some(refresh_rate) = local.refresh_rate {
            self.refresh_rate = refresh_rate;
        }
        if let Some(theme) = local.theme {
            self.theme = theme;
        }
    }

    /// Root path za hostem, preferuje `opensearch_root_path`
    pub fn root_path(&self) -> Option<&str> {
        self.opensearch_root_path
            .as_deref()
            .or(self.elasticsearch_root_path.as_deref())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_rate.max(MIN_REFRESH_RATE))
    }

    /// Uloží lokální přepisy (jen `refresh_rate` a `theme`)
    pub fn save_local(&self) -> Result<(), ConfigError> {
        self.save_local_to(&get_app_dir()?)
    }

    pub fn save_local_to(&self, dir: &Path) -> Result<(), ConfigError> {
        let path = dir.join(LOCAL_SETTINGS_FILE);
        let write_error = |source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        };

        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(write_error)?;
            tracing::info!("Created settings directory: {}", dir.display());
        }

        let local = LocalSettings {
            refresh_rate: Some(self.refresh_rate),
            theme: Some(self.theme.clone()),
        };
        let content = serde_json::to_string_pretty(&local).map_err(ConfigError::Serialize)?;
        std::fs::write(&path, content).map_err(write_error)?;

        tracing::debug!("Saved local settings to {}", path.display());
        Ok(())
    }
}

/// Chybějící nebo poškozené lokální nastavení se ignoruje
fn read_local(dir: &Path) -> Option<LocalSettings> {
    let path = dir.join(LOCAL_SETTINGS_FILE);

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!("No local settings at {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(local) => Some(local),
        Err(e) => {
            tracing::debug!("Ignoring unreadable local settings {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kopf-console-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_app_dir_path() {
        let app_dir = get_app_dir().unwrap();
        assert!(app_dir.to_string_lossy().contains("kopf-console"));
    }

    #[test]
    fn test_defaults_without_files() {
        let dir = temp_dir("defaults");

        let settings = Settings::load_from(&dir).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.location, "http://localhost:9200");
        assert_eq!(settings.refresh_interval(), Duration::from_secs(5));
        assert_eq!(settings.root_path(), None);
    }

    #[test]
    fn test_root_path_fallback() {
        let dir = temp_dir("root-path");
        std::fs::write(
            dir.join(SETTINGS_FILE),
            r#"{ "location": "http://es:9200", "elasticsearch_root_path": "/legacy" }"#,
        )
        .unwrap();

        let mut settings = Settings::load_from(&dir).unwrap();
        assert_eq!(settings.location, "http://es:9200");
        assert_eq!(settings.root_path(), Some("/legacy"));

        settings.opensearch_root_path = Some("/os".to_string());
        assert_eq!(settings.root_path(), Some("/os"));
    }

    #[test]
    fn test_local_overrides_only_updatable_keys() {
        let dir = temp_dir("local");
        std::fs::write(dir.join(SETTINGS_FILE), r#"{ "refresh_rate": 3000, "theme": "light" }"#).unwrap();
        std::fs::write(
            dir.join(LOCAL_SETTINGS_FILE),
            r#"{ "refresh_rate": 10000, "location": "http://ignored:9200" }"#,
        )
        .unwrap();

        let settings = Settings::load_from(&dir).unwrap();
        assert_eq!(settings.refresh_rate, 10000);
        assert_eq!(settings.theme, "light");
        assert_eq!(settings.location, "http://localhost:9200");
    }

    #[test]
    fn test_broken_local_settings_are_ignored() {
        let dir = temp_dir("broken-local");
        std::fs::write(dir.join(LOCAL_SETTINGS_FILE), "{ not json").unwrap();

        let settings = Settings::load_from(&dir).unwrap();
        assert_eq!(settings.refresh_rate, 5000);
    }

    #[test]
    fn test_broken_settings_file_is_an_error() {
        let dir = temp_dir("broken");
        std::fs::write(dir.join(SETTINGS_FILE), "[1, 2").unwrap();

        let err = Settings::load_from(&dir).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_save_local_round_trip() {
        let dir = temp_dir("save");
        let settings = Settings {
            location: "http://other:9200".to_string(),
            refresh_rate: 2000,
            theme: "light".to_string(),
            ..Default::default()
        };
        settings.save_local_to(&dir).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join(LOCAL_SETTINGS_FILE)).unwrap()).unwrap();
        assert_eq!(saved, serde_json::json!({ "refresh_rate": 2000, "theme": "light" }));

        let loaded = Settings::load_from(&dir).unwrap();
        assert_eq!(loaded.refresh_rate, 2000);
        assert_eq!(loaded.theme, "light");
        assert_eq!(loaded.location, "http://localhost:9200");
    }

    #[test]
    fn test_refresh_interval_has_floor() {
        let settings = Settings {
            refresh_rate: 0,
            ..Default::default()
        };
        assert_eq!(settings.refresh_interval(), Duration::from_millis(MIN_REFRESH_RATE));
    }
}
