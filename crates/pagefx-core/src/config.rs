use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::color::TriggerRatio;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub background: BackgroundConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundConfig {
    /// Color applied when no zone matches the trigger line
    #[serde(default = "default_background_color")]
    pub default_color: String,
    /// Fraction of the viewport height below the scroll offset where the
    /// trigger line sits. Values outside [0, 1] are clamped on use.
    #[serde(default = "default_trigger_ratio")]
    pub trigger_ratio: f64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            default_color: default_background_color(),
            trigger_ratio: default_trigger_ratio(),
        }
    }
}

impl BackgroundConfig {
    /// Clamped trigger ratio
    pub fn trigger_ratio(&self) -> TriggerRatio {
        TriggerRatio::new(self.trigger_ratio)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_background_color() -> String {
    "#d4ccc4".to_string()
}

fn default_trigger_ratio() -> f64 {
    1.0
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// when the file does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml_str(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = self.to_toml_string()?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Render as pretty TOML
    pub fn to_toml_string(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/pagefx/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("pagefx")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.background.default_color, "#d4ccc4");
        assert_eq!(config.background.trigger_ratio, 1.0);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r##"
[background]
trigger_ratio = 0.25
"##,
        )
        .unwrap();

        assert_eq!(config.background.trigger_ratio, 0.25);
        assert_eq!(config.background.default_color, "#d4ccc4");
    }

    #[test]
    fn test_out_of_range_ratio_is_clamped_on_use() {
        let config = AppConfig::from_toml_str(
            r##"
[background]
trigger_ratio = 1.5
"##,
        )
        .unwrap();

        assert_eq!(config.background.trigger_ratio, 1.5);
        assert_eq!(config.background.trigger_ratio().value(), 1.0);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[background\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = std::env::temp_dir().join(format!("pagefx-config-{}", std::process::id()));
        let path = dir.join("config.toml");

        let mut config = AppConfig::default();
        config.background.trigger_ratio = 0.5;
        config.background.default_color = "navy".to_string();
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.background.trigger_ratio, 0.5);
        assert_eq!(loaded.background.default_color, "navy");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("pagefx-definitely-missing").join("config.toml");
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.background.default_color, "#d4ccc4");
    }
}
