use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Exchange rate used when `--rate` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_rate: Option<f64>,

    /// Append a literal `$` after the formatted amount
    #[serde(default = "default_true")]
    pub trailing_symbol: bool,

    /// Kitty-style color file to take the palette from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_path: Option<PathBuf>,

    /// File this config was read from; `save` writes back here
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_rate: None,
            trailing_symbol: true,
            theme_path: None,
            path: None,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("okuman");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_with(true)
    }

    /// Load config without writing a default file (one-shot mode)
    pub fn load_read_only() -> Result<Self> {
        Self::load_with(false)
    }

    fn load_with(write_default: bool) -> Result<Self> {
        match Self::config_path() {
            Ok(path) => Ok(Self::load_from(&path, write_default)),
            Err(_) => Ok(AppConfig::default()),
        }
    }

    fn load_from(path: &Path, write_default: bool) -> Self {
        let mut config = AppConfig::default();

        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match Self::parse(&content) {
                    Ok(loaded) => {
                        tracing::debug!("Loaded config from {}", path.display());
                        config = loaded;
                    }
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            config.path = Some(path.to_path_buf());
            // Never overwrite a file that failed to parse
            return config;
        }

        config.path = Some(path.to_path_buf());
        if write_default {
            if let Err(e) = config.save() {
                tracing::warn!("Could not write default config: {}", e);
            }
        }
        config
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => Self::config_path()?,
        };
        if let Some(dir) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                tracing::warn!("Could not create config directory: {}", e);
            }
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            default_rate: Some(0.0067),
            trailing_symbol: false,
            theme_path: Some(PathBuf::from("/tmp/kitty.conf")),
            path: None,
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized = AppConfig::parse(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.trailing_symbol);
        assert!(config.default_rate.is_none());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(AppConfig::parse("default_rate = \"cheap\"").is_err());
    }

    #[test]
    fn test_read_only_load_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = AppConfig::load_from(&path, false);
        assert_eq!(config.default_rate, None);
        assert!(!path.exists());

        AppConfig::load_from(&path, true);
        assert!(path.exists());
    }

    #[test]
    fn test_save_writes_back_to_loaded_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_rate = 0.0065\ntrailing_symbol = false\n").unwrap();

        let mut config = AppConfig::load_from(&path, false);
        assert_eq!(config.default_rate, Some(0.0065));
        assert!(!config.trailing_symbol);

        config.default_rate = Some(0.007);
        config.save().unwrap();

        let reloaded = AppConfig::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded.default_rate, Some(0.007));
        assert!(!reloaded.trailing_symbol);
    }
}
