use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::model::Coordinate;

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const API_KEY_ENV: &str = "CLIMA_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
///
/// [location]
/// lat = 51.5
/// lon = -0.12
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Fixed position used instead of the IP lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            location: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    /// `CLIMA_API_KEY` overrides the stored key.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;

        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(key) = env::var(API_KEY_ENV) {
            cfg.set_api_key(key);
        }

        Ok(cfg)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "clima", "clima")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Blank keys are treated as unset.
    pub fn set_api_key(&mut self, key: String) {
        let key = key.trim();
        self.api_key = if key.is_empty() { None } else { Some(key.to_string()) };
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `clima configure` or set {API_KEY_ENV}."
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key().unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("clima configure"));
    }

    #[test]
    fn blank_api_key_is_unset() {
        let mut cfg = Config::default();
        cfg.set_api_key("  ".into());
        assert!(cfg.api_key.is_none());

        cfg.set_api_key(" KEY ".into());
        assert_eq!(cfg.api_key().expect("key is set"), "KEY");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let cfg = Config::from_toml(r#"api_key = "KEY""#).expect("valid toml");

        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert!(cfg.location.is_none());
    }

    #[test]
    fn fixed_location_is_parsed() {
        let cfg = Config::from_toml(
            r#"
            [location]
            lat = 51.5
            lon = -0.12
            "#,
        )
        .expect("valid toml");

        assert_eq!(cfg.location, Some(Coordinate::new(51.5, -0.12)));
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn toml_roundtrip_keeps_location() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.location = Some(Coordinate::new(10.0, 20.0));

        let text = toml::to_string_pretty(&cfg).expect("serializable");
        let back = Config::from_toml(&text).expect("parsable");

        assert_eq!(back.api_key.as_deref(), Some("KEY"));
        assert_eq!(back.location, cfg.location);
    }
}
