use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::messages::MessageTable;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 1000;

/// How the backend signals a successful `/chat` reply
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponseVariant {
    /// `{"success": true, "response": ...}`
    #[default]
    SuccessFlag,
    /// `{"status": "success", "response": ...}`
    StatusString,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub response_variant: ResponseVariant,
    /// `None` disables the local length check
    pub max_message_chars: Option<usize>,
    pub log_level: String,
    pub messages: MessageTable,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            response_variant: ResponseVariant::SuccessFlag,
            max_message_chars: Some(DEFAULT_MAX_MESSAGE_CHARS),
            log_level: "info".to_string(),
            messages: MessageTable::default(),
        }
    }

    /// Load the user's config, falling back to defaults when the file is
    /// unreadable. `KUMTANESI_URL` applies either way; the load error is handed
    /// back so it can be logged once logging is up.
    pub fn load() -> (Self, Option<anyhow::Error>) {
        let url = std::env::var("KUMTANESI_URL").ok();
        match Self::get_config_path() {
            Ok(path) => Self::load_with_override(&path, url),
            Err(err) => {
                let mut config = Self::new();
                config.apply_url_override(url);
                (config, Some(err))
            }
        }
    }

    pub fn load_with_override(path: &Path, url: Option<String>) -> (Self, Option<anyhow::Error>) {
        let (mut config, error) = match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(err) => (Self::new(), Some(err)),
        };

        // Environment wins over the config file
        config.apply_url_override(url);
        (config, error)
    }

    fn apply_url_override(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|url| !url.trim().is_empty()) {
            self.base_url = url;
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("kumtanesi"))
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::new());
        assert_eq!(config.max_message_chars, Some(1000));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::new();
        config.base_url = "http://chat.local:8080".to_string();
        config.response_variant = ResponseVariant::StatusString;
        config.max_message_chars = None;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"response_variant": "status_string"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.response_variant, ResponseVariant::StatusString);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.messages, MessageTable::default());
    }

    #[test]
    fn test_url_override_beats_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"base_url": "http://file.local:1234"}"#).unwrap();

        let (config, error) =
            Config::load_with_override(&path, Some("http://env.example:9000".to_string()));
        assert!(error.is_none());
        assert_eq!(config.base_url, "http://env.example:9000");

        let (config, _) = Config::load_with_override(&path, None);
        assert_eq!(config.base_url, "http://file.local:1234");
    }

    #[test]
    fn test_malformed_file_keeps_url_override() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let (config, error) =
            Config::load_with_override(&path, Some("http://env.example:9000".to_string()));
        assert!(error.is_some());
        assert_eq!(config.base_url, "http://env.example:9000");
        assert_eq!(config.max_message_chars, Some(DEFAULT_MAX_MESSAGE_CHARS));
    }
}
