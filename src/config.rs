use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::Result;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub gemini_api_key: String,
    pub model: String,
    pub api_base_url: String,
    /// Upper bound for a single model call. Zero disables the timeout.
    pub request_timeout_secs: u64,
    /// Overrides the default favorites location under the data dir.
    pub favorites_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            model: DEFAULT_MODEL.into(),
            api_base_url: DEFAULT_API_BASE_URL.into(),
            request_timeout_secs: 60,
            favorites_path: None,
        }
    }
}

impl Config {
    /// Directory: ~/.config/chefia/
    fn dir() -> PathBuf {
        let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("chefia");
        p
    }

    fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load from disk, returning defaults if file doesn't exist or is invalid.
    /// `GEMINI_API_KEY` wins over the stored key.
    pub fn load() -> Self {
        let mut config = match fs::read_to_string(Self::path()) {
            Ok(data) => Self::parse(&data),
            Err(_) => Self::default(),
        };
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.gemini_api_key = key;
            }
        }
        config
    }

    fn parse(data: &str) -> Self {
        serde_json::from_str(data).unwrap_or_else(|e| {
            log::warn!("Ignoring invalid config file: {e}");
            Self::default()
        })
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(Self::dir())?;
        let data = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(Self::path(), data)?;
        Ok(())
    }

    /// Where favorites live: the configured path or ~/.local/share/chefia/favorites.json
    pub fn favorites_file(&self) -> PathBuf {
        self.favorites_path.clone().unwrap_or_else(|| {
            let mut p = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push("chefia");
            p.push("favorites.json");
            p
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse(r#"{"gemini_api_key": "abc"}"#);
        assert_eq!(config.gemini_api_key, "abc");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        assert_eq!(Config::parse("not json"), Config::default());
    }

    #[test]
    fn test_favorites_override() {
        let config = Config {
            favorites_path: Some(PathBuf::from("/tmp/favs.json")),
            ..Config::default()
        };
        assert_eq!(config.favorites_file(), PathBuf::from("/tmp/favs.json"));
        assert!(Config::default().favorites_file().ends_with("chefia/favorites.json"));
    }
}
