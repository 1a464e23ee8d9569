//! Configuration management for CineHub
//!
//! Handles config file loading/saving and API endpoint resolution.
//! Config is stored at ~/.config/cinehub/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// API used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Environment variable overriding the configured API URL
pub const API_URL_ENV: &str = "CINEHUB_API_URL";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the CineHub API, including the `/api` prefix
    pub api_url: Option<String>,
    /// Where the session token and user are persisted
    pub session_file: Option<PathBuf>,
}

impl Config {
    /// Get config file path (~/.config/cinehub/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cinehub").join("config.toml"))
    }

    /// Load config from the default location, or defaults if missing
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from `path`; a missing or malformed file yields defaults
    pub fn load_from(path: &Path) -> Self {
        let Ok(raw) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Self::default()
            }
        }
    }

    /// Save config to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Resolve the API URL with fallback chain:
    /// 1. Explicit override (command-line flag)
    /// 2. Environment variable CINEHUB_API_URL
    /// 3. `api_url` from the config file
    /// 4. DEFAULT_API_URL
    pub fn api_url(&self, cli_override: Option<&str>) -> String {
        let env = std::env::var(API_URL_ENV).ok();
        resolve_api_url(cli_override, env.as_deref(), self.api_url.as_deref())
    }

    /// Session file location (~/.local/share/cinehub/session.json by default)
    pub fn session_path(&self) -> Option<PathBuf> {
        self.session_file.clone().or_else(|| {
            dirs::data_dir().map(|p| p.join("cinehub").join("session.json"))
        })
    }
}

fn resolve_api_url(cli: Option<&str>, env: Option<&str>, file: Option<&str>) -> String {
    [cli, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.api_url.is_none());
        assert!(config.session_file.is_none());
    }

    #[test]
    fn test_api_url_precedence() {
        assert_eq!(resolve_api_url(None, None, None), DEFAULT_API_URL);
        assert_eq!(resolve_api_url(None, None, Some("http://file")), "http://file");
        assert_eq!(
            resolve_api_url(None, Some("http://env"), Some("http://file")),
            "http://env"
        );
        assert_eq!(
            resolve_api_url(Some("http://cli"), Some("http://env"), Some("http://file")),
            "http://cli"
        );
        assert_eq!(resolve_api_url(Some(" "), None, Some("http://file")), "http://file");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_url = \"https://cinehub.example/api\"\nsession_file = \"/tmp/s.json\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.api_url.as_deref(), Some("https://cinehub.example/api"));
        assert_eq!(config.session_path(), Some(PathBuf::from("/tmp/s.json")));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            api_url: Some("http://x/api".into()),
            session_file: None,
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_load_from_missing_or_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_from(&dir.path().join("nope.toml")), Config::default());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "api_url = [").unwrap();
        assert_eq!(Config::load_from(&bad), Config::default());
    }
}
