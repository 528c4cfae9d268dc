//! Application configuration management.
//!
//! Configuration lives at `~/.config/projtrack/config.json` and holds the
//! backend origin, the last used email and the request timeout. The backend
//! origin can be overridden with the `PROJTRACK_API_URL` environment
//! variable (also read from a `.env` file by the CLI).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_TIMEOUT_SECS;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "projtrack";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable naming the backend origin
pub const API_URL_ENV: &str = "PROJTRACK_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    pub last_email: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Backend origin from the environment, else the config file
    pub fn api_url(&self) -> Result<String> {
        resolve_api_url(std::env::var(API_URL_ENV).ok(), self.api_url.as_deref())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

/// Pick the backend origin: a non-blank environment value wins over the
/// config file; neither is an error.
pub fn resolve_api_url(env: Option<String>, file: Option<&str>) -> Result<String> {
    env.as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .or_else(|| file.map(str::trim).filter(|url| !url.is_empty()))
        .map(str::to_string)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No API URL configured. Set {} or add \"api_url\" to {}",
                API_URL_ENV,
                Config::config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| CONFIG_FILE.to_string())
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_wins_over_file() {
        let url = resolve_api_url(
            Some("http://env.example:8000".into()),
            Some("http://file.example"),
        )
        .unwrap();
        assert_eq!(url, "http://env.example:8000");
    }

    #[test]
    fn test_file_used_when_env_missing_or_blank() {
        assert_eq!(
            resolve_api_url(None, Some(" http://file.example ")).unwrap(),
            "http://file.example"
        );
        assert_eq!(
            resolve_api_url(Some("  ".into()), Some("http://file.example")).unwrap(),
            "http://file.example"
        );
    }

    #[test]
    fn test_missing_url_is_an_error() {
        let err = resolve_api_url(None, None).unwrap_err();
        assert!(err.to_string().contains(API_URL_ENV));
        assert!(resolve_api_url(None, Some("")).is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.api_url.is_none());
        assert_eq!(config.request_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let config: Config = serde_json::from_str(r#"{"request_timeout_secs": 5}"#).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }
}
