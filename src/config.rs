//! Client configuration.
//!
//! Configuration is stored in `config.yaml` under the quicknotes home and
//! includes:
//! - The note service API URL
//! - An optional request timeout
//!
//! The home is `$QUICKNOTES_HOME` when set, otherwise the platform config
//! directory. The session cookie lives next to the config file.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{NoteError, Result};

/// API root used when nothing is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Environment variable overriding the quicknotes home directory.
pub const HOME_ENV: &str = "QUICKNOTES_HOME";

/// Environment variable overriding the configured API URL.
pub const API_URL_ENV: &str = "QUICKNOTES_API_URL";

/// Keys accepted by `config set`.
pub const VALID_KEYS: &[&str] = &["api_url", "request_timeout_secs"];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root of the note service API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds. Unset means the HTTP client default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

/// Directory holding the config file and the session cookie.
pub fn quicknotes_home() -> Result<PathBuf> {
    if let Ok(home) = env::var(HOME_ENV)
        && !home.is_empty()
    {
        return Ok(PathBuf::from(home));
    }

    ProjectDirs::from("", "", "quicknotes")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            NoteError::Config(format!(
                "cannot determine a home directory; set {HOME_ENV}"
            ))
        })
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        Ok(quicknotes_home()?.join("config.yaml"))
    }

    /// Get the path to the session cookie
    pub fn session_path() -> Result<PathBuf> {
        Ok(quicknotes_home()?.join("session.json"))
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            NoteError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            NoteError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;
        Ok(())
    }

    /// API URL from the environment, the config file, or the default, in
    /// that order.
    pub fn api_url(&self) -> String {
        if let Ok(url) = env::var(API_URL_ENV)
            && !url.is_empty()
        {
            return url;
        }

        self.api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Set the API URL after checking it parses as an http(s) URL.
    pub fn set_api_url(&mut self, url: &str) -> Result<()> {
        let parsed = Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(NoteError::Config(format!(
                "API URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        self.api_url = Some(url.to_string());
        Ok(())
    }

    /// Set the request timeout. Zero clears it.
    pub fn set_request_timeout_secs(&mut self, seconds: u64) {
        self.request_timeout_secs = (seconds > 0).then_some(seconds);
    }

    /// Set a value by key, as used by `config set`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_url" => self.set_api_url(value),
            "request_timeout_secs" => {
                let seconds = value.parse::<u64>().map_err(|_| {
                    NoteError::Config(format!(
                        "invalid value '{value}' for request_timeout_secs. Expected a number of seconds"
                    ))
                })?;
                self.set_request_timeout_secs(seconds);
                Ok(())
            }
            _ => Err(NoteError::Config(format!(
                "unknown config key '{key}'. Valid keys: {}",
                VALID_KEYS.join(", ")
            ))),
        }
    }
}
