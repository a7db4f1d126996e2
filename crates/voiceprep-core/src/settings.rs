//! Persistent settings for the upload backend.
//!
//! Stored as JSON at `<config_dir>/voiceprep/settings.json`. Environment
//! variables override stored values, so a `.env` file or CI variables can
//! point the client at another backend without touching the file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Backend used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout in seconds (5 minutes for large recordings).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Environment override for [`Settings::api_base_url`].
pub const API_BASE_URL_ENV: &str = "VOICEPREP_API_BASE_URL";

/// Environment override for [`Settings::timeout_secs`].
pub const TIMEOUT_SECS_ENV: &str = "VOICEPREP_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL that upload paths and relative result URLs are joined onto
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Whole-request timeout; an expired upload reports a network error
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Settings {
    /// Settings file location, if the platform has a config directory.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("voiceprep").join("settings.json"))
    }

    /// Load stored settings, then apply environment overrides.
    ///
    /// A missing or unreadable file falls back to defaults.
    pub fn load() -> Self {
        let stored = Self::path()
            .and_then(|path| std::fs::read_to_string(&path).ok())
            .and_then(|content| match serde_json::from_str::<Settings>(&content) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    tracing::warn!("ignoring invalid settings file: {e}");
                    None
                }
            })
            .unwrap_or_default();

        stored.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(secs) = lookup(TIMEOUT_SECS_ENV) {
            match secs.trim().parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => tracing::warn!("ignoring invalid {TIMEOUT_SECS_ENV}: {secs}"),
            }
        }
        self
    }

    /// Write settings to [`Settings::path`].
    pub fn save(&self) -> std::io::Result<PathBuf> {
        let path = Self::path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no config directory")
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    /// Base URL without trailing slashes.
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// Validate the base URL shape.
    pub fn validate(&self) -> Result<(), String> {
        let trimmed = self.api_base_url.trim();
        let Some(after_scheme) = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))
        else {
            return Err(format!(
                "Invalid API base URL: must start with http:// or https://\nGot: {trimmed}"
            ));
        };
        if after_scheme.is_empty() || after_scheme.starts_with('/') {
            return Err(format!("Invalid API base URL: missing host\nGot: {trimmed}"));
        }
        if self.timeout_secs == 0 {
            return Err("Timeout must be at least 1 second".to_string());
        }
        Ok(())
    }
}
