//! Configuration loading for step-client.
//!
//! Configuration is loaded from a TOML file (default: `twostep.toml` in the
//! data directory). Every field has a default, so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration for the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// State service configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Weather lookup configuration.
    #[serde(default)]
    pub weather: WeatherConfig,
}

/// State service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the state service (default: http://localhost:5000).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Name of the session cookie (default: session).
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
}

/// Weather lookup configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Look up the weather at startup to pick the initial color (default: false).
    #[serde(default)]
    pub enabled: bool,
    /// weatherapi.com API key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Location query (default: tel aviv).
    #[serde(default = "default_location")]
    pub location: String,
    /// API base URL (default: http://api.weatherapi.com).
    #[serde(default = "default_weather_url")]
    pub base_url: String,
    /// Lookup timeout in seconds (default: 3).
    #[serde(default = "default_weather_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_session_cookie() -> String {
    "session".to_string()
}

fn default_location() -> String {
    "tel aviv".to_string()
}

fn default_weather_url() -> String {
    "http://api.weatherapi.com".to_string()
}

fn default_weather_timeout_secs() -> u64 {
    3
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            session_cookie: default_session_cookie(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            location: default_location(),
            base_url: default_weather_url(),
            timeout_secs: default_weather_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write configuration as TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;
        std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// Failed to serialize configuration.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] toml::ser::Error),
    /// Failed to write configuration file.
    #[error("failed to write config file {path}: {source}")]
    WriteError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_file_gives_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.server.base_url, "http://localhost:5000");
        assert_eq!(config.server.session_cookie, "session");
        assert!(!config.weather.enabled);
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [server]
            base_url = "https://steps.example.com"

            [weather]
            enabled = true
            api_key = "k"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.base_url, "https://steps.example.com");
        assert_eq!(config.server.request_timeout_secs, 10);
        assert!(config.weather.enabled);
        assert_eq!(config.weather.api_key.as_deref(), Some("k"));
        assert_eq!(config.weather.location, "tel aviv");
        assert_eq!(config.weather.timeout_secs, 3);
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("twostep.toml");
        let mut config = ClientConfig::default();
        config.server.request_timeout_secs = 3;

        config.save(&path).unwrap();
        let loaded = ClientConfig::from_file(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let loaded = ClientConfig::load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(loaded, ClientConfig::default());
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "server = 5").unwrap();

        let err = ClientConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }
}
