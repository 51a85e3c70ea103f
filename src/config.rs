use serde::Deserialize;
use std::error;
use std::fmt;
use std::io;
use std::str::FromStr;
use tokio::fs;
use tracing::Level;

pub const CONFIG_PATH: &str = "app_config.json";
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";

#[derive(Debug, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub backend_url: String, // Base URL of the backend, every endpoint lives under it
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64, // How often the selected coin's prices are fetched again, in seconds
    #[serde(default = "default_log_level")]
    pub log_level: String, // One of trace, debug, info, warn, error
}

fn default_refresh_interval_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            refresh_interval_secs: default_refresh_interval_secs(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn max_level(&self) -> Result<Level, ConfigError> {
        Level::from_str(self.log_level.trim()).map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    /// The environment wins over the file. The result always has a usable
    /// base URL without a trailing slash.
    fn finish(mut self, env_backend_url: Option<String>) -> Result<Self, ConfigError> {
        if let Some(url) = env_backend_url.filter(|url| !url.trim().is_empty()) {
            self.backend_url = url;
        }
        self.backend_url = self.backend_url.trim().trim_end_matches('/').to_string();
        if self.backend_url.is_empty() {
            return Err(ConfigError::MissingBackendUrl);
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::InvalidRefreshInterval);
        }
        self.max_level()?;
        Ok(self)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    JsonParse(serde_json::Error),
    MissingBackendUrl,
    InvalidRefreshInterval,
    InvalidLogLevel(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConfigError::Io(ref err) => write!(f, "Config Read Error: {}", err),
            ConfigError::JsonParse(ref err) => write!(f, "Config Parse Error: {}", err),
            ConfigError::MissingBackendUrl => write!(
                f,
                "No backend URL: set `backend_url` in {} or the {} environment variable",
                CONFIG_PATH, BACKEND_URL_ENV
            ),
            ConfigError::InvalidRefreshInterval => write!(f, "`refresh_interval_secs` must be at least 1"),
            ConfigError::InvalidLogLevel(ref level) => write!(f, "Unknown log level '{}'", level),
        }
    }
}

impl error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            ConfigError::Io(ref err) => Some(err),
            ConfigError::JsonParse(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> ConfigError {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> ConfigError {
        ConfigError::JsonParse(err)
    }
}

/// A missing file is fine as long as the environment names the backend.
pub async fn read_config(file_path: &str) -> Result<Config, ConfigError> {
    let config = match fs::read_to_string(file_path).await {
        Ok(config_string) => serde_json::from_str(config_string.as_str())?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Config::default(),
        Err(e) => return Err(e.into()),
    };
    config.finish(std::env::var(BACKEND_URL_ENV).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = serde_json::from_str(r#"{"backend_url": "http://localhost:3000/"}"#).unwrap();
        let config = config.finish(None).unwrap();
        assert_eq!("http://localhost:3000", config.backend_url);
        assert_eq!(60, config.refresh_interval_secs);
        assert_eq!(Level::INFO, config.max_level().unwrap());
    }

    #[test]
    fn test_env_overrides_file() {
        let config: Config = serde_json::from_str(r#"{"backend_url": "http://file", "log_level": "debug"}"#).unwrap();
        let config = config.finish(Some("https://env.example".to_string())).unwrap();
        assert_eq!("https://env.example", config.backend_url);
        assert_eq!(Level::DEBUG, config.max_level().unwrap());

        let config = Config::default().finish(Some("   ".to_string()));
        assert!(matches!(config, Err(ConfigError::MissingBackendUrl)));
    }

    #[test]
    fn test_invalid_values() {
        let config = Config {
            backend_url: "http://x".to_string(),
            refresh_interval_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.finish(None), Err(ConfigError::InvalidRefreshInterval)));

        let config = Config {
            backend_url: "http://x".to_string(),
            log_level: "loud".to_string(),
            ..Default::default()
        };
        let err = config.finish(None).unwrap_err();
        assert_eq!("Unknown log level 'loud'", err.to_string());
    }

    #[tokio::test]
    async fn test_read_config_from_file() {
        let path = std::env::temp_dir().join(format!("coin_dashboard_config_{}.json", std::process::id()));
        tokio::fs::write(&path, r#"{"backend_url": "http://127.0.0.1:8080", "refresh_interval_secs": 30}"#)
            .await
            .unwrap();
        let config = read_config(path.to_str().unwrap()).await;
        tokio::fs::remove_file(&path).await.unwrap();

        // BACKEND_URL in the test environment would override the file
        if std::env::var(BACKEND_URL_ENV).is_err() {
            let config = config.unwrap();
            assert_eq!("http://127.0.0.1:8080", config.backend_url);
            assert_eq!(30, config.refresh_interval_secs);
        }
    }

    #[tokio::test]
    async fn test_read_config_rejects_bad_json() {
        let path = std::env::temp_dir().join(format!("coin_dashboard_bad_{}.json", std::process::id()));
        tokio::fs::write(&path, "{ not json").await.unwrap();
        let config = read_config(path.to_str().unwrap()).await;
        tokio::fs::remove_file(&path).await.unwrap();
        assert!(matches!(config, Err(ConfigError::JsonParse(_))));
    }
}
