use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::recent::default_storage_dir;
use crate::retry::RetryConfig;
use crate::search::SearchConfig;
use crate::transport::DEFAULT_TIMEOUT;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

pub const ENV_API_BASE_URL: &str = "TICKERLENS_API_BASE_URL";
pub const ENV_ENVIRONMENT: &str = "TICKERLENS_ENV";
pub const ENV_DEBUG: &str = "TICKERLENS_DEBUG";
pub const ENV_TIMEOUT_MS: &str = "TICKERLENS_TIMEOUT_MS";
pub const ENV_STORAGE_DIR: &str = "TICKERLENS_STORAGE_DIR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
    Test,
}

impl Environment {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(ConfigError::InvalidEnvironment {
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TICKERLENS_API_BASE_URL is required in production")]
    MissingBaseUrl,
    #[error("API base URL must start with http:// or https://: '{value}'")]
    InvalidBaseUrl { value: String },
    #[error("unknown environment '{value}'")]
    InvalidEnvironment { value: String },
    #[error("timeout must be a positive number of milliseconds: '{value}'")]
    InvalidTimeout { value: String },
    #[error("{name} must be a boolean: '{value}'")]
    InvalidFlag { name: &'static str, value: String },
}

/// Runtime configuration. Only the endpoint target and log verbosity vary
/// between environments.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub environment: Environment,
    pub debug: bool,
    pub request_timeout: Duration,
    pub retry: RetryConfig,
    pub search: SearchConfig,
    pub storage_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            environment: Environment::default(),
            debug: false,
            request_timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
            search: SearchConfig::default(),
            storage_dir: default_storage_dir(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let environment = var(ENV_ENVIRONMENT)
            .map(|value| value.parse::<Environment>())
            .transpose()?
            .unwrap_or_default();

        let api_base_url = match var(ENV_API_BASE_URL) {
            Some(url) => validate_base_url(&url)?,
            None if environment == Environment::Production => {
                return Err(ConfigError::MissingBaseUrl)
            }
            None => DEFAULT_API_BASE_URL.to_owned(),
        };

        let debug = match var(ENV_DEBUG) {
            Some(value) => parse_flag(ENV_DEBUG, &value)?,
            None => environment == Environment::Development,
        };

        let request_timeout = match var(ENV_TIMEOUT_MS) {
            Some(value) => parse_timeout(&value)?,
            None => DEFAULT_TIMEOUT,
        };

        let storage_dir = var(ENV_STORAGE_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(default_storage_dir);

        Ok(Self {
            api_base_url,
            environment,
            debug,
            request_timeout,
            retry: RetryConfig::default(),
            search: SearchConfig::default(),
            storage_dir,
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.api_base_url = validate_base_url(url)?;
        Ok(self)
    }
}

pub fn validate_base_url(url: &str) -> Result<String, ConfigError> {
    let url = url.trim().trim_end_matches('/');
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(url.to_owned()),
        _ => Err(ConfigError::InvalidBaseUrl {
            value: url.to_owned(),
        }),
    }
}

pub fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(millis) if millis > 0 => Ok(Duration::from_millis(millis)),
        _ => Err(ConfigError::InvalidTimeout {
            value: value.to_owned(),
        }),
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect::<HashMap<_, _>>();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_outside_production() {
        let config = AppConfig::from_lookup(lookup(&[])).expect("config");

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.environment, Environment::Development);
        assert!(config.debug);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn production_requires_base_url() {
        let result = AppConfig::from_lookup(lookup(&[(ENV_ENVIRONMENT, "production")]));
        assert_eq!(result, Err(ConfigError::MissingBaseUrl));

        let config = AppConfig::from_lookup(lookup(&[
            (ENV_ENVIRONMENT, "production"),
            (ENV_API_BASE_URL, "https://api.example.com/api/v1/"),
        ]))
        .expect("config");
        assert_eq!(config.api_base_url, "https://api.example.com/api/v1");
        assert!(!config.debug);
    }

    #[test]
    fn rejects_non_http_base_url() {
        let result = AppConfig::from_lookup(lookup(&[(ENV_API_BASE_URL, "ftp://files")]));
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn parses_timeout_flag_and_storage_dir() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_ENVIRONMENT, "test"),
            (ENV_TIMEOUT_MS, "2500"),
            (ENV_DEBUG, "yes"),
            (ENV_STORAGE_DIR, "/tmp/tickerlens"),
        ]))
        .expect("config");

        assert_eq!(config.request_timeout, Duration::from_millis(2500));
        assert!(config.debug);
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/tickerlens"));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(ENV_TIMEOUT_MS, "0")])),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(ENV_DEBUG, "maybe")])),
            Err(ConfigError::InvalidFlag { .. })
        ));
    }
}
