//! Configuration infrastructure
//!
//! Settings are layered, later sources winning:
//! 1. Built-in defaults (`defaults` module)
//! 2. Optional config file (TOML/JSON/YAML, picked by extension)
//! 3. `PRODUCT_SCOUT_*` environment variables, `__` between nested keys
//!    (e.g. `PRODUCT_SCOUT_SCRAPER__TIMEOUT_SECONDS=5`)
//! 4. The bare `PORT` and `CORS_ORIGIN` variables used by container hosts

#![allow(clippy::uninlined_format_args)]

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::infrastructure::parsing::ListingSelectors;

/// Default values, kept in one place
pub mod defaults {
    pub const SERVER_HOST: &str = "0.0.0.0";
    pub const SERVER_PORT: u16 = 3000;

    pub const BASE_URL: &str = "https://www.amazon.com.br";
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 10;
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    pub const ACCEPT_LANGUAGE: &str = "pt-BR,pt;q=0.9,en;q=0.8";

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = false;
    pub const LOG_DIRECTORY: &str = "logs";
    pub const LOG_FILE_PREFIX: &str = "product-scout.log";

    pub const ENV_PREFIX: &str = "PRODUCT_SCOUT";
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    FileLoad {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },

    #[error("Environment variable error: {message}")]
    Environment { message: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub scraper: ScraperConfig,
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed to call the API from a browser; no CORS header when unset
    pub cors_origin: Option<String>,
}

/// Outbound scraping settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Site root the search path is appended to
    pub base_url: String,

    /// Wait budget for one fetch
    pub timeout_seconds: u64,

    pub user_agent: String,
    pub accept_language: String,

    /// Listing layout selectors
    pub selectors: ListingSelectors,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs (file output)
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for log files, relative paths resolve against the working directory
    pub directory: String,

    /// Log file name; a date suffix is appended on daily rotation
    pub file_prefix: String,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
            cors_origin: None,
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            user_agent: defaults::USER_AGENT.to_string(),
            accept_language: defaults::ACCEPT_LANGUAGE.to_string(),
            selectors: ListingSelectors::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            directory: defaults::LOG_DIRECTORY.to_string(),
            file_prefix: defaults::LOG_FILE_PREFIX.to_string(),
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("html5ever".to_string(), "warn".to_string());
                filters.insert("actix_server".to_string(), "info".to_string());
                filters.insert("actix_web".to_string(), "info".to_string());
                filters
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from the optional file and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(path, None)
    }

    /// Load configuration, reading variables from `env` instead of the process
    /// environment when it is given
    pub fn load_from(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env.clone()),
            )
            .build()?;

        let mut config: Self = settings.try_deserialize()?;
        config.apply_host_env(|key| match &env {
            Some(vars) => vars.get(key).cloned(),
            None => std::env::var(key).ok(),
        })?;
        config.validate()?;

        info!(
            "Configuration loaded: port={}, base_url={}, timeout={}s",
            config.server.port, config.scraper.base_url, config.scraper.timeout_seconds
        );
        Ok(config)
    }

    /// Apply the bare `PORT` / `CORS_ORIGIN` variables
    fn apply_host_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(port) = lookup("PORT").filter(|p| !p.trim().is_empty()) {
            self.server.port = port.trim().parse().map_err(|e| ConfigError::Environment {
                message: format!("PORT must be a port number, got '{}': {}", port, e),
            })?;
        }

        if let Some(origin) = lookup("CORS_ORIGIN").filter(|o| !o.trim().is_empty()) {
            self.server.cors_origin = Some(origin.trim().to_string());
        }

        Ok(())
    }

    /// Validate settings that would otherwise fail at first use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        if self.scraper.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                message: "scraper.timeout_seconds must be greater than 0".to_string(),
            });
        }

        match Url::parse(&self.scraper.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::Validation {
                    message: format!("scraper.base_url must be http(s), got scheme '{}'", url.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::Validation {
                    message: format!("scraper.base_url is not a valid URL: {}", e),
                });
            }
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "logging.level must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect())
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::load_from(None, env(&[])).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.scraper.timeout_seconds, 10);
        assert!(config.server.cors_origin.is_none());
        assert!(config.logging.console_output);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[scraper]
timeout_seconds = 5

[scraper.selectors]
rating = "span.rating"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(Some(file.path()), env(&[])).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, defaults::SERVER_HOST);
        assert_eq!(config.scraper.timeout_seconds, 5);
        assert_eq!(config.scraper.selectors.rating, "span.rating");
        assert_eq!(config.scraper.selectors.image, "img.s-image");
    }

    #[test]
    fn test_prefixed_environment_overrides() {
        let config = AppConfig::load_from(
            None,
            env(&[
                ("PRODUCT_SCOUT_SERVER__PORT", "4000"),
                ("PRODUCT_SCOUT_SCRAPER__BASE_URL", "http://localhost:9000"),
            ]),
        )
        .unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.scraper.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_host_variables() {
        let config = AppConfig::load_from(
            None,
            env(&[("PORT", "5050"), ("CORS_ORIGIN", "http://localhost:5173")]),
        )
        .unwrap();

        assert_eq!(config.server.port, 5050);
        assert_eq!(config.server.cors_origin.as_deref(), Some("http://localhost:5173"));

        let err = AppConfig::load_from(None, env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Environment { .. }));
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.scraper.timeout_seconds = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));

        config.scraper.timeout_seconds = 10;
        config.scraper.base_url = "ftp://example.com".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));

        config.scraper.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));
    }
}
