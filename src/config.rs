//! Application configuration
//!
//! Loaded from a TOML file; every section and key is optional and falls
//! back to its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::crypto::jwt::{JwtConfig, PLACEHOLDER_SECRET};
use crate::infrastructure::DatabaseConfig;
use crate::shared::PageLimits;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "ACCOUNTS_CONFIG";

const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub paging: PagingConfig,
    pub logging: LoggingConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: DatabaseConfig::default().url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        let jwt = JwtConfig::default();
        Self {
            jwt_secret: jwt.secret,
            jwt_issuer: jwt.issuer,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for PagingConfig {
    fn default() -> Self {
        let limits = PageLimits::default();
        Self {
            default_page_size: limits.default_page_size,
            max_page_size: limits.max_page_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Account created on start-up when the store holds none
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            email: "admin@localhost.localdomain".to_string(),
            password: "admin".to_string(),
        }
    }
}

impl AppConfig {
    /// Load and validate `path`. A missing file yields the defaults, which
    /// are only valid once `JWT_SECRET` provides the token secret.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let secret = self.security.jwt_secret.trim();
        if secret.is_empty() || secret == PLACEHOLDER_SECRET {
            return Err(ConfigError::Invalid(
                "security.jwt_secret must be set to the token issuer's secret".to_string(),
            ));
        }
        if self.paging.default_page_size == 0 || self.paging.max_page_size == 0 {
            return Err(ConfigError::Invalid(
                "page sizes must be positive".to_string(),
            ));
        }
        if self.paging.default_page_size > self.paging.max_page_size {
            return Err(ConfigError::Invalid(
                "default_page_size exceeds max_page_size".to_string(),
            ));
        }
        if !BCRYPT_COST_RANGE.contains(&self.security.bcrypt_cost) {
            return Err(ConfigError::Invalid(format!(
                "bcrypt_cost must be between {} and {}",
                BCRYPT_COST_RANGE.start(),
                BCRYPT_COST_RANGE.end()
            )));
        }
        Ok(())
    }

    /// Apply a `--log-level` override, if any.
    pub fn with_log_level(mut self, level: Option<String>) -> Self {
        if let Some(level) = level {
            self.logging.level = level;
        }
        self
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.security.jwt_secret.clone(),
            issuer: self.security.jwt_issuer.clone(),
        }
    }

    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_page_size: self.paging.default_page_size,
            max_page_size: self.paging.max_page_size,
        }
    }
}

/// `$ACCOUNTS_CONFIG`, else `<config dir>/account-panel/config.toml`
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("account-panel")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_secret(raw: &str) -> AppConfig {
        let mut config = AppConfig::from_toml(raw).unwrap();
        config.security.jwt_secret = "issuer-shared-secret".into();
        config
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = with_secret("");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.paging.default_page_size, 20);
        assert_eq!(config.paging.max_page_size, 100);
        assert_eq!(config.security.jwt_issuer, "account-panel");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn placeholder_or_empty_secret_is_invalid() {
        let mut config = with_secret("");
        for secret in ["", "   ", PLACEHOLDER_SECRET] {
            config.security.jwt_secret = secret.to_string();
            assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        }
    }

    #[test]
    fn configured_secret_is_accepted() {
        let config = AppConfig::from_toml(
            r#"
            [security]
            jwt_secret = "issuer-shared-secret"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 9090

            [paging]
            max_page_size = 50

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.page_limits().max_page_size, 50);
        assert_eq!(config.page_limits().default_page_size, 20);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn log_level_override_applies_to_any_config() {
        let config = AppConfig::default().with_log_level(Some("debug".into()));
        assert_eq!(config.logging.level, "debug");

        let config = AppConfig::default().with_log_level(None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn default_page_size_above_max_is_invalid() {
        let config = with_secret(
            r#"
            [paging]
            default_page_size = 200
            "#,
        );
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_yields_default_sections() {
        let path = Path::new("/nonexistent/account-panel.toml");
        match AppConfig::load(path) {
            // JWT_SECRET set in the environment
            Ok(config) => assert_eq!(config.admin.username, "admin"),
            Err(e) => assert!(matches!(e, ConfigError::Invalid(_))),
        }
    }
}
