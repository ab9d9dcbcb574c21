//! Directory configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (PostgreSQL store only)
//! - `FACTURO_DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `FACTURO_DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `FACTURO_DB_ACQUIRE_TIMEOUT_SECS` - Pool acquire timeout (default: 10)
//! - `FACTURO_SUCCESS_NOTICE_MS` - How long the settings success notice stays up (default: 3000)
//! - `FACTURO_LOG_FORMAT` - `text` or `json` (default: text)

use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SUCCESS_NOTICE_MS: u64 = 3000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected text or json, got {other:?}")),
        }
    }
}

/// `PostgreSQL` connection settings.
///
/// Implements `Debug` manually to redact the connection string.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Connection URL (contains password)
    pub url: SecretString,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

/// Directory configuration.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Absent when `FACTURO_DATABASE_URL` is unset.
    pub database: Option<DatabaseConfig>,
    /// Display time of the settings success notice
    pub success_notice: Duration,
    pub log_format: LogFormat,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            database: None,
            success_notice: Duration::from_millis(DEFAULT_SUCCESS_NOTICE_MS),
            log_format: LogFormat::Text,
        }
    }
}

impl DirectoryConfig {
    /// Load configuration from environment variables.
    ///
    /// Does not read `.env`; callers run `dotenvy::dotenv()` beforehand.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a set variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = match lookup("FACTURO_DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => Some(DatabaseConfig {
                url: SecretString::from(url),
                max_connections: parse_or(
                    &lookup,
                    "FACTURO_DB_MAX_CONNECTIONS",
                    DEFAULT_MAX_CONNECTIONS,
                )?,
                acquire_timeout: Duration::from_secs(parse_or(
                    &lookup,
                    "FACTURO_DB_ACQUIRE_TIMEOUT_SECS",
                    DEFAULT_ACQUIRE_TIMEOUT_SECS,
                )?),
            }),
            None => None,
        };
        let success_notice = Duration::from_millis(parse_or(
            &lookup,
            "FACTURO_SUCCESS_NOTICE_MS",
            DEFAULT_SUCCESS_NOTICE_MS,
        )?);
        let log_format = parse_or(&lookup, "FACTURO_LOG_FORMAT", LogFormat::Text)?;

        Ok(Self {
            database,
            success_notice,
            log_format,
        })
    }

    /// The database settings, or an error naming the missing variable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if no database URL was configured.
    pub fn require_database(&self) -> Result<&DatabaseConfig, ConfigError> {
        self.database
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("FACTURO_DATABASE_URL".to_owned()))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        _ => Ok(default),
    }
}
