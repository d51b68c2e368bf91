//! Factory configuration.

use crate::error::{DbError, DbResult};
use serde::Deserialize;
use std::path::Path;
use tracing::Level;

/// Level SQL events are emitted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    #[default]
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Configuration for a [`Db`](crate::Db) factory.
///
/// Built in code with the setters below, or read from TOML:
///
/// ```
/// use querykit::DbConfig;
///
/// let config = DbConfig::from_toml_str(r#"
///     prefix = "yeah_"
///     log_level = "info"
///     max_sql_length = 120
/// "#).unwrap();
/// assert_eq!(config.prefix.as_deref(), Some("yeah_"));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DbConfig {
    /// Prefix stamped onto every table name.
    pub prefix: Option<String>,
    /// Emit a tracing event per executed statement.
    pub log_sql: bool,
    pub log_level: LogLevel,
    /// Truncate logged SQL (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
    /// Keep executed SQL for [`Db::queries`](crate::Db::queries).
    pub record_queries: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            prefix: None,
            log_sql: true,
            log_level: LogLevel::Debug,
            max_sql_length: Some(200),
            record_queries: false,
        }
    }
}

impl DbConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = (!prefix.is_empty()).then_some(prefix);
        self
    }

    /// Disable SQL logging.
    pub fn no_logging(mut self) -> Self {
        self.log_sql = false;
        self
    }

    /// Override the tracing event level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_sql = true;
        self.log_level = level;
        self
    }

    /// Set maximum logged SQL length.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Keep executed SQL in memory.
    pub fn record_queries(mut self, on: bool) -> Self {
        self.record_queries = on;
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> DbResult<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DbError::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// The prefix may only hold identifier characters.
    pub fn validate(&self) -> DbResult<()> {
        if let Some(prefix) = &self.prefix {
            if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(DbError::Config(format!(
                    "table prefix must be [A-Za-z0-9_], got \"{prefix}\""
                )));
            }
        }
        if self.max_sql_length == Some(0) {
            return Err(DbError::Config("max_sql_length must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DbConfig::default();
        assert!(config.prefix.is_none());
        assert!(config.log_sql);
        assert_eq!(config.max_sql_length, Some(200));
        assert_eq!(Level::from(config.log_level), Level::DEBUG);
    }

    #[test]
    fn builder_setters() {
        let config = DbConfig::new()
            .prefix("cms_")
            .log_level(LogLevel::Info)
            .no_truncate()
            .record_queries(true);
        assert_eq!(config.prefix.as_deref(), Some("cms_"));
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.max_sql_length, None);
        assert!(config.record_queries);
        assert!(DbConfig::new().prefix("").prefix.is_none());
    }

    #[test]
    fn toml_missing_fields_use_defaults() {
        let config = DbConfig::from_toml_str("record_queries = true").unwrap();
        assert!(config.record_queries);
        assert!(config.log_sql);
        assert_eq!(config.max_sql_length, Some(200));
    }

    #[test]
    fn toml_rejects_bad_prefix() {
        let err = DbConfig::from_toml_str(r#"prefix = "a b""#).unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        let err = DbConfig::from_toml_str("prefx = \"x\"").unwrap_err();
        assert!(err.is_config_error());
    }
}
