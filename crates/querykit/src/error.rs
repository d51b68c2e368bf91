//! Error types for querykit

use crate::definition::Engine;
use thiserror::Error;

/// Result type alias for querykit operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum DbError {
    /// A fulltext index was combined with an engine that cannot hold one
    #[error("Fulltext index on table \"{table}\" requires the MyISAM engine, got {engine}")]
    FulltextEngine { table: String, engine: Engine },

    /// INSERT/UPDATE/CREATE assembled with nothing to write
    #[error("{statement} on table \"{table}\" has no fields")]
    EmptyFields {
        statement: &'static str,
        table: String,
    },

    /// No executor configured for the statement
    #[error("No database connection configured")]
    NoConnection,

    /// The database rejected or failed the statement
    #[error("Query failed \"{sql}\": [{code}] {message}")]
    Query {
        sql: String,
        code: String,
        message: String,
    },

    /// Key column requested from a result set that lacks it
    #[error("Result set has no key column \"{0}\"")]
    MissingKey(String),

    /// Value column requested from a result set that lacks it
    #[error("Result set has no column \"{0}\"")]
    MissingColumn(String),

    /// Row could not be mapped into the requested type
    #[error("Decode error: {0}")]
    Decode(String),

    /// Statement state is invalid
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(String),
}

impl DbError {
    /// Create a query execution error carrying the driver's native code and message
    pub fn query(
        sql: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Query {
            sql: sql.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create an empty-statement error
    pub fn empty_fields(statement: &'static str, table: impl Into<String>) -> Self {
        Self::EmptyFields {
            statement,
            table: table.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a configuration error raised before any I/O
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::FulltextEngine { .. }
                | Self::EmptyFields { .. }
                | Self::Validation(_)
                | Self::Config(_)
        )
    }

    /// Check if this is a missing-connection error
    pub fn is_no_connection(&self) -> bool {
        matches!(self, Self::NoConnection)
    }

    /// Check if this is a query execution error
    pub fn is_query_error(&self) -> bool {
        matches!(self, Self::Query { .. })
    }

    /// Native driver error code, for query execution errors
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Query { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<toml::de::Error> for DbError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
