//! Result rows and row mapping.

use crate::error::{DbError, DbResult};
use crate::value::Value;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;

/// One result row: column name → value, in result-set column order.
pub type Row = IndexMap<String, Value>;

/// Trait for types that can be built from a [`Row`].
///
/// Every `serde` deserializable type gets an implementation: the row is read
/// as a JSON object keyed by column name.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> DbResult<Self>;
}

impl<T: DeserializeOwned> FromRow for T {
    fn from_row(row: &Row) -> DbResult<Self> {
        let object = serde_json::to_value(row)?;
        Ok(serde_json::from_value(object)?)
    }
}

/// Extension trait for reading columns out of a [`Row`].
pub trait RowExt {
    /// Get a column value, failing with [`DbError::MissingColumn`] when absent.
    fn try_get(&self, column: &str) -> DbResult<&Value>;
}

impl RowExt for Row {
    fn try_get(&self, column: &str) -> DbResult<&Value> {
        self.get(column)
            .ok_or_else(|| DbError::MissingColumn(column.to_string()))
    }
}
