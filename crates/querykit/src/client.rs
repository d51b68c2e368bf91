//! Execution adapter trait.

use crate::bindings::BoundValues;
use crate::error::DbResult;
use crate::row::Row;

/// Anything that can run assembled statements against a database.
///
/// `sql` always carries `:name` placeholders and `values` maps each
/// placeholder (with its leading `:`) to its value. Implementations report
/// database failures as [`DbError::Query`](crate::DbError::Query) with the
/// driver's native code, untouched.
pub trait Executor: Send + Sync {
    /// Run a statement that produces rows.
    fn query(
        &self,
        sql: &str,
        values: &BoundValues,
    ) -> impl std::future::Future<Output = DbResult<Vec<Row>>> + Send;

    /// Run a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        values: &BoundValues,
    ) -> impl std::future::Future<Output = DbResult<u64>> + Send;

    /// Run an INSERT and return the generated key.
    fn insert(
        &self,
        sql: &str,
        values: &BoundValues,
    ) -> impl std::future::Future<Output = DbResult<u64>> + Send;
}

impl<E: Executor> Executor for &E {
    fn query(
        &self,
        sql: &str,
        values: &BoundValues,
    ) -> impl std::future::Future<Output = DbResult<Vec<Row>>> + Send {
        (**self).query(sql, values)
    }

    fn execute(
        &self,
        sql: &str,
        values: &BoundValues,
    ) -> impl std::future::Future<Output = DbResult<u64>> + Send {
        (**self).execute(sql, values)
    }

    fn insert(
        &self,
        sql: &str,
        values: &BoundValues,
    ) -> impl std::future::Future<Output = DbResult<u64>> + Send {
        (**self).insert(sql, values)
    }
}
