//! Statement factory wrapping an executor.

use crate::bindings::BoundValues;
use crate::client::Executor;
use crate::config::DbConfig;
use crate::error::{DbError, DbResult};
use crate::query::{
    Alter, Create, Delete, DropTable, Insert, Select, Statement, StatementKind, Truncate, Update,
};
use crate::row::Row;
use std::sync::{Mutex, PoisonError};
use tracing::Level;

/// Cut `sql` to at most `max_bytes`, on a char boundary.
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// Entry point: builds statements with the configured prefix and runs them
/// through the wrapped executor, logging each one.
///
/// `Db` itself implements [`Executor`], so statements run against it:
///
/// ```ignore
/// let db = Db::new(DbConfig::new().prefix("cms_"), my_executor);
/// let pages = db.select("pages").where_active().fetch_all(&db).await?;
/// ```
#[derive(Debug)]
pub struct Db<E> {
    config: DbConfig,
    executor: Option<E>,
    queries: Mutex<Vec<String>>,
}

impl<E> Db<E> {
    pub fn new(config: DbConfig, executor: E) -> Self {
        Self {
            config,
            executor: Some(executor),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// A factory that can build statements but fails every execution with
    /// [`DbError::NoConnection`].
    pub fn without_connection(config: DbConfig) -> Self {
        Self {
            config,
            executor: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    pub fn prefix(&self) -> Option<&str> {
        self.config.prefix.as_deref()
    }

    pub fn executor(&self) -> Option<&E> {
        self.executor.as_ref()
    }

    fn stamp<S: Statement>(&self, mut statement: S) -> S {
        statement.core_mut().set_prefix(self.config.prefix.clone());
        statement
    }

    pub fn select(&self, table: &str) -> Select {
        self.stamp(Select::new(table))
    }

    pub fn insert(&self, table: &str) -> Insert {
        self.stamp(Insert::new(table))
    }

    pub fn update(&self, table: &str) -> Update {
        self.stamp(Update::new(table))
    }

    pub fn delete(&self, table: &str) -> Delete {
        self.stamp(Delete::new(table))
    }

    pub fn create(&self, table: &str) -> Create {
        self.stamp(Create::new(table))
    }

    pub fn alter(&self, table: &str) -> Alter {
        self.stamp(Alter::new(table))
    }

    pub fn drop(&self, table: &str) -> DropTable {
        self.stamp(DropTable::new(table))
    }

    pub fn truncate(&self, table: &str) -> Truncate {
        self.stamp(Truncate::new(table))
    }

    /// SQL executed so far, when `record_queries` is on.
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn queries_count(&self) -> usize {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn clear_queries(&self) {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.config.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    fn before(&self, sql: &str, values: &BoundValues) {
        if self.config.record_queries {
            self.queries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(sql.to_string());
        }
        if !self.config.log_sql {
            return;
        }

        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let kind = StatementKind::detect(sql).map_or("-", |k| k.as_str());
        let sql = self.truncate_sql(sql);
        emit_at_level!(
            Level::from(self.config.log_level),
            target: "querykit.sql",
            kind,
            param_count = values.len(),
            sql = %sql,
        );
    }

    fn after<T>(&self, sql: &str, result: DbResult<T>) -> DbResult<T> {
        if let Err(err) = &result {
            tracing::warn!(
                target: "querykit.sql",
                code = err.code().unwrap_or("-"),
                sql = %self.truncate_sql(sql),
                error = %err,
                "query failed"
            );
        }
        result
    }

    fn connection(&self) -> DbResult<&E> {
        self.executor.as_ref().ok_or(DbError::NoConnection)
    }
}

impl<E: Executor> Executor for Db<E> {
    fn query(
        &self,
        sql: &str,
        values: &BoundValues,
    ) -> impl std::future::Future<Output = DbResult<Vec<Row>>> + Send {
        async move {
            let conn = self.connection()?;
            self.before(sql, values);
            let result = conn.query(sql, values).await;
            self.after(sql, result)
        }
    }

    fn execute(
        &self,
        sql: &str,
        values: &BoundValues,
    ) -> impl std::future::Future<Output = DbResult<u64>> + Send {
        async move {
            let conn = self.connection()?;
            self.before(sql, values);
            let result = conn.execute(sql, values).await;
            self.after(sql, result)
        }
    }

    fn insert(
        &self,
        sql: &str,
        values: &BoundValues,
    ) -> impl std::future::Future<Output = DbResult<u64>> + Send {
        async move {
            let conn = self.connection()?;
            self.before(sql, values);
            let result = conn.insert(sql, values).await;
            self.after(sql, result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_sql_bytes("SELECT 1", 100), "SELECT 1");
        assert_eq!(truncate_sql_bytes("ab\u{e9}cd", 3), "ab");
    }

    #[test]
    fn statements_carry_prefix() {
        let db: Db<()> = Db::without_connection(DbConfig::new().prefix("yeah_"));
        assert_eq!(
            db.select("pages p").to_sql().unwrap(),
            "SELECT * FROM `yeah_pages` `p`"
        );
        assert_eq!(db.truncate("pages").to_sql().unwrap(), "TRUNCATE TABLE `yeah_pages`");
        assert_eq!(db.prefix(), Some("yeah_"));
    }

    #[test]
    fn long_sql_is_truncated_for_logging() {
        let db: Db<()> = Db::without_connection(DbConfig::new().max_sql_length(6));
        assert_eq!(db.truncate_sql("SELECT * FROM t"), "SELECT...");
    }
}
