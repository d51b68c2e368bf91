//! INSERT statement.

use super::{QueryCore, Statement, StatementKind};
use crate::bindings::ClausePart;
use crate::clause::{build_names, build_values};
use crate::client::Executor;
use crate::error::{DbError, DbResult};
use crate::quote::clean_key_name;
use crate::sql::Sql;
use crate::value::Value;

/// INSERT builder: `INSERT INTO t (cols) VALUES (:insert_col, ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    core: QueryCore,
    fields: Vec<String>,
}

impl Insert {
    pub fn new(table: &str) -> Self {
        Self {
            core: QueryCore::new(table),
            fields: Vec::new(),
        }
    }

    impl_statement_common!();

    /// Set a column value. Setting a column again overwrites its value.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.core.bindings_mut().set(ClausePart::Insert, column, value);
        let key = clean_key_name(column);
        if !self.fields.iter().any(|f| clean_key_name(f) == key) {
            self.fields.push(column.to_string());
        }
        self
    }

    /// Set several column values.
    pub fn set_all<K, V>(self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        pairs
            .into_iter()
            .fold(self, |q, (column, value)| q.set(column.as_ref(), value))
    }

    /// Execute and return the generated key.
    pub async fn execute(&mut self, conn: &impl Executor) -> DbResult<u64> {
        let sql = self.make(false)?;
        let values = self.bound_values();
        conn.insert(&sql, &values).await
    }
}

impl Statement for Insert {
    const KIND: StatementKind = StatementKind::Insert;

    fn core(&self) -> &QueryCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore {
        &mut self.core
    }

    fn build(&self) -> DbResult<Sql> {
        if self.fields.is_empty() {
            return Err(DbError::empty_fields("INSERT", self.core.table()));
        }

        let mut sql = Sql::new(format!(
            "INSERT INTO {} ({}) VALUES (",
            self.core.quoted_table(),
            build_names(&self.fields)
        ));
        sql.push_sql(build_values(ClausePart::Insert, &self.fields))
            .push(")");
        Ok(sql)
    }
}
