//! UPDATE statement.

use super::{Mutation, QueryCore, Statement, StatementKind};
use crate::bindings::ClausePart;
use crate::clause::{build_limit, build_set, build_where};
use crate::condition::{Conditions, Term};
use crate::error::{DbError, DbResult};
use crate::sql::Sql;
use crate::value::Value;

/// UPDATE builder: SET, WHERE, LIMIT.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    core: QueryCore,
    set: Conditions,
    where_: Conditions,
    limit: Option<u64>,
}

impl Update {
    pub fn new(table: &str) -> Self {
        Self {
            core: QueryCore::new(table),
            set: Conditions::new(ClausePart::Set),
            where_: Conditions::new(ClausePart::Where),
            limit: None,
        }
    }

    impl_statement_common!();
    impl_where_methods!();
    impl_limit_methods!();

    /// `` `column`=:set_column ``. Later calls for one column overwrite.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.set.apply(self.core.bindings_mut(), Term::eq(column, value));
        self
    }

    /// Several `set` calls at once.
    pub fn set_all<K, V>(self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        pairs
            .into_iter()
            .fold(self, |q, (column, value)| q.set(column.as_ref(), value))
    }

    /// A raw assignment such as `` `date`=now() ``, included verbatim.
    pub fn set_expression(mut self, expression: &str) -> Self {
        self.set.push_raw(expression);
        self
    }
}

impl Statement for Update {
    const KIND: StatementKind = StatementKind::Update;

    fn core(&self) -> &QueryCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore {
        &mut self.core
    }

    fn build(&self) -> DbResult<Sql> {
        if self.set.is_empty() {
            return Err(DbError::empty_fields("UPDATE", self.core.table()));
        }

        let mut sql = Sql::new(format!("UPDATE {}", self.core.quoted_table()));
        build_set(&mut sql, &self.set);
        build_where(&mut sql, &self.where_);
        build_limit(&mut sql, self.limit, 0);
        Ok(sql)
    }
}

impl Mutation for Update {}
