//! DELETE statement.

use super::{Mutation, QueryCore, Statement, StatementKind};
use crate::bindings::ClausePart;
use crate::clause::{build_limit, build_where};
use crate::condition::Conditions;
use crate::error::DbResult;
use crate::sql::Sql;

/// DELETE builder: FROM, WHERE, LIMIT.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    core: QueryCore,
    where_: Conditions,
    limit: Option<u64>,
}

impl Delete {
    pub fn new(table: &str) -> Self {
        Self {
            core: QueryCore::new(table),
            where_: Conditions::new(ClausePart::Where),
            limit: None,
        }
    }

    impl_statement_common!();
    impl_where_methods!();
    impl_limit_methods!();
}

impl Statement for Delete {
    const KIND: StatementKind = StatementKind::Delete;

    fn core(&self) -> &QueryCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore {
        &mut self.core
    }

    fn build(&self) -> DbResult<Sql> {
        let mut sql = Sql::new(format!("DELETE FROM {}", self.core.quoted_table()));
        build_where(&mut sql, &self.where_);
        build_limit(&mut sql, self.limit, 0);
        Ok(sql)
    }
}

impl Mutation for Delete {}
