//! TRUNCATE TABLE statement.

use super::{Mutation, QueryCore, Statement, StatementKind};
use crate::error::DbResult;
use crate::sql::Sql;

#[derive(Debug, Clone, PartialEq)]
pub struct Truncate {
    core: QueryCore,
}

impl Truncate {
    pub fn new(table: &str) -> Self {
        Self {
            core: QueryCore::new(table),
        }
    }

    impl_statement_common!();
}

impl Statement for Truncate {
    const KIND: StatementKind = StatementKind::Truncate;

    fn core(&self) -> &QueryCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore {
        &mut self.core
    }

    fn build(&self) -> DbResult<Sql> {
        Ok(Sql::new(format!("TRUNCATE TABLE {}", self.core.quoted_table())))
    }
}

impl Mutation for Truncate {}
