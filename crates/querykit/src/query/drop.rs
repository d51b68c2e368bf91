//! DROP TABLE statement.

use super::{Mutation, QueryCore, Statement, StatementKind};
use crate::error::DbResult;
use crate::sql::Sql;

/// `DROP TABLE [IF EXISTS] t`. `IF EXISTS` is on by default.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    core: QueryCore,
    if_exists: bool,
}

impl DropTable {
    pub fn new(table: &str) -> Self {
        Self {
            core: QueryCore::new(table),
            if_exists: true,
        }
    }

    impl_statement_common!();

    pub fn if_exists(mut self, on: bool) -> Self {
        self.if_exists = on;
        self
    }
}

impl Statement for DropTable {
    const KIND: StatementKind = StatementKind::Drop;

    fn core(&self) -> &QueryCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore {
        &mut self.core
    }

    fn build(&self) -> DbResult<Sql> {
        let if_exists = if self.if_exists { "IF EXISTS " } else { "" };
        Ok(Sql::new(format!(
            "DROP TABLE {if_exists}{}",
            self.core.quoted_table()
        )))
    }
}

impl Mutation for DropTable {}
