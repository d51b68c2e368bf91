//! Statement assemblers.
//!
//! Every statement is a plain value: create it, configure it through consuming
//! builder methods, then render it with [`Statement::make`] or run it through an
//! [`Executor`].
//!
//! # Usage
//!
//! ```
//! use querykit::query::{self, Statement};
//! use querykit::Term;
//!
//! let mut q = query::select("pages p")
//!     .where_([Term::raw("p.id > 3"), Term::active()])
//!     .order_by("p.id DESC")
//!     .limit(10);
//!
//! assert_eq!(
//!     q.make(false).unwrap(),
//!     "SELECT * FROM `pages` `p` WHERE p.id > 3 AND `is_active`=:where_is_active ORDER BY p.id DESC LIMIT 10"
//! );
//! assert_eq!(
//!     q.make(true).unwrap(),
//!     "SELECT * FROM `pages` `p` WHERE p.id > 3 AND `is_active`=1 ORDER BY p.id DESC LIMIT 10"
//! );
//! ```

#[macro_use]
mod macros;

mod alter;
mod create;
mod delete;
mod drop;
mod insert;
mod select;
mod truncate;
mod update;


pub use alter::{Alter, ColumnPosition};
pub use create::Create;
pub use delete::Delete;
pub use drop::DropTable;
pub use insert::Insert;
pub use select::Select;
pub use truncate::Truncate;
pub use update::Update;

use crate::bindings::{Bindings, BoundValues};
use crate::client::Executor;
use crate::error::DbResult;
use crate::quote::quote_table;
use crate::sql::Sql;
use std::fmt;

/// Which statement an assembler produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Alter,
    Drop,
    Truncate,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::Create => "CREATE",
            StatementKind::Alter => "ALTER",
            StatementKind::Drop => "DROP",
            StatementKind::Truncate => "TRUNCATE",
        }
    }

    /// Kind of a statement text, from its leading keyword.
    pub fn detect(sql: &str) -> Option<Self> {
        let keyword = sql.split_whitespace().next()?.to_ascii_uppercase();
        Some(match keyword.as_str() {
            "SELECT" => StatementKind::Select,
            "INSERT" => StatementKind::Insert,
            "UPDATE" => StatementKind::Update,
            "DELETE" => StatementKind::Delete,
            "CREATE" => StatementKind::Create,
            "ALTER" => StatementKind::Alter,
            "DROP" => StatementKind::Drop,
            "TRUNCATE" => StatementKind::Truncate,
            _ => return None,
        })
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State shared by every statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryCore {
    table: String,
    prefix: Option<String>,
    bindings: Bindings,
    last_sql: Option<String>,
}

impl QueryCore {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Table name with prefix, quoted.
    pub fn quoted_table(&self) -> String {
        quote_table(&self.table, self.prefix())
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    pub(crate) fn set_prefix(&mut self, prefix: Option<String>) {
        self.prefix = prefix.filter(|p| !p.is_empty());
    }
}

/// Common surface of every statement.
pub trait Statement: Send {
    const KIND: StatementKind;

    fn core(&self) -> &QueryCore;

    fn core_mut(&mut self) -> &mut QueryCore;

    /// Assemble the statement template.
    fn build(&self) -> DbResult<Sql>;

    fn kind(&self) -> StatementKind {
        Self::KIND
    }

    fn table(&self) -> &str {
        self.core().table()
    }

    fn prefix(&self) -> Option<&str> {
        self.core().prefix()
    }

    /// Render the statement, with placeholders or with values inlined, and
    /// keep the text as [`Statement::last_sql`].
    fn make(&mut self, inline: bool) -> DbResult<String> {
        let sql = template(self)?;
        let text = if inline {
            sql.to_inlined(&self.bound_values())
        } else {
            sql.to_sql()
        };
        self.core_mut().last_sql = Some(text.clone());
        Ok(text)
    }

    /// Render with placeholders.
    fn to_sql(&self) -> DbResult<String> {
        Ok(template(self)?.to_sql())
    }

    /// Render with values inlined.
    fn to_inlined_sql(&self) -> DbResult<String> {
        Ok(template(self)?.to_inlined(&self.bound_values()))
    }

    /// Text produced by the most recent [`Statement::make`].
    fn last_sql(&self) -> Option<&str> {
        self.core().last_sql.as_deref()
    }

    /// Binding table, by clause-part.
    fn values(&self) -> &Bindings {
        self.core().bindings()
    }

    /// Flat placeholder map, user binds included.
    fn bound_values(&self) -> BoundValues {
        self.core().bindings().bound_values()
    }
}

/// Assembled template of `statement`. User binds may not shadow generated
/// placeholders.
fn template<S: Statement + ?Sized>(statement: &S) -> DbResult<Sql> {
    statement.core().bindings().check_user_binds()?;
    statement.build()
}

/// Statements executed for their affected-row count.
pub trait Mutation: Statement {
    /// Run the statement and return the number of affected rows.
    fn execute(
        &mut self,
        conn: &impl Executor,
    ) -> impl std::future::Future<Output = DbResult<u64>> + Send {
        async move {
            let sql = self.make(false)?;
            let values = self.bound_values();
            conn.execute(&sql, &values).await
        }
    }
}

/// Create a SELECT statement.
pub fn select(table: &str) -> Select {
    Select::new(table)
}

/// Create an INSERT statement.
pub fn insert(table: &str) -> Insert {
    Insert::new(table)
}

/// Create an UPDATE statement.
pub fn update(table: &str) -> Update {
    Update::new(table)
}

/// Create a DELETE statement.
pub fn delete(table: &str) -> Delete {
    Delete::new(table)
}

/// Create a CREATE TABLE statement.
pub fn create(table: &str) -> Create {
    Create::new(table)
}

/// Create an ALTER TABLE statement.
pub fn alter(table: &str) -> Alter {
    Alter::new(table)
}

/// Create a DROP TABLE statement.
pub fn drop(table: &str) -> DropTable {
    DropTable::new(table)
}

/// Create a TRUNCATE TABLE statement.
pub fn truncate(table: &str) -> Truncate {
    Truncate::new(table)
}
