//! # querykit
//!
//! A MySQL-dialect SQL statement builder with named placeholders.
//!
//! ## Features
//!
//! - **Eight statements**: SELECT, INSERT, UPDATE, DELETE, CREATE, ALTER, DROP, TRUNCATE
//! - **Safe quoting**: backtick identifiers, table prefixes, escaped literals
//! - **Scoped placeholders**: `:where_id` and `:set_id` never collide
//! - **Two renderings from one template**: placeholders for execution, inlined literals for logs
//! - **Pluggable execution**: any [`Executor`] runs the statements; [`Db`] adds prefix and logging
//!
//! ## Statements
//!
//! ```
//! use querykit::query::{self, Statement};
//!
//! let mut q = query::update("pages")
//!     .set("id", 15)
//!     .set("name", "John")
//!     .set_expression("`date`=now()")
//!     .where_id(12)
//!     .limit(10);
//!
//! assert_eq!(
//!     q.make(false).unwrap(),
//!     "UPDATE `pages` SET `id`=:set_id, `name`=:set_name, `date`=now() WHERE `id`=:where_id LIMIT 10"
//! );
//! assert_eq!(
//!     q.make(true).unwrap(),
//!     "UPDATE `pages` SET `id`=15, `name`=\"John\", `date`=now() WHERE `id`=12 LIMIT 10"
//! );
//! ```
//!
//! ## Execution
//!
//! ```ignore
//! use querykit::{Db, DbConfig};
//!
//! let db = Db::new(DbConfig::new().prefix("cms_"), executor);
//! let titles = db
//!     .select("pages")
//!     .where_active()
//!     .fetch_column(&db, "title")
//!     .await?;
//! ```

pub mod bindings;
pub mod clause;
pub mod client;
pub mod condition;
pub mod config;
pub mod db;
pub mod definition;
pub mod error;
pub mod query;
pub mod quote;
pub mod row;
pub mod sql;
pub mod value;

pub use bindings::{Bindings, BoundValues, ClausePart};
pub use clause::{ColumnList, JoinKind};
pub use client::Executor;
pub use condition::{Conditions, Glue, Term};
pub use config::{DbConfig, LogLevel};
pub use db::Db;
pub use definition::{Engine, ForeignKey, ReferenceAction, TableDefinition};
pub use error::{DbError, DbResult};
pub use query::{
    Alter, ColumnPosition, Create, Delete, DropTable, Insert, Mutation, Select, Statement,
    StatementKind, Truncate, Update,
};
pub use row::{FromRow, Row, RowExt};
pub use sql::Sql;
pub use value::Value;
