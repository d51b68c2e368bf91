//! CREATE TABLE statement.

use super::{Mutation, QueryCore, Statement, StatementKind};
use crate::definition::{Engine, ForeignKey, ReferenceAction, TableDefinition};
use crate::error::{DbError, DbResult};
use crate::sql::Sql;
use crate::value::Value;

/// CREATE TABLE builder.
///
/// The body lists columns, then indexes, unique indexes, fulltext indexes,
/// the primary key and foreign keys, each group in declaration order.
///
/// ```
/// use querykit::query::{self, Statement};
///
/// let q = query::create("pages")
///     .add_id(None)
///     .add_char("title", None)
///     .add_index(["title"]);
///
/// assert_eq!(
///     q.to_sql().unwrap(),
///     "CREATE TABLE `pages` (\n  `id` INT UNSIGNED AUTO_INCREMENT,\n  `title` VARCHAR(250) DEFAULT NULL,\n  INDEX `i_title` (`title`),\n  PRIMARY KEY (`id`)\n) ENGINE=MyISAM"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Create {
    core: QueryCore,
    definition: TableDefinition,
}

fn names<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Vec<String> {
    columns.into_iter().map(Into::into).collect()
}

impl Create {
    pub fn new(table: &str) -> Self {
        Self {
            core: QueryCore::new(table),
            definition: TableDefinition::new(table),
        }
    }

    impl_statement_common!();

    /// Everything declared so far, for schema tooling.
    pub fn definition(&self) -> &TableDefinition {
        &self.definition
    }

    fn log_rejected(&self, err: DbError) -> DbError {
        tracing::warn!(
            target: "querykit.sql",
            table = %self.core.table(),
            error = %err,
            "table definition rejected"
        );
        err
    }

    /// Declare a column with a raw definition.
    pub fn add(mut self, column: &str, definition: &str) -> Self {
        self.definition.add_column(column, definition);
        self
    }

    pub fn add_primary_key<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.definition.set_primary_key(names(columns));
        self
    }

    /// `INDEX `i_<cols>``
    pub fn add_index<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.definition.add_index(names(columns));
        self
    }

    /// `UNIQUE INDEX `u_<cols>``
    pub fn add_unique_index<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.definition.add_unique_index(names(columns));
        self
    }

    /// `FULLTEXT `f_<cols>``. Fails unless the engine is MyISAM.
    pub fn add_fulltext_index<S: Into<String>>(
        mut self,
        columns: impl IntoIterator<Item = S>,
    ) -> DbResult<Self> {
        match self.definition.add_fulltext_index(names(columns)) {
            Ok(()) => Ok(self),
            Err(err) => Err(self.log_rejected(err)),
        }
    }

    /// Fails when fulltext indexes exist and `engine` is not MyISAM.
    pub fn set_engine(mut self, engine: Engine) -> DbResult<Self> {
        match self.definition.set_engine(engine) {
            Ok(()) => Ok(self),
            Err(err) => Err(self.log_rejected(err)),
        }
    }

    /// `FOREIGN KEY `fk_<column>``. Switches the engine to InnoDB.
    /// `on_update` defaults to `on_delete`.
    pub fn add_foreign_key(
        mut self,
        column: &str,
        table: &str,
        ref_column: &str,
        on_delete: ReferenceAction,
        on_update: Option<ReferenceAction>,
    ) -> DbResult<Self> {
        let key = ForeignKey {
            column: column.to_string(),
            table: table.to_string(),
            ref_column: ref_column.to_string(),
            on_delete,
            on_update: on_update.unwrap_or(on_delete),
        };
        match self.definition.add_foreign_key(key) {
            Ok(()) => Ok(self),
            Err(err) => Err(self.log_rejected(err)),
        }
    }

    // ==================== common column types ====================

    /// `INT UNSIGNED AUTO_INCREMENT` primary key, `id` by default.
    pub fn add_id(self, column: Option<&str>) -> Self {
        let column = column.unwrap_or("id");
        self.add(column, "INT UNSIGNED AUTO_INCREMENT")
            .add_primary_key([column])
    }

    /// `INT UNSIGNED DEFAULT NULL`, `parent_id` by default.
    pub fn add_foreign_id(self, column: Option<&str>) -> Self {
        self.add(column.unwrap_or("parent_id"), "INT UNSIGNED DEFAULT NULL")
    }

    /// `FLOAT(10,2)`, `price` by default.
    pub fn add_price(self, column: Option<&str>, unsigned: bool) -> Self {
        let definition = if unsigned { "FLOAT(10,2) UNSIGNED" } else { "FLOAT(10,2)" };
        self.add(column.unwrap_or("price"), definition)
    }

    /// `TEXT` or `LONGTEXT`, `text` by default.
    pub fn add_text(self, column: Option<&str>, long: bool) -> Self {
        self.add(column.unwrap_or("text"), if long { "LONGTEXT" } else { "TEXT" })
    }

    /// `BOOL DEFAULT <default>`
    pub fn add_bool(self, column: &str, default: bool) -> Self {
        self.add(column, &format!("BOOL DEFAULT {}", u8::from(default)))
    }

    /// `TIMESTAMP DEFAULT 0` or `DATETIME DEFAULT 0`.
    pub fn add_time(self, column: &str, unix: bool) -> Self {
        let definition = if unix { "TIMESTAMP DEFAULT 0" } else { "DATETIME DEFAULT 0" };
        self.add(column, definition)
    }

    /// `TIMESTAMP DEFAULT CURRENT_TIMESTAMP`, `created_at` by default.
    pub fn add_time_created(self, column: Option<&str>) -> Self {
        self.add(
            column.unwrap_or("created_at"),
            "TIMESTAMP DEFAULT CURRENT_TIMESTAMP",
        )
    }

    /// Auto-updating timestamp, `updated_at` by default.
    pub fn add_time_updated(self, column: Option<&str>) -> Self {
        self.add(
            column.unwrap_or("updated_at"),
            "TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP",
        )
    }

    /// `VARCHAR(<length>) DEFAULT NULL`, 250 characters by default.
    pub fn add_char(self, column: &str, length: Option<u32>) -> Self {
        let length = length.filter(|l| *l > 0).unwrap_or(250);
        self.add(column, &format!("VARCHAR({length}) DEFAULT NULL"))
    }

    pub fn add_int(self, column: &str) -> Self {
        self.add(column, "INT UNSIGNED DEFAULT 0")
    }

    pub fn add_tiny_int(self, column: &str) -> Self {
        self.add(column, "TINYINT UNSIGNED DEFAULT 0")
    }

    pub fn add_big_int(self, column: &str) -> Self {
        self.add(column, "BIGINT UNSIGNED DEFAULT 0")
    }

    /// `ENUM ("a", "b")`, `NOT NULL` unless `nullable`.
    pub fn add_enum<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
        nullable: bool,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.definition.add_enum(column, values, nullable);
        self
    }
}

impl Statement for Create {
    const KIND: StatementKind = StatementKind::Create;

    fn core(&self) -> &QueryCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore {
        &mut self.core
    }

    fn build(&self) -> DbResult<Sql> {
        if self.definition.columns().is_empty() {
            return Err(DbError::empty_fields("CREATE", self.core.table()));
        }

        let parts = self.definition.render_parts(self.core.prefix());
        Ok(Sql::new(format!(
            "CREATE TABLE {} (\n  {}\n) ENGINE={}",
            self.core.quoted_table(),
            parts.join(",\n  "),
            self.definition.engine()
        )))
    }
}

impl Mutation for Create {}
