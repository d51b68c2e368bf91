//! ALTER TABLE statement.

use super::{Mutation, QueryCore, Statement, StatementKind};
use crate::clause::build_names;
use crate::error::{DbError, DbResult};
use crate::quote::quote_identifier;
use crate::sql::Sql;

/// Where ADD/MODIFY COLUMN places the column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnPosition {
    First,
    After(String),
}

impl ColumnPosition {
    fn render(&self) -> String {
        match self {
            ColumnPosition::First => " FIRST".to_string(),
            ColumnPosition::After(column) => format!(" AFTER {}", quote_identifier(column)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AlterAction {
    AddColumn {
        column: String,
        definition: String,
        position: Option<ColumnPosition>,
    },
    AddIndex(Vec<String>),
    AddUnique(Vec<String>),
    AddFulltext(Vec<String>),
    AddPrimaryKey(Vec<String>),
    DropColumn(String),
    DropIndex(String),
    DropPrimaryKey,
    ModifyColumn {
        column: String,
        definition: String,
        position: Option<ColumnPosition>,
    },
    RenameTo(String),
    OrderBy(String),
}

fn column_definition(column: &str, definition: &str, position: Option<&ColumnPosition>) -> String {
    let position = position.map(ColumnPosition::render).unwrap_or_default();
    format!("{} {definition}{position}", quote_identifier(column))
}

fn named_index(prefix: &str, columns: &[String]) -> String {
    format!("`{prefix}_{}` ({})", columns.join("_"), build_names(columns))
}

impl AlterAction {
    fn render(&self, prefix: Option<&str>) -> (&'static str, Option<String>) {
        match self {
            AlterAction::AddColumn {
                column,
                definition,
                position,
            } => (
                "ADD COLUMN",
                Some(column_definition(column, definition, position.as_ref())),
            ),
            AlterAction::AddIndex(columns) => ("ADD INDEX", Some(named_index("i", columns))),
            AlterAction::AddUnique(columns) => ("ADD UNIQUE", Some(named_index("u", columns))),
            AlterAction::AddFulltext(columns) => ("ADD FULLTEXT", Some(named_index("f", columns))),
            AlterAction::AddPrimaryKey(columns) => {
                ("ADD PRIMARY KEY", Some(format!("({})", build_names(columns))))
            }
            AlterAction::DropColumn(column) => ("DROP COLUMN", Some(quote_identifier(column))),
            AlterAction::DropIndex(index) => ("DROP INDEX", Some(quote_identifier(index))),
            AlterAction::DropPrimaryKey => ("DROP PRIMARY KEY", None),
            AlterAction::ModifyColumn {
                column,
                definition,
                position,
            } => (
                "MODIFY COLUMN",
                Some(column_definition(column, definition, position.as_ref())),
            ),
            AlterAction::RenameTo(name) => (
                "RENAME TO",
                Some(quote_identifier(&format!("{}{name}", prefix.unwrap_or_default()))),
            ),
            AlterAction::OrderBy(column) => ("ORDER BY", Some(quote_identifier(column))),
        }
    }
}

/// ALTER TABLE builder. Holds exactly one change; a later change replaces
/// the earlier one.
#[derive(Debug, Clone, PartialEq)]
pub struct Alter {
    core: QueryCore,
    action: Option<AlterAction>,
}

fn names<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Vec<String> {
    columns.into_iter().map(Into::into).collect()
}

impl Alter {
    pub fn new(table: &str) -> Self {
        Self {
            core: QueryCore::new(table),
            action: None,
        }
    }

    impl_statement_common!();

    fn action(mut self, action: AlterAction) -> Self {
        self.action = Some(action);
        self
    }

    /// `ADD COLUMN `col` <definition> [FIRST | AFTER `other`]`
    pub fn add_column(self, column: &str, definition: &str, position: Option<ColumnPosition>) -> Self {
        self.action(AlterAction::AddColumn {
            column: column.to_string(),
            definition: definition.to_string(),
            position,
        })
    }

    pub fn add_index<S: Into<String>>(self, columns: impl IntoIterator<Item = S>) -> Self {
        self.action(AlterAction::AddIndex(names(columns)))
    }

    pub fn add_unique_index<S: Into<String>>(self, columns: impl IntoIterator<Item = S>) -> Self {
        self.action(AlterAction::AddUnique(names(columns)))
    }

    pub fn add_fulltext_index<S: Into<String>>(self, columns: impl IntoIterator<Item = S>) -> Self {
        self.action(AlterAction::AddFulltext(names(columns)))
    }

    pub fn add_primary_key<S: Into<String>>(self, columns: impl IntoIterator<Item = S>) -> Self {
        self.action(AlterAction::AddPrimaryKey(names(columns)))
    }

    pub fn drop_column(self, column: &str) -> Self {
        self.action(AlterAction::DropColumn(column.to_string()))
    }

    pub fn drop_index(self, index: &str) -> Self {
        self.action(AlterAction::DropIndex(index.to_string()))
    }

    pub fn drop_primary_key(self) -> Self {
        self.action(AlterAction::DropPrimaryKey)
    }

    /// `MODIFY COLUMN `col` <definition> [FIRST | AFTER `other`]`
    pub fn modify_column(self, column: &str, definition: &str, position: Option<ColumnPosition>) -> Self {
        self.action(AlterAction::ModifyColumn {
            column: column.to_string(),
            definition: definition.to_string(),
            position,
        })
    }

    /// `RENAME TO` the new name, prefix applied.
    pub fn rename(self, name: &str) -> Self {
        self.action(AlterAction::RenameTo(name.to_string()))
    }

    /// Default row order of the table.
    pub fn order_by(self, column: &str) -> Self {
        self.action(AlterAction::OrderBy(column.to_string()))
    }
}

impl Statement for Alter {
    const KIND: StatementKind = StatementKind::Alter;

    fn core(&self) -> &QueryCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore {
        &mut self.core
    }

    fn build(&self) -> DbResult<Sql> {
        let action = self.action.as_ref().ok_or_else(|| {
            DbError::validation(format!("ALTER on table \"{}\" has no change", self.core.table()))
        })?;

        let (keyword, definition) = action.render(self.core.prefix());
        let mut sql = Sql::new(format!("ALTER TABLE {} {keyword}", self.core.quoted_table()));
        if let Some(definition) = definition {
            sql.push(" ").push(&definition);
        }
        Ok(sql)
    }
}

impl Mutation for Alter {}
