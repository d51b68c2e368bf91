//! Table definitions used by CREATE TABLE.

use crate::clause::{build_literal_values, build_names};
use crate::error::{DbError, DbResult};
use crate::quote::quote_table;
use crate::value::Value;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Storage engine of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Engine {
    #[default]
    #[serde(rename = "MyISAM")]
    MyIsam,
    #[serde(rename = "InnoDB")]
    InnoDb,
    #[serde(rename = "HEAP")]
    Heap,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::MyIsam => "MyISAM",
            Engine::InnoDb => "InnoDB",
            Engine::Heap => "HEAP",
        }
    }

    /// Whether fulltext indexes are allowed on this engine.
    pub fn supports_fulltext(&self) -> bool {
        matches!(self, Engine::MyIsam)
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Engine {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "myisam" => Ok(Engine::MyIsam),
            "innodb" => Ok(Engine::InnoDb),
            "heap" | "memory" => Ok(Engine::Heap),
            other => Err(DbError::validation(format!("unknown table engine: {other}"))),
        }
    }
}

/// `ON DELETE` / `ON UPDATE` action of a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ReferenceAction {
    #[default]
    Restrict,
    Cascade,
    SetNull,
}

impl ReferenceAction {
    /// Lenient parse: anything unrecognized is `RESTRICT`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().replace('_', " ").as_str() {
            "CASCADE" => ReferenceAction::Cascade,
            "SET NULL" => ReferenceAction::SetNull,
            _ => ReferenceAction::Restrict,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferenceAction::Restrict => "RESTRICT",
            ReferenceAction::Cascade => "CASCADE",
            ReferenceAction::SetNull => "SET NULL",
        }
    }
}

impl fmt::Display for ReferenceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    pub column: String,
    /// Referenced table, without prefix.
    pub table: String,
    pub ref_column: String,
    pub on_delete: ReferenceAction,
    pub on_update: ReferenceAction,
}

/// Everything CREATE TABLE knows about a table.
///
/// Column definitions are kept as the raw strings they were declared with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDefinition {
    table: String,
    engine: Engine,
    columns: IndexMap<String, String>,
    enums: IndexMap<String, Vec<Value>>,
    indexes: IndexMap<String, Vec<String>>,
    unique: IndexMap<String, Vec<String>>,
    fulltext: IndexMap<String, Vec<String>>,
    primary_key: Option<Vec<String>>,
    foreign_keys: IndexMap<String, ForeignKey>,
}

fn index_name(prefix: &str, columns: &[String]) -> String {
    format!("{prefix}_{}", columns.join("_"))
}

impl TableDefinition {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            engine: Engine::default(),
            columns: IndexMap::new(),
            enums: IndexMap::new(),
            indexes: IndexMap::new(),
            unique: IndexMap::new(),
            fulltext: IndexMap::new(),
            primary_key: None,
            foreign_keys: IndexMap::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn columns(&self) -> &IndexMap<String, String> {
        &self.columns
    }

    pub fn enums(&self) -> &IndexMap<String, Vec<Value>> {
        &self.enums
    }

    pub fn indexes(&self) -> &IndexMap<String, Vec<String>> {
        &self.indexes
    }

    pub fn unique_indexes(&self) -> &IndexMap<String, Vec<String>> {
        &self.unique
    }

    pub fn fulltext_indexes(&self) -> &IndexMap<String, Vec<String>> {
        &self.fulltext
    }

    pub fn primary_key(&self) -> Option<&[String]> {
        self.primary_key.as_deref()
    }

    pub fn foreign_keys(&self) -> &IndexMap<String, ForeignKey> {
        &self.foreign_keys
    }

    /// Declare (or redeclare) a column.
    pub fn add_column(&mut self, column: impl Into<String>, definition: impl Into<String>) {
        self.columns.insert(column.into(), definition.into());
    }

    /// `ENUM (...)` column; the value list is kept for [`TableDefinition::enums`].
    pub fn add_enum(&mut self, column: impl Into<String>, values: Vec<Value>, nullable: bool) {
        let column = column.into();
        let mut definition = format!("ENUM ({})", build_literal_values(&values));
        if !nullable {
            definition.push_str(" NOT NULL");
        }
        self.enums.insert(column.clone(), values);
        self.columns.insert(column, definition);
    }

    pub fn set_primary_key(&mut self, columns: Vec<String>) {
        self.primary_key = Some(columns);
    }

    pub fn add_index(&mut self, columns: Vec<String>) {
        self.indexes.insert(index_name("i", &columns), columns);
    }

    pub fn add_unique_index(&mut self, columns: Vec<String>) {
        self.unique.insert(index_name("u", &columns), columns);
    }

    /// Fails unless the engine supports fulltext indexes.
    pub fn add_fulltext_index(&mut self, columns: Vec<String>) -> DbResult<()> {
        if !self.engine.supports_fulltext() {
            return Err(DbError::FulltextEngine {
                table: self.table.clone(),
                engine: self.engine,
            });
        }
        self.fulltext.insert(index_name("f", &columns), columns);
        Ok(())
    }

    /// Fails when fulltext indexes exist and `engine` cannot hold them.
    pub fn set_engine(&mut self, engine: Engine) -> DbResult<()> {
        if !self.fulltext.is_empty() && !engine.supports_fulltext() {
            return Err(DbError::FulltextEngine {
                table: self.table.clone(),
                engine,
            });
        }
        self.engine = engine;
        Ok(())
    }

    /// Foreign keys need InnoDB, so this switches the engine (and fails when
    /// fulltext indexes are declared).
    pub fn add_foreign_key(&mut self, key: ForeignKey) -> DbResult<()> {
        self.set_engine(Engine::InnoDb)?;
        self.foreign_keys.insert(format!("fk_{}", key.column), key);
        Ok(())
    }

    /// Body lines of CREATE TABLE: columns, indexes, unique indexes, fulltext
    /// indexes, primary key, foreign keys.
    pub fn render_parts(&self, prefix: Option<&str>) -> Vec<String> {
        let mut parts = Vec::new();

        for (column, definition) in &self.columns {
            parts.push(format!("`{column}` {definition}"));
        }
        for (name, columns) in &self.indexes {
            parts.push(format!("INDEX `{name}` ({})", build_names(columns)));
        }
        for (name, columns) in &self.unique {
            parts.push(format!("UNIQUE INDEX `{name}` ({})", build_names(columns)));
        }
        for (name, columns) in &self.fulltext {
            parts.push(format!("FULLTEXT `{name}` ({})", build_names(columns)));
        }
        if let Some(columns) = &self.primary_key {
            parts.push(format!("PRIMARY KEY ({})", build_names(columns)));
        }
        for (name, fk) in &self.foreign_keys {
            parts.push(format!(
                "FOREIGN KEY `{name}` (`{}`) REFERENCES {}(`{}`) ON DELETE {} ON UPDATE {}",
                fk.column,
                quote_table(&fk.table, prefix),
                fk.ref_column,
                fk.on_delete,
                fk.on_update,
            ));
        }

        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn engine_names() {
        assert_eq!(Engine::default(), Engine::MyIsam);
        assert_eq!(Engine::InnoDb.to_string(), "InnoDB");
        assert_eq!("innodb".parse::<Engine>().unwrap(), Engine::InnoDb);
        assert!("paper".parse::<Engine>().is_err());
    }

    #[test]
    fn reference_action_parse_is_lenient() {
        assert_eq!(ReferenceAction::parse("cascade"), ReferenceAction::Cascade);
        assert_eq!(ReferenceAction::parse("set_null"), ReferenceAction::SetNull);
        assert_eq!(ReferenceAction::parse("whatever"), ReferenceAction::Restrict);
    }

    #[test]
    fn fulltext_requires_myisam() {
        let mut def = TableDefinition::new("pages");
        def.add_fulltext_index(cols(&["title", "text"])).unwrap();
        let err = def.set_engine(Engine::InnoDb).unwrap_err();
        assert!(matches!(err, DbError::FulltextEngine { engine: Engine::InnoDb, .. }));
        assert_eq!(def.engine(), Engine::MyIsam);

        let mut innodb = TableDefinition::new("pages");
        innodb.set_engine(Engine::InnoDb).unwrap();
        assert!(innodb.add_fulltext_index(cols(&["title"])).is_err());
    }

    #[test]
    fn foreign_key_switches_engine() {
        let mut def = TableDefinition::new("pages");
        def.add_foreign_key(ForeignKey {
            column: "user_id".to_string(),
            table: "users".to_string(),
            ref_column: "id".to_string(),
            on_delete: ReferenceAction::Cascade,
            on_update: ReferenceAction::Cascade,
        })
        .unwrap();
        assert_eq!(def.engine(), Engine::InnoDb);
        assert!(def.foreign_keys().contains_key("fk_user_id"));
    }

    #[test]
    fn parts_in_declaration_order() {
        let mut def = TableDefinition::new("pages");
        def.add_column("id", "INT");
        def.add_enum("kind", vec![Value::from("a"), Value::from(2)], false);
        def.add_unique_index(cols(&["kind"]));
        def.add_index(cols(&["id", "kind"]));
        def.set_primary_key(cols(&["id"]));

        assert_eq!(
            def.render_parts(None),
            vec![
                "`id` INT",
                "`kind` ENUM (\"a\", 2) NOT NULL",
                "INDEX `i_id_kind` (`id`, `kind`)",
                "UNIQUE INDEX `u_kind` (`kind`)",
                "PRIMARY KEY (`id`)",
            ]
        );
    }
}
