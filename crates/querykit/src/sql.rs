//! Tokenized statement text.
//!
//! [`Sql`] stores a statement as raw text parts and named placeholder parts.
//! Both renderings of a statement come from the same parts:
//!
//! - [`Sql::to_sql`] writes placeholders as `:name` (what gets executed);
//! - [`Sql::to_inlined`] writes the bound value's literal in place of each
//!   placeholder (what gets logged or shown while debugging).
//!
//! Placeholders are never located by searching the rendered text, so a value
//! containing something that looks like a placeholder, or a placeholder that
//! is a prefix of another (`:where_p_id_1` / `:where_p_id_10`), cannot corrupt
//! the output.
//!
//! # Example
//! ```
//! use querykit::{BoundValues, Sql, Value};
//!
//! let mut q = Sql::new("SELECT * FROM `pages` WHERE `id`=");
//! q.push_param("where_id");
//! q.push_fragment(" AND status = :status");
//!
//! let mut values = BoundValues::new();
//! values.insert(":where_id".to_string(), Value::from(12));
//! values.insert(":status".to_string(), Value::from("new"));
//!
//! assert_eq!(q.to_sql(), "SELECT * FROM `pages` WHERE `id`=:where_id AND status = :status");
//! assert_eq!(q.to_inlined(&values), r#"SELECT * FROM `pages` WHERE `id`=12 AND status = "new""#);
//! ```

use crate::bindings::BoundValues;
use crate::quote::quote_value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum SqlPart {
    Raw(String),
    /// Placeholder name, without the leading `:`.
    Param(String),
}

/// A statement template made of raw SQL and named placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sql {
    parts: Vec<SqlPart>,
}

impl Sql {
    /// Create a template starting with raw SQL.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        let mut sql = Self::empty();
        sql.push(&initial_sql.into());
        sql
    }

    /// Create an empty template.
    pub fn empty() -> Self {
        Self { parts: Vec::new() }
    }

    /// Tokenize SQL text, recognizing `:name` placeholders outside quotes.
    pub fn parse(text: &str) -> Self {
        let mut sql = Self::empty();
        sql.push_fragment(text);
        sql
    }

    /// Append raw SQL (no placeholders are recognized).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(SqlPart::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(SqlPart::Raw(sql.to_string())),
        }
        self
    }

    /// Append a named placeholder. A leading `:` is optional.
    pub fn push_param(&mut self, name: &str) -> &mut Self {
        let name = name.strip_prefix(':').unwrap_or(name);
        self.parts.push(SqlPart::Param(name.to_string()));
        self
    }

    /// Append caller-supplied SQL, recognizing `:name` placeholders in it.
    ///
    /// Text inside `'...'`, `"..."` and `` `...` `` is copied verbatim, and
    /// `::` is not treated as a placeholder marker.
    pub fn push_fragment(&mut self, text: &str) -> &mut Self {
        let bytes = text.as_bytes();
        let mut raw_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                quote @ (b'\'' | b'"' | b'`') => {
                    i += 1;
                    while i < bytes.len() && bytes[i] != quote {
                        if bytes[i] == b'\\' && quote != b'`' {
                            i += 1;
                        }
                        i += 1;
                    }
                    i += 1;
                }
                b':' => {
                    let prev_colon = i > 0 && bytes[i - 1] == b':';
                    let starts_name = bytes
                        .get(i + 1)
                        .is_some_and(|b| b.is_ascii_alphabetic() || *b == b'_');
                    if prev_colon || !starts_name {
                        i += 1;
                        continue;
                    }

                    let name_start = i + 1;
                    let mut end = name_start;
                    while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
                        end += 1;
                    }
                    self.push(&text[raw_start..i]);
                    self.push_param(&text[name_start..end]);
                    raw_start = end;
                    i = end;
                }
                _ => i += 1,
            }
        }

        if raw_start < text.len() {
            self.push(&text[raw_start..]);
        }
        self
    }

    /// Append another template, consuming it.
    pub fn push_sql(&mut self, other: Sql) -> &mut Self {
        for part in other.parts {
            match part {
                SqlPart::Raw(s) => {
                    self.push(&s);
                }
                param => self.parts.push(param),
            }
        }
        self
    }

    /// Append templates separated by `separator`.
    pub fn push_joined(&mut self, items: impl IntoIterator<Item = Sql>, separator: &str) -> &mut Self {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.push(separator);
            }
            self.push_sql(item);
        }
        self
    }

    /// Whether the template holds no text and no placeholders.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Placeholder names (without `:`) in order of appearance.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|p| match p {
            SqlPart::Param(name) => Some(name.as_str()),
            SqlPart::Raw(_) => None,
        })
    }

    /// Render with `:name` placeholders.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                SqlPart::Raw(s) => out.push_str(s),
                SqlPart::Param(name) => {
                    out.push(':');
                    out.push_str(name);
                }
            }
        }
        out
    }

    /// Render with bound values inlined as literals.
    ///
    /// Placeholders without a bound value are left as `:name`.
    pub fn to_inlined(&self, values: &BoundValues) -> String {
        let mut out = String::new();
        let mut key = String::new();
        for part in &self.parts {
            match part {
                SqlPart::Raw(s) => out.push_str(s),
                SqlPart::Param(name) => {
                    key.clear();
                    key.push(':');
                    key.push_str(name);
                    match values.get(&key) {
                        Some(value) => out.push_str(&quote_value(value)),
                        None => out.push_str(&key),
                    }
                }
            }
        }
        out
    }
}

impl fmt::Display for Sql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
