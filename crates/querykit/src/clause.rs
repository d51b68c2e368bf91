//! Clause fragment builders.
//!
//! Each `build_*` function appends its clause (with leading space and
//! keyword) to a statement template, or nothing when the clause is empty.

use crate::bindings::ClausePart;
use crate::condition::Conditions;
use crate::quote::{binding_key, quote_identifier, quote_table, quote_value};
use crate::sql::Sql;
use crate::value::Value;

/// JOIN flavour. `None` on a [`Join`] renders a plain `JOIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Cross => "CROSS",
        }
    }
}

/// One joined table. `table` is unprefixed; the statement prefix is applied
/// when the clause is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: String,
    pub on: Sql,
    pub kind: Option<JoinKind>,
}

/// ORDER BY / GROUP BY / column list input: raw SQL or a list of names.
///
/// A single string converts to a one-name list; names that already contain
/// SQL (`something DESC`, `SUM(x) as t`) pass through unquoted anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnList {
    Raw(String),
    Names(Vec<String>),
}

impl ColumnList {
    pub fn names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        ColumnList::Names(names.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ColumnList::Raw(s) => s.trim().is_empty(),
            ColumnList::Names(names) => names.iter().all(|n| n.trim().is_empty()),
        }
    }

    /// Raw text verbatim, names quoted and comma-joined.
    pub fn render(&self) -> String {
        match self {
            ColumnList::Raw(s) => s.clone(),
            ColumnList::Names(names) => build_names(names),
        }
    }
}

impl From<&str> for ColumnList {
    fn from(name: &str) -> Self {
        ColumnList::Names(vec![name.to_string()])
    }
}

impl From<String> for ColumnList {
    fn from(name: String) -> Self {
        ColumnList::Names(vec![name])
    }
}

impl<S: Into<String>> From<Vec<S>> for ColumnList {
    fn from(names: Vec<S>) -> Self {
        ColumnList::names(names)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for ColumnList {
    fn from(names: [S; N]) -> Self {
        ColumnList::names(names)
    }
}

/// ` [KIND ]JOIN <table> ON <condition>` for every join.
pub fn build_join(sql: &mut Sql, joins: &[Join], prefix: Option<&str>) {
    for join in joins {
        sql.push(" ");
        if let Some(kind) = join.kind {
            sql.push(kind.as_str()).push(" ");
        }
        sql.push("JOIN ")
            .push(&quote_table(&join.table, prefix))
            .push(" ON ")
            .push_sql(join.on.clone());
    }
}

pub fn build_order_by(sql: &mut Sql, order_by: Option<&ColumnList>) {
    build_column_clause(sql, " ORDER BY ", order_by);
}

pub fn build_group_by(sql: &mut Sql, group_by: Option<&ColumnList>) {
    build_column_clause(sql, " GROUP BY ", group_by);
}

fn build_column_clause(sql: &mut Sql, keyword: &str, list: Option<&ColumnList>) {
    if let Some(list) = list.filter(|l| !l.is_empty()) {
        sql.push(keyword).push(&list.render());
    }
}

/// ` LIMIT [offset, ]count`. Nothing when the count is unset or zero.
pub fn build_limit(sql: &mut Sql, limit: Option<u64>, offset: u64) {
    match limit {
        Some(count) if count > 0 && offset > 0 => {
            sql.push(&format!(" LIMIT {offset}, {count}"));
        }
        Some(count) if count > 0 => {
            sql.push(&format!(" LIMIT {count}"));
        }
        _ => {}
    }
}

pub fn build_where(sql: &mut Sql, conditions: &Conditions) {
    build_conditions(sql, " WHERE ", conditions);
}

pub fn build_having(sql: &mut Sql, conditions: &Conditions) {
    build_conditions(sql, " HAVING ", conditions);
}

pub fn build_set(sql: &mut Sql, entries: &Conditions) {
    build_conditions(sql, " SET ", entries);
}

fn build_conditions(sql: &mut Sql, keyword: &str, conditions: &Conditions) {
    if conditions.is_empty() {
        return;
    }
    sql.push(keyword).push_sql(conditions.build());
}

/// `` `a`, `b`, c.d ``
pub fn build_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|n| quote_identifier(n.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `:<part>_<key>, ...` for each key.
pub fn build_values<S: AsRef<str>>(part: ClausePart, keys: &[S]) -> Sql {
    let mut sql = Sql::empty();
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            sql.push(", ");
        }
        sql.push_param(&binding_key(part.as_str(), key.as_ref()));
    }
    sql
}

/// `"abc", 12, NULL`
pub fn build_literal_values(values: &[Value]) -> String {
    values.iter().map(quote_value).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_kinds() {
        let mut sql = Sql::empty();
        build_join(
            &mut sql,
            &[
                Join {
                    table: "users u".to_string(),
                    on: Sql::parse("u.id = p.user_id"),
                    kind: Some(JoinKind::Left),
                },
                Join {
                    table: "tags".to_string(),
                    on: Sql::parse("tags.id = :tag"),
                    kind: None,
                },
            ],
            Some("yeah_"),
        );
        assert_eq!(
            sql.to_sql(),
            " LEFT JOIN `yeah_users` `u` ON u.id = p.user_id JOIN `yeah_tags` ON tags.id = :tag"
        );
    }

    #[test]
    fn order_and_group() {
        let mut sql = Sql::empty();
        build_group_by(&mut sql, Some(&ColumnList::from(["id", "p.parent_id"])));
        build_order_by(&mut sql, Some(&ColumnList::from("something DESC")));
        assert_eq!(sql.to_sql(), " GROUP BY `id`, p.parent_id ORDER BY something DESC");

        let mut empty = Sql::empty();
        build_order_by(&mut empty, Some(&ColumnList::names(Vec::<String>::new())));
        build_group_by(&mut empty, None);
        assert!(empty.is_empty());
    }

    #[test]
    fn limit_forms() {
        let render = |limit, offset| {
            let mut sql = Sql::empty();
            build_limit(&mut sql, limit, offset);
            sql.to_sql()
        };
        assert_eq!(render(Some(10), 0), " LIMIT 10");
        assert_eq!(render(Some(5), 10), " LIMIT 10, 5");
        assert_eq!(render(None, 10), "");
        assert_eq!(render(Some(0), 0), "");
    }

    #[test]
    fn value_lists() {
        assert_eq!(build_values(ClausePart::Insert, &["id", "name"]).to_sql(), ":insert_id, :insert_name");
        assert_eq!(
            build_literal_values(&[Value::from("abc"), Value::from(12), Value::Null]),
            "\"abc\", 12, NULL"
        );
    }
}
