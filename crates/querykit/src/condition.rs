//! Condition normalizer for WHERE, HAVING and SET.
//!
//! Callers describe conditions with [`Term`]s. A [`Conditions`] list turns
//! them into ordered entries and records every bound value in the statement's
//! [`Bindings`] under a placeholder scoped to its clause-part.
//!
//! ```
//! use querykit::{Bindings, ClausePart, Conditions, Term};
//!
//! let mut bindings = Bindings::new();
//! let mut where_ = Conditions::new(ClausePart::Where);
//! where_.apply(&mut bindings, Term::raw("p.id > 3"));
//! where_.apply(&mut bindings, Term::active());
//! where_.apply(&mut bindings, Term::in_list("status", ["new", "old"]));
//!
//! assert_eq!(
//!     where_.build().to_sql(),
//!     "p.id > 3 AND `is_active`=:where_is_active AND `status` IN (:where_status_1,:where_status_2)"
//! );
//! ```

use crate::bindings::{Bindings, ClausePart};
use crate::quote::{binding_key, clean_key_name, quote_identifier};
use crate::sql::Sql;
use crate::value::Value;
use indexmap::IndexMap;

/// One condition input.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// `` `id`=:<part>_id ``
    Id(Value),
    /// `` `is_active`=:<part>_is_active `` bound to 1
    Active,
    /// Verbatim SQL, never bound. `:name` tokens inside refer to user binds.
    Raw(String),
    /// `` `column`=:<part>_<column> ``
    Eq(String, Value),
    /// `column IN (:<part>_<column>_1,...)`
    In(String, Vec<Value>),
    /// `column BETWEEN :<part>_<column>_from AND :<part>_<column>_to`
    Between(String, Value, Value),
    /// Nested terms, normalized in place.
    Group(Vec<Term>),
}

impl Term {
    pub fn id(value: impl Into<Value>) -> Self {
        Term::Id(value.into())
    }

    pub fn active() -> Self {
        Term::Active
    }

    pub fn raw(fragment: impl Into<String>) -> Self {
        Term::Raw(fragment.into())
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Term::Eq(column.into(), value.into())
    }

    pub fn in_list<V: Into<Value>>(column: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Term::In(column.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn between(column: impl Into<String>, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Term::Between(column.into(), from.into(), to.into())
    }

    pub fn group(terms: impl IntoIterator<Item = Term>) -> Self {
        Term::Group(terms.into_iter().collect())
    }
}

impl From<&str> for Term {
    fn from(fragment: &str) -> Self {
        Term::raw(fragment)
    }
}

impl From<String> for Term {
    fn from(fragment: String) -> Self {
        Term::Raw(fragment)
    }
}

impl<V: Into<Value>> From<(&str, V)> for Term {
    fn from((column, value): (&str, V)) -> Self {
        Term::eq(column, value)
    }
}

/// How entries of one clause are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Glue {
    #[default]
    And,
    Or,
    Comma,
}

impl Glue {
    /// `true` → AND, `false` → OR.
    pub fn from_and(and: bool) -> Self {
        if and { Glue::And } else { Glue::Or }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Glue::And => " AND ",
            Glue::Or => " OR ",
            Glue::Comma => ", ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    /// `owner` is the cleaned column name, `key` the binding key it holds.
    Bound { owner: String, key: String, column: String },
    Raw(Sql),
    /// IN / BETWEEN folded into a fragment; `owner` identifies it for
    /// replacement, `keys` are the binding keys it holds.
    Folded { owner: String, sql: Sql, keys: Vec<String> },
}

/// Ordered condition entries of one clause-part.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    part: ClausePart,
    glue: Glue,
    entries: Vec<Entry>,
    /// Placeholder name → owner of the entry holding it. A placeholder never
    /// belongs to two entries.
    owners: IndexMap<String, String>,
}

impl Conditions {
    /// Empty list for `part`. SET lists are comma-joined, the rest use AND.
    pub fn new(part: ClausePart) -> Self {
        let glue = match part {
            ClausePart::Set | ClausePart::Insert => Glue::Comma,
            ClausePart::Where | ClausePart::Having => Glue::And,
        };
        Self {
            part,
            glue,
            entries: Vec::new(),
            owners: IndexMap::new(),
        }
    }

    pub fn set_glue(&mut self, glue: Glue) {
        self.glue = glue;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalize one term into this list.
    pub fn apply(&mut self, bindings: &mut Bindings, term: Term) {
        match term {
            Term::Id(value) => self.bind_eq(bindings, "id", value),
            Term::Active => self.bind_eq(bindings, "is_active", Value::Int(1)),
            Term::Raw(fragment) => self.push_raw(&fragment),
            Term::Eq(column, value) => self.bind_eq(bindings, &column, value),
            Term::In(column, values) => self.where_in(bindings, &column, values),
            Term::Between(column, from, to) => self.where_between(bindings, &column, from, to),
            Term::Group(terms) => self.apply_all(bindings, terms),
        }
    }

    pub fn apply_all(&mut self, bindings: &mut Bindings, terms: impl IntoIterator<Item = Term>) {
        for term in terms {
            self.apply(bindings, term);
        }
    }

    /// Claim the binding key `key` for `owner`. While the placeholder is held
    /// by another entry, `_2`, `_3`, ... is appended.
    fn claim(&mut self, owner: &str, key: String) -> String {
        let part = self.part.as_str();
        let mut candidate = key.clone();
        let mut n = 2;
        while self
            .owners
            .get(&binding_key(part, &candidate))
            .is_some_and(|held_by| held_by != owner)
        {
            candidate = format!("{key}_{n}");
            n += 1;
        }
        self.owners
            .insert(binding_key(part, &candidate), owner.to_string());
        candidate
    }

    /// Bound equality. A column that is already present keeps its position and
    /// placeholder and gets the new value.
    pub fn bind_eq(&mut self, bindings: &mut Bindings, column: &str, value: impl Into<Value>) {
        let owner = clean_key_name(column);
        let held = self.entries.iter().find_map(|e| match e {
            Entry::Bound { owner: o, key, .. } if *o == owner => Some(key.clone()),
            _ => None,
        });

        match held {
            Some(key) => {
                bindings.set(self.part, &key, value);
            }
            None => {
                let key = self.claim(&owner, owner.clone());
                bindings.set(self.part, &key, value);
                self.entries.push(Entry::Bound {
                    owner,
                    key,
                    column: column.to_string(),
                });
            }
        }
    }

    /// Verbatim fragment. Empty fragments are ignored.
    pub fn push_raw(&mut self, fragment: &str) {
        if fragment.trim().is_empty() {
            return;
        }
        self.entries.push(Entry::Raw(Sql::parse(fragment)));
    }

    /// `column IN (...)` with one placeholder per value. An empty list matches
    /// nothing (`1=0`).
    pub fn where_in<V: Into<Value>>(
        &mut self,
        bindings: &mut Bindings,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) {
        let base = clean_key_name(column);
        let owner = format!("in:{base}");
        let position = self.release_folded(bindings, &owner);

        let mut keys = Vec::new();
        let mut names = Vec::new();
        for (i, value) in values.into_iter().enumerate() {
            let key = self.claim(&owner, format!("{base}_{}", i + 1));
            names.push(bindings.set(self.part, &key, value));
            keys.push(key);
        }

        let sql = if names.is_empty() {
            Sql::new("1=0")
        } else {
            let mut sql = Sql::new(format!("{} IN (", quote_identifier(column)));
            for (i, name) in names.iter().enumerate() {
                if i > 0 {
                    sql.push(",");
                }
                sql.push_param(name);
            }
            sql.push(")");
            sql
        };

        self.place_folded(position, owner, sql, keys);
    }

    /// `column BETWEEN :from AND :to`
    pub fn where_between(
        &mut self,
        bindings: &mut Bindings,
        column: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) {
        let base = clean_key_name(column);
        let owner = format!("between:{base}");
        let position = self.release_folded(bindings, &owner);

        let from_key = self.claim(&owner, format!("{base}_from"));
        let to_key = self.claim(&owner, format!("{base}_to"));

        let mut sql = Sql::new(format!("{} BETWEEN ", quote_identifier(column)));
        sql.push_param(&bindings.set(self.part, &from_key, from))
            .push(" AND ")
            .push_param(&bindings.set(self.part, &to_key, to));

        self.place_folded(position, owner, sql, vec![from_key, to_key]);
    }

    /// Forget the keys of the folded entry `owner`, returning its position.
    fn release_folded(&mut self, bindings: &mut Bindings, owner: &str) -> Option<usize> {
        let position = self
            .entries
            .iter()
            .position(|e| matches!(e, Entry::Folded { owner: o, .. } if o == owner))?;

        let keys = match &mut self.entries[position] {
            Entry::Folded { keys, .. } => std::mem::take(keys),
            _ => Vec::new(),
        };
        for key in keys {
            self.owners.shift_remove(&binding_key(self.part.as_str(), &key));
            bindings.remove(self.part, &key);
        }
        Some(position)
    }

    fn place_folded(&mut self, position: Option<usize>, owner: String, sql: Sql, keys: Vec<String>) {
        let entry = Entry::Folded { owner, sql, keys };
        match position {
            Some(i) => self.entries[i] = entry,
            None => self.entries.push(entry),
        }
    }

    /// Drop every entry and its bound values.
    pub fn clear(&mut self, bindings: &mut Bindings) {
        self.entries.clear();
        self.owners.clear();
        bindings.clear_part(self.part);
    }

    /// Entries joined with the glue. Empty when there are none.
    pub fn build(&self) -> Sql {
        let part = self.part.as_str();
        let items = self.entries.iter().map(|entry| match entry {
            Entry::Bound { key, column, .. } => {
                let mut sql = Sql::new(format!("{}=", quote_identifier(column)));
                sql.push_param(&binding_key(part, key));
                sql
            }
            Entry::Raw(sql) | Entry::Folded { sql, .. } => sql.clone(),
        });

        let mut out = Sql::empty();
        out.push_joined(items, self.glue.as_str());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn where_list(terms: Vec<Term>) -> (Conditions, Bindings) {
        let mut bindings = Bindings::new();
        let mut list = Conditions::new(ClausePart::Where);
        list.apply_all(&mut bindings, terms);
        (list, bindings)
    }

    #[test]
    fn id_and_active_shortcuts() {
        let (list, bindings) = where_list(vec![Term::id(12), Term::active()]);
        assert_eq!(
            list.build().to_sql(),
            "`id`=:where_id AND `is_active`=:where_is_active"
        );
        let values = bindings.bound_values();
        assert_eq!(values[":where_id"], Value::from(12));
        assert_eq!(values[":where_is_active"], Value::from(1));
    }

    #[test]
    fn repeated_key_keeps_position() {
        let (list, bindings) = where_list(vec![
            Term::eq("a", 1),
            Term::raw("x > 1"),
            Term::eq("a", 2),
        ]);
        assert_eq!(list.build().to_sql(), "`a`=:where_a AND x > 1");
        assert_eq!(bindings.get(ClausePart::Where, "a"), Some(&Value::from(2)));
    }

    #[test]
    fn nested_groups_flatten() {
        let (list, _) = where_list(vec![Term::group([
            Term::raw("a = 1"),
            Term::group([Term::id(5)]),
        ])]);
        assert_eq!(list.build().to_sql(), "a = 1 AND `id`=:where_id");
    }

    #[test]
    fn empty_raw_is_ignored() {
        let (list, _) = where_list(vec![Term::raw(""), Term::raw("  ")]);
        assert!(list.is_empty());
        assert!(list.build().is_empty());
    }

    #[test]
    fn in_list_placeholders() {
        let (list, bindings) = where_list(vec![Term::in_list("p.id", [12, 13, 14])]);
        assert_eq!(
            list.build().to_sql(),
            "p.id IN (:where_p_id_1,:where_p_id_2,:where_p_id_3)"
        );
        assert_eq!(bindings.len(), 3);
    }

    #[test]
    fn empty_in_list_matches_nothing() {
        let (list, bindings) = where_list(vec![Term::in_list("id", Vec::<i64>::new())]);
        assert_eq!(list.build().to_sql(), "1=0");
        assert!(bindings.is_empty());
    }

    #[test]
    fn repeated_in_list_replaces_previous() {
        let (list, bindings) = where_list(vec![
            Term::in_list("id", [1, 2, 3]),
            Term::raw("x = 1"),
            Term::in_list("id", [4]),
        ]);
        assert_eq!(list.build().to_sql(), "`id` IN (:where_id_1) AND x = 1");
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.get(ClausePart::Where, "id_1"), Some(&Value::from(4)));
    }

    #[test]
    fn between_placeholders() {
        let (list, bindings) = where_list(vec![Term::between("p.id", 12, 24)]);
        assert_eq!(
            list.build().to_sql(),
            "p.id BETWEEN :where_p_id_from AND :where_p_id_to"
        );
        let values = bindings.bound_values();
        assert_eq!(values[":where_p_id_from"], Value::from(12));
        assert_eq!(values[":where_p_id_to"], Value::from(24));
    }

    #[test]
    fn or_glue() {
        let (mut list, _) = where_list(vec![Term::raw("a = 1"), Term::raw("b = 2")]);
        list.set_glue(Glue::from_and(false));
        assert_eq!(list.build().to_sql(), "a = 1 OR b = 2");
    }

    #[test]
    fn set_list_is_comma_joined() {
        let mut bindings = Bindings::new();
        let mut set = Conditions::new(ClausePart::Set);
        set.apply(&mut bindings, ("id", 15).into());
        set.apply(&mut bindings, "`date`=now()".into());
        assert_eq!(set.build().to_sql(), "`id`=:set_id, `date`=now()");
    }

    #[test]
    fn in_list_never_reuses_an_equality_placeholder() {
        let (list, bindings) = where_list(vec![Term::eq("id_1", 5), Term::in_list("id", [7])]);
        assert_eq!(list.build().to_sql(), "`id_1`=:where_id_1 AND `id` IN (:where_id_1_2)");
        let values = bindings.bound_values();
        assert_eq!(values[":where_id_1"], Value::from(5));
        assert_eq!(values[":where_id_1_2"], Value::from(7));
    }

    #[test]
    fn equality_never_reuses_an_in_list_placeholder() {
        let (list, bindings) = where_list(vec![Term::in_list("id", [7]), Term::eq("id_1", 5)]);
        assert_eq!(list.build().to_sql(), "`id` IN (:where_id_1) AND `id_1`=:where_id_1_2");
        let values = bindings.bound_values();
        assert_eq!(values[":where_id_1"], Value::from(7));
        assert_eq!(values[":where_id_1_2"], Value::from(5));
    }

    #[test]
    fn between_and_equality_keep_separate_placeholders() {
        let (list, bindings) = where_list(vec![
            Term::eq("x_from", 1),
            Term::eq("x_to", 2),
            Term::between("x", 10, 20),
        ]);
        assert_eq!(
            list.build().to_sql(),
            "`x_from`=:where_x_from AND `x_to`=:where_x_to AND `x` BETWEEN :where_x_from_2 AND :where_x_to_2"
        );
        let values = bindings.bound_values();
        assert_eq!(values.len(), 4);
        assert_eq!(values[":where_x_from"], Value::from(1));
        assert_eq!(values[":where_x_to_2"], Value::from(20));

        let (list, bindings) = where_list(vec![Term::between("x", 10, 20), Term::eq("x_to", 2)]);
        assert_eq!(
            list.build().to_sql(),
            "`x` BETWEEN :where_x_from AND :where_x_to AND `x_to`=:where_x_to_2"
        );
        assert_eq!(bindings.bound_values()[":where_x_to"], Value::from(20));
    }

    #[test]
    fn replacing_in_list_keeps_values_of_other_entries() {
        let (list, bindings) = where_list(vec![
            Term::in_list("id", [1, 2, 3]),
            Term::eq("id_2", 9),
            Term::in_list("id", [4]),
        ]);
        let sql = list.build();
        assert_eq!(sql.to_sql(), "`id` IN (:where_id_1) AND `id_2`=:where_id_2_2");

        let values = bindings.bound_values();
        assert_eq!(values.len(), 2);
        assert!(sql.params().all(|name| values.contains_key(&format!(":{name}"))));
        assert_eq!(values[":where_id_2_2"], Value::from(9));
    }

    #[test]
    fn numeric_and_underscored_keys_do_not_share_a_placeholder() {
        let (list, bindings) = where_list(vec![Term::eq("0", "a"), Term::eq("_0", "b")]);
        assert_eq!(list.build().to_sql(), "`0`=:where__0 AND `_0`=:where__0_2");
        assert_eq!(bindings.bound_values().len(), 2);
    }

    #[test]
    fn clear_forgets_values() {
        let (mut list, mut bindings) = where_list(vec![Term::id(1)]);
        list.clear(&mut bindings);
        assert!(list.is_empty());
        assert!(bindings.is_empty());
    }
}
