//! Bound values, partitioned by clause-part.

use crate::error::{DbError, DbResult};
use crate::quote::{binding_key, binding_name, clean_key_name};
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;

/// Flat `:placeholder → value` map handed to an executor.
pub type BoundValues = IndexMap<String, Value>;

/// The clause a bound value belongs to.
///
/// The part is baked into the placeholder name, so `id` bound in WHERE and in
/// SET of one statement become `:where_id` and `:set_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClausePart {
    Where,
    Having,
    Set,
    Insert,
}

impl ClausePart {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClausePart::Where => "where",
            ClausePart::Having => "having",
            ClausePart::Set => "set",
            ClausePart::Insert => "insert",
        }
    }
}

impl fmt::Display for ClausePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binding table of one statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    parts: IndexMap<ClausePart, IndexMap<String, Value>>,
    user: BoundValues,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` for `key` in `part` and return the placeholder name
    /// (without `:`). Binding the same key again overwrites the value.
    pub fn set(&mut self, part: ClausePart, key: &str, value: impl Into<Value>) -> String {
        let clean = clean_key_name(key);
        let name = binding_key(part.as_str(), &clean);
        self.parts.entry(part).or_default().insert(clean, value.into());
        name
    }

    pub fn get(&self, part: ClausePart, key: &str) -> Option<&Value> {
        self.parts.get(&part)?.get(&clean_key_name(key))
    }

    /// Forget the value bound for `key` in `part`.
    pub fn remove(&mut self, part: ClausePart, key: &str) -> Option<Value> {
        self.parts.get_mut(&part)?.shift_remove(&clean_key_name(key))
    }

    /// Forget everything bound in `part`.
    pub fn clear_part(&mut self, part: ClausePart) {
        self.parts.shift_remove(&part);
    }

    /// Bind a user variable. A leading `:` is added when missing.
    pub fn bind(&mut self, name: &str, value: impl Into<Value>) {
        let name = if name.starts_with(':') {
            name.to_string()
        } else {
            format!(":{name}")
        };
        self.user.insert(name, value.into());
    }

    /// Fails when a user variable has the name of a generated placeholder,
    /// since one of the two values would be lost.
    pub fn check_user_binds(&self) -> DbResult<()> {
        for (part, values) in &self.parts {
            for key in values.keys() {
                let name = binding_name(part.as_str(), key);
                if self.user.contains_key(&name) {
                    return Err(DbError::validation(format!(
                        "bind variable {name} collides with a generated {part} placeholder"
                    )));
                }
            }
        }
        Ok(())
    }

    /// User variables bound through [`Bindings::bind`].
    pub fn user(&self) -> &BoundValues {
        &self.user
    }

    /// Number of distinct placeholders.
    pub fn len(&self) -> usize {
        self.user.len() + self.parts.values().map(IndexMap::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every bound value keyed by placeholder: user variables first, then
    /// each clause-part in the order it was first bound.
    pub fn bound_values(&self) -> BoundValues {
        let mut out = self.user.clone();
        for (part, values) in &self.parts {
            for (key, value) in values {
                out.insert(binding_name(part.as_str(), key), value.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_in_different_parts_is_independent() {
        let mut b = Bindings::new();
        assert_eq!(b.set(ClausePart::Where, "id", 12), "where_id");
        assert_eq!(b.set(ClausePart::Set, "id", 15), "set_id");

        let values = b.bound_values();
        assert_eq!(values.get(":where_id"), Some(&Value::from(12)));
        assert_eq!(values.get(":set_id"), Some(&Value::from(15)));
    }

    #[test]
    fn rebinding_overwrites() {
        let mut b = Bindings::new();
        b.set(ClausePart::Where, "p.id", 1);
        b.set(ClausePart::Where, "p.id", 2);
        assert_eq!(b.len(), 1);
        assert_eq!(b.get(ClausePart::Where, "p.id"), Some(&Value::from(2)));
        assert_eq!(b.get(ClausePart::Where, "p_id"), Some(&Value::from(2)));
    }

    #[test]
    fn user_binds_get_colon_and_come_first() {
        let mut b = Bindings::new();
        b.set(ClausePart::Where, "id", 1);
        b.bind("me", "igor");
        b.bind(":you", "ivan");

        let keys: Vec<_> = b.bound_values().into_keys().collect();
        assert_eq!(keys, vec![":me", ":you", ":where_id"]);
    }

    #[test]
    fn user_bind_shadowing_a_placeholder_is_rejected() {
        let mut b = Bindings::new();
        b.set(ClausePart::Where, "id", 12);
        b.bind("min", 1);
        assert!(b.check_user_binds().is_ok());

        b.bind("where_id", 5);
        let err = b.check_user_binds().unwrap_err();
        assert!(matches!(err, DbError::Validation(msg) if msg.contains(":where_id")));
    }

    #[test]
    fn numeric_keys_get_separator() {
        let mut b = Bindings::new();
        assert_eq!(b.set(ClausePart::Set, "0", "x"), "set__0");
        assert!(b.bound_values().contains_key(":set__0"));
    }
}
