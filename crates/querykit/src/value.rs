//! Bindable scalar values.
//!
//! [`Value`] is what every placeholder is bound to and what result rows hold.
//! The set of variants is closed on purpose: the only type decision the
//! builder ever makes is "does this inline as a number or as a string".

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar SQL value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL `NULL`
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Whether the value is `NULL`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether the value inlines as an unquoted number.
    ///
    /// Text counts as numeric when it reads as a number (`"12"`, `" 1.5e3"`).
    pub fn is_numeric(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(_) | Value::Int(_) | Value::UInt(_) => true,
            Value::Float(f) => f.is_finite(),
            Value::Text(s) => crate::quote::is_numeric(s),
        }
    }

    /// Borrow the text payload, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Read the value as a signed integer, parsing numeric text.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Int(i) => Some(*i),
            Value::UInt(u) => i64::try_from(*u).ok(),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Float(_) | Value::Null => None,
        }
    }
}

impl fmt::Display for Value {
    /// Plain textual form, without SQL quoting. `NULL` renders as an empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", u8::from(*b)),
            Value::Int(i) => write!(f, "{i}"),
            Value::UInt(u) => write!(f, "{u}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! impl_from_int {
    ($variant:ident => $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_int!(Int => i8, i16, i32, i64, u8, u16, u32);
impl_from_int!(UInt => u64);

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::UInt(u64::try_from(v).unwrap_or(u64::MAX))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Text(v.format("%Y-%m-%d").to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Text(v.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::from(v.naive_utc())
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Text(v.hyphenated().to_string())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::Text(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_detection() {
        assert!(Value::from(12).is_numeric());
        assert!(Value::from("12").is_numeric());
        assert!(Value::from("-1.5e3").is_numeric());
        assert!(!Value::from("12abc").is_numeric());
        assert!(!Value::from(f64::NAN).is_numeric());
        assert!(!Value::Null.is_numeric());
    }

    #[test]
    fn usize_converts_to_unsigned() {
        assert_eq!(Value::from(5usize), Value::UInt(5));
        assert_eq!(Value::from(usize::MAX), Value::UInt(usize::MAX as u64));
    }

    #[test]
    fn option_maps_to_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }

    #[test]
    fn dates_render_in_mysql_format() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(7, 5, 0))
            .unwrap();
        assert_eq!(Value::from(dt), Value::Text("2024-03-09 07:05:00".to_string()));
    }

    #[test]
    fn json_scalars_convert() {
        assert_eq!(Value::from(serde_json::json!(5)), Value::Int(5));
        assert_eq!(Value::from(serde_json::json!("a")), Value::from("a"));
        assert_eq!(Value::from(serde_json::json!([1, 2])), Value::from("[1,2]"));
    }

    #[test]
    fn serializes_as_plain_json() {
        let json = serde_json::to_string(&vec![Value::Null, Value::from(1), Value::from("a")]).unwrap();
        assert_eq!(json, r#"[null,1,"a"]"#);
    }
}
