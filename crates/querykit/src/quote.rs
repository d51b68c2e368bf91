//! Identifier and literal quoting.
//!
//! Identifiers are quoted with backticks unless they already look like SQL
//! (contain an operator, a quote, whitespace, parentheses, a dot or a comma).
//! Such strings are passed through untouched: the caller supplied raw SQL and
//! is responsible for it.
//!
//! # Example
//! ```
//! use querykit::quote::{quote_identifier, quote_table};
//!
//! assert_eq!(quote_identifier("title"), "`title`");
//! assert_eq!(quote_identifier("p.id"), "p.id");
//! assert_eq!(quote_table("pages p", Some("yeah_")), "`yeah_pages` `p`");
//! ```

use crate::value::Value;
use regex::Regex;
use std::sync::LazyLock;

static SPECIAL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[><,.()`\s*=:]").expect("special character pattern is valid")
});

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?\s*$")
        .expect("numeric pattern is valid")
});

/// Whether `s` contains characters that mark it as a raw SQL fragment rather
/// than a plain name.
pub fn has_special_chars(s: &str) -> bool {
    SPECIAL_CHARS.is_match(s)
}

/// Whether `s` reads as a number: optional surrounding whitespace, sign,
/// decimal part and exponent.
pub fn is_numeric(s: &str) -> bool {
    NUMERIC.is_match(s)
}

/// Quote a column or index name, unless it already contains SQL.
pub fn quote_identifier(name: &str) -> String {
    if has_special_chars(name) {
        name.to_string()
    } else {
        format!("`{name}`")
    }
}

/// Quote a table name, applying `prefix` to plain names.
///
/// - Names containing a backtick or a comma are returned as-is, without prefix.
/// - `"name alias"` quotes both halves: `` `prefix_name` `alias` ``.
pub fn quote_table(name: &str, prefix: Option<&str>) -> String {
    if name.contains('`') || name.contains(',') {
        return name.to_string();
    }

    let table = format!("{}{}", prefix.unwrap_or_default(), name);
    let table = table.trim();
    match table.split_once(' ') {
        Some((name, alias)) => format!("{} {}", quote_identifier(name), quote_identifier(alias)),
        None => quote_identifier(table),
    }
}

/// Backslash-escape `\`, `'`, `"` and NUL.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out
}

/// Render a value as an SQL literal.
///
/// Used only when rendering statements with values inlined; execution always
/// goes through placeholders.
pub fn quote_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => u8::from(*b).to_string(),
        Value::Int(i) => i.to_string(),
        Value::UInt(u) => u.to_string(),
        Value::Float(f) if f.is_finite() => f.to_string(),
        Value::Float(f) => format!("\"{f}\""),
        Value::Text(s) if is_numeric(s) => s.clone(),
        Value::Text(s) => format!("\"{}\"", escape_string(s)),
    }
}

/// `` `key`=literal ``
pub fn quote_key_value(key: &str, value: &Value) -> String {
    format!("{}={}", quote_identifier(key), quote_value(value))
}

/// Make a column name usable inside a placeholder name: every character
/// outside `[A-Za-z0-9_]` becomes `_` (`p.id` → `p_id`).
pub fn clean_key_name(column: &str) -> String {
    column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Placeholder name (without the leading `:`) for `key` in a clause-part.
///
/// A purely numeric key gets a leading `_` so the result stays a valid name.
pub fn binding_key(part: &str, key: &str) -> String {
    let key = clean_key_name(key);
    if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
        format!("{part}__{key}")
    } else {
        format!("{part}_{key}")
    }
}

/// Placeholder (`:<part>_<key>`) for `key` in a clause-part.
pub fn binding_name(part: &str, key: &str) -> String {
    format!(":{}", binding_key(part, key))
}
