//! Per-language term lookups shared by every entity type.
//!
//! Terms are stored as `{lang: {"language": lang, "value": text}}` (aliases
//! hold a list per language). A missing language, a malformed entry, or a map
//! that is not an object all read as empty.

use std::fmt;

use serde_json::Value;

/// Language used when callers do not name one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Look up the single term for `lang` in a per-language map.
#[must_use]
pub fn term<'a>(map: Option<&'a Value>, lang: &str) -> &'a str {
    map.and_then(Value::as_object)
        .and_then(|by_language| by_language.get(lang))
        .and_then(|entry| entry.get("value"))
        .and_then(Value::as_str)
        .unwrap_or_default()
}

/// Look up every term for `lang` in a per-language list map such as aliases.
#[must_use]
pub fn term_list<'a>(map: Option<&'a Value>, lang: &str) -> Vec<&'a str> {
    map.and_then(Value::as_object)
        .and_then(|by_language| by_language.get(lang))
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.get("value").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

/// Render `['a', 'b']`.
pub(crate) fn fmt_quoted(f: &mut fmt::Formatter<'_>, values: &[&str]) -> fmt::Result {
    f.write_str("[")?;
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "'{value}'")?;
    }
    f.write_str("]")
}
