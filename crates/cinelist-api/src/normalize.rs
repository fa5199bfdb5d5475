//! Response normalization.
//!
//! Every payload is turned into a camelCase-keyed JSON value before anything else
//! looks at it. Bodies that are not JSON fall back to markup parsing (HTML error
//! pages from proxies) or get wrapped as `{"message": raw}`.

use regex::Regex;
use serde_json::{json, Map, Value};
use std::sync::LazyLock;

use crate::markup;

/// Keys like `12-2024` are data, not field names, and are never rewritten.
static DATE_FRAGMENT_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}-\d{4}$").expect("valid date fragment pattern"));

/// Normalize a decoded payload. Strings get a second chance as JSON or markup.
pub fn normalize(raw: Value) -> Value {
    match raw {
        Value::String(text) => normalize_text(&text),
        other => camelize_keys(other),
    }
}

/// Normalize a payload that arrived as text.
pub fn normalize_text(text: &str) -> Value {
    let parsed = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(_) if markup::looks_like_markup(text) => markup::parse_markup(text),
        Err(_) => json!({ "message": text }),
    };
    camelize_keys(parsed)
}

/// Normalize a raw response body: JSON bodies are decoded first, anything else is
/// treated as a string payload.
pub fn normalize_body(body: &str) -> Value {
    let raw = serde_json::from_str::<Value>(body).unwrap_or_else(|_| Value::String(body.to_string()));
    normalize(raw)
}

/// Recursively rewrite mapping keys to camelCase, descending into sequences.
pub fn camelize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, nested) in map {
                let key = if DATE_FRAGMENT_KEY.is_match(&key) {
                    key
                } else {
                    camel_case(&key)
                };
                out.insert(key, camelize_keys(nested));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(camelize_keys).collect()),
        other => other,
    }
}

fn is_separator(c: char) -> bool {
    c == '_' || c == '-' || c == '.' || c.is_whitespace()
}

fn is_all_uppercase(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

/// `release_date` -> `releaseDate`, `iso_3166_1` -> `iso31661`, `ID` -> `id`.
///
/// Already camelCased keys come back unchanged.
pub fn camel_case(key: &str) -> String {
    let words: Vec<&str> = key.split(is_separator).filter(|w| !w.is_empty()).collect();
    if words.is_empty() {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len());
    for (index, word) in words.iter().enumerate() {
        let upper = is_all_uppercase(word);
        let mut chars = word.chars();
        let Some(first) = chars.next() else {
            continue;
        };
        let rest = chars.as_str();

        if index == 0 {
            if upper {
                out.push_str(&word.to_lowercase());
            } else {
                out.extend(first.to_lowercase());
                out.push_str(rest);
            }
        } else {
            out.extend(first.to_uppercase());
            if upper {
                out.push_str(&rest.to_lowercase());
            } else {
                out.push_str(rest);
            }
        }
    }
    out
}
