//! Query-string serialization with bracket notation for nested values.

use serde_json::Value;

/// Serialize a parameter mapping into `key=value&...`.
///
/// Nested mappings become `parent[child]`, sequences become `key[0]`, `key[1]`, ...
/// Null values are skipped. Keys and values are percent-encoded separately.
pub fn build(params: &Value) -> String {
    flatten(params)
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Flatten a parameter mapping into unencoded `(bracketed key, value)` pairs.
///
/// Shared by the query string and multipart form encoders.
pub fn flatten(params: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Value::Object(map) = params {
        for (key, value) in map {
            push_value(&mut pairs, key.clone(), value);
        }
    }
    pairs
}

fn push_value(pairs: &mut Vec<(String, String)>, key: String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (child, nested) in map {
                push_value(pairs, format!("{}[{}]", key, child), nested);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                push_value(pairs, format!("{}[{}]", key, index), item);
            }
        }
        Value::String(s) => pairs.push((key, s.clone())),
        scalar => pairs.push((key, scalar.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(query: &str) -> Vec<&str> {
        let mut pairs: Vec<&str> = query.split('&').filter(|p| !p.is_empty()).collect();
        pairs.sort_unstable();
        pairs
    }

    #[test]
    fn test_flat_params() {
        let query = build(&json!({"page": 2, "include_adult": false, "query": "star wars"}));
        assert_eq!(
            pairs(&query),
            vec!["include_adult=false", "page=2", "query=star%20wars"]
        );
    }

    #[test]
    fn test_nested_params_use_brackets() {
        let query = build(&json!({"filter": {"year": 2024, "genre": "drama"}}));
        assert_eq!(
            pairs(&query),
            vec!["filter%5Bgenre%5D=drama", "filter%5Byear%5D=2024"]
        );
    }

    #[test]
    fn test_arrays_are_indexed() {
        let query = build(&json!({"ids": [3, 5]}));
        assert_eq!(query, "ids%5B0%5D=3&ids%5B1%5D=5");

        let query = build(&json!({"tags": [{"name": "a"}]}));
        assert_eq!(query, "tags%5B0%5D%5Bname%5D=a");
    }

    #[test]
    fn test_reserved_characters_are_encoded() {
        let query = build(&json!({
            "primary_release_date.gte": "2024-12-01",
            "with_release_type": "2|3",
            "q": "a&b=c"
        }));
        assert_eq!(
            pairs(&query),
            vec![
                "primary_release_date.gte=2024-12-01",
                "q=a%26b%3Dc",
                "with_release_type=2%7C3"
            ]
        );
    }

    #[test]
    fn test_flatten_keeps_keys_unencoded() {
        let pairs = flatten(&json!({"a": {"b": 1, "c": [2, 3]}}));
        assert_eq!(
            pairs,
            vec![
                ("a[b]".to_string(), "1".to_string()),
                ("a[c][0]".to_string(), "2".to_string()),
                ("a[c][1]".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_null_values_are_skipped() {
        assert_eq!(build(&json!({"a": null, "b": 1})), "b=1");
    }

    #[test]
    fn test_empty_and_non_mapping_input() {
        assert_eq!(build(&json!({})), "");
        assert_eq!(build(&json!(null)), "");
        assert_eq!(build(&json!([1, 2])), "");
    }
}
