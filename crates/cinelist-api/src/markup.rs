//! Best-effort conversion of HTML/XML bodies into nested mappings.
//!
//! Elements are matched as `<name ...>content</name>` triples or `<name />`.
//! Content has to sit on one line and must not reopen the same tag; content that
//! itself holds elements is parsed recursively, plain text is kept as a string,
//! and empty or self-closing elements map to `null`. Later elements overwrite
//! earlier ones with the same name.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[a-zA-Z][\s\S]*>").expect("valid markup pattern"));

pub fn looks_like_markup(text: &str) -> bool {
    TAG.is_match(text)
}

struct Element<'a> {
    name: &'a str,
    content: Option<&'a str>,
    end: usize,
}

pub fn parse_markup(text: &str) -> Value {
    let mut out = Map::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('<') {
        let start = pos + offset;
        match match_element(text, start) {
            Some(element) => {
                out.insert(element.name.to_string(), element_value(element.content));
                pos = element.end;
            }
            None => pos = start + 1,
        }
    }

    Value::Object(out)
}

fn element_value(content: Option<&str>) -> Value {
    match content {
        Some(content) if !content.is_empty() => match parse_markup(content) {
            Value::Object(nested) if !nested.is_empty() => Value::Object(nested),
            _ => Value::String(content.to_string()),
        },
        _ => Value::Null,
    }
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn match_element(text: &str, start: usize) -> Option<Element<'_>> {
    let after_bracket = start + 1;
    let rest = &text[after_bracket..];
    let name_len = rest.find(|c: char| !is_word(c)).unwrap_or(rest.len());
    let name = &rest[..name_len];
    let after_name = after_bracket + name_len;

    if let Some(content_start) = open_tag_end(text, after_name) {
        if let Some((content_end, end)) = find_close(text, content_start, name) {
            return Some(Element {
                name,
                content: Some(&text[content_start..content_end]),
                end,
            });
        }
    }

    let trimmed = after_name
        + text[after_name..]
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(text.len() - after_name);
    if text[trimmed..].starts_with("/>") {
        return Some(Element {
            name,
            content: None,
            end: trimmed + 2,
        });
    }

    None
}

/// Position just past the `>` closing an opening tag, attributes included.
fn open_tag_end(text: &str, after_name: usize) -> Option<usize> {
    let next = text[after_name..].chars().next()?;
    if next == '>' {
        return Some(after_name + 1);
    }
    if next.is_whitespace() {
        return text[after_name..].find('>').map(|i| after_name + i + 1);
    }
    None
}

/// Locate `</name>` for content starting at `content_start`.
///
/// Content extends as far as possible (to the end of the line or the next `<name`)
/// and then backs off to the last closing tag inside that span.
fn find_close(text: &str, content_start: usize, name: &str) -> Option<(usize, usize)> {
    let reopen = format!("<{}", name);
    let close = format!("</{}>", name);
    let body = &text[content_start..];

    let mut limit = body.len();
    for (index, c) in body.char_indices() {
        if is_line_terminator(c) || body[index..].starts_with(&reopen) {
            limit = index;
            break;
        }
    }

    let close_at = body
        .match_indices(close.as_str())
        .map(|(index, _)| index)
        .take_while(|index| *index <= limit)
        .last()?;

    let content_end = content_start + close_at;
    Some((content_end, content_end + close.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detects_markup() {
        assert!(looks_like_markup("<html><body>hi</body></html>"));
        assert!(looks_like_markup("prefix </div> suffix"));
        assert!(!looks_like_markup("a < b and c > d"));
        assert!(!looks_like_markup("plain text"));
    }

    #[test]
    fn test_nested_elements() {
        let parsed = parse_markup("<response><code>34</code><message>Not found</message></response>");
        assert_eq!(parsed, json!({"response": {"code": "34", "message": "Not found"}}));
    }

    #[test]
    fn test_self_closing_and_empty_elements_are_null() {
        let parsed = parse_markup("<root><empty></empty><br /><flag/></root>");
        assert_eq!(parsed, json!({"root": {"empty": null, "br": null, "flag": null}}));
    }

    #[test]
    fn test_attributes_are_skipped() {
        let parsed = parse_markup(r#"<error type="auth" retry="no">denied</error>"#);
        assert_eq!(parsed, json!({"error": "denied"}));
    }

    #[test]
    fn test_multiline_page_keeps_single_line_elements() {
        let page = "<html>\n<head><title>502 Bad Gateway</title></head>\n<body>\n<center><h1>502 Bad Gateway</h1></center>\n</body>\n</html>\n";
        let parsed = parse_markup(page);
        assert_eq!(
            parsed,
            json!({
                "head": {"title": "502 Bad Gateway"},
                "center": {"h1": "502 Bad Gateway"}
            })
        );
    }

    #[test]
    fn test_repeated_tags_do_not_swallow_siblings() {
        let parsed = parse_markup("<item>one</item><item>two</item>");
        assert_eq!(parsed, json!({"item": "two"}));
    }

    #[test]
    fn test_unclosed_tag_is_ignored() {
        let parsed = parse_markup("<p>dangling <b>bold</b>");
        assert_eq!(parsed, json!({"b": "bold"}));
    }
}
