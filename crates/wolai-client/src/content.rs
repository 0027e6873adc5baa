//! Rich-text content parsing.
//!
//! Wolai stores a block's text as a flat list of styled spans:
//!
//! ```json
//! [{"title": "Hello ", "type": "text"}, {"title": "World", "bold": true}]
//! ```
//!
//! [`parse_content`] flattens that into a single markdown-ish string. The
//! input is raw JSON because the API is not trusted to send a well-formed
//! list; anything unexpected degrades to best-effort text.

use serde_json::Value;

/// Flatten a block's `content` value into text.
///
/// Bold spans become `**…**`, italic spans `*…*` (applied after bold, so a
/// bold-italic span reads `***…***`). Never fails.
pub fn parse_content(content: &Value) -> String {
    let spans = match content {
        Value::Array(spans) => spans,
        other if truthy(other) => return scalar_text(other),
        _ => return String::new(),
    };

    let mut text = String::new();
    for span in spans {
        let Value::Object(fields) = span else {
            text.push_str(&scalar_text(span));
            continue;
        };

        let mut piece = match fields.get("title") {
            Some(Value::String(title)) => title.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => scalar_text(other),
        };
        if fields.get("bold").is_some_and(truthy) {
            piece = format!("**{piece}**");
        }
        if fields.get("italic").is_some_and(truthy) {
            piece = format!("*{piece}*");
        }
        text.push_str(&piece);
    }
    text
}

/// Text of a non-list value: strings verbatim, null empty, the rest as JSON.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// JSON truthiness: `false`, `null`, zero, and empty containers are falsy.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bold_then_plain() {
        let content = json!([{"title": "a", "bold": true}, {"title": "b"}]);
        assert_eq!(parse_content(&content), "**a**b");
    }

    #[test]
    fn test_null_is_empty() {
        assert_eq!(parse_content(&Value::Null), "");
    }

    #[test]
    fn test_string_passes_through() {
        assert_eq!(parse_content(&json!("x")), "x");
    }

    #[test]
    fn test_bold_italic_nesting() {
        let content = json!([{"title": "both", "bold": true, "italic": true}]);
        assert_eq!(parse_content(&content), "***both***");
    }

    #[test]
    fn test_italic_only() {
        let content = json!([{"title": "lean", "italic": 1}]);
        assert_eq!(parse_content(&content), "*lean*");
    }

    #[test]
    fn test_falsy_flags_ignored() {
        let content = json!([{"title": "plain", "bold": false, "italic": 0}]);
        assert_eq!(parse_content(&content), "plain");
    }

    #[test]
    fn test_missing_title_defaults_empty() {
        let content = json!([{"bold": false}, {"title": "tail"}]);
        assert_eq!(parse_content(&content), "tail");
    }

    #[test]
    fn test_non_object_entries_stringified() {
        let content = json!(["raw", 42, {"title": "!"}]);
        assert_eq!(parse_content(&content), "raw42!");
    }

    #[test]
    fn test_empty_list_and_scalars() {
        assert_eq!(parse_content(&json!([])), "");
        assert_eq!(parse_content(&json!(7)), "7");
        assert_eq!(parse_content(&json!(true)), "true");
        assert_eq!(parse_content(&json!(false)), "");
        assert_eq!(parse_content(&json!("")), "");
    }
}
