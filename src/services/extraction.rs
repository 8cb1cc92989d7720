//! Provider-agnostic parsing of AI responses.
//!
//! Both supported providers wrap the assistant's text differently, and models
//! do not reliably return bare JSON even when asked to. Everything here is a
//! pure function over strings and `serde_json` values.

use serde_json::{Map, Value};

const CODE_FENCE: &str = "```";

/// Extracts the assistant text from a provider response body
///
/// Understands the chat-completions shape (`choices[0].message.content`) and
/// the messages shape (top-level `content` array). Returns `None` when no
/// non-blank text is present.
pub fn extract_assistant_text(response: &Value) -> Option<String> {
    let chat_content = response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"));

    if let Some(text) = chat_content.and_then(text_from_content) {
        return Some(text);
    }

    response
        .get("content")
        .filter(|content| content.is_array())
        .and_then(text_from_content)
}

fn text_from_content(content: &Value) -> Option<String> {
    match content {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Array(parts) => {
            let texts: Vec<&str> = parts
                .iter()
                .filter_map(|part| match part {
                    Value::String(text) => Some(text.as_str()),
                    Value::Object(fields) => fields.get("text").and_then(Value::as_str),
                    _ => None,
                })
                .filter(|text| !text.trim().is_empty())
                .collect();

            if texts.is_empty() {
                None
            } else {
                Some(texts.join("\n"))
            }
        }
        _ => None,
    }
}

/// Finds a JSON object in free-form model output
///
/// Candidates are tried in order: the whole trimmed text, the body of the
/// first code fence, then the first balanced `{...}` span.
pub fn extract_json_object(content: &str) -> Option<Map<String, Value>> {
    let mut candidates: Vec<&str> = Vec::with_capacity(3);

    let trimmed = content.trim();
    if !trimmed.is_empty() {
        candidates.push(trimmed);
    }
    if let Some(fenced) = fenced_block(content) {
        candidates.push(fenced);
    }
    if let Some(span) = first_balanced_object(content) {
        candidates.push(span);
    }

    let mut seen: Vec<&str> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if seen.contains(&candidate) {
            continue;
        }
        seen.push(candidate);

        if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(candidate) {
            return Some(object);
        }
    }

    None
}

/// Text between the first code fence's opening line and its closing fence
fn fenced_block(content: &str) -> Option<&str> {
    let fence_start = content.find(CODE_FENCE)?;
    let after_fence = fence_start + CODE_FENCE.len();
    let body_start = after_fence + content[after_fence..].find('\n')? + 1;
    let body_end = body_start + content[body_start..].find(CODE_FENCE)?;

    let body = content[body_start..body_end].trim();
    (!body.is_empty()).then_some(body)
}

/// First `{...}` span whose braces balance, ignoring braces inside strings
///
/// String state is tracked from the first character, so a quoted `{...}` in
/// leading prose is skipped rather than taken as the object.
fn first_balanced_object(content: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, ch) in content.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '{' => {
                if depth == 0 {
                    start = index;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Some(&content[start..=index]);
                }
            }
            '"' => in_string = true,
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_shape_plain_string() {
        let response = json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"suggestions\":[]}"}}]
        });
        assert_eq!(
            extract_assistant_text(&response).as_deref(),
            Some("{\"suggestions\":[]}")
        );
    }

    #[test]
    fn test_chat_shape_parts_are_joined() {
        let response = json!({
            "choices": [{"message": {"content": [
                "first",
                {"type": "text", "text": "second"},
                {"type": "image_url", "image_url": {"url": "https://x"}},
                {"type": "text", "text": "   "}
            ]}}]
        });
        assert_eq!(
            extract_assistant_text(&response).as_deref(),
            Some("first\nsecond")
        );
    }

    #[test]
    fn test_content_shape() {
        let response = json!({
            "id": "msg_01",
            "content": [
                {"type": "text", "text": "Here you go:"},
                {"type": "tool_use", "id": "t1", "input": {}},
                {"type": "text", "text": "{\"a\":1}"}
            ]
        });
        assert_eq!(
            extract_assistant_text(&response).as_deref(),
            Some("Here you go:\n{\"a\":1}")
        );
    }

    #[test]
    fn test_missing_or_blank_text_is_none() {
        assert_eq!(extract_assistant_text(&json!({})), None);
        assert_eq!(
            extract_assistant_text(&json!({"choices": [{"message": {"content": "  "}}]})),
            None
        );
        assert_eq!(extract_assistant_text(&json!({"content": "plain"})), None);
        assert_eq!(extract_assistant_text(&json!({"content": []})), None);
    }

    #[test]
    fn test_bare_object() {
        let object = extract_json_object("  {\"suggestions\": []}\n").unwrap();
        assert!(object.contains_key("suggestions"));
    }

    #[test]
    fn test_fenced_object() {
        let content = "```json\n{\"suggestions\":[{\"recipeId\":\"x\",\"reason\":\"y\"}]}\n```";
        let object = extract_json_object(content).unwrap();
        assert_eq!(
            Value::Object(object),
            json!({"suggestions": [{"recipeId": "x", "reason": "y"}]})
        );
    }

    #[test]
    fn test_fenced_object_with_surrounding_prose() {
        let content = "Sure! Here are my picks:\n```\n{\"a\": 1}\n```\nEnjoy your meal.";
        let object = extract_json_object(content).unwrap();
        assert_eq!(Value::Object(object), json!({"a": 1}));
    }

    #[test]
    fn test_object_embedded_in_prose() {
        let content = "I picked these for you {\"a\": {\"b\": 2}} hope that helps!";
        let object = extract_json_object(content).unwrap();
        assert_eq!(Value::Object(object), json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_escaped_quotes_do_not_end_scan_early() {
        let content = r#"Result: {"reason": "Say \"cheese}\" twice", "n": 1} trailing"#;
        let object = extract_json_object(content).unwrap();
        assert_eq!(object["reason"], "Say \"cheese}\" twice");
        assert_eq!(object["n"], 1);
    }

    #[test]
    fn test_quoted_prose_before_object() {
        let content = r#"The "best" options: {"a": 1}"#;
        let object = extract_json_object(content).unwrap();
        assert_eq!(Value::Object(object), json!({"a": 1}));
    }

    #[test]
    fn test_braces_inside_quoted_prose_are_skipped() {
        let content = r#"You said "{x}" earlier, so: {"a": 1}"#;
        assert_eq!(first_balanced_object(content), Some(r#"{"a": 1}"#));

        let object = extract_json_object(content).unwrap();
        assert_eq!(Value::Object(object), json!({"a": 1}));
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        assert_eq!(extract_json_object("[1, 2, 3]"), None);
        assert_eq!(extract_json_object("\"just a string\""), None);
    }

    #[test]
    fn test_no_object_found() {
        assert_eq!(extract_json_object(""), None);
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("{ unbalanced"), None);
        assert_eq!(extract_json_object("{not: json}"), None);
    }
}
