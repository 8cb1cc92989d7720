//! Payload sanitization for audit records.
//!
//! Payloads are parsed into a `serde_json::Value` tree and walked with a
//! [`ValueVisitor`]; the [`Redactor`] visitor masks credentials, image data
//! URIs and long base64 blobs. Text that is not JSON is treated as a single
//! string value.

use serde_json::Value;

const REDACTED: &str = "[REDACTED]";
const MIN_BASE64_BLOB_LEN: usize = 256;
const SENSITIVE_KEY_FRAGMENTS: &[&str] = &[
    "api_key",
    "apikey",
    "api-key",
    "authorization",
    "password",
    "secret",
    "credential",
];
const SENSITIVE_KEYS: &[&str] = &["token", "access_token", "refresh_token"];

/// Visitor over a JSON value tree
///
/// Default implementations are no-ops, so implementors only override what
/// they need.
pub trait ValueVisitor {
    /// Called for each object member before its subtree is walked.
    /// Returning `false` skips the subtree.
    #[allow(unused_variables)]
    fn visit_member(&mut self, key: &str, value: &mut Value) -> bool {
        true
    }

    /// Called for every string leaf
    #[allow(unused_variables)]
    fn visit_string(&mut self, value: &mut String) {}
}

/// Walks `value` depth-first, letting `visitor` rewrite it in place
pub fn walk_value(value: &mut Value, visitor: &mut dyn ValueVisitor) {
    match value {
        Value::Object(members) => {
            for (key, member) in members.iter_mut() {
                if visitor.visit_member(key, member) {
                    walk_value(member, visitor);
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                walk_value(item, visitor);
            }
        }
        Value::String(text) => visitor.visit_string(text),
        _ => {}
    }
}

/// Masks sensitive values and counts what it replaced
#[derive(Debug, Default)]
pub struct Redactor {
    pub redacted: usize,
}

impl ValueVisitor for Redactor {
    fn visit_member(&mut self, key: &str, value: &mut Value) -> bool {
        if is_sensitive_key(key) && !value.is_null() {
            *value = Value::String(REDACTED.to_string());
            self.redacted += 1;
            return false;
        }
        true
    }

    fn visit_string(&mut self, value: &mut String) {
        if is_image_data_uri(value) {
            *value = "[REDACTED image data]".to_string();
            self.redacted += 1;
        } else if is_base64_blob(value) {
            *value = format!("[REDACTED base64, {} chars]", value.len());
            self.redacted += 1;
        }
    }
}

/// Returns a copy of `payload` safe to store or log
pub fn redact_payload(payload: &str) -> String {
    let mut redactor = Redactor::default();

    match serde_json::from_str::<Value>(payload) {
        Ok(mut tree) => {
            walk_value(&mut tree, &mut redactor);
            tree.to_string()
        }
        Err(_) => {
            let mut text = payload.to_string();
            redactor.visit_string(&mut text);
            text
        }
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_lowercase();
    SENSITIVE_KEYS.contains(&key.as_str())
        || SENSITIVE_KEY_FRAGMENTS
            .iter()
            .any(|fragment| key.contains(fragment))
}

fn is_image_data_uri(value: &str) -> bool {
    value.starts_with("data:image/") && value.contains(";base64,")
}

fn is_base64_blob(value: &str) -> bool {
    value.len() >= MIN_BASE64_BLOB_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=' | b'-' | b'_'))
}
