//! Classification of upstream response bodies.

use serde_json::Value;

/// A response body, classified once: JSON or plain text.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    Structured(Value),
    Raw(String),
}

impl ResponseShape {
    pub fn classify(body: String) -> Self {
        match serde_json::from_str::<Value>(&body) {
            Ok(value) if value.is_object() => ResponseShape::Structured(value),
            _ => ResponseShape::Raw(body),
        }
    }

    /// First non-empty string found at any of the JSON pointers.
    pub fn text_at(&self, pointers: &[&str]) -> Option<String> {
        let ResponseShape::Structured(value) = self else {
            return None;
        };
        pointers
            .iter()
            .filter_map(|p| value.pointer(p).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}
