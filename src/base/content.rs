//! Tool-call result model.
//!
//! The external tool's payloads have no schema guarantee, so a result is kept
//! as an open document: only `isError` and the `content` items are typed, and
//! every other field rides along untouched in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// One element of a tool-call result's `content` sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentItem(JsonValue);

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        ContentItem(serde_json::json!({ "type": "text", "text": text.into() }))
    }

    pub fn from_value(value: JsonValue) -> Self {
        ContentItem(value)
    }

    /// The item's text, when it is a `{"type":"text","text":...}` item.
    pub fn as_text(&self) -> Option<&str> {
        let obj = self.0.as_object()?;
        if obj.get("type").and_then(JsonValue::as_str) != Some("text") {
            return None;
        }
        obj.get("text").and_then(JsonValue::as_str)
    }

    pub fn as_value(&self) -> &JsonValue {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
    #[serde(default)]
    pub content: Vec<ContentItem>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl ToolCallResult {
    pub fn success(content: Vec<ContentItem>) -> Self {
        Self {
            is_error: Some(false),
            content,
            extra: Map::new(),
        }
    }

    pub fn error(content: Vec<ContentItem>) -> Self {
        Self {
            is_error: Some(true),
            content,
            extra: Map::new(),
        }
    }

    /// Only an explicit `true` counts; absent is success.
    pub fn is_error(&self) -> bool {
        self.is_error == Some(true)
    }

    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(ContentItem::as_text)
    }

    /// First text item, or a JSON dump of the whole result when there is none.
    pub fn error_detail(&self) -> String {
        match self.first_text() {
            Some(text) => text.to_owned(),
            None => self.to_string(),
        }
    }
}

impl std::fmt::Display for ToolCallResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{self:?}"),
        }
    }
}
