//! Chat completion payloads and tolerant response parsing.
//!
//! Successful responses are OpenAI-style `choices[0].message.content`, but the
//! endpoint also answers with content under `parts[]` or with the message as a
//! bare string. Each accepted shape is a matcher; the first match wins.

use serde::Serialize;
use serde_json::Value;

use crate::envelope::{non_empty, provider_message};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Request body. Streaming is always off.
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub messages: &'a [ChatMessage],
    pub stream: bool,
    pub include_thoughts: bool,
}

type ShapeMatcher = fn(&Value) -> Option<String>;

/// Accepted response shapes, in priority order. A present `content`
/// wins even when empty; the others only apply when it is absent.
const SHAPES: &[ShapeMatcher] = &[message_content, message_parts_text, bare_string_message];

fn first_message(body: &Value) -> Option<&Value> {
    body.get("choices")?.get(0)?.get("message")
}

fn message_content(body: &Value) -> Option<String> {
    match first_message(body)?.get("content")? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(match other.get("text").and_then(Value::as_str) {
            Some(text) => text.to_string(),
            None => other.to_string(),
        }),
    }
}

fn message_parts_text(body: &Value) -> Option<String> {
    first_message(body)?
        .get("parts")?
        .as_array()?
        .iter()
        .find_map(|part| part.get("text").and_then(Value::as_str))
        .map(str::to_string)
}

fn bare_string_message(body: &Value) -> Option<String> {
    first_message(body)?.as_str().map(str::to_string)
}

/// Extract generated text, or `None` if the first matching shape is blank.
pub fn extract_text(body: &Value) -> Option<String> {
    SHAPES
        .iter()
        .find_map(|shape| shape(body))
        .filter(|text| !text.trim().is_empty())
}

/// Best explanation for a response without usable text.
pub fn empty_reason(body: &Value) -> String {
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .and_then(non_empty)
        .or_else(|| provider_message(body))
        .or_else(|| {
            body.get("choices")
                .and_then(Value::as_array)
                .filter(|choices| choices.is_empty())
                .map(|_| "Empty choices (possible filter or quota).".to_string())
        })
        .or_else(|| {
            body.get("choices")
                .and_then(|c| c.get(0))
                .filter(|choice| choice.get("message").is_none())
                .map(|_| "Choice has no message.".to_string())
        })
        .unwrap_or_else(|| "Try again or use a different prompt.".to_string())
}
