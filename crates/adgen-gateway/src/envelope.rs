//! Kie response envelope handling.
//!
//! Every endpoint answers `{code, msg|message, data}`. A numeric `code` other
//! than 200 is a failure even when the HTTP status is 2xx.

use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};

/// A successfully unwrapped response body.
#[derive(Debug, Clone)]
pub struct Envelope {
    body: Value,
}

impl Envelope {
    /// The `data` member, or the whole body when the provider omitted the wrapper.
    pub fn data(&self) -> &Value {
        match self.body.get("data") {
            Some(data) if !data.is_null() => data,
            _ => &self.body,
        }
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}

/// Turn an HTTP status plus raw body into an [`Envelope`] or a typed error.
pub fn unwrap_envelope(operation: &str, status: u16, raw: &str) -> GatewayResult<Envelope> {
    if status == 401 {
        return Err(GatewayError::InvalidApiKey);
    }

    let success = (200..300).contains(&status);
    let body = if raw.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        match serde_json::from_str::<Value>(raw) {
            Ok(body) => body,
            Err(_) if success => {
                return Err(GatewayError::invalid_response(format!(
                    "Invalid JSON in {operation} response."
                )))
            }
            Err(_) => {
                return Err(GatewayError::from_http_status(
                    status,
                    non_empty(raw).unwrap_or_else(|| format!("{operation} failed {status}")),
                ))
            }
        }
    };

    if !success {
        let message = provider_message(&body)
            .or_else(|| non_empty(raw))
            .unwrap_or_else(|| format!("{operation} failed {status}"));
        return Err(GatewayError::from_http_status(status, message));
    }

    if let Some(code) = body.get("code").and_then(Value::as_i64) {
        if code != 200 {
            if code == 401 {
                return Err(GatewayError::InvalidApiKey);
            }
            let message = provider_message(&body).unwrap_or_else(|| format!("{operation} failed {code}"));
            return Err(GatewayError::Provider {
                status: u16::try_from(code).unwrap_or(status),
                message,
            });
        }
    }

    Ok(Envelope { body })
}

/// Provider-supplied message: `msg`, then `message`.
pub fn provider_message(body: &Value) -> Option<String> {
    ["msg", "message"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .find_map(non_empty)
}

/// Read a list of URLs that may arrive as a JSON array or a JSON-encoded string.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(non_empty)
            .collect(),
        Some(Value::String(encoded)) => match serde_json::from_str::<Value>(encoded) {
            Ok(decoded @ Value::Array(_)) => string_list(Some(&decoded)),
            _ => non_empty(encoded).into_iter().collect(),
        },
        _ => Vec::new(),
    }
}

pub(crate) fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
