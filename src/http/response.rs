//! HTTP response handling and formatting

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::config::{ResponseMapper, ResponseType};
use crate::error::Result;

/// Raw response produced by a transport
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: HashMap<String, String>,
    /// Decoded body.
    pub response: Value,
}

impl Response {
    pub fn new(status: u16, response: Value) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            response,
        }
    }

    /// Decode a body according to the requested response type.
    ///
    /// Empty bodies decode to `null`.
    pub fn decode(body: &str, response_type: Option<ResponseType>) -> Value {
        match response_type {
            Some(ResponseType::Text) => Value::String(body.to_string()),
            _ if body.trim().is_empty() => Value::Null,
            _ => serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())),
        }
    }
}

/// Mapper returning the decoded body.
pub fn default_mapper() -> ResponseMapper {
    Arc::new(|response: Response| response.response)
}

/// Response formatter for CLI output
pub struct ResponseFormatter {
    format_json: bool,
}

impl ResponseFormatter {
    pub fn new(format_json: bool) -> Self {
        Self { format_json }
    }

    /// Render a mapped value; strings are written raw.
    pub fn format(&self, value: &Value) -> Result<String> {
        match value {
            Value::String(text) => Ok(text.clone()),
            Value::Null => Ok(String::new()),
            _ if self.format_json => Ok(serde_json::to_string_pretty(value)?),
            _ => Ok(serde_json::to_string(value)?),
        }
    }
}
