/// Typed events emitted by `gemini --output-format stream-json`, and the
/// line parser that decodes them.
///
/// The stream is newline-delimited JSON, but the CLI may interleave
/// diagnostics or truncate a line on exit. A line is dropped only when it
/// is not JSON or its `type` is missing or unrecognized.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::services::utils::preview;

define_debug_log!("stream");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Outcome reported by `tool_result` and `result` events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Success,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultStats {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<u64>,
}

/// One line of the event stream.
///
/// Only the `type` tag is mandatory. Every other field falls back to its
/// default when missing or of an unexpected shape, so a recognized event is
/// never lost to a schema drift in the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Session metadata, normally the first line
    Init {
        #[serde(default, deserialize_with = "lenient_string")]
        timestamp: String,
        #[serde(default, deserialize_with = "lenient_string")]
        session_id: String,
        #[serde(default, deserialize_with = "lenient_string")]
        model: String,
    },
    /// User or assistant text; `delta: true` marks a streaming fragment
    Message {
        #[serde(default, deserialize_with = "lenient_string")]
        timestamp: String,
        #[serde(default, deserialize_with = "lenient")]
        role: Role,
        #[serde(default, deserialize_with = "lenient_string")]
        content: String,
        #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
        delta: Option<bool>,
    },
    ToolUse {
        #[serde(default, deserialize_with = "lenient_string")]
        timestamp: String,
        #[serde(default, deserialize_with = "lenient_string")]
        tool_name: String,
        #[serde(default, deserialize_with = "lenient_string")]
        tool_id: String,
        #[serde(default, deserialize_with = "lenient")]
        parameters: Map<String, Value>,
    },
    ToolResult {
        #[serde(default, deserialize_with = "lenient_string")]
        timestamp: String,
        #[serde(default, deserialize_with = "lenient_string")]
        tool_id: String,
        #[serde(default, deserialize_with = "lenient")]
        status: EventStatus,
        #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
        output: Option<String>,
        /// Plain text, or the `message` of a `{type, message}` error object
        #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// Non-fatal warning
    Error {
        #[serde(default, deserialize_with = "lenient_string")]
        timestamp: String,
        #[serde(default, deserialize_with = "lenient_string")]
        message: String,
        #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
        code: Option<i64>,
    },
    /// Final outcome with aggregated stats
    Result {
        #[serde(default, deserialize_with = "lenient_string")]
        timestamp: String,
        #[serde(default, deserialize_with = "lenient")]
        status: EventStatus,
        #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
        stats: Option<ResultStats>,
    },
}

/// Decode a field, falling back to the default on a type mismatch.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()).unwrap_or_default())
}

fn text_of(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Object(map) => {
            if let Some(message) = map.get("message").and_then(Value::as_str) {
                return Some(message.to_string());
            }
            Some(Value::Object(map).to_string())
        }
        other => Some(other.to_string()),
    }
}

/// Text field that may arrive as a string, an object with `message`, or anything else.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(text_of))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

impl StreamEvent {
    /// Wire tag of this event
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Init { .. } => "init",
            StreamEvent::Message { .. } => "message",
            StreamEvent::ToolUse { .. } => "tool_use",
            StreamEvent::ToolResult { .. } => "tool_result",
            StreamEvent::Error { .. } => "error",
            StreamEvent::Result { .. } => "result",
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            StreamEvent::Init { timestamp, .. }
            | StreamEvent::Message { timestamp, .. }
            | StreamEvent::ToolUse { timestamp, .. }
            | StreamEvent::ToolResult { timestamp, .. }
            | StreamEvent::Error { timestamp, .. }
            | StreamEvent::Result { timestamp, .. } => timestamp,
        }
    }
}

/// Parse a single line of JSONL stream output.
/// Returns `None` for blank lines, invalid JSON, and a missing or unknown `type`.
pub fn parse_stream_line(line: &str) -> Option<StreamEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<StreamEvent>(trimmed) {
        Ok(event) => {
            debug_log(&format!("{} event at {}", event.kind(), event.timestamp()));
            Some(event)
        }
        Err(e) => {
            debug_log(&format!("Dropped line ({}): {}", e, preview(trimmed, 200)));
            None
        }
    }
}

/// Parse complete JSONL output into the ordered list of recognized events.
pub fn parse_stream_output(output: &str) -> Vec<StreamEvent> {
    output.split('\n').filter_map(parse_stream_line).collect()
}
