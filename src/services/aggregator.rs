/// Reduces a parsed stream-json event sequence into one task result.

use std::collections::HashMap;

use serde::Serialize;

use super::streaming::{EventStatus, ResultStats, Role, StreamEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCallStatus {
    Pending,
    Success,
    Error,
}

impl From<EventStatus> for ToolCallStatus {
    fn from(status: EventStatus) -> Self {
        match status {
            EventStatus::Success => ToolCallStatus::Success,
            EventStatus::Error => ToolCallStatus::Error,
            EventStatus::Unknown => ToolCallStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Success,
    Error,
    Unknown,
}

impl From<EventStatus> for TaskStatus {
    fn from(status: EventStatus) -> Self {
        match status {
            EventStatus::Success => TaskStatus::Success,
            EventStatus::Error => TaskStatus::Error,
            EventStatus::Unknown => TaskStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallRecord {
    pub tool_name: String,
    pub tool_id: String,
    pub status: ToolCallStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated result from a streaming task
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingTaskResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub events: Vec<StreamEvent>,
    pub tool_calls: Vec<ToolCallRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_response: Option<String>,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ResultStats>,
    pub errors: Vec<String>,
}

impl StreamingTaskResult {
    fn new(events: Vec<StreamEvent>) -> Self {
        Self {
            session_id: None,
            model: None,
            events,
            tool_calls: Vec::new(),
            final_response: None,
            status: TaskStatus::Unknown,
            stats: None,
            errors: Vec::new(),
        }
    }

    /// Final assistant text, empty when the stream produced none.
    pub fn response_text(&self) -> &str {
        self.final_response.as_deref().unwrap_or("")
    }
}

/// Fold stream events into a structured result, left to right.
///
/// Tool results are matched to their `tool_use` by id; a result whose id was
/// never announced has no tool name to attach and is discarded. Only the last
/// `result` event decides the terminal status.
pub fn aggregate_stream_events(events: &[StreamEvent]) -> StreamingTaskResult {
    let mut result = StreamingTaskResult::new(events.to_vec());
    let mut tool_index: HashMap<&str, usize> = HashMap::new();

    for event in events {
        match event {
            StreamEvent::Init { session_id, model, .. } => {
                result.session_id = Some(session_id.clone());
                result.model = Some(model.clone()).filter(|m| !m.is_empty());
            }
            StreamEvent::Message { role: Role::Assistant, content, delta, .. } => {
                if delta.unwrap_or(false) {
                    result.final_response
                        .get_or_insert_with(String::new)
                        .push_str(content);
                } else {
                    result.final_response = Some(content.clone());
                }
            }
            StreamEvent::Message { role: Role::User | Role::Unknown, .. } => {}
            StreamEvent::ToolUse { tool_name, tool_id, .. } => {
                // duplicate ids keep the first record's position
                tool_index.entry(tool_id.as_str()).or_insert(result.tool_calls.len());
                result.tool_calls.push(ToolCallRecord {
                    tool_name: tool_name.clone(),
                    tool_id: tool_id.clone(),
                    status: ToolCallStatus::Pending,
                    output: None,
                    error: None,
                });
            }
            StreamEvent::ToolResult { tool_id, status, output, error, .. } => {
                if let Some(&index) = tool_index.get(tool_id.as_str()) {
                    let record = &mut result.tool_calls[index];
                    record.status = (*status).into();
                    record.output = output.clone();
                    record.error = error.clone();
                }
            }
            StreamEvent::Error { message, .. } => {
                result.errors.push(message.clone());
            }
            StreamEvent::Result { status, stats, .. } => {
                result.status = (*status).into();
                result.stats = stats.clone();
            }
        }
    }

    result
}
