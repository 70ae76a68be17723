/// MCP tool descriptors and their argument types.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::error::{GeminiError, Result};
use super::i18n::{Locale, ToolText};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    GoogleSearch,
    Chat,
    ListSessions,
    AnalyzeFile,
    ExecuteTask,
}

impl ToolName {
    pub const ALL: [ToolName; 5] = [
        ToolName::GoogleSearch,
        ToolName::Chat,
        ToolName::ListSessions,
        ToolName::AnalyzeFile,
        ToolName::ExecuteTask,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::GoogleSearch => "googleSearch",
            ToolName::Chat => "chat",
            ToolName::ListSessions => "listSessions",
            ToolName::AnalyzeFile => "analyzeFile",
            ToolName::ExecuteTask => "executeTask",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSearchArgs {
    pub query: String,
    pub limit: Option<u64>,
    pub raw: Option<bool>,
    pub sandbox: Option<bool>,
    pub yolo: Option<bool>,
    pub model: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatArgs {
    pub prompt: String,
    pub session_id: Option<String>,
    pub sandbox: Option<bool>,
    pub yolo: Option<bool>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeFileArgs {
    pub file_path: String,
    pub prompt: Option<String>,
    pub sandbox: Option<bool>,
    pub yolo: Option<bool>,
    pub model: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteTaskArgs {
    pub task: String,
    pub files: Option<Vec<String>>,
    pub session_id: Option<String>,
    pub model: Option<String>,
    pub sandbox: Option<bool>,
    pub yolo: Option<bool>,
    pub cwd: Option<String>,
    /// Return the aggregated stream-json result instead of plain text
    pub stream: Option<bool>,
}

/// Decode a `tools/call` arguments object. A missing object counts as `{}`.
pub fn parse_tool_args<T: DeserializeOwned>(arguments: Option<Value>) -> Result<T> {
    let value = match arguments {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(v) => v,
    };
    serde_json::from_value(value).map_err(|e| GeminiError::InvalidParams(e.to_string()))
}

// ---------------------------------------------------------------------------
// JSON-Schema descriptors
// ---------------------------------------------------------------------------

enum ParamType {
    String,
    Integer,
    Boolean,
    StringArray,
}

struct Param {
    name: &'static str,
    kind: ParamType,
    required: bool,
}

const fn param(name: &'static str, kind: ParamType, required: bool) -> Param {
    Param { name, kind, required }
}

fn params_for(tool: ToolName) -> Vec<Param> {
    use ParamType::*;
    match tool {
        ToolName::GoogleSearch => vec![
            param("query", String, true),
            param("limit", Integer, false),
            param("raw", Boolean, false),
            param("sandbox", Boolean, false),
            param("yolo", Boolean, false),
            param("model", String, false),
            param("sessionId", String, false),
        ],
        ToolName::Chat => vec![
            param("prompt", String, true),
            param("sessionId", String, false),
            param("sandbox", Boolean, false),
            param("yolo", Boolean, false),
            param("model", String, false),
        ],
        ToolName::ListSessions => Vec::new(),
        ToolName::AnalyzeFile => vec![
            param("filePath", String, true),
            param("prompt", String, false),
            param("sandbox", Boolean, false),
            param("yolo", Boolean, false),
            param("model", String, false),
            param("sessionId", String, false),
        ],
        ToolName::ExecuteTask => vec![
            param("task", String, true),
            param("files", StringArray, false),
            param("sessionId", String, false),
            param("model", String, false),
            param("sandbox", Boolean, false),
            param("yolo", Boolean, false),
            param("cwd", String, false),
            param("stream", Boolean, false),
        ],
    }
}

fn text_for(locale: &Locale, tool: ToolName) -> &ToolText {
    match tool {
        ToolName::GoogleSearch => &locale.tools.google_search,
        ToolName::Chat => &locale.tools.chat,
        ToolName::ListSessions => &locale.tools.list_sessions,
        ToolName::AnalyzeFile => &locale.tools.analyze_file,
        ToolName::ExecuteTask => &locale.tools.execute_task,
    }
}

fn input_schema(tool: ToolName, text: &ToolText) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for p in params_for(tool) {
        let mut schema = match p.kind {
            ParamType::String => json!({ "type": "string" }),
            ParamType::Integer => json!({ "type": "integer", "minimum": 1 }),
            ParamType::Boolean => json!({ "type": "boolean" }),
            ParamType::StringArray => json!({ "type": "array", "items": { "type": "string" } }),
        };
        let description = text.param(p.name);
        if !description.is_empty() {
            schema["description"] = Value::String(description.to_string());
        }
        properties.insert(p.name.to_string(), schema);
        if p.required {
            required.push(Value::String(p.name.to_string()));
        }
    }

    let mut schema = json!({ "type": "object", "properties": properties });
    if !required.is_empty() {
        schema["required"] = Value::Array(required);
    }
    schema
}

/// Descriptors for `tools/list`, with descriptions in the given locale.
pub fn tool_definitions(locale: &Locale) -> Vec<Value> {
    ToolName::ALL
        .into_iter()
        .map(|tool| {
            let text = text_for(locale, tool);
            json!({
                "name": tool.as_str(),
                "description": text.description,
                "inputSchema": input_schema(tool, text),
            })
        })
        .collect()
}
