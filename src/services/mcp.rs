/// JSON-RPC 2.0 server speaking MCP over stdin/stdout.
///
/// Each stdin line is one message. Responses are written one per line by a
/// single writer task; `tools/call` requests run concurrently in their own
/// tasks so a long CLI run never blocks `ping` or `tools/list`.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use super::error::{GeminiError, Result};
use super::gemini::GeminiService;
use super::i18n::Locale;
use super::tools::{parse_tool_args, tool_definitions, ToolName};
use super::utils::preview;

define_debug_log!("mcp");

pub const SERVER_NAME: &str = "gemini-cli-mcp-server";
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

/// What to do with one incoming line.
enum Routed {
    Respond(Value),
    CallTool { id: Value, params: Option<Value> },
    Ignore,
}

fn success(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

fn failure(id: Value, code: i64, message: &str) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
}

fn text_content(text: &str, is_error: bool) -> Value {
    let mut result = json!({ "content": [{ "type": "text", "text": text }] });
    if is_error {
        result["isError"] = Value::Bool(true);
    }
    result
}

pub struct McpServer {
    service: GeminiService,
    locale: &'static Locale,
}

impl McpServer {
    pub fn new(service: GeminiService, locale: &'static Locale) -> Self {
        Self { service, locale }
    }

    fn route(&self, line: &str) -> Routed {
        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                debug_log(&format!("Parse error: {} in {}", e, preview(line, 200)));
                return Routed::Respond(failure(Value::Null, PARSE_ERROR, "Parse error"));
            }
        };

        let Some(method) = request.method else {
            // a response to something we never sent
            return Routed::Ignore;
        };
        let Some(id) = request.id else {
            debug_log(&format!("Notification: {}", method));
            return Routed::Ignore;
        };

        match method.as_str() {
            "initialize" => {
                let version = request.params.as_ref()
                    .and_then(|p| p.get("protocolVersion"))
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_PROTOCOL_VERSION);
                Routed::Respond(success(id, json!({
                    "protocolVersion": version,
                    "capabilities": { "tools": {} },
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                })))
            }
            "ping" => Routed::Respond(success(id, json!({}))),
            "tools/list" => Routed::Respond(success(id, json!({
                "tools": tool_definitions(self.locale),
            }))),
            "tools/call" => Routed::CallTool { id, params: request.params },
            other => {
                debug_log(&format!("Unknown method: {}", other));
                Routed::Respond(failure(id, METHOD_NOT_FOUND, &format!("Method not found: {}", other)))
            }
        }
    }

    async fn execute(&self, tool: ToolName, arguments: Option<Value>) -> Result<String> {
        let service = &self.service;
        match tool {
            ToolName::GoogleSearch => service.google_search(&parse_tool_args(arguments)?).await,
            ToolName::Chat => service.chat(&parse_tool_args(arguments)?).await,
            ToolName::ListSessions => service.list_sessions().await,
            ToolName::AnalyzeFile => service.analyze_file(&parse_tool_args(arguments)?, self.locale).await,
            ToolName::ExecuteTask => service.execute_task(&parse_tool_args(arguments)?).await,
        }
    }

    /// Run one `tools/call` and build its full JSON-RPC response.
    async fn call_tool(&self, id: Value, params: Option<Value>) -> Value {
        let params = match params.map(serde_json::from_value::<ToolCallParams>) {
            Some(Ok(params)) => params,
            Some(Err(e)) => return failure(id, INVALID_PARAMS, &format!("Invalid params: {}", e)),
            None => return failure(id, INVALID_PARAMS, "Invalid params: missing tool name"),
        };
        let Some(tool) = ToolName::from_name(&params.name) else {
            return failure(id, INVALID_PARAMS, &format!("Unknown tool: {}", params.name));
        };

        debug_log(&format!("tools/call {} id={}", tool.as_str(), id));
        let started = std::time::Instant::now();
        let outcome = self.execute(tool, params.arguments).await;
        debug_log(&format!("tools/call {} finished in {:?}, ok={}", tool.as_str(), started.elapsed(), outcome.is_ok()));

        match outcome {
            Ok(text) => success(id, text_content(&text, false)),
            Err(GeminiError::InvalidParams(msg)) => {
                failure(id, INVALID_PARAMS, &format!("Invalid arguments for {}: {}", tool.as_str(), msg))
            }
            Err(e) => success(id, text_content(&e.to_string(), true)),
        }
    }

    /// Handle one line to completion, awaiting tool calls inline.
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        match self.route(line) {
            Routed::Respond(response) => Some(response),
            Routed::CallTool { id, params } => Some(self.call_tool(id, params).await),
            Routed::Ignore => None,
        }
    }

    /// Serve stdin/stdout until stdin closes, then wait for in-flight calls.
    pub async fn serve(self: Arc<Self>) -> std::io::Result<()> {
        self.serve_io(BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
    }

    /// Serve newline-delimited messages from `reader`, writing responses to `output`.
    pub async fn serve_io<R, W>(self: Arc<Self>, mut reader: R, mut output: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Value>();

        let writer = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                let mut line = message.to_string();
                line.push('\n');
                output.write_all(line.as_bytes()).await?;
                output.flush().await?;
            }
            Ok::<(), std::io::Error>(())
        });

        let mut in_flight = JoinSet::new();
        let mut buf = Vec::new();
        let mut read_error = None;

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    debug_log(&format!("stdin read failed: {}", e));
                    read_error = Some(e);
                    break;
                }
            }

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    debug_log(&format!("Parse error: {}", e));
                    send(&tx, failure(Value::Null, PARSE_ERROR, "Parse error"));
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            match self.route(line) {
                Routed::Respond(response) => send(&tx, response),
                Routed::CallTool { id, params } => {
                    let server = self.clone();
                    let tx = tx.clone();
                    in_flight.spawn(async move {
                        let response = server.call_tool(id, params).await;
                        send(&tx, response);
                    });
                }
                Routed::Ignore => {}
            }
            // reap finished calls so the set does not grow unbounded
            while in_flight.try_join_next().is_some() {}
        }

        debug_log(&format!("stdin closed, waiting for {} in-flight calls", in_flight.len()));
        while in_flight.join_next().await.is_some() {}

        drop(tx);
        let written = match writer.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::other(e)),
        };
        match read_error {
            Some(e) => Err(e),
            None => written,
        }
    }
}

fn send(tx: &mpsc::UnboundedSender<Value>, message: Value) {
    if let Err(e) = tx.send(message) {
        debug_log(&format!("Dropped response, writer is gone: {}", preview(&e.0.to_string(), 200)));
    }
}
