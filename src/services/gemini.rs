/// Gemini CLI operations behind the MCP tools: flag construction, prompt
/// building, `--list-sessions` parsing and session-aware execution.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Serialize;
use serde_json::{json, Map};

use super::aggregator::aggregate_stream_events;
use super::error::{GeminiError, Result};
use super::i18n::{self, Locale};
use super::process::CliRunner;
use super::session::SessionManager;
use super::streaming::parse_stream_output;
use super::tools::{AnalyzeFileArgs, ChatArgs, ExecuteTaskArgs, GoogleSearchArgs};
use super::utils::preview;

define_debug_log!("gemini");

/// Default model for all Gemini CLI operations
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg", ".bmp"];
pub const SUPPORTED_TEXT_EXTENSIONS: &[&str] = &[".txt", ".md", ".text"];
pub const SUPPORTED_DOCUMENT_EXTENSIONS: &[&str] = &[".pdf"];

/// One entry of `gemini --list-sessions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub title: String,
    pub age: String,
    pub session_id: String,
    /// Client session ID mapped to this session, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionList {
    pub raw: String,
    pub sessions: Vec<SessionInfo>,
}

/// Matches lines like `9. hello test (14 minutes ago) [9ec64691-53cb-...]`
fn session_line_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| {
            Regex::new(r"^\s*\d+\.\s+(?P<title>.+?)\s+\((?P<age>[^)]+)\)\s+\[(?P<session_id>[^\]]+)\]").ok()
        })
        .as_ref()
}

/// Parse the output of `gemini --list-sessions` into structured data.
/// Lines that do not look like a session entry are skipped.
pub fn parse_sessions_output(output: &str) -> Vec<SessionInfo> {
    let Some(regex) = session_line_regex() else {
        return Vec::new();
    };

    output
        .lines()
        .filter_map(|line| regex.captures(line))
        .map(|caps| SessionInfo {
            title: caps["title"].trim().to_string(),
            age: caps["age"].trim().to_string(),
            session_id: caps["session_id"].trim().to_string(),
            client_id: None,
        })
        .collect()
}

/// Run `--list-sessions` and parse it.
pub async fn list_sessions(runner: &dyn CliRunner, cwd: Option<&Path>) -> Result<SessionList> {
    let raw = runner.run(&["--list-sessions".to_string()], cwd).await?;
    let sessions = parse_sessions_output(&raw);
    Ok(SessionList { raw, sessions })
}

async fn list_session_ids(runner: &dyn CliRunner, cwd: Option<&Path>) -> Result<Vec<String>> {
    let list = list_sessions(runner, cwd).await?;
    Ok(list.sessions.into_iter().map(|s| s.session_id).collect())
}

// ---------------------------------------------------------------------------
// Prompt and flag construction
// ---------------------------------------------------------------------------

pub fn build_search_prompt(args: &GoogleSearchArgs) -> String {
    if args.raw.unwrap_or(false) {
        // Structured grounding metadata format
        let limit_text = args.limit
            .map(|limit| format!("\nLimit to {} sources.", limit))
            .unwrap_or_default();
        let mut template = Map::new();
        template.insert(args.query.clone(), json!({
            "summary": "Brief summary of findings",
            "groundingMetadata": {
                "searchQueries": ["list of search queries used"],
                "sources": [{
                    "url": "source URL",
                    "title": "source domain/title",
                    "relevantExcerpts": ["key excerpts from this source"]
                }]
            }
        }));
        let template = serde_json::to_string_pretty(&template).unwrap_or_default();
        format!(
            "Search for: \"{}\" and return the results in the following JSON format:\n{}{}",
            args.query, template, limit_text
        )
    } else {
        let mut prompt = format!("Search for: {}", args.query);
        if let Some(limit) = args.limit {
            prompt.push_str(&format!(" (return up to {} results)", limit));
        }
        prompt
    }
}

pub fn build_task_prompt(args: &ExecuteTaskArgs) -> String {
    let mut prompt = args.task.clone();
    if let Some(files) = args.files.as_ref().filter(|f| !f.is_empty()) {
        prompt.push_str("\n\nTarget files:\n");
        prompt.push_str(&files.join("\n"));
    }
    prompt
}

pub fn build_analyze_prompt(args: &AnalyzeFileArgs) -> String {
    let mut prompt = format!("Analyze this file: {}", args.file_path);
    if let Some(extra) = args.prompt.as_deref().filter(|p| !p.is_empty()) {
        prompt.push_str("\n\n");
        prompt.push_str(extra);
    }
    prompt
}

/// `-p <prompt> [-s] [-y] -m <model>`
fn base_args(prompt: String, sandbox: bool, yolo: bool, model: &str) -> Vec<String> {
    let mut args = vec!["-p".to_string(), prompt];
    if sandbox {
        args.push("-s".to_string());
    }
    if yolo {
        args.push("-y".to_string());
    }
    args.push("-m".to_string());
    args.push(model.to_string());
    args
}

/// Lowercased extension including the dot, or "" when there is none.
fn file_extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

pub fn check_supported_file(path: &str, locale: &Locale) -> Result<()> {
    let extension = file_extension(path);
    let supported = SUPPORTED_IMAGE_EXTENSIONS.iter()
        .chain(SUPPORTED_TEXT_EXTENSIONS)
        .chain(SUPPORTED_DOCUMENT_EXTENSIONS)
        .any(|ext| *ext == extension);
    if supported {
        return Ok(());
    }

    let errors = &locale.errors;
    Err(GeminiError::UnsupportedFileType(format!(
        "{}\n{}: {}\n{}: {}\n{}: {}",
        i18n::t(&errors.unsupported_file_type, &[("extension", &extension)]),
        errors.images, SUPPORTED_IMAGE_EXTENSIONS.join(", "),
        errors.text, SUPPORTED_TEXT_EXTENSIONS.join(", "),
        errors.documents, SUPPORTED_DOCUMENT_EXTENSIONS.join(", "),
    )))
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Executes tool calls against the CLI, sharing one session table.
pub struct GeminiService {
    runner: Arc<dyn CliRunner>,
    sessions: Arc<SessionManager>,
    default_model: String,
}

impl GeminiService {
    pub fn new(runner: Arc<dyn CliRunner>, sessions: Arc<SessionManager>, default_model: String) -> Self {
        Self { runner, sessions, default_model }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    fn model<'a>(&'a self, requested: &'a Option<String>) -> &'a str {
        requested.as_deref().filter(|m| !m.is_empty()).unwrap_or(&self.default_model)
    }

    /// Run `base_args` in the conversation mapped to `client_id`.
    ///
    /// The first call for a client starts a new conversation (whose output is
    /// the answer) and learns its ID; later calls resume it with `-r <id>`.
    pub async fn run_with_session(
        &self,
        client_id: &str,
        base_args: &[String],
        cwd: Option<&Path>,
    ) -> Result<String> {
        let runner = self.runner.as_ref();

        let mut first_output = None;
        let slot = &mut first_output;

        let session_id = self.sessions
            .resolve_session(
                client_id,
                || list_session_ids(runner, cwd),
                || async move {
                    *slot = Some(runner.run(base_args, cwd).await?);
                    Ok::<(), GeminiError>(())
                },
            )
            .await?;

        if let Some(output) = first_output {
            return Ok(output);
        }

        debug_log(&format!("Resuming '{}' as {}", client_id, session_id));
        let mut args = base_args.to_vec();
        args.push("-r".to_string());
        args.push(session_id);
        runner.run(&args, cwd).await
    }

    async fn run(&self, session_id: Option<&str>, args: &[String], cwd: Option<&Path>) -> Result<String> {
        match session_id {
            Some(client_id) => self.run_with_session(client_id, args, cwd).await,
            None => self.runner.run(args, cwd).await,
        }
    }

    pub async fn google_search(&self, args: &GoogleSearchArgs) -> Result<String> {
        let cli_args = base_args(
            build_search_prompt(args),
            args.sandbox.unwrap_or(false),
            args.yolo.unwrap_or(false),
            self.model(&args.model),
        );
        // Raw result without parsing; the client handles it
        self.run(args.session_id.as_deref(), &cli_args, None).await
    }

    pub async fn chat(&self, args: &ChatArgs) -> Result<String> {
        // chat defaults to sandbox mode (safe, read-only)
        let cli_args = base_args(
            args.prompt.clone(),
            args.sandbox != Some(false),
            args.yolo.unwrap_or(false),
            self.model(&args.model),
        );
        self.run(args.session_id.as_deref(), &cli_args, None).await
    }

    pub async fn analyze_file(&self, args: &AnalyzeFileArgs, locale: &Locale) -> Result<String> {
        check_supported_file(&args.file_path, locale)?;
        let cli_args = base_args(
            build_analyze_prompt(args),
            args.sandbox.unwrap_or(false),
            args.yolo.unwrap_or(false),
            self.model(&args.model),
        );
        self.run(args.session_id.as_deref(), &cli_args, None).await
    }

    /// Execute a task with edit permissions: no sandbox and YOLO by default.
    pub async fn execute_task(&self, args: &ExecuteTaskArgs) -> Result<String> {
        let stream = args.stream.unwrap_or(false);
        let mut cli_args = base_args(
            build_task_prompt(args),
            args.sandbox == Some(true),
            args.yolo != Some(false),
            self.model(&args.model),
        );
        if stream {
            cli_args.push("--output-format".to_string());
            cli_args.push("stream-json".to_string());
        }

        let cwd = args.cwd.as_deref().map(PathBuf::from);
        let output = self.run(args.session_id.as_deref(), &cli_args, cwd.as_deref()).await?;
        if !stream {
            return Ok(output);
        }

        let events = parse_stream_output(&output);
        let result = aggregate_stream_events(&events);
        debug_log(&format!(
            "Aggregated {} events: status={:?}, tool_calls={}, errors={}, response={}",
            events.len(), result.status, result.tool_calls.len(), result.errors.len(),
            preview(result.response_text(), 200)
        ));
        Ok(serde_json::to_string_pretty(&result)?)
    }

    /// Sessions known to the CLI, annotated with the client IDs mapped to them.
    pub async fn list_sessions(&self) -> Result<String> {
        let list = list_sessions(self.runner.as_ref(), None).await?;
        let mappings = self.sessions.all_mappings();

        let sessions: Vec<SessionInfo> = list.sessions
            .into_iter()
            .map(|mut session| {
                session.client_id = mappings.iter()
                    .find(|(_, real_id)| **real_id == session.session_id)
                    .map(|(client_id, _)| client_id.clone());
                session
            })
            .collect();

        let mut structured = json!({
            "raw": list.raw,
            "sessions": sessions,
        });
        if !mappings.is_empty() {
            structured["mappings"] = json!(mappings);
        }
        Ok(serde_json::to_string_pretty(&structured)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::services::i18n::{load_locale, Language};

    /// Scripted runner: `--list-sessions` answers come from `listings`, every
    /// other call pops from `replies`. All calls are recorded.
    #[derive(Default)]
    struct MockRunner {
        listings: Mutex<VecDeque<String>>,
        replies: Mutex<VecDeque<Result<String>>>,
        calls: Mutex<Vec<(Vec<String>, Option<PathBuf>)>>,
    }

    impl MockRunner {
        fn with(listings: &[&str], replies: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                listings: Mutex::new(listings.iter().map(|s| s.to_string()).collect()),
                replies: Mutex::new(replies.into_iter().collect()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(Vec<String>, Option<PathBuf>)> {
            self.calls.lock().unwrap().clone()
        }

        fn prompt_calls(&self) -> Vec<Vec<String>> {
            self.calls()
                .into_iter()
                .map(|(args, _)| args)
                .filter(|args| args.first().map(String::as_str) == Some("-p"))
                .collect()
        }
    }

    #[async_trait]
    impl CliRunner for MockRunner {
        async fn run(&self, args: &[String], cwd: Option<&Path>) -> Result<String> {
            self.calls.lock().unwrap().push((args.to_vec(), cwd.map(Path::to_path_buf)));
            if args.iter().any(|a| a == "--list-sessions") {
                let mut listings = self.listings.lock().unwrap();
                // keep answering with the last listing once the script runs out
                let next = if listings.len() > 1 { listings.pop_front() } else { listings.front().cloned() };
                return Ok(next.unwrap_or_default());
            }
            self.replies.lock().unwrap().pop_front().unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn service(runner: Arc<MockRunner>) -> GeminiService {
        GeminiService::new(runner, Arc::new(SessionManager::new()), DEFAULT_MODEL.to_string())
    }

    const LIST_BEFORE: &str = "Available sessions:\n  1. Empty conversation (13 days ago) [54e41765-c1b4-43ef-a66b-b707e519]\n";
    const LIST_AFTER: &str = "Available sessions:\n  1. Empty conversation (13 days ago) [54e41765-c1b4-43ef-a66b-b707e519]\n  2. hello test (14 minutes ago) [9ec64691-53cb-4fa3-b7df-a121b6dcef54]\n";

    // ========== parse_sessions_output ==========

    #[test]
    fn test_parse_sessions_output() {
        let sessions = parse_sessions_output(LIST_AFTER);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].title, "Empty conversation");
        assert_eq!(sessions[0].age, "13 days ago");
        assert_eq!(sessions[0].session_id, "54e41765-c1b4-43ef-a66b-b707e519");
        assert_eq!(sessions[1].title, "hello test");
        assert_eq!(sessions[1].session_id, "9ec64691-53cb-4fa3-b7df-a121b6dcef54");
    }

    #[test]
    fn test_parse_sessions_output_title_with_parentheses() {
        let sessions = parse_sessions_output("3. fix (the) bug (2 hours ago) [abc-123]");
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].title, "fix (the) bug");
        assert_eq!(sessions[0].age, "2 hours ago");
        assert_eq!(sessions[0].session_id, "abc-123");
    }

    #[test]
    fn test_parse_sessions_output_ignores_noise() {
        assert!(parse_sessions_output("No previous sessions found for this project.").is_empty());
        assert!(parse_sessions_output("").is_empty());
    }

    // ========== prompts and flags ==========

    #[test]
    fn test_build_search_prompt_natural() {
        let args = GoogleSearchArgs { query: "rust async".to_string(), limit: Some(5), ..Default::default() };
        assert_eq!(build_search_prompt(&args), "Search for: rust async (return up to 5 results)");
    }

    #[test]
    fn test_build_search_prompt_raw() {
        let args = GoogleSearchArgs {
            query: "rust".to_string(),
            raw: Some(true),
            limit: Some(3),
            ..Default::default()
        };
        let prompt = build_search_prompt(&args);
        assert!(prompt.starts_with("Search for: \"rust\" and return the results in the following JSON format:\n{"));
        assert!(prompt.contains("\"groundingMetadata\""));
        assert!(prompt.ends_with("\nLimit to 3 sources."));
    }

    #[test]
    fn test_build_task_prompt_with_files() {
        let args = ExecuteTaskArgs {
            task: "Refactor".to_string(),
            files: Some(vec!["src/a.rs".to_string(), "src/b.rs".to_string()]),
            ..Default::default()
        };
        assert_eq!(build_task_prompt(&args), "Refactor\n\nTarget files:\nsrc/a.rs\nsrc/b.rs");

        let no_files = ExecuteTaskArgs { task: "Refactor".to_string(), files: Some(vec![]), ..Default::default() };
        assert_eq!(build_task_prompt(&no_files), "Refactor");
    }

    #[test]
    fn test_check_supported_file() {
        let locale = load_locale(Language::En);
        assert!(check_supported_file("/tmp/shot.PNG", locale).is_ok());
        assert!(check_supported_file("notes.md", locale).is_ok());
        assert!(check_supported_file("paper.pdf", locale).is_ok());

        let err = check_supported_file("/tmp/app.exe", locale).unwrap_err().to_string();
        assert!(err.contains(".exe"));
        assert!(err.contains(".png, .jpg"));
        assert!(err.contains(".pdf"));

        assert!(check_supported_file("Makefile", locale).is_err());
    }

    #[tokio::test]
    async fn test_chat_defaults_to_sandbox() {
        let runner = MockRunner::with(&[], vec![Ok("hi".to_string())]);
        let svc = service(runner.clone());
        let out = svc.chat(&ChatArgs { prompt: "hello".to_string(), ..Default::default() }).await.unwrap();
        assert_eq!(out, "hi");
        assert_eq!(runner.prompt_calls(), vec![vec!["-p", "hello", "-s", "-m", DEFAULT_MODEL]]);
    }

    #[tokio::test]
    async fn test_chat_sandbox_disabled_with_model() {
        let runner = MockRunner::with(&[], vec![]);
        let svc = service(runner.clone());
        svc.chat(&ChatArgs {
            prompt: "hello".to_string(),
            sandbox: Some(false),
            yolo: Some(true),
            model: Some("gemini-2.5-flash".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(runner.prompt_calls(), vec![vec!["-p", "hello", "-y", "-m", "gemini-2.5-flash"]]);
    }

    #[tokio::test]
    async fn test_execute_task_defaults_to_yolo_and_uses_cwd() {
        let runner = MockRunner::with(&[], vec![Ok("done".to_string())]);
        let svc = service(runner.clone());
        svc.execute_task(&ExecuteTaskArgs {
            task: "build".to_string(),
            cwd: Some("/work".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, vec!["-p", "build", "-y", "-m", DEFAULT_MODEL]);
        assert_eq!(calls[0].1, Some(PathBuf::from("/work")));
    }

    #[tokio::test]
    async fn test_analyze_file_rejects_unsupported_before_running() {
        let runner = MockRunner::with(&[], vec![]);
        let svc = service(runner.clone());
        let err = svc
            .analyze_file(
                &AnalyzeFileArgs { file_path: "/tmp/a.zip".to_string(), ..Default::default() },
                load_locale(Language::En),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GeminiError::UnsupportedFileType(_)));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_google_search_propagates_cli_failure() {
        let runner = MockRunner::with(&[], vec![Err(GeminiError::Exit { code: Some(1), stderr: "auth".to_string() })]);
        let svc = service(runner);
        let err = svc
            .google_search(&GoogleSearchArgs { query: "q".to_string(), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "gemini exited with code 1: auth");
    }

    // ========== sessions ==========

    #[tokio::test]
    async fn test_run_with_session_starts_then_resumes() {
        let runner = MockRunner::with(
            &[LIST_BEFORE, LIST_AFTER],
            vec![Ok("first".to_string()), Ok("second".to_string())],
        );
        let svc = service(runner.clone());
        let args = ChatArgs { prompt: "hello".to_string(), session_id: Some("task-1".to_string()), ..Default::default() };

        assert_eq!(svc.chat(&args).await.unwrap(), "first");
        assert_eq!(
            svc.sessions().get_session_id("task-1").as_deref(),
            Some("9ec64691-53cb-4fa3-b7df-a121b6dcef54")
        );

        assert_eq!(svc.chat(&args).await.unwrap(), "second");
        let prompts = runner.prompt_calls();
        assert_eq!(prompts.len(), 2);
        assert!(!prompts[0].contains(&"-r".to_string()));
        assert_eq!(
            &prompts[1][prompts[1].len() - 2..],
            &["-r".to_string(), "9ec64691-53cb-4fa3-b7df-a121b6dcef54".to_string()]
        );
        // two listings for the first call, none for the second
        assert_eq!(runner.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_run_with_session_no_new_session() {
        let runner = MockRunner::with(&[LIST_BEFORE], vec![Ok("answer".to_string())]);
        let svc = service(runner);
        let err = svc
            .chat(&ChatArgs { prompt: "x".to_string(), session_id: Some("task-9".to_string()), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to map session 'task-9': No new session created by Gemini CLI."
        );
    }

    #[tokio::test]
    async fn test_execute_task_with_session_lists_in_task_cwd() {
        let runner = MockRunner::with(&[LIST_BEFORE, LIST_AFTER], vec![Ok("ok".to_string())]);
        let svc = service(runner.clone());
        svc.execute_task(&ExecuteTaskArgs {
            task: "t".to_string(),
            session_id: Some("s".to_string()),
            cwd: Some("/proj".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
        assert!(runner.calls().iter().all(|(_, cwd)| cwd.as_deref() == Some(Path::new("/proj"))));
    }

    #[tokio::test]
    async fn test_execute_task_stream_aggregates() {
        let stream = concat!(
            r#"{"type":"init","timestamp":"t0","session_id":"abc","model":"gemini-2.5-flash"}"#, "\n",
            "some diagnostic line\n",
            r#"{"type":"tool_use","timestamp":"t1","tool_name":"write_file","tool_id":"w1","parameters":{}}"#, "\n",
            r#"{"type":"tool_result","timestamp":"t2","tool_id":"w1","status":"success","output":"written"}"#, "\n",
            r#"{"type":"message","timestamp":"t3","role":"assistant","content":"Done.","delta":true}"#, "\n",
            r#"{"type":"result","timestamp":"t4","status":"success","stats":{"total_tokens":42}}"#, "\n",
        );
        let runner = MockRunner::with(&[], vec![Ok(stream.to_string())]);
        let svc = service(runner.clone());
        let out = svc
            .execute_task(&ExecuteTaskArgs { task: "t".to_string(), stream: Some(true), ..Default::default() })
            .await
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["sessionId"], "abc");
        assert_eq!(json["finalResponse"], "Done.");
        assert_eq!(json["toolCalls"][0]["status"], "success");
        assert_eq!(json["stats"]["total_tokens"], 42);

        let prompt_args = &runner.prompt_calls()[0];
        assert!(prompt_args.ends_with(&["--output-format".to_string(), "stream-json".to_string()]));
    }

    #[tokio::test]
    async fn test_list_sessions_includes_client_ids() {
        let runner = MockRunner::with(&[LIST_AFTER], vec![]);
        let svc = service(runner);
        svc.sessions().set_session_id("task-1", "9ec64691-53cb-4fa3-b7df-a121b6dcef54");

        let out = svc.list_sessions().await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["sessions"].as_array().map(Vec::len), Some(2));
        assert!(json["sessions"][0].get("clientId").is_none());
        assert_eq!(json["sessions"][1]["clientId"], "task-1");
        assert_eq!(json["mappings"]["task-1"], "9ec64691-53cb-4fa3-b7df-a121b6dcef54");
        assert_eq!(json["raw"], LIST_AFTER);
    }

    #[tokio::test]
    async fn test_list_sessions_omits_empty_mappings() {
        let runner = MockRunner::with(&[LIST_BEFORE], vec![]);
        let svc = service(runner);
        let json: serde_json::Value = serde_json::from_str(&svc.list_sessions().await.unwrap()).unwrap();
        assert!(json.get("mappings").is_none());
    }
}
