use thiserror::Error;

/// Failure of the session resolver itself, as opposed to a failure of
/// the listing/starting collaborators it drives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionMappingError {
    #[error("Failed to map session '{client_id}': No new session created by Gemini CLI.")]
    NoNewSession { client_id: String },
}

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("{0}")]
    CliNotFound(String),

    #[error("Failed to start gemini: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("gemini exited with code {}: {stderr}", display_code(.code))]
    Exit { code: Option<i32>, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    UnsupportedFileType(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid arguments: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    SessionMapping(#[from] SessionMappingError),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "null".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, GeminiError>;
