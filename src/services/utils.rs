/// Shared utility functions used across multiple modules.

use std::io::Write;
use std::sync::OnceLock;

/// Environment variable that switches on file debug logging.
pub const DEBUG_ENV: &str = "GEMINI_MCP_DEBUG";

/// Macro to generate a component-scoped `debug_log` function that writes to
/// `~/.gemini-mcp/debug/<name>.log`.
///
/// Usage: `define_debug_log!("session");`
#[macro_export]
macro_rules! define_debug_log {
    ($component:expr) => {
        fn debug_log(msg: &str) {
            $crate::services::utils::debug_log_for($component, msg);
        }
    };
}

/// Append one timestamped line to the component's debug log.
/// No-op unless `GEMINI_MCP_DEBUG=1`. Never writes to stdout, which carries the protocol.
pub fn debug_log_for(component: &str, msg: &str) {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    let enabled = ENABLED.get_or_init(|| {
        std::env::var(DEBUG_ENV).map(|v| v == "1").unwrap_or(false)
    });
    if !*enabled { return; }
    if let Some(home) = dirs::home_dir() {
        let debug_dir = home.join(".gemini-mcp").join("debug");
        let _ = std::fs::create_dir_all(&debug_dir);
        let log_path = debug_dir.join(format!("{}.log", component));
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
        {
            let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
            let _ = writeln!(file, "[{}] {}", timestamp, msg);
        }
    }
}

/// Find the nearest char boundary at or before the given byte index.
/// Returns `s.len()` if `index >= s.len()`.
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Shorten a string for a log line, cutting at a valid UTF-8 boundary.
pub fn preview(s: &str, max_len: usize) -> &str {
    &s[..floor_char_boundary(s, max_len)]
}
