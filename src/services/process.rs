/// Locating the `gemini` binary and running it as a subprocess.
///
/// Everything above this module talks to the CLI through [`CliRunner`],
/// so tool logic can be exercised without a real binary.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::error::{GeminiError, Result};
use super::i18n;
use super::utils::preview;

define_debug_log!("process");

/// Fallback used with `--allow-npx` when no local binary exists.
pub const NPX_PACKAGE: &str = "https://github.com/google-gemini/gemini-cli";

/// Program plus the arguments that precede every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiCommand {
    pub command: String,
    pub initial_args: Vec<String>,
}

/// Runs one CLI invocation to completion and returns its stdout.
#[async_trait]
pub trait CliRunner: Send + Sync {
    async fn run(&self, args: &[String], cwd: Option<&Path>) -> Result<String>;
}

/// [`CliRunner`] backed by a real subprocess.
pub struct GeminiCli {
    command: GeminiCommand,
}

impl GeminiCli {
    pub fn new(command: GeminiCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl CliRunner for GeminiCli {
    async fn run(&self, args: &[String], cwd: Option<&Path>) -> Result<String> {
        let GeminiCommand { command, initial_args } = &self.command;

        debug_log(&format!("Command: {} {:?} {:?}", command, initial_args, args));
        let spawn_start = std::time::Instant::now();

        let mut cmd = Command::new(command);
        cmd.args(initial_args)
            .args(args)
            // nothing is ever sent on stdin
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|e| {
            debug_log(&format!("ERROR: Failed to spawn: {}", e));
            GeminiError::Spawn(e)
        })?;
        debug_log(&format!("gemini spawned, pid={:?}", child.id()));

        let output = child.wait_with_output().await?;
        debug_log(&format!(
            "gemini finished in {:?}, exit_code: {:?}, stdout {} bytes",
            spawn_start.elapsed(), output.status.code(), output.stdout.len()
        ));

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        debug_log(&format!("stderr: {}", preview(&stderr, 500)));
        Err(GeminiError::Exit { code: output.status.code(), stderr })
    }
}

/// Find an executable in the given PATH-style list of directories.
/// On Windows every PATHEXT extension is tried; on Unix the file must have an
/// execute bit.
pub fn find_executable(name: &str, path_var: &str) -> Option<PathBuf> {
    let extensions: Vec<String> = if cfg!(windows) {
        std::env::var("PATHEXT")
            .unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string())
            .to_lowercase()
            .split(';')
            .map(String::from)
            .collect()
    } else {
        vec![String::new()]
    };

    std::env::split_paths(path_var)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| {
            extensions
                .iter()
                .map(move |ext| dir.join(format!("{}{}", name, ext)))
        })
        .find(|candidate| is_executable_file(candidate))
}

fn is_executable_file(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Fallback: use login shell to resolve PATH
/// (for non-interactive sessions where ~/.profile isn't loaded).
fn find_with_login_shell(name: &str) -> Option<PathBuf> {
    if cfg!(not(unix)) {
        return None;
    }
    let output = std::process::Command::new("bash")
        .args(["-lc", &format!("which {}", name)])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if path.is_empty() { None } else { Some(PathBuf::from(path)) }
}

/// Locate the gemini binary: PATH scan first, then the login shell.
pub fn locate_gemini() -> Option<PathBuf> {
    let path_var = std::env::var("PATH").unwrap_or_default();
    find_executable("gemini", &path_var).or_else(|| find_with_login_shell("gemini"))
}

/// Determine the gemini-cli command and its initial arguments.
pub fn decide_gemini_command(allow_npx: bool) -> Result<GeminiCommand> {
    command_for(locate_gemini(), allow_npx)
}

fn command_for(found: Option<PathBuf>, allow_npx: bool) -> Result<GeminiCommand> {
    if let Some(path) = found {
        debug_log(&format!("Using gemini at {}", path.display()));
        return Ok(GeminiCommand {
            command: path.display().to_string(),
            initial_args: Vec::new(),
        });
    }

    if allow_npx {
        debug_log("gemini not found on PATH, falling back to npx");
        return Ok(GeminiCommand {
            command: "npx".to_string(),
            initial_args: vec![NPX_PACKAGE.to_string()],
        });
    }

    Err(GeminiError::CliNotFound(i18n::locale().errors.gemini_not_found.clone()))
}
