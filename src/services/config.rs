/// Server configuration from the command line and environment.

use super::gemini::DEFAULT_MODEL;

/// Environment variable overriding the default model.
pub const MODEL_ENV: &str = "GEMINI_MCP_MODEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Fall back to running gemini-cli through npx when it is not installed
    pub allow_npx: bool,
    /// Model passed with `-m` when a tool call does not name one
    pub default_model: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allow_npx: false,
            default_model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// What `main` should do after reading the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Help,
    Version,
    Serve(ServerConfig),
}

/// Parse command-line arguments (without the program name).
/// `env_model` is the value of `GEMINI_MCP_MODEL`, if set; `--model` wins over it.
pub fn parse_args(args: &[String], env_model: Option<String>) -> Result<CliAction, String> {
    let mut config = ServerConfig::default();
    if let Some(model) = env_model.filter(|m| !m.trim().is_empty()) {
        config.default_model = model.trim().to_string();
    }

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(CliAction::Help),
            "-v" | "--version" => return Ok(CliAction::Version),
            "--allow-npx" => {
                config.allow_npx = true;
            }
            "--model" => {
                let Some(model) = args.get(i + 1) else {
                    return Err("--model requires a model name".to_string());
                };
                config.default_model = model.clone();
                i += 1;
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    Ok(CliAction::Serve(config))
}
