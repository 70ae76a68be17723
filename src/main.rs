mod services;

use std::env;
use std::sync::Arc;

use crate::services::config::{self, CliAction, ServerConfig};
use crate::services::gemini::GeminiService;
use crate::services::i18n;
use crate::services::mcp::McpServer;
use crate::services::process::{self, GeminiCli};
use crate::services::session::SessionManager;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    println!("gemini-mcp {} - MCP server for the Gemini CLI", VERSION);
    println!();
    println!("USAGE:");
    println!("    gemini-mcp [OPTIONS]");
    println!();
    println!("Speaks MCP (JSON-RPC 2.0) on stdin/stdout.");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help              Print help information");
    println!("    -v, --version           Print version information");
    println!("    --allow-npx             Run gemini-cli through npx when it is not installed");
    println!("    --model <NAME>          Default model (env: {})", config::MODEL_ENV);
    println!();
    println!("ENVIRONMENT:");
    println!("    MCP_LANGUAGE            Tool description language (en, ja)");
    println!("    GEMINI_MCP_DEBUG=1      Write debug logs to ~/.gemini-mcp/debug/");
}

fn print_version() {
    println!("gemini-mcp {}", VERSION);
}

fn handle_serve(config: ServerConfig) {
    let locale = i18n::locale();

    let command = match process::decide_gemini_command(config.allow_npx) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", locale.errors.install_gemini);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create Tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let service = GeminiService::new(
        Arc::new(GeminiCli::new(command)),
        Arc::new(SessionManager::new()),
        config.default_model,
    );
    let server = Arc::new(McpServer::new(service, locale));

    if let Err(e) = rt.block_on(server.serve()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    match config::parse_args(&args, env::var(config::MODEL_ENV).ok()) {
        Ok(CliAction::Help) => print_help(),
        Ok(CliAction::Version) => print_version(),
        Ok(CliAction::Serve(config)) => handle_serve(config),
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    }
}
