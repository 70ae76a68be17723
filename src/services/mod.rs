#[macro_use]
pub mod utils;
pub mod error;
pub mod config;
pub mod i18n;
pub mod streaming;
pub mod aggregator;
pub mod session;
pub mod process;
pub mod gemini;
pub mod tools;
pub mod mcp;
