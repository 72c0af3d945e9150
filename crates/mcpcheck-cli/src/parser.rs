//! Main CLI parser.
//!
//! There are no subcommands: running the binary runs the probes.

use std::path::PathBuf;

use clap::Parser;

/// Default launch file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".mcp.json";

/// Smoke-test the orchestrator, memory, context and graph MCP servers.
#[derive(Debug, Parser)]
#[command(name = "mcpcheck")]
#[command(about = "Smoke-test the AI-OS MCP collaborators")]
#[command(version)]
pub struct Cli {
    /// JSON file describing how to launch each MCP server
    #[arg(long = "config", env = "MCPCHECK_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// User identifier written into the memory probe record
    #[arg(long = "user-id", env = "USER_ID")]
    pub user_id: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
