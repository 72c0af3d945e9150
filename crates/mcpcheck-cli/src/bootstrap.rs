//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together:
//! the launch file is loaded, the MCP adapters are built from it, and the
//! runner receives them as plain port handles.

use std::path::PathBuf;

use mcpcheck_core::ProbeRunner;
use mcpcheck_mcp::{CollaboratorConfig, build_collaborators};

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Path to the MCP launch file.
    pub config_path: PathBuf,
    /// User identifier stored in the memory check record.
    pub user_id: Option<String>,
}

impl CliConfig {
    /// Take settings from parsed arguments. The user id is stored verbatim.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            config_path: cli.config.clone(),
            user_id: cli.user_id.clone(),
        }
    }
}

/// Fully composed context for the check handler.
pub struct CliContext {
    pub runner: ProbeRunner,
}

/// Bootstrap the CLI application.
///
/// Loading the launch file is the only step that can fail. No MCP server is
/// started here.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext, CliError> {
    let launch = CollaboratorConfig::load(&config.config_path)?;

    tracing::debug!(
        config = %config.config_path.display(),
        user_id = ?config.user_id,
        "Bootstrapping probe runner"
    );

    let collaborators = build_collaborators(&launch);
    Ok(CliContext {
        runner: ProbeRunner::new(collaborators, config.user_id.clone()),
    })
}
