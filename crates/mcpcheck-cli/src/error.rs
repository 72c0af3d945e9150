//! CLI-specific error types and exit-code mapping.
//!
//! Collaborator failures never reach this type: they are reported as probe
//! lines. Only setup and output failures end the process with a non-zero code.

use mcpcheck_mcp::ConfigError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Launch configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error writing the report.
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h:
    /// - 74: EX_IOERR
    /// - 78: EX_CONFIG
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Io(_) => 74,
            Self::Config(_) => 78,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
