//! Launch configuration for the collaborator MCP servers.
//!
//! Read from a JSON file in the layout most MCP clients share:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "orchestrator": { "command": "npx", "args": ["-y", "@ai-os/orchestrator"] },
//!     "memory":       { "command": "memory-hub", "env": { "HUB_DIR": "/tmp/hub" } },
//!     "context":      { "command": "context-manager", "cwd": "/srv/project" },
//!     "graph":        { "command": "document-graph" }
//!   }
//! }
//! ```
//!
//! Unknown server names are ignored; a missing entry is not an error here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server names the four adapters look up.
pub const ORCHESTRATOR_SERVER: &str = "orchestrator";
pub const MEMORY_SERVER: &str = "memory";
pub const CONTEXT_SERVER: &str = "context";
pub const GRAPH_SERVER: &str = "graph";

/// Errors loading the launch configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid MCP server '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

/// How to launch one stdio MCP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerConfig {
    /// Executable name or path.
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// Extra environment variables for the child.
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Working directory for the child.
    #[serde(default)]
    pub cwd: Option<PathBuf>,
}

impl McpServerConfig {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            env: HashMap::new(),
            cwd: None,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.command.trim().is_empty() {
            return Err("command is required".to_string());
        }
        Ok(())
    }
}

/// The whole launch file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaboratorConfig {
    #[serde(rename = "mcpServers", default)]
    pub servers: HashMap<String, McpServerConfig>,
}

impl CollaboratorConfig {
    /// Load and validate a launch file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;

        tracing::debug!(
            path = %path.display(),
            servers = config.servers.len(),
            "Loaded MCP launch configuration"
        );

        Ok(config)
    }

    /// Validate every configured server.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, server) in &self.servers {
            server.validate().map_err(|reason| ConfigError::Invalid {
                name: name.clone(),
                reason,
            })?;
        }
        Ok(())
    }

    /// Launch settings for a named server, if present.
    pub fn server(&self, name: &str) -> Option<&McpServerConfig> {
        self.servers.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"{
                "mcpServers": {
                    "orchestrator": { "command": "npx", "args": ["-y", "@ai-os/orchestrator"] },
                    "memory": { "command": "memory-hub", "env": { "HUB_DIR": "/tmp/hub" } },
                    "context": { "command": "context-manager", "cwd": "/srv/project" },
                    "graph": { "command": "document-graph" }
                }
            }"#,
        );

        let config = CollaboratorConfig::load(file.path()).unwrap();
        assert_eq!(config.servers.len(), 4);

        let orchestrator = config.server(ORCHESTRATOR_SERVER).unwrap();
        assert_eq!(orchestrator.command, "npx");
        assert_eq!(orchestrator.args, vec!["-y", "@ai-os/orchestrator"]);

        let memory = config.server(MEMORY_SERVER).unwrap();
        assert_eq!(memory.env.get("HUB_DIR").map(String::as_str), Some("/tmp/hub"));

        let context = config.server(CONTEXT_SERVER).unwrap();
        assert_eq!(context.cwd.as_deref(), Some(Path::new("/srv/project")));

        assert!(config.server(GRAPH_SERVER).unwrap().args.is_empty());
    }

    #[test]
    fn test_missing_entries_are_allowed() {
        let file = write_config(r#"{ "mcpServers": { "graph": { "command": "g" } } }"#);
        let config = CollaboratorConfig::load(file.path()).unwrap();
        assert!(config.server(MEMORY_SERVER).is_none());

        let empty = write_config("{}");
        assert!(CollaboratorConfig::load(empty.path()).unwrap().servers.is_empty());
    }

    #[test]
    fn test_empty_command_is_invalid() {
        let file = write_config(r#"{ "mcpServers": { "memory": { "command": "  " } } }"#);
        let err = CollaboratorConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref name, .. } if name == "memory"));
    }

    #[test]
    fn test_malformed_json() {
        let file = write_config("{ not json");
        let err = CollaboratorConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CollaboratorConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("absent.json"));
    }
}
