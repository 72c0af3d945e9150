//! Lazily connected session to one MCP server.
//!
//! The server is spawned on the first tool call, not at bootstrap, so a
//! server that cannot start shows up as a failed check for its collaborator
//! instead of aborting the whole run.

use serde_json::{Map, Value};
use tokio::sync::OnceCell;

use crate::client::{McpClient, McpClientError};
use crate::config::McpServerConfig;
use mcpcheck_core::CollaboratorError;

/// One named server and its (not yet established) connection.
pub struct McpSession {
    name: String,
    config: Option<McpServerConfig>,
    client: OnceCell<McpClient>,
}

impl McpSession {
    /// `config` is `None` when the launch file has no entry for `name`.
    pub fn new(name: impl Into<String>, config: Option<McpServerConfig>) -> Self {
        Self {
            name: name.into(),
            config,
            client: OnceCell::new(),
        }
    }

    /// Whether the server has been spawned and initialized.
    pub fn is_connected(&self) -> bool {
        self.client.get().is_some_and(McpClient::is_connected)
    }

    /// Call a tool, connecting first if needed.
    pub async fn call_tool(
        &self,
        tool: &str,
        arguments: Map<String, Value>,
    ) -> Result<Value, CollaboratorError> {
        let client = self.client().await?;

        tracing::debug!(server = %self.name, tool, "Calling MCP tool");

        client.call_tool(tool, arguments).await.map_err(|e| {
            tracing::debug!(server = %self.name, tool, error = %e, "MCP tool call failed");
            CollaboratorError::new(e.to_string())
        })
    }

    async fn client(&self) -> Result<&McpClient, CollaboratorError> {
        let config = self.config.as_ref().ok_or_else(|| {
            CollaboratorError::new(format!("MCP server '{}' is not configured", self.name))
        })?;

        self.client
            .get_or_try_init(|| self.connect(config))
            .await
            .map_err(|e| CollaboratorError::new(e.to_string()))
    }

    async fn connect(&self, config: &McpServerConfig) -> Result<McpClient, McpClientError> {
        let mut client = McpClient::new();
        client
            .connect_stdio(
                &config.command,
                &config.args,
                config.cwd.as_deref(),
                &config.env,
            )
            .await?;

        match client.list_tools().await {
            Ok(tools) => tracing::info!(
                server_name = %self.name,
                tool_count = tools.len(),
                "MCP server started"
            ),
            Err(e) => tracing::warn!(server_name = %self.name, error = %e, "Failed to list tools"),
        }

        Ok(client)
    }
}
