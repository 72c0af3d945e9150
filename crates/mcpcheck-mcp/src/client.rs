//! MCP JSON-RPC client for communicating with MCP servers.
//!
//! Implements the MCP protocol over stdio (JSON-RPC 2.0, one message per line).
//! Reference: <https://spec.modelcontextprotocol.io/>
//!
//! Requests are serialized: the transport lock is held from writing a request
//! until its reply arrives. Anything else the server prints in between
//! (notifications, server-to-client requests, replies to other ids, banner
//! text) is skipped. Each reply wait is bounded by the client's read timeout.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tokio::time::timeout;

/// Protocol revision sent in `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Default bound on waiting for one reply (npx-launched servers start slowly).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Unrelated messages tolerated while waiting for one reply.
const MAX_SKIPPED_MESSAGES: usize = 32;

/// Errors that can occur during MCP client operations.
#[derive(Debug, Error)]
pub enum McpClientError {
    #[error("Failed to spawn MCP server process: {0}")]
    SpawnFailed(String),

    #[error("Failed to communicate with MCP server: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("MCP protocol error: {0}")]
    ProtocolError(String),

    #[error("Timeout waiting for MCP server response")]
    Timeout,

    #[error("MCP server returned error: code={code}, message={message}")]
    ServerError { code: i64, message: String },

    /// The tool ran and reported `isError: true`.
    #[error("{0}")]
    ToolError(String),

    #[error("Server not connected")]
    NotConnected,
}

/// Outgoing JSON-RPC 2.0 request.
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

/// Any incoming JSON-RPC 2.0 message: reply, notification or server request.
#[derive(Debug, Deserialize)]
struct JsonRpcMessage {
    /// Required so arbitrary JSON output is not mistaken for protocol traffic.
    #[serde(rename = "jsonrpc")]
    _version: String,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// How one line of server output relates to the request being waited on.
#[derive(Debug)]
enum Incoming {
    Reply(JsonRpcMessage),
    Skip(&'static str),
}

impl Incoming {
    fn classify(line: &str, expected_id: u64) -> Self {
        let Ok(message) = serde_json::from_str::<JsonRpcMessage>(line) else {
            return Self::Skip("not JSON-RPC");
        };
        if message.method.is_some() {
            return Self::Skip("notification or server request");
        }
        if message.id.as_ref().and_then(Value::as_u64) != Some(expected_id) {
            return Self::Skip("reply to another request");
        }
        Self::Reply(message)
    }
}

/// MCP initialize result.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
    #[serde(default)]
    pub capabilities: ServerCapabilities,
}

/// Server identity from initialize.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    pub name: String,
}

/// Server capabilities. Only tool support matters here.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServerCapabilities {
    #[serde(default)]
    pub tools: Option<Value>,
}

/// Tool descriptor from `tools/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolInfo {
    pub name: String,
}

/// The child process and its pipes, locked as one unit per request.
struct Transport {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl Transport {
    async fn send(&mut self, message: &impl Serialize) -> Result<(), McpClientError> {
        let line = serde_json::to_string(message)? + "\n";
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }
}

/// Client for one MCP server spawned as a child process.
pub struct McpClient {
    transport: Option<Mutex<Transport>>,
    next_id: AtomicU64,
    capabilities: Option<ServerCapabilities>,
    read_timeout: Duration,
}

impl McpClient {
    /// Create a new MCP client (not yet connected).
    pub const fn new() -> Self {
        Self {
            transport: None,
            next_id: AtomicU64::new(1),
            capabilities: None,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Override how long to wait for each reply.
    #[must_use]
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Spawn the server and run the `initialize` handshake.
    pub async fn connect_stdio(
        &mut self,
        command: &str,
        args: &[String],
        cwd: Option<&Path>,
        env: &HashMap<String, String>,
    ) -> Result<InitializeResult, McpClientError> {
        let mut cmd = Command::new(command);
        cmd.args(args)
            .envs(env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        if let Some(working_dir) = cwd {
            cmd.current_dir(working_dir);
        }

        let mut child = cmd.spawn().map_err(|e| {
            McpClientError::SpawnFailed(format!(
                "Failed to spawn '{command}': {e} (args: {args:?}, cwd: {cwd:?})"
            ))
        })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(McpClientError::SpawnFailed(
                "Child process has no stdio pipes".to_string(),
            ));
        };

        self.transport = Some(Mutex::new(Transport {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        }));

        self.initialize().await
    }

    async fn initialize(&mut self) -> Result<InitializeResult, McpClientError> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "clientInfo": {
                "name": "mcpcheck",
                "version": env!("CARGO_PKG_VERSION")
            },
            "capabilities": {}
        });

        let result: InitializeResult = self.request("initialize", Some(params)).await?;
        self.capabilities = Some(result.capabilities.clone());
        self.notify("notifications/initialized").await?;

        tracing::debug!(
            server = %result.server_info.name,
            protocol = %result.protocol_version,
            "MCP session initialized"
        );

        Ok(result)
    }

    /// List tools; empty when the server does not advertise tool support.
    pub async fn list_tools(&self) -> Result<Vec<ToolInfo>, McpClientError> {
        let supports_tools = self
            .capabilities
            .as_ref()
            .is_some_and(|c| c.tools.is_some());
        if !supports_tools {
            return Ok(Vec::new());
        }

        let result: Value = self.request("tools/list", None).await?;
        let tools = result.get("tools").cloned().unwrap_or_else(|| json!([]));
        Ok(serde_json::from_value(tools)?)
    }

    /// Call a tool and return its `content` array.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<Value, McpClientError> {
        let params = json!({ "name": name, "arguments": arguments });
        let result: Value = self.request("tools/call", Some(params)).await?;

        let content = result.get("content").cloned().unwrap_or_else(|| json!([]));
        if result.get("isError").and_then(Value::as_bool) == Some(true) {
            let message = first_text(&content).unwrap_or("Unknown error");
            return Err(McpClientError::ToolError(message.to_string()));
        }

        Ok(content)
    }

    async fn request<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<T, McpClientError> {
        let transport = self.transport.as_ref().ok_or(McpClientError::NotConnected)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        let mut io = transport.lock().await;
        io.send(&JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        })
        .await?;
        tracing::trace!(id, method, "Sent MCP request");

        let reply = timeout(self.read_timeout, read_reply(&mut io.stdout, id))
            .await
            .map_err(|_| McpClientError::Timeout)??;
        drop(io);

        if let Some(err) = reply.error {
            return Err(McpClientError::ServerError {
                code: err.code,
                message: err.message,
            });
        }

        let result = reply.result.ok_or_else(|| {
            McpClientError::ProtocolError("Missing result in response".to_string())
        })?;
        Ok(serde_json::from_value(result)?)
    }

    async fn notify(&self, method: &str) -> Result<(), McpClientError> {
        let transport = self.transport.as_ref().ok_or(McpClientError::NotConnected)?;
        let notification = json!({ "jsonrpc": "2.0", "method": method, "params": {} });
        transport.lock().await.send(&notification).await
    }

    pub const fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Close the pipes and kill the server.
    pub fn disconnect(&mut self) {
        if let Some(transport) = self.transport.take() {
            let mut transport = transport.into_inner();
            if let Err(e) = transport.child.start_kill() {
                tracing::debug!(error = %e, "MCP server already exited");
            }
        }
        self.capabilities = None;
    }
}

impl Default for McpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for McpClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Read lines until the reply to `id` arrives.
async fn read_reply<R>(reader: &mut R, id: u64) -> Result<JsonRpcMessage, McpClientError>
where
    R: AsyncBufRead + Unpin,
{
    let mut skipped = 0;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Err(McpClientError::ProtocolError(
                "Server closed connection".to_string(),
            ));
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match Incoming::classify(trimmed, id) {
            Incoming::Reply(reply) => return Ok(reply),
            Incoming::Skip(reason) => {
                tracing::debug!(id, reason, line = trimmed, "Skipping server output");
                skipped += 1;
                if skipped >= MAX_SKIPPED_MESSAGES {
                    return Err(McpClientError::ProtocolError(format!(
                        "No reply to request {id} after {skipped} unrelated messages"
                    )));
                }
            }
        }
    }
}

/// Text of the first `{"type": "text"}` item in an MCP content array.
pub(crate) fn first_text(content: &Value) -> Option<&str> {
    content
        .as_array()?
        .iter()
        .find_map(|item| item.get("text").and_then(Value::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_omits_missing_params() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "tools/list",
            params: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#);
    }

    #[test]
    fn test_classify_messages() {
        let reply = r#"{"jsonrpc":"2.0","id":4,"result":{}}"#;
        assert!(matches!(Incoming::classify(reply, 4), Incoming::Reply(_)));
        assert!(matches!(Incoming::classify(reply, 5), Incoming::Skip(_)));

        let notification =
            r#"{"jsonrpc":"2.0","method":"notifications/message","params":{"level":"info"}}"#;
        assert!(matches!(
            Incoming::classify(notification, 4),
            Incoming::Skip(_)
        ));

        // Server-to-client request that happens to reuse our id
        let ping = r#"{"jsonrpc":"2.0","id":4,"method":"ping"}"#;
        assert!(matches!(Incoming::classify(ping, 4), Incoming::Skip(_)));

        assert!(matches!(
            Incoming::classify(r#"{"count": 4}"#, 4),
            Incoming::Skip(_)
        ));
        assert!(matches!(
            Incoming::classify("npx: installing", 4),
            Incoming::Skip(_)
        ));
    }

    #[tokio::test]
    async fn test_read_reply_skips_unrelated_messages() {
        let input = concat!(
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/message","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":1,"result":{"stale":true}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"error":{"code":-32600,"message":"Invalid Request"}}"#,
            "\n",
        );
        let mut reader = input.as_bytes();

        let reply = read_reply(&mut reader, 2).await.unwrap();
        assert!(reply.result.is_none());
        assert_eq!(reply.error.unwrap().code, -32600);
    }

    #[tokio::test]
    async fn test_read_reply_eof() {
        let mut reader = r#"{"jsonrpc":"2.0","id":1,"result":{}}"#.as_bytes();
        let err = read_reply(&mut reader, 2).await.unwrap_err();
        assert!(matches!(err, McpClientError::ProtocolError(ref m) if m == "Server closed connection"));
    }

    #[tokio::test]
    async fn test_read_reply_gives_up_on_noise() {
        let input = "noise\n".repeat(MAX_SKIPPED_MESSAGES + 1);
        let mut reader = input.as_bytes();
        let err = read_reply(&mut reader, 1).await.unwrap_err();
        assert!(err.to_string().contains("unrelated messages"));
    }

    #[test]
    fn test_initialize_result_without_capabilities() {
        let json = r#"{"protocolVersion":"2024-11-05","serverInfo":{"name":"memory-hub"}}"#;
        let result: InitializeResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.server_info.name, "memory-hub");
        assert!(result.capabilities.tools.is_none());
    }

    #[test]
    fn test_first_text_skips_non_text_items() {
        let content = json!([
            {"type": "image", "data": "...", "mimeType": "image/png"},
            {"type": "text", "text": "hello"}
        ]);
        assert_eq!(first_text(&content), Some("hello"));
        assert_eq!(first_text(&json!([])), None);
        assert_eq!(first_text(&json!("not an array")), None);
    }

    #[tokio::test]
    async fn test_call_before_connect_fails() {
        let client = McpClient::new();
        assert!(!client.is_connected());

        let err = client.call_tool("query", Map::new()).await.unwrap_err();
        assert!(matches!(err, McpClientError::NotConnected));
    }
}
