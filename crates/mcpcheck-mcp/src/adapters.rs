//! MCP-backed implementations of the collaborator ports.
//!
//! Each adapter owns one [`McpSession`] and maps its port methods onto tool
//! calls. Tool results arrive as MCP content arrays; the first text item is
//! decoded as JSON when it parses, and kept as a plain string otherwise.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::client::first_text;
use crate::config::{
    CONTEXT_SERVER, CollaboratorConfig, GRAPH_SERVER, MEMORY_SERVER, ORCHESTRATOR_SERVER,
};
use crate::session::McpSession;
use mcpcheck_core::{
    CollaboratorError, Collaborators, GraphQueryable, KeyValueStore, ProbeRecord, QueryResult,
    StructureDescription, StructureProvider, Workflow, WorkflowLister,
};

/// Tool names called on each server.
pub mod tools {
    pub const LIST_WORKFLOWS: &str = "list_workflows";
    pub const STORE: &str = "store";
    pub const RETRIEVE: &str = "retrieve";
    pub const DELETE: &str = "delete";
    pub const GET_PROJECT_STRUCTURE: &str = "get_project_structure";
    pub const QUERY: &str = "query";
}

/// Decode an MCP content array into a single JSON value.
pub fn decode_content(content: &Value) -> Value {
    first_text(content).map_or_else(
        || content.clone(),
        |text| serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())),
    )
}

/// Accept either a bare array or `{"workflows": [...]}`.
fn workflows_from(value: Value) -> Result<Vec<Workflow>, CollaboratorError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("workflows") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(CollaboratorError::new(
                    "Unexpected workflow list: object without a 'workflows' array",
                ));
            }
        },
        other => {
            return Err(CollaboratorError::new(format!(
                "Unexpected workflow list: {other}"
            )));
        }
    };

    Ok(items.into_iter().map(Workflow).collect())
}

fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Orchestrator reached over MCP.
pub struct McpOrchestrator {
    session: McpSession,
}

impl McpOrchestrator {
    pub const fn new(session: McpSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl WorkflowLister for McpOrchestrator {
    async fn list_workflows(&self) -> Result<Vec<Workflow>, CollaboratorError> {
        let content = self
            .session
            .call_tool(tools::LIST_WORKFLOWS, Map::new())
            .await?;
        workflows_from(decode_content(&content))
    }
}

/// Memory hub reached over MCP.
pub struct McpMemory {
    session: McpSession,
}

impl McpMemory {
    pub const fn new(session: McpSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl KeyValueStore for McpMemory {
    async fn store(&self, key: &str, value: &ProbeRecord) -> Result<(), CollaboratorError> {
        let value =
            serde_json::to_value(value).map_err(|e| CollaboratorError::new(e.to_string()))?;
        self.session
            .call_tool(tools::STORE, args(json!({ "key": key, "value": value })))
            .await?;
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Value, CollaboratorError> {
        let content = self
            .session
            .call_tool(tools::RETRIEVE, args(json!({ "key": key })))
            .await?;
        Ok(decode_content(&content))
    }

    async fn delete(&self, key: &str) -> Result<(), CollaboratorError> {
        self.session
            .call_tool(tools::DELETE, args(json!({ "key": key })))
            .await?;
        Ok(())
    }
}

/// Context manager reached over MCP.
pub struct McpContext {
    session: McpSession,
}

impl McpContext {
    pub const fn new(session: McpSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl StructureProvider for McpContext {
    async fn get_project_structure(&self) -> Result<StructureDescription, CollaboratorError> {
        let content = self
            .session
            .call_tool(tools::GET_PROJECT_STRUCTURE, Map::new())
            .await?;
        Ok(decode_content(&content))
    }
}

/// Document graph reached over MCP.
pub struct McpGraph {
    session: McpSession,
}

impl McpGraph {
    pub const fn new(session: McpSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl GraphQueryable for McpGraph {
    async fn query(&self, query: &str) -> Result<QueryResult, CollaboratorError> {
        let content = self
            .session
            .call_tool(tools::QUERY, args(json!({ "query": query })))
            .await?;
        Ok(decode_content(&content))
    }
}

/// Build the four MCP-backed collaborators from a launch file.
///
/// Nothing is spawned here; each server starts on its first call.
pub fn build_collaborators(config: &CollaboratorConfig) -> Collaborators {
    let session = |name: &str| McpSession::new(name, config.server(name).cloned());

    Collaborators {
        orchestrator: Arc::new(McpOrchestrator::new(session(ORCHESTRATOR_SERVER))),
        memory: Arc::new(McpMemory::new(session(MEMORY_SERVER))),
        context: Arc::new(McpContext::new(session(CONTEXT_SERVER))),
        graph: Arc::new(McpGraph::new(session(GRAPH_SERVER))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_content_parses_json_text() {
        let content = json!([{"type": "text", "text": "{\"count\": 42}"}]);
        assert_eq!(decode_content(&content), json!({"count": 42}));
    }

    #[test]
    fn test_decode_content_keeps_plain_text() {
        let content = json!([{"type": "text", "text": "stored"}]);
        assert_eq!(decode_content(&content), json!("stored"));
    }

    #[test]
    fn test_decode_content_without_text_returns_raw() {
        let content = json!([]);
        assert_eq!(decode_content(&content), json!([]));
    }

    #[test]
    fn test_workflows_from_array_and_object() {
        assert_eq!(workflows_from(json!(["a", "b", "c"])).unwrap().len(), 3);
        assert_eq!(
            workflows_from(json!({"workflows": [{"id": 1}]}))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_workflows_from_rejects_other_shapes() {
        let err = workflows_from(json!("nope")).unwrap_err();
        assert!(err.message().starts_with("Unexpected workflow list"));

        assert!(workflows_from(json!({"items": []})).is_err());
    }

    #[tokio::test]
    async fn test_missing_entries_fail_only_their_collaborator() {
        let collaborators = build_collaborators(&CollaboratorConfig::default());

        let err = collaborators.orchestrator.list_workflows().await.unwrap_err();
        assert_eq!(err.message(), "MCP server 'orchestrator' is not configured");

        let err = collaborators.graph.query("MATCH (n) RETURN n").await.unwrap_err();
        assert_eq!(err.message(), "MCP server 'graph' is not configured");
    }
}
