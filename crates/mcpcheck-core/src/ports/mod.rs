//! Collaborator ports.
//!
//! Each trait is one capability the smoke test exercises. Adapters (MCP,
//! in-memory fakes in tests) implement these; the probe runner only ever
//! sees `Arc<dyn Trait>`.
//!
//! # Design Rules
//!
//! - One undifferentiated error kind: [`CollaboratorError`] carries a message
//!   and nothing else. Adapters fold transport and protocol failures into it.
//! - Payloads the runner never inspects stay as JSON values.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ProbeRecord;

/// A collaborator call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CollaboratorError {
    message: String,
}

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A workflow as reported by the orchestrator. Only counted, never inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Workflow(pub serde_json::Value);

/// Project structure description returned by the context collaborator.
pub type StructureDescription = serde_json::Value;

/// Result of a graph query.
pub type QueryResult = serde_json::Value;

/// Lists workflows known to the orchestrator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkflowLister: Send + Sync {
    async fn list_workflows(&self) -> Result<Vec<Workflow>, CollaboratorError>;
}

/// Key/value storage used for the memory round trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn store(&self, key: &str, value: &ProbeRecord) -> Result<(), CollaboratorError>;

    /// Fetch a previously stored value.
    async fn retrieve(&self, key: &str) -> Result<serde_json::Value, CollaboratorError>;

    async fn delete(&self, key: &str) -> Result<(), CollaboratorError>;
}

/// Describes the current project's structure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StructureProvider: Send + Sync {
    async fn get_project_structure(&self) -> Result<StructureDescription, CollaboratorError>;
}

/// Executes graph queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphQueryable: Send + Sync {
    async fn query(&self, query: &str) -> Result<QueryResult, CollaboratorError>;
}

/// The four collaborator handles, bundled for injection.
#[derive(Clone)]
pub struct Collaborators {
    pub orchestrator: Arc<dyn WorkflowLister>,
    pub memory: Arc<dyn KeyValueStore>,
    pub context: Arc<dyn StructureProvider>,
    pub graph: Arc<dyn GraphQueryable>,
}
