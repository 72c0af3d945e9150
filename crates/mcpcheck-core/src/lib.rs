//! Core domain types and port definitions for mcpcheck.
//!
//! This crate knows nothing about how collaborators are reached. It defines
//! the four capabilities the smoke test exercises ([`ports`]), the transient
//! values it passes around ([`domain`]), and the sequential runner that
//! drives the checks ([`services::ProbeRunner`]).
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    GRAPH_PROBE_QUERY, ProbeKind, ProbeOutcome, ProbeRecord, ProbeReport, ProbeResult, probe_key,
};
pub use ports::{
    Collaborators, CollaboratorError, GraphQueryable, KeyValueStore, QueryResult,
    StructureDescription, StructureProvider, Workflow, WorkflowLister,
};
pub use services::ProbeRunner;

// tokio only provides the test runtime here
#[cfg(test)]
use tokio as _;
