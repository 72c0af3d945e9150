//! MCP adapters for the mcpcheck collaborator ports.
//!
//! Each collaborator is an MCP server launched over stdio. The launch file
//! ([`config`]) says how to start them; [`adapters`] turns port calls into
//! `tools/call` requests through the JSON-RPC [`client`].
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod adapters;
pub mod client;
pub mod config;
pub mod session;

pub use adapters::{
    McpContext, McpGraph, McpMemory, McpOrchestrator, build_collaborators, decode_content,
};
pub use client::{McpClient, McpClientError};
pub use config::{CollaboratorConfig, ConfigError, McpServerConfig};
pub use session::McpSession;
