//! Command-line smoke test for the AI-OS MCP collaborators.
//!
//! `main.rs` is the composition root; this library holds the pieces it wires
//! together so they can be tested without spawning the binary.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings: tempfile is used by the binary tests
#[cfg(test)]
use tempfile as _;

// Dependencies used only by main.rs
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod parser;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use error::CliError;
pub use parser::Cli;
