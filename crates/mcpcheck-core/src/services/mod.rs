//! Core services.

mod probe_runner;

pub use probe_runner::{COMPLETION_LINE, HEADER_LINE, ProbeRunner};
