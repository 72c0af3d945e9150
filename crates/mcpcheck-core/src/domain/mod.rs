//! Domain types for the smoke test.
//!
//! Pure data: no I/O, no async.

mod probe;
mod record;

pub use probe::{GRAPH_PROBE_QUERY, ProbeKind, ProbeOutcome, ProbeReport, ProbeResult};
pub use record::{ProbeRecord, probe_key};
