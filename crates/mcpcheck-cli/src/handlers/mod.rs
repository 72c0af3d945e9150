//! Command handlers.

pub mod probe;
