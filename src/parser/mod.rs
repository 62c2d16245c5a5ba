//! Trace parsing and schema definitions.
//!
//! This module handles:
//! - Repairing byte-level corruption in exported trace files
//! - Loading trace documents into typed events
//! - Defining the in-memory trace model

pub mod sanitize;
pub mod schema;
pub mod trace_file;

// Re-export main types
pub use sanitize::{sanitize_bytes, sanitize_file};
pub use schema::{ThreadId, TraceDocument, TraceEvent};
pub use trace_file::{load_trace, parse_trace_bytes};
