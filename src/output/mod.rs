//! Output writers for trace documents.
//!
//! This module handles writing data to disk:
//! - Compact JSON trace documents
//! - Raw sanitized bytes
//! - Output file naming next to the input

pub mod json;
pub mod paths;

// Re-export main functions
pub use json::{trace_to_bytes, validate_path, write_bytes, write_trace};
pub use paths::{derive_output_path, processed_path, sanitized_path};
