//! CLI command implementations.
//!
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod process;

// Re-export main command functions
pub use models::{BatchSummary, FileReport, ProcessArgs};
pub use process::{
    discover_trace_files, execute_process, format_summary, process_file, validate_args,
};
