//! Trace Prune
//!
//! Post-processing for Chrome trace-event JSON files, such as PyTorch
//! profiler exports, so that they stay small enough to open in a viewer:
//! - keep only the main thread's `python_function` spans
//! - trim call frames nested deeper than a chosen depth, keeping
//!   kernel launches and instantaneous markers
//! - strip bytes that stop viewers from loading the file
//!
//! ## Getting Started
//!
//! ```bash
//! cargo install trace-prune
//! trace-prune /path/to/trace.json --tids auto --max-depth 40
//! ```
//!
//! Output is written next to the input as `<name>_processed.json`.
//! Open it in `chrome://tracing` or https://ui.perfetto.dev/.

pub mod commands;
pub mod output;
pub mod parser;
pub mod pruner;
pub mod utils;
