//! Pruning of trace events.
//!
//! This module transforms a loaded event list by:
//! - Choosing the main thread(s), explicitly or by inference
//! - Filtering scoped events to those threads
//! - Trimming scoped call frames beyond a nesting depth

pub mod filter;
pub mod stack_trimmer;
pub mod thread_select;

// Re-export main types and functions
pub use filter::filter_threads;
pub use stack_trimmer::{trim_frames, TrimOutcome, TrimStats};
pub use thread_select::{infer_main_thread, select_threads, ThreadSelection};
