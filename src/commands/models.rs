use crate::parser::schema::ThreadId;
use crate::pruner::{ThreadSelection, TrimStats};
use crate::utils::config::TraceConventions;
use std::path::PathBuf;

/// Arguments for the process command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ProcessArgs {
    /// Trace file, or directory of trace files
    pub path: PathBuf,

    /// Threads whose scoped events are kept
    pub threads: ThreadSelection,

    /// Deepest call frame to keep; `<= 0` disables trimming
    pub max_depth: i64,

    /// Repair invalid bytes before loading
    pub fix_invalid: bool,

    /// Files processed concurrently
    pub jobs: usize,

    /// Category, marker and events key of the trace producer
    pub conventions: TraceConventions,

    /// Print a per-file table after the batch
    pub print_summary: bool,
}

impl Default for ProcessArgs {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            threads: ThreadSelection::Auto,
            max_depth: 0,
            fix_invalid: false,
            jobs: 1,
            conventions: TraceConventions::default(),
            print_summary: false,
        }
    }
}

impl ProcessArgs {
    /// Trimming depth, or `None` when trimming is disabled
    pub fn depth_limit(&self) -> Option<usize> {
        usize::try_from(self.max_depth).ok().filter(|&depth| depth > 0)
    }
}

/// What happened to one successfully processed file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,

    /// Set when `--fix-invalid` wrote a sanitized copy
    pub sanitized: Option<PathBuf>,

    pub output: PathBuf,

    /// Threads whose scoped events were kept, sorted
    pub kept_threads: Vec<ThreadId>,

    pub events_loaded: usize,
    pub events_after_filter: usize,
    pub events_written: usize,

    /// Present when trimming ran
    pub trim: Option<TrimStats>,
}

/// Outcome of a whole batch
///
/// Per-file failures are collected here instead of aborting siblings.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub reports: Vec<FileReport>,
    pub failures: Vec<(PathBuf, anyhow::Error)>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.reports.len() + self.failures.len()
    }

    /// True when there was work to do and none of it succeeded
    pub fn all_failed(&self) -> bool {
        self.reports.is_empty() && !self.failures.is_empty()
    }
}
