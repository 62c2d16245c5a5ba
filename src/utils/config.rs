//! Configuration and constants for the CLI.

/// Category carried by instrumented call spans in PyTorch profiler exports
pub const DEFAULT_SCOPED_CATEGORY: &str = "python_function";

/// Substring marking kernel-launch spans (compared case-insensitively)
pub const DEFAULT_KERNEL_MARKER: &str = "launchkernel";

/// Top-level member holding the event array
pub const DEFAULT_EVENTS_KEY: &str = "traceEvents";

/// Inference token accepted by `--tids`
pub const AUTO_THREADS_TOKEN: &str = "auto";

// Output file name suffixes, inserted before the extension
pub const PROCESSED_SUFFIX: &str = "_processed";
pub const SANITIZED_SUFFIX: &str = "_sanitized";

/// Directory scans skip files whose name contains this marker
pub const PROCESSED_MARKER: &str = "processed";
pub const TRACE_EXTENSION: &str = "json";

// Chrome trace-event keys interpreted by the pipeline
pub const CATEGORY_FIELD: &str = "cat";
pub const THREAD_FIELD: &str = "tid";
pub const NAME_FIELD: &str = "name";
pub const START_FIELD: &str = "ts";
pub const DURATION_FIELD: &str = "dur";

/// Trace-producer conventions the pipeline keys on.
///
/// Trace producers vary, so none of these are hardcoded in the stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceConventions {
    /// Category of events subject to thread filtering and trimming
    pub scoped_category: String,

    /// Name substring that exempts a span from trimming
    pub kernel_marker: String,

    /// Top-level key of the event array
    pub events_key: String,
}

impl Default for TraceConventions {
    fn default() -> Self {
        Self {
            scoped_category: DEFAULT_SCOPED_CATEGORY.to_string(),
            kernel_marker: DEFAULT_KERNEL_MARKER.to_string(),
            events_key: DEFAULT_EVENTS_KEY.to_string(),
        }
    }
}

impl TraceConventions {
    /// Whether `name` carries the kernel-launch marker, ignoring case
    pub fn is_kernel_launch(&self, name: &str) -> bool {
        name.to_lowercase()
            .contains(&self.kernel_marker.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_marker_is_case_insensitive() {
        let conventions = TraceConventions::default();
        assert!(conventions.is_kernel_launch("cudaLaunchKernel"));
        assert!(conventions.is_kernel_launch("LAUNCHKERNEL_EXC"));
        assert!(!conventions.is_kernel_launch("aten::matmul"));
    }

    #[test]
    fn test_custom_marker() {
        let conventions = TraceConventions {
            kernel_marker: "hipLaunch".to_string(),
            ..Default::default()
        };
        assert!(conventions.is_kernel_launch("HIPLAUNCHKERNEL"));
        assert!(!conventions.is_kernel_launch("cudaLaunchKernel"));
    }
}
