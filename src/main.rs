//! Trace Prune CLI
//!
//! Trims Chrome trace-event files down to the main thread and a bounded
//! call-stack depth, and repairs files viewers refuse to load.

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;

use trace_prune::commands::{execute_process, format_summary, ProcessArgs};
use trace_prune::pruner::ThreadSelection;
use trace_prune::utils::config::{
    TraceConventions, DEFAULT_EVENTS_KEY, DEFAULT_KERNEL_MARKER, DEFAULT_SCOPED_CATEGORY,
};

/// Trace Prune - slim down profiler traces for trace viewers
#[derive(Parser, Debug)]
#[command(name = "trace-prune")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Trace file, or directory of `.json` trace files
    path: PathBuf,

    /// Threads to keep: `auto`, or comma-separated thread ids
    #[arg(short, long, default_value = "auto")]
    tids: ThreadSelection,

    /// Deepest call frame to keep (0 or less disables trimming)
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    max_depth: i64,

    /// Strip invalid characters first, writing a `_sanitized` copy
    #[arg(short, long)]
    fix_invalid: bool,

    /// Number of files processed concurrently
    #[arg(short, long, default_value = "1")]
    jobs: usize,

    /// Event category subject to thread filtering and trimming
    #[arg(long, env = "TRACE_PRUNE_CATEGORY", default_value = DEFAULT_SCOPED_CATEGORY)]
    category: String,

    /// Name substring of spans that survive trimming at any depth
    #[arg(long, env = "TRACE_PRUNE_KERNEL_MARKER", default_value = DEFAULT_KERNEL_MARKER)]
    kernel_marker: String,

    /// Top-level key of the event array
    #[arg(long, env = "TRACE_PRUNE_EVENTS_KEY", default_value = DEFAULT_EVENTS_KEY)]
    events_key: String,

    /// Print a per-file summary to stdout
    #[arg(long)]
    summary: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let args = ProcessArgs {
        path: cli.path,
        threads: cli.tids,
        max_depth: cli.max_depth,
        fix_invalid: cli.fix_invalid,
        jobs: cli.jobs,
        conventions: TraceConventions {
            scoped_category: cli.category,
            kernel_marker: cli.kernel_marker,
            events_key: cli.events_key,
        },
        print_summary: cli.summary,
    };

    let summary = execute_process(&args)?;

    if args.print_summary {
        println!("\n{}", format_summary(&summary));
    }

    if summary.all_failed() {
        anyhow::bail!("All {} trace file(s) failed", summary.total());
    }

    Ok(())
}
