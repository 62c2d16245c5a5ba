//! Process command implementation.
//!
//! For each trace file the process command:
//! 1. Optionally sanitizes invalid bytes
//! 2. Loads the trace document
//! 3. Selects the main thread(s)
//! 4. Filters scoped events to those threads
//! 5. Optionally trims deep call frames
//! 6. Writes the `_processed` output

use crate::commands::models::{BatchSummary, FileReport, ProcessArgs};
use crate::output::{processed_path, write_trace};
use crate::parser::{load_trace, sanitize_file};
use crate::pruner::{filter_threads, select_threads, trim_frames};
use crate::utils::config::{PROCESSED_MARKER, TRACE_EXTENSION};
use crate::utils::error::ConfigError;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Execute the process command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Process command arguments
///
/// # Returns
/// A summary of processed and failed files. A failing file never stops
/// the others; the caller decides what counts as overall failure.
///
/// # Errors
/// * Invalid arguments (see `validate_args`)
/// * The input directory cannot be listed
pub fn execute_process(args: &ProcessArgs) -> Result<BatchSummary> {
    let start_time = Instant::now();

    validate_args(args)?;

    let files = discover_trace_files(&args.path)?;
    if files.is_empty() {
        anyhow::bail!("No trace files found in {}", args.path.display());
    }
    info!("Found {} trace file(s) to process", files.len());

    let results = run_batch(&files, args)?;

    let mut summary = BatchSummary::default();
    for (path, result) in files.into_iter().zip(results) {
        match result {
            Ok(report) => summary.reports.push(report),
            Err(e) => {
                error!("Skipping {}: {:#}", path.display(), e);
                summary.failures.push((path, e));
            }
        }
    }

    info!(
        "Processed {}/{} file(s) in {:.2}s",
        summary.reports.len(),
        summary.total(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(summary)
}

/// Validate process arguments
///
/// **Public** - fails fast before any trace is read
pub fn validate_args(args: &ProcessArgs) -> Result<()> {
    if !args.path.exists() {
        return Err(ConfigError::PathNotFound(args.path.clone()).into());
    }

    if args.jobs == 0 {
        return Err(ConfigError::InvalidJobs(args.jobs).into());
    }

    let conventions = &args.conventions;
    if conventions.scoped_category.is_empty() {
        return Err(ConfigError::EmptySetting("Scoped category").into());
    }

    // An empty marker would match every name and exempt every frame
    if conventions.kernel_marker.is_empty() {
        return Err(ConfigError::EmptySetting("Kernel marker").into());
    }

    if conventions.events_key.is_empty() {
        return Err(ConfigError::EmptySetting("Events key").into());
    }

    Ok(())
}

/// Collect the trace files a path refers to
///
/// **Public** - a file is returned as-is; a directory yields its `.json`
/// files whose name does not mark them as already processed, sorted
pub fn discover_trace_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = std::fs::read_dir(path)
        .with_context(|| format!("Failed to list directory {}", path.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let candidate = entry
            .with_context(|| format!("Failed to list directory {}", path.display()))?
            .path();

        if is_trace_candidate(&candidate) {
            files.push(candidate);
        } else {
            debug!("Ignoring {}", candidate.display());
        }
    }

    files.sort();
    Ok(files)
}

/// **Private** - directory scan predicate
fn is_trace_candidate(path: &Path) -> bool {
    let has_extension = path
        .extension()
        .map_or(false, |ext| ext == TRACE_EXTENSION);
    let already_processed = path
        .file_name()
        .map_or(false, |name| name.to_string_lossy().contains(PROCESSED_MARKER));

    path.is_file() && has_extension && !already_processed
}

/// Run the full pipeline on one trace file
///
/// **Public** - each call owns its document; safe to run concurrently
///
/// # Errors
/// * Sanitization leaves invalid JSON
/// * The trace cannot be loaded or lacks required fields
/// * Auto thread inference finds no scoped events
/// * The output cannot be written
pub fn process_file(path: &Path, args: &ProcessArgs) -> Result<FileReport> {
    info!("Processing {}...", path.display());
    let conventions = &args.conventions;
    let category = conventions.scoped_category.as_str();

    let sanitized = if args.fix_invalid {
        Some(sanitize_file(path).context("Failed to sanitize trace")?)
    } else {
        None
    };
    let source = sanitized.as_deref().unwrap_or(path);

    let mut doc = load_trace(source, conventions)
        .with_context(|| format!("Failed to load {}", source.display()))?;
    let events_loaded = doc.events.len();

    let keep = select_threads(&doc.events, &args.threads, category)
        .context("Failed to select threads")?;
    let mut kept_threads: Vec<_> = keep.iter().cloned().collect();
    kept_threads.sort();

    let events = filter_threads(std::mem::take(&mut doc.events), &keep, category);
    let events_after_filter = events.len();

    let (events, trim) = match args.depth_limit() {
        Some(max_depth) => {
            info!("Trimming frame depth to {}...", max_depth);
            let outcome = trim_frames(events, max_depth, conventions)?;
            (outcome.events, Some(outcome.stats))
        }
        None => (events, None),
    };
    doc.events = events;

    let output = processed_path(source);
    write_trace(&doc, &output).context("Failed to write processed trace")?;

    Ok(FileReport {
        input: path.to_path_buf(),
        sanitized,
        output,
        kept_threads,
        events_loaded,
        events_after_filter,
        events_written: doc.events.len(),
        trim,
    })
}

/// Process files, concurrently when more than one worker is allowed
///
/// **Private** - results come back in input order
fn run_batch(files: &[PathBuf], args: &ProcessArgs) -> Result<Vec<Result<FileReport>>> {
    let progress = batch_progress(files.len())?;
    let run_one = |file: &PathBuf| {
        let result = process_file(file, args);
        progress.inc(1);
        result
    };

    let workers = args.jobs.min(files.len());
    let results = if workers <= 1 {
        files.iter().map(&run_one).collect()
    } else {
        debug!("Processing with {} workers", workers);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .context("Failed to start worker pool")?;

        // Indexed collect keeps input order
        pool.install(|| files.par_iter().map(&run_one).collect())
    };

    progress.finish_and_clear();
    Ok(results)
}

/// Progress bar over the files of a batch
///
/// **Private** - drawn on stderr, hidden when stderr is not a terminal
fn batch_progress(len: usize) -> Result<ProgressBar> {
    let progress = ProgressBar::new(len as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")?
            .progress_chars("#>-"),
    );
    Ok(progress)
}

/// Render a per-file summary table
///
/// **Public** - printed by `--summary`
pub fn format_summary(summary: &BatchSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "=".repeat(80)));
    out.push_str("TRACE PRUNE SUMMARY\n");
    out.push_str(&format!("{}\n", "=".repeat(80)));

    for report in &summary.reports {
        let threads: Vec<String> = report.kept_threads.iter().map(|t| t.to_string()).collect();
        out.push_str(&format!("{}\n", report.output.display()));
        out.push_str(&format!("  Threads kept:  {}\n", threads.join(",")));
        out.push_str(&format!(
            "  Events:        {} loaded, {} after thread filter, {} written\n",
            report.events_loaded, report.events_after_filter, report.events_written
        ));
        if let Some(trim) = &report.trim {
            out.push_str(&format!(
                "  Frames:        {} dropped, {} exempt, deepest {}\n",
                trim.dropped, trim.kept_by_exemption, trim.deepest
            ));
        }
    }

    for (path, e) in &summary.failures {
        out.push_str(&format!("FAILED {}: {:#}\n", path.display(), e));
    }

    out.push_str(&format!(
        "{}/{} file(s) processed\n",
        summary.reports.len(),
        summary.total()
    ));
    out.push_str(&"=".repeat(80));
    out
}
