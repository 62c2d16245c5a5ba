//! Byte-level repair of trace files that viewers refuse to load.
//!
//! Profilers occasionally leak raw control characters or broken UTF-8
//! into string values. The repair is purely textual: strip those bytes,
//! confirm the remainder is JSON, and write it next to the original.

use crate::output::{sanitized_path, write_bytes};
use crate::utils::error::TraceError;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Strip bytes a strict JSON reader would reject
///
/// **Public** - pure transformation, no I/O
///
/// Removes C0 control characters other than TAB, LF and CR, and every
/// byte outside ASCII. Every byte of a multi-byte UTF-8 sequence is
/// >= 0x80, so this equals lenient UTF-8 decoding followed by dropping
/// non-ASCII characters.
pub fn sanitize_bytes(raw: &[u8]) -> Vec<u8> {
    raw.iter().copied().filter(|&b| is_allowed(b)).collect()
}

/// **Private** - byte predicate for `sanitize_bytes`
fn is_allowed(byte: u8) -> bool {
    match byte {
        b'\t' | b'\n' | b'\r' => true,
        0x00..=0x1F => false,
        _ => byte.is_ascii(),
    }
}

/// Sanitize a trace file and write the result alongside it
///
/// **Public** - entry point for `--fix-invalid`
///
/// # Arguments
/// * `path` - Trace file to repair
///
/// # Returns
/// Path of the `<stem>_sanitized` file that was written
///
/// # Errors
/// * `TraceError::Io` - Input cannot be read
/// * `TraceError::Output` - Sanitized file cannot be written
/// * `TraceError::Format` - Result still does not parse as JSON; nothing is written
pub fn sanitize_file(path: impl AsRef<Path>) -> Result<PathBuf, TraceError> {
    let path = path.as_ref();
    info!("Sanitizing {}...", path.display());

    let raw = std::fs::read(path).map_err(|e| TraceError::io(path, e))?;
    let cleaned = sanitize_bytes(&raw);
    debug!(
        "Removed {} invalid bytes from {}",
        raw.len() - cleaned.len(),
        path.display()
    );

    serde_json::from_slice::<serde::de::IgnoredAny>(&cleaned).map_err(|e| {
        TraceError::Format(format!(
            "{} is still not valid JSON after sanitization: {}",
            path.display(),
            e
        ))
    })?;
    info!("JSON is valid after sanitization");

    let output = sanitized_path(path);
    write_bytes(&cleaned, &output)?;

    info!("Sanitized trace saved as {}", output.display());
    Ok(output)
}
