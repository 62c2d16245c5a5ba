//! Trace document output writer.
//!
//! Writes trace documents as compact JSON. Viewers choke on very large
//! files, so nothing is pretty-printed.

use crate::parser::schema::TraceDocument;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a trace document to a JSON file
///
/// **Public** - main entry point for trace output
///
/// # Arguments
/// * `doc` - Document to write
/// * `output_path` - Destination file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_trace(doc: &TraceDocument, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Saving to {}...", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer(&mut writer, doc).map_err(OutputError::SerializationFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    debug!(
        "Trace written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Serialize a trace document to compact JSON bytes
///
/// **Public** - useful for tests and in-memory pipelines
pub fn trace_to_bytes(doc: &TraceDocument) -> Result<Vec<u8>, OutputError> {
    serde_json::to_vec(doc).map_err(OutputError::SerializationFailed)
}

/// Write raw bytes to a file, creating parent directories
///
/// **Public** - used by the sanitizer
pub fn write_bytes(bytes: &[u8], output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    prepare_output_path(output_path)?;
    std::fs::write(output_path, bytes).map_err(OutputError::WriteFailed)
}

/// Validate that output path is writable
///
/// **Public** - callers may check a destination before doing any work
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Refuse to clobber a directory
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Validate the path and create missing parent directories
///
/// **Private** - shared by the writers
fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    validate_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
