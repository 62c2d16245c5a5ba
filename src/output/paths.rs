//! Output file naming.
//!
//! Outputs land next to their input, with a suffix inserted before the
//! extension: `trace.json` becomes `trace_processed.json`.

use crate::utils::config::{PROCESSED_SUFFIX, SANITIZED_SUFFIX};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Insert `suffix` between the file stem and its extension
pub fn derive_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(OsString::from)
        .unwrap_or_default();

    let mut name = stem;
    name.push(suffix);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }

    input.with_file_name(name)
}

/// `<stem>_processed.<ext>`
pub fn processed_path(input: &Path) -> PathBuf {
    derive_output_path(input, PROCESSED_SUFFIX)
}

/// `<stem>_sanitized.<ext>`
pub fn sanitized_path(input: &Path) -> PathBuf {
    derive_output_path(input, SANITIZED_SUFFIX)
}
