//! Local persistence of export artifacts.
//!
//! This module handles writing data to disk:
//! - The flamegraph call tree
//! - One top-down report per granularity
//! - Optionally, the merged stacks in folded format

pub mod folded;
pub mod json;

// Re-export main functions
pub use folded::write_folded;
pub use json::{read_call_tree, read_report, write_json};

use crate::utils::error::OutputError;
use log::debug;
use std::path::{Path, PathBuf};

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create the parent directories of `path` if needed
pub fn ensure_parent_dir(path: &Path) -> Result<(), OutputError> {
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

/// Sibling path of `base` for one artifact.
///
/// `out/profile.json` + `lines` -> `out/profile.lines.json`
pub fn artifact_path(base: &Path, artifact: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "profile".to_string());
    let ext = base
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "json".to_string());

    base.with_file_name(format!("{}.{}.{}", stem, artifact, ext))
}
