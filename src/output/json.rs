//! JSON artifact writer and reader.
//!
//! Writes call trees and text reports to JSON files with proper formatting.

use crate::aggregator::CallTreeNode;
use crate::parser::schema::TextReport;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write any artifact to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `artifact` - Call tree or report to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let tree = build_call_tree(&stacks);
/// write_json(&tree, "profile.flamegraph.json")?;
/// ```
pub fn write_json<T: Serialize>(
    artifact: &T,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing artifact to: {}", output_path.display());

    super::validate_path(output_path)?;
    super::ensure_parent_dir(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, artifact)
        .map_err(OutputError::SerializationFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Artifact written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a call tree artifact
pub fn read_call_tree(input_path: impl AsRef<Path>) -> Result<CallTreeNode, OutputError> {
    let tree: CallTreeNode = read_json(input_path.as_ref())?;
    debug!(
        "Call tree loaded: {} nodes, total weight {}",
        tree.node_count(),
        tree.cumulative_weight
    );
    Ok(tree)
}

/// Read a text report artifact
pub fn read_report(input_path: impl AsRef<Path>) -> Result<TextReport, OutputError> {
    let report: TextReport = read_json(input_path.as_ref())?;
    debug!("Report loaded: {} rows", report.total_rows);
    Ok(report)
}

fn read_json<T: DeserializeOwned>(input_path: &Path) -> Result<T, OutputError> {
    debug!("Reading JSON from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::ReadFailed)?;
    serde_json::from_reader(BufReader::new(file)).map_err(OutputError::SerializationFailed)
}
