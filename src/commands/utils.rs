use crate::output::{read_call_tree, read_report};
use anyhow::{bail, Result};
use std::path::Path;

/// Validate a local artifact file and print what it contains
pub fn validate_artifact_file(file_path: &Path) -> Result<()> {
    println!("Validating artifact: {}", file_path.display());

    if let Ok(tree) = read_call_tree(file_path) {
        println!("✓ Valid flamegraph call tree");
        println!("  Total weight: {}", tree.cumulative_weight);
        println!("  Nodes: {}", tree.node_count());
        println!("  Depth: {}", tree.depth());
        println!("  Top-level frames: {}", tree.children.len());
        return Ok(());
    }

    match read_report(file_path) {
        Ok(report) => {
            println!("✓ Valid text report");
            for label in &report.labels {
                println!("  {}", label);
            }
            println!("  Rows: {}", report.total_rows);
            Ok(())
        }
        Err(e) => bail!(
            "{} is neither a call tree nor a text report: {}",
            file_path.display(),
            e
        ),
    }
}

/// Display version information
pub fn display_version() {
    println!("pprof-exporter v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Export and persist Go's profiling data locally, or into https://codeperf.io.");
}
