//! Folded stack writer.

use crate::aggregator::{fold_stacks, WeightedCallStack};
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `stacks` in folded format, one `a;b;c weight` line per stack
pub fn write_folded(
    stacks: &[WeightedCallStack],
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing folded stacks to: {}", output_path.display());

    super::validate_path(output_path)?;
    super::ensure_parent_dir(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    let folded = fold_stacks(stacks);
    for entry in &folded {
        writeln!(writer, "{}", entry.to_line()).map_err(OutputError::WriteFailed)?;
    }
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!("Wrote {} folded stacks", folded.len());
    Ok(())
}
