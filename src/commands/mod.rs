//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod benchmarks;
pub mod export;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use benchmarks::find_benchmarks;
pub use export::{execute_export, run_export, ArtifactSink, FOLDED_ARTIFACT};
pub use models::ExportSummary;
pub use utils::{display_version, validate_artifact_file};
