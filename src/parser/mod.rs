//! Parsing of the external profiling tool's output.
//!
//! This module handles:
//! - Decoding pprof protobuf profiles into call stacks
//! - Parsing top-down text reports
//! - Defining the report output schema

pub mod pprof;
pub mod schema;
pub mod text_report;

// Re-export main types
pub use pprof::{decode_profile, parse_profile, profile_to_stacks};
pub use schema::{TextItem, TextReport};
pub use text_report::{parse_text_report, read_text_report};
