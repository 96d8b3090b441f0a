//! Invocation of the external profiling tool.
//!
//! Decoding, aggregation and text rendering of raw profiles are delegated to
//! `go tool pprof`. The [`ProfileRenderer`] trait is the seam the export
//! command talks to, so it can be driven by a fake in tests.

pub mod go_pprof;

pub use go_pprof::GoPprof;

use crate::utils::error::DriverError;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Resolution of a top-down report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One row per source line
    Lines,
    /// One row per function
    Functions,
}

impl Granularity {
    /// Every granularity, in export order
    pub fn all() -> Vec<Granularity> {
        vec![Granularity::Lines, Granularity::Functions]
    }

    /// Flag/endpoint name
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Lines => "lines",
            Granularity::Functions => "functions",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produces the raw inputs the exporter needs from a profile file
pub trait ProfileRenderer {
    /// Profile re-encoded as pprof protobuf (may be gzip-compressed)
    fn render_proto(&self, profile: &Path) -> Result<Vec<u8>, DriverError>;

    /// Top-down text report at the given granularity
    fn render_text(&self, profile: &Path, granularity: Granularity) -> Result<String, DriverError>;
}
