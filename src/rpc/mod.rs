//! Client for the remote codeperf collector.

pub mod client;
pub mod endpoints;

// Re-export main types
pub use client::CollectorClient;
pub use endpoints::{result_url, upload_url, BenchCoordinates, FLAMEGRAPH_ARTIFACT};
