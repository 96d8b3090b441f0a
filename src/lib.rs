//! pprof exporter
//!
//! Turns Go pprof profiles into a de-duplicated flamegraph call tree and
//! ranked top-down reports, and ships them to a local file or to the
//! codeperf.io collector.
//!
//! This crate provides the core implementation for the
//! `pprof-exporter` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! pprof-exporter export --bench BenchmarkFib cpu.out
//! pprof-exporter export --local --bench BenchmarkFib cpu.out
//! ```

pub mod aggregator;
pub mod commands;
pub mod driver;
pub mod output;
pub mod parser;
pub mod rpc;
pub mod utils;
