//! Export command implementation.
//!
//! The export command:
//! 1. Asks pprof for the profile as protobuf and builds the call tree
//! 2. Asks pprof for one top-down text report per granularity and parses it
//! 3. Writes every artifact locally or pushes it to the collector
//! 4. Optionally writes the merged stacks in folded format to a local file
//!
//! A failing artifact does not stop the others; failures are collected in the
//! returned [`ExportSummary`].

use crate::aggregator::{build_call_tree, CallTreeNode, WeightedCallStack};
use crate::commands::models::{DeliveredArtifact, ExportSummary, FailedArtifact};
use crate::driver::{GoPprof, Granularity, ProfileRenderer};
use crate::output::{artifact_path, write_folded, write_json};
use crate::parser::{parse_profile, parse_text_report, TextReport};
use crate::rpc::{result_url, BenchCoordinates, CollectorClient, FLAMEGRAPH_ARTIFACT};
use crate::utils::config::ExportConfig;
use anyhow::{Context, Result};
use log::{debug, error, info};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Summary name of the folded stacks file
pub const FOLDED_ARTIFACT: &str = "folded";

/// Destination of exported artifacts
pub enum ArtifactSink {
    /// Sibling JSON files of a base path
    Local { base: PathBuf },
    /// The remote collector
    Remote(CollectorClient),
}

impl ArtifactSink {
    /// Pick the sink the config asks for
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        if config.local {
            return Ok(ArtifactSink::Local {
                base: config.local_filename.clone(),
            });
        }

        let client = CollectorClient::new(config.api_url.clone(), BenchCoordinates::from_config(config))
            .context("Failed to create collector client")?;
        Ok(ArtifactSink::Remote(client))
    }

    /// Deliver one artifact, returning where it went
    pub fn deliver<T: Serialize>(&self, artifact: &str, body: &T) -> Result<String> {
        match self {
            ArtifactSink::Local { base } => {
                let path = artifact_path(base, artifact);
                write_json(body, &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                Ok(path.display().to_string())
            }
            ArtifactSink::Remote(client) => {
                client
                    .push(artifact, body)
                    .with_context(|| format!("Failed to push {}", artifact))?;
                Ok(client.endpoint(artifact))
            }
        }
    }
}

/// Execute the export command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Invalid configuration
/// * Any artifact that could not be generated or delivered
pub fn execute_export(profile: &Path, config: &ExportConfig) -> Result<ExportSummary> {
    config.validate().context("Invalid export configuration")?;

    let start_time = Instant::now();
    let renderer = GoPprof::from_config(config);
    let sink = ArtifactSink::from_config(config)?;

    let summary = run_export(&renderer, &sink, profile, config);

    info!(
        "Export completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    if !summary.is_success() {
        anyhow::bail!("Export incomplete: {}", summary);
    }

    if !config.local {
        info!("Successfully published profile data");
        info!(
            "Check it at: {}",
            result_url(&config.codeperf_url, &BenchCoordinates::from_config(config))
        );
    }

    Ok(summary)
}

/// Produce and deliver every artifact for `profile`.
///
/// Never fails as a whole; per-artifact errors are logged and recorded.
pub fn run_export<R: ProfileRenderer>(
    renderer: &R,
    sink: &ArtifactSink,
    profile: &Path,
    config: &ExportConfig,
) -> ExportSummary {
    info!("Exporting profile: {}", profile.display());
    let mut summary = ExportSummary::default();

    match decode_call_stacks(renderer, profile) {
        Ok(stacks) => {
            let tree = generate_flamegraph(&stacks);
            record(
                &mut summary,
                FLAMEGRAPH_ARTIFACT,
                sink.deliver(FLAMEGRAPH_ARTIFACT, &tree),
            );

            if let Some(path) = &config.folded_output {
                let folded = write_folded(&stacks, path)
                    .map(|()| path.display().to_string())
                    .with_context(|| format!("Failed to write {}", path.display()));
                record(&mut summary, FOLDED_ARTIFACT, folded);
            }
        }
        Err(e) => record(&mut summary, FLAMEGRAPH_ARTIFACT, Err(e)),
    }

    for granularity in &config.granularities {
        let report = generate_text_report(renderer, profile, *granularity)
            .and_then(|report| sink.deliver(granularity.as_str(), &report));
        record(&mut summary, granularity.as_str(), report);
    }

    summary
}

fn record(summary: &mut ExportSummary, artifact: &str, result: Result<String>) {
    match result {
        Ok(location) => {
            info!("✓ {} exported to {}", artifact, location);
            summary.delivered.push(DeliveredArtifact {
                artifact: artifact.to_string(),
                location,
            });
        }
        Err(e) => {
            error!("✗ {} failed: {:#}", artifact, e);
            summary.failed.push(FailedArtifact {
                artifact: artifact.to_string(),
                error: format!("{:#}", e),
            });
        }
    }
}

/// Decode the merged, weight-sorted call stacks of a profile
pub fn decode_call_stacks<R: ProfileRenderer>(
    renderer: &R,
    profile: &Path,
) -> Result<Vec<WeightedCallStack>> {
    let proto = renderer
        .render_proto(profile)
        .with_context(|| format!("Cannot read pprof profile from {}", profile.display()))?;

    let stacks = parse_profile(&proto).context("Failed to decode pprof output")?;
    debug!("Decoded {} call stacks", stacks.len());
    Ok(stacks)
}

/// Build the flamegraph call tree from decoded stacks
pub fn generate_flamegraph(stacks: &[WeightedCallStack]) -> CallTreeNode {
    let tree = build_call_tree(stacks);
    info!(
        "Built call tree: {} nodes, total weight {}",
        tree.node_count(),
        tree.cumulative_weight
    );
    tree
}

/// Render and parse the top-down report at one granularity
pub fn generate_text_report<R: ProfileRenderer>(
    renderer: &R,
    profile: &Path,
    granularity: Granularity,
) -> Result<TextReport> {
    let text = renderer
        .render_text(profile, granularity)
        .with_context(|| format!("Cannot render {} report for {}", granularity, profile.display()))?;

    let report = parse_text_report(text.lines())
        .with_context(|| format!("Failed to parse {} report", granularity))?;
    debug!("Parsed {} report: {} rows", granularity, report.total_rows);
    Ok(report)
}
