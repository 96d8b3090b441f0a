//! pprof exporter CLI
//!
//! Export and persist Go's profiling data locally, or into https://codeperf.io.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use pprof_exporter::commands::{
    display_version, execute_export, find_benchmarks, validate_artifact_file,
};
use pprof_exporter::driver::Granularity;
use pprof_exporter::utils::config::{load_config_file, PartialConfig};
use pprof_exporter::utils::git::detect_git_info;

/// pprof exporter - flamegraphs and top-down reports from Go profiles
#[derive(Parser, Debug)]
#[command(name = "pprof-exporter")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Export a profile as flamegraph tree and top-down reports
    Export {
        /// Profile file (e.g. cpu.out from `go test -cpuprofile`)
        profile: PathBuf,

        /// Config file (default is $HOME/.pprof-exporter.toml)
        #[arg(long, env = "PPROF_EXPORTER_CONFIG")]
        config: Option<PathBuf>,

        /// Benchmark name
        #[arg(long, env = "PPROF_EXPORTER_BENCH")]
        bench: Option<String>,

        /// git org (detected from the current repo when omitted)
        #[arg(long, env = "PPROF_EXPORTER_GIT_ORG")]
        git_org: Option<String>,

        /// git repo (detected from the current repo when omitted)
        #[arg(long, env = "PPROF_EXPORTER_GIT_REPO")]
        git_repo: Option<String>,

        /// git commit hash (detected from the current repo when omitted)
        #[arg(long, env = "PPROF_EXPORTER_GIT_HASH")]
        git_hash: Option<String>,

        /// Don't push the data to the collector, write JSON files instead
        #[arg(long, overrides_with = "remote")]
        local: bool,

        /// Push the data to the collector even if the config file sets `local`
        #[arg(long, overrides_with = "local")]
        remote: bool,

        /// Also write the merged stacks in folded format to this file
        #[arg(long, env = "PPROF_EXPORTER_FOLDED")]
        folded: Option<PathBuf>,

        /// Base path for local JSON files
        #[arg(long, env = "PPROF_EXPORTER_LOCAL_FILENAME")]
        local_filename: Option<PathBuf>,

        /// codeperf URL
        #[arg(long, env = "PPROF_EXPORTER_CODEPERF_URL")]
        codeperf_url: Option<String>,

        /// Collector API URL
        #[arg(long, env = "PPROF_EXPORTER_API_URL")]
        api_url: Option<String>,

        /// Report granularity, repeatable (default: lines and functions)
        #[arg(long = "granularity", value_enum)]
        granularities: Vec<Granularity>,

        /// Drop pprof nodes below this fraction of the total
        #[arg(long)]
        node_fraction: Option<f64>,

        /// Drop pprof edges below this fraction of the total
        #[arg(long)]
        edge_fraction: Option<f64>,

        /// Go toolchain binary
        #[arg(long, env = "PPROF_EXPORTER_GO")]
        go_binary: Option<String>,
    },

    /// List Go benchmark functions found in *_test.go files
    Benchmarks {
        /// Directory to scan
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Validate a local artifact JSON file
    Validate {
        /// Path to artifact JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

/// `--local` / `--remote` as a config layer value; `None` when neither is given
fn local_mode(local: bool, remote: bool) -> Option<bool> {
    match (local, remote) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Export {
            profile,
            config,
            bench,
            git_org,
            git_repo,
            git_hash,
            local,
            remote,
            folded,
            local_filename,
            codeperf_url,
            api_url,
            granularities,
            node_fraction,
            edge_fraction,
            go_binary,
        } => {
            let cli_layer = PartialConfig {
                bench,
                git_org,
                git_repo,
                git_commit: git_hash,
                local: local_mode(local, remote),
                local_filename,
                folded_output: folded,
                codeperf_url,
                api_url,
                granularities: (!granularities.is_empty()).then_some(granularities),
                node_fraction,
                edge_fraction,
                go_binary,
            };

            let file_layer =
                load_config_file(config.as_deref()).context("Failed to load config file")?;
            let detected = detect_git_info(&std::env::current_dir()?);
            let export_config = cli_layer.or(file_layer).resolve(&detected);

            let summary = execute_export(&profile, &export_config)?;
            println!("{}", summary);
        }

        Commands::Benchmarks { dir } => {
            for name in find_benchmarks(&dir)? {
                println!("{}", name);
            }
        }

        Commands::Validate { file } => {
            validate_artifact_file(&file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
