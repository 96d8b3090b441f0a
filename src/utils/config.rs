//! Configuration and constants for the CLI.
//!
//! Settings are layered: command-line flags and `PPROF_EXPORTER_*` environment
//! variables (both handled by clap) take precedence over the TOML config file,
//! which takes precedence over values detected from the git checkout, which
//! take precedence over the defaults below. The result is a single
//! [`ExportConfig`] value that the export command receives explicitly.

use super::error::ConfigError;
use super::git::GitInfo;
use crate::driver::Granularity;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default timeout for collector requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_CODEPERF_URL: &str = "https://codeperf.io";
pub const DEFAULT_API_URL: &str = "https://api.codeperf.io";
pub const DEFAULT_LOCAL_FILENAME: &str = "profile.json";
pub const DEFAULT_GO_BINARY: &str = "go";

// Node/edge pruning thresholds handed to pprof
pub const DEFAULT_NODE_FRACTION: f64 = 0.05;
pub const DEFAULT_EDGE_FRACTION: f64 = 0.01;

/// Name of the config file looked up in the home directory
pub const CONFIG_FILE_NAME: &str = ".pprof-exporter.toml";

/// A partially specified configuration layer.
///
/// Used both for the TOML file and for the values coming from the command
/// line, so the layers can be merged field by field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialConfig {
    pub bench: Option<String>,
    pub git_org: Option<String>,
    pub git_repo: Option<String>,
    pub git_commit: Option<String>,
    pub local: Option<bool>,
    pub local_filename: Option<PathBuf>,
    pub folded_output: Option<PathBuf>,
    pub codeperf_url: Option<String>,
    pub api_url: Option<String>,
    pub granularities: Option<Vec<Granularity>>,
    pub node_fraction: Option<f64>,
    pub edge_fraction: Option<f64>,
    pub go_binary: Option<String>,
}

impl PartialConfig {
    /// Fill every unset field of `self` from `lower`.
    pub fn or(self, lower: PartialConfig) -> PartialConfig {
        PartialConfig {
            bench: self.bench.or(lower.bench),
            git_org: self.git_org.or(lower.git_org),
            git_repo: self.git_repo.or(lower.git_repo),
            git_commit: self.git_commit.or(lower.git_commit),
            local: self.local.or(lower.local),
            local_filename: self.local_filename.or(lower.local_filename),
            folded_output: self.folded_output.or(lower.folded_output),
            codeperf_url: self.codeperf_url.or(lower.codeperf_url),
            api_url: self.api_url.or(lower.api_url),
            granularities: self.granularities.or(lower.granularities),
            node_fraction: self.node_fraction.or(lower.node_fraction),
            edge_fraction: self.edge_fraction.or(lower.edge_fraction),
            go_binary: self.go_binary.or(lower.go_binary),
        }
    }

    /// Resolve the layered values into a complete config.
    ///
    /// Git fields missing from every layer fall back to `detected`.
    pub fn resolve(self, detected: &GitInfo) -> ExportConfig {
        ExportConfig {
            bench: self.bench.unwrap_or_default(),
            git_org: self
                .git_org
                .or_else(|| detected.org.clone())
                .unwrap_or_default(),
            git_repo: self
                .git_repo
                .or_else(|| detected.repo.clone())
                .unwrap_or_default(),
            git_commit: self
                .git_commit
                .or_else(|| detected.commit.clone())
                .unwrap_or_default(),
            local: self.local.unwrap_or(false),
            local_filename: self
                .local_filename
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_FILENAME)),
            folded_output: self.folded_output,
            codeperf_url: self
                .codeperf_url
                .unwrap_or_else(|| DEFAULT_CODEPERF_URL.to_string()),
            api_url: self.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            granularities: self.granularities.unwrap_or_else(Granularity::all),
            node_fraction: self.node_fraction.unwrap_or(DEFAULT_NODE_FRACTION),
            edge_fraction: self.edge_fraction.unwrap_or(DEFAULT_EDGE_FRACTION),
            go_binary: self
                .go_binary
                .unwrap_or_else(|| DEFAULT_GO_BINARY.to_string()),
        }
    }
}

/// Fully resolved settings for one export run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Benchmark name the profile belongs to
    pub bench: String,
    pub git_org: String,
    pub git_repo: String,
    pub git_commit: String,

    /// Write artifacts to disk instead of pushing them to the collector
    pub local: bool,

    /// Base path for local artifacts (see [`crate::output::artifact_path`])
    pub local_filename: PathBuf,

    /// Where to write the merged stacks in folded format, if anywhere
    pub folded_output: Option<PathBuf>,

    /// Public codeperf site, used for the result link
    pub codeperf_url: String,

    /// Collector API base URL
    pub api_url: String,

    /// Report granularities to render, in order
    pub granularities: Vec<Granularity>,

    pub node_fraction: f64,
    pub edge_fraction: f64,

    /// Go toolchain binary used to run `go tool pprof`
    pub go_binary: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        PartialConfig::default().resolve(&GitInfo::default())
    }
}

impl ExportConfig {
    /// Check the config is usable for an export run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bench.trim().is_empty() {
            return Err(ConfigError::Invalid("benchmark name (--bench) is required".into()));
        }

        if self.granularities.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one report granularity is required".into(),
            ));
        }

        for (name, value) in [
            ("node fraction", self.node_fraction),
            ("edge fraction", self.edge_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }

        if self.go_binary.trim().is_empty() {
            return Err(ConfigError::Invalid("go binary cannot be empty".into()));
        }

        if self.local {
            if self.local_filename.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("local filename cannot be empty".into()));
            }
            return Ok(());
        }

        for (flag, value) in [
            ("--git-org", &self.git_org),
            ("--git-repo", &self.git_repo),
            ("--git-hash", &self.git_commit),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "{} is required when pushing to the remote collector",
                    flag
                )));
            }
        }

        for (name, url) in [("codeperf URL", &self.codeperf_url), ("API URL", &self.api_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "{} must start with http:// or https://",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// Load the TOML config layer.
///
/// An explicit `path` must exist. Without one, `~/.pprof-exporter.toml` is
/// read when present and an empty layer is returned otherwise.
pub fn load_config_file(path: Option<&Path>) -> Result<PartialConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.is_file() => p,
            _ => return Ok(PartialConfig::default()),
        },
    };

    debug!("Reading config file: {}", path.display());
    let content = std::fs::read_to_string(&path)?;
    parse_config(&content)
}

/// Parse a TOML config layer from a string
pub fn parse_config(content: &str) -> Result<PartialConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_layer_wins_over_file() {
        let cli = PartialConfig {
            bench: Some("BenchmarkFoo".into()),
            ..Default::default()
        };
        let file = PartialConfig {
            bench: Some("BenchmarkBar".into()),
            api_url: Some("http://localhost:8080".into()),
            ..Default::default()
        };

        let merged = cli.or(file);
        assert_eq!(merged.bench.as_deref(), Some("BenchmarkFoo"));
        assert_eq!(merged.api_url.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn test_detected_git_info_is_fallback() {
        let detected = GitInfo {
            org: Some("codeperfio".into()),
            repo: Some("example-go".into()),
            commit: Some("1e872b5".into()),
        };
        let config = PartialConfig {
            git_repo: Some("other".into()),
            ..Default::default()
        }
        .resolve(&detected);

        assert_eq!(config.git_org, "codeperfio");
        assert_eq!(config.git_repo, "other");
        assert_eq!(config.git_commit, "1e872b5");
    }
}
