//! `go tool pprof` subprocess driver.

use super::{Granularity, ProfileRenderer};
use crate::utils::config::{ExportConfig, DEFAULT_EDGE_FRACTION, DEFAULT_GO_BINARY, DEFAULT_NODE_FRACTION};
use crate::utils::error::DriverError;
use log::debug;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

/// Runs `<go> tool pprof` with fixed pruning thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct GoPprof {
    pub go_binary: String,
    pub node_fraction: f64,
    pub edge_fraction: f64,
}

impl Default for GoPprof {
    fn default() -> Self {
        Self {
            go_binary: DEFAULT_GO_BINARY.to_string(),
            node_fraction: DEFAULT_NODE_FRACTION,
            edge_fraction: DEFAULT_EDGE_FRACTION,
        }
    }
}

impl GoPprof {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            go_binary: config.go_binary.clone(),
            node_fraction: config.node_fraction,
            edge_fraction: config.edge_fraction,
        }
    }

    /// Arguments for rendering a top-down text report
    pub fn text_args(&self, profile: &Path, granularity: Granularity) -> Vec<OsString> {
        let mut args = self.base_args();
        args.push("-top".into());
        args.push(format!("-{}", granularity.as_str()).into());
        args.push(format!("-nodefraction={}", self.node_fraction).into());
        args.push(format!("-edgefraction={}", self.edge_fraction).into());
        args.push(profile.as_os_str().to_owned());
        args
    }

    /// Arguments for re-encoding the profile as protobuf
    pub fn proto_args(&self, profile: &Path) -> Vec<OsString> {
        let mut args = self.base_args();
        args.push("-proto".into());
        args.push(profile.as_os_str().to_owned());
        args
    }

    fn base_args(&self) -> Vec<OsString> {
        vec!["tool".into(), "pprof".into()]
    }

    fn run(&self, args: Vec<OsString>) -> Result<Vec<u8>, DriverError> {
        let command = format!(
            "{} {}",
            self.go_binary,
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );
        debug!("Running: {}", command);

        let output = Command::new(&self.go_binary)
            .args(&args)
            .output()
            .map_err(|source| DriverError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DriverError::Failed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

impl ProfileRenderer for GoPprof {
    fn render_proto(&self, profile: &Path) -> Result<Vec<u8>, DriverError> {
        self.run(self.proto_args(profile))
    }

    fn render_text(&self, profile: &Path, granularity: Granularity) -> Result<String, DriverError> {
        let stdout = self.run(self.text_args(profile, granularity))?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}
