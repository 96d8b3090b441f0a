//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while parsing a top-down text report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Malformed report: expected 4 header lines, input ended after {found}")]
    MalformedReport { found: usize },

    #[error("Failed to read report: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while decoding a pprof profile
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Protobuf decoding failed: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Failed to decompress profile: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sample references unknown location id {0}")]
    UnknownLocation(u64),

    #[error("Location references unknown function id {0}")]
    UnknownFunction(u64),
}

/// Errors that can occur while invoking the external pprof tool
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Errors that can occur while talking to the remote collector
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Collector at {endpoint} rejected the upload ({status}): {body}")]
    Rejected {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Invalid collector endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
