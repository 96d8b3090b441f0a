//! Utility modules for configuration, error handling and git discovery.

pub mod config;
pub mod error;
pub mod git;

// Re-export commonly used error types for convenience
pub use error::{ConfigError, DriverError, OutputError, ProfileError, RemoteError, ReportError};
