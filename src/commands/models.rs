use std::fmt;

/// Where a delivered artifact ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredArtifact {
    /// `flamegraph`, `lines` or `functions`
    pub artifact: String,

    /// File path or collector endpoint
    pub location: String,
}

/// An artifact that could not be produced or delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedArtifact {
    pub artifact: String,
    pub error: String,
}

/// Outcome of one export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub delivered: Vec<DeliveredArtifact>,
    pub failed: Vec<FailedArtifact>,
}

impl ExportSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn delivered_names(&self) -> Vec<&str> {
        self.delivered.iter().map(|d| d.artifact.as_str()).collect()
    }
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} artifact(s) exported, {} failed",
            self.delivered.len(),
            self.failed.len()
        )?;
        for failed in &self.failed {
            write!(f, "\n  {}: {}", failed.artifact, failed.error)?;
        }
        Ok(())
    }
}
