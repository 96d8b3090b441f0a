//! Output JSON schema for top-down text reports.
//!
//! The field names are the collector's wire format and must not change.

use serde::{Deserialize, Serialize};

/// A single ranked report row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextItem {
    /// Symbol as rendered by pprof (already shortened)
    pub symbol: String,

    /// Share of total weight spent in the symbol itself, e.g. `"5.00%"`
    #[serde(rename = "flat%")]
    pub flat_percent: String,

    /// Share of total weight spent in the symbol and its callees
    #[serde(rename = "cum%")]
    pub cum_percent: String,
}

/// Parsed top-down report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextReport {
    /// Rows in rank order
    #[serde(rename = "data")]
    pub items: Vec<TextItem>,

    #[serde(rename = "totalRows")]
    pub total_rows: usize,

    /// Always 1, reports are not paginated
    #[serde(rename = "totalPages")]
    pub total_pages: usize,

    /// Header lines: sample type, duration, node count, dropped nodes
    pub labels: Vec<String>,
}

impl TextReport {
    /// Build a report, deriving the row and page counts
    pub fn new(labels: Vec<String>, items: Vec<TextItem>) -> Self {
        Self {
            total_rows: items.len(),
            total_pages: 1,
            items,
            labels,
        }
    }
}
