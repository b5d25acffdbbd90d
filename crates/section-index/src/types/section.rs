//! Section, record and batch outcome types

use serde::{Deserialize, Serialize};

/// One page's slice of the linear text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMapEntry {
    /// Page number of the source page
    pub page_number: u32,
    /// Cumulative start offset (chars) in the linear text
    pub offset: usize,
    /// Rendered page text, tables spliced in, trailing space included
    pub text: String,
}

/// A bounded excerpt of the linear text, before provenance is attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSection {
    pub text: String,
    /// Page containing the section's first character
    pub page_number: u32,
    /// Start offset (chars, inclusive)
    pub start: usize,
    /// End offset (chars, exclusive)
    pub end: usize,
}

/// A tagged section, shaped as the search index document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Index key, `[0-9A-Za-z_-]` only
    pub id: String,
    pub content: String,
    pub category: Option<String>,
    /// Citation target, e.g. "report-3.pdf"
    pub sourcepage: String,
    pub sourcefile: String,
}

/// Per-record result reported by a sink, aligned with the submitted batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    /// Record id the outcome refers to
    pub key: String,
    pub succeeded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SubmitOutcome {
    pub fn success(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            succeeded: true,
            error_message: None,
        }
    }

    pub fn failure(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            succeeded: false,
            error_message: Some(message.into()),
        }
    }
}

/// Aggregate result of indexing one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexReport {
    /// Number of sink calls made
    pub batches: usize,
    /// Records handed to the sink
    pub submitted: usize,
    /// Records the sink accepted
    pub succeeded: usize,
    /// Ids of records the sink rejected
    pub failed_ids: Vec<String>,
}

impl IndexReport {
    /// Records the sink rejected
    pub fn failed(&self) -> usize {
        self.submitted - self.succeeded
    }
}
