//! Index sink trait for submitting tagged sections to a search index

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{IndexRecord, SubmitOutcome};

/// Trait for a search index accepting batches of records
///
/// Implementations:
/// - `SearchIndexClient`: Azure Cognitive Search REST API
/// - `InMemorySink`: process-local map, for tests and dry runs
#[async_trait]
pub trait IndexSink: Send + Sync {
    /// Upload a batch
    ///
    /// Returns one outcome per record, in submission order. An `Err` means the
    /// call itself failed and no per-record outcome is known.
    async fn submit(&self, batch: &[IndexRecord]) -> Result<Vec<SubmitOutcome>>;

    /// Remove every record whose `sourcefile` equals `sourcefile`
    ///
    /// Returns the number of records removed.
    async fn delete_by_sourcefile(&self, sourcefile: &str) -> Result<usize>;

    /// Remove every record in the index
    async fn delete_all(&self) -> Result<usize>;

    /// Check if the sink is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get sink name for logging
    fn name(&self) -> &str;
}
