//! In-memory index sink

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::types::{IndexRecord, SubmitOutcome};

use super::sink::IndexSink;

type RejectFn = Box<dyn Fn(&IndexRecord) -> bool + Send + Sync>;

/// Index sink holding records in a map keyed by id
///
/// Uploading an existing id replaces the record, as a search index upload does.
#[derive(Default)]
pub struct InMemorySink {
    inner: Mutex<Inner>,
    reject: Option<RejectFn>,
}

#[derive(Default)]
struct Inner {
    records: BTreeMap<String, IndexRecord>,
    batch_sizes: Vec<usize>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that reports matching records as failed and does not store them
    pub fn rejecting<F>(predicate: F) -> Self
    where
        F: Fn(&IndexRecord) -> bool + Send + Sync + 'static,
    {
        Self {
            inner: Mutex::new(Inner::default()),
            reject: Some(Box::new(predicate)),
        }
    }

    /// Sizes of every batch received, in order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.inner.lock().batch_sizes.clone()
    }

    /// Stored records ordered by id
    pub fn records(&self) -> Vec<IndexRecord> {
        self.inner.lock().records.values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<IndexRecord> {
        self.inner.lock().records.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl IndexSink for InMemorySink {
    async fn submit(&self, batch: &[IndexRecord]) -> Result<Vec<SubmitOutcome>> {
        let mut inner = self.inner.lock();
        inner.batch_sizes.push(batch.len());

        let outcomes = batch
            .iter()
            .map(|record| {
                if self.reject.as_ref().is_some_and(|reject| reject(record)) {
                    SubmitOutcome::failure(record.id.clone(), "rejected by sink")
                } else {
                    inner.records.insert(record.id.clone(), record.clone());
                    SubmitOutcome::success(record.id.clone())
                }
            })
            .collect();

        Ok(outcomes)
    }

    async fn delete_by_sourcefile(&self, sourcefile: &str) -> Result<usize> {
        let mut inner = self.inner.lock();
        let before = inner.records.len();
        inner.records.retain(|_, record| record.sourcefile != sourcefile);
        Ok(before - inner.records.len())
    }

    async fn delete_all(&self) -> Result<usize> {
        let mut inner = self.inner.lock();
        let removed = inner.records.len();
        inner.records.clear();
        Ok(removed)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, sourcefile: &str) -> IndexRecord {
        IndexRecord {
            id: id.to_string(),
            content: format!("content of {}", id),
            category: None,
            sourcepage: sourcefile.to_string(),
            sourcefile: sourcefile.to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_and_replace() {
        let sink = InMemorySink::new();
        let outcomes = sink
            .submit(&[record("a-0", "a.txt"), record("a-1", "a.txt")])
            .await
            .unwrap();
        assert!(outcomes.iter().all(|o| o.succeeded));

        let mut updated = record("a-0", "a.txt");
        updated.content = "new".to_string();
        sink.submit(&[updated]).await.unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.get("a-0").unwrap().content, "new");
        assert_eq!(sink.batch_sizes(), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_rejected_records_not_stored() {
        let sink = InMemorySink::rejecting(|r| r.id.ends_with('1'));
        let outcomes = sink
            .submit(&[record("x-0", "x.txt"), record("x-1", "x.txt")])
            .await
            .unwrap();
        assert_eq!(
            outcomes.iter().map(|o| o.succeeded).collect::<Vec<_>>(),
            vec![true, false]
        );
        assert_eq!(outcomes[1].key, "x-1");
        assert!(sink.get("x-1").is_none());
    }

    #[tokio::test]
    async fn test_delete_by_sourcefile() {
        let sink = InMemorySink::new();
        sink.submit(&[
            record("a-0", "a.pdf"),
            record("a-1", "a.pdf"),
            record("b-0", "b.pdf"),
        ])
        .await
        .unwrap();

        assert_eq!(sink.delete_by_sourcefile("a.pdf").await.unwrap(), 2);
        assert_eq!(sink.delete_by_sourcefile("a.pdf").await.unwrap(), 0);
        assert_eq!(sink.records().len(), 1);

        assert_eq!(sink.delete_all().await.unwrap(), 1);
        assert!(sink.is_empty());
    }
}
