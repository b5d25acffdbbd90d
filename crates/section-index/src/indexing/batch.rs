//! Batched submission of tagged records to an index sink

use std::collections::HashSet;

use crate::config::BatchConfig;
use crate::error::Result;
use crate::providers::IndexSink;
use crate::types::{IndexRecord, IndexReport};

/// Groups records into fixed-size batches and submits each batch once
#[derive(Debug, Clone, Copy)]
pub struct BatchIndexer {
    batch_size: usize,
}

impl BatchIndexer {
    /// Create an indexer, rejecting a zero batch size
    pub fn new(config: BatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            batch_size: config.batch_size,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Submit every record to `sink`
    ///
    /// Records the sink rejects are reported in `failed_ids` and do not stop
    /// later batches. A failed sink call aborts the run.
    pub async fn index<I>(&self, records: I, sink: &dyn IndexSink) -> Result<IndexReport>
    where
        I: IntoIterator<Item = IndexRecord>,
    {
        let mut report = IndexReport::default();
        let mut batch = Vec::with_capacity(self.batch_size);

        for record in records {
            batch.push(record);
            if batch.len() == self.batch_size {
                self.submit_batch(&batch, sink, &mut report).await?;
                batch.clear();
            }
        }

        if !batch.is_empty() {
            self.submit_batch(&batch, sink, &mut report).await?;
        }

        tracing::info!(
            "Indexed {}/{} sections in {} batches via {}",
            report.succeeded,
            report.submitted,
            report.batches,
            sink.name()
        );

        Ok(report)
    }

    async fn submit_batch(
        &self,
        batch: &[IndexRecord],
        sink: &dyn IndexSink,
        report: &mut IndexReport,
    ) -> Result<()> {
        tracing::debug!("Submitting batch {} of {} sections", report.batches + 1, batch.len());

        let outcomes = match sink.submit(batch).await {
            Ok(outcomes) => outcomes,
            Err(e) => {
                tracing::error!(
                    "Sink {} failed on batch {} after {} of {} sections succeeded: {}",
                    sink.name(),
                    report.batches + 1,
                    report.succeeded,
                    report.submitted,
                    e
                );
                return Err(e);
            }
        };

        report.batches += 1;
        report.submitted += batch.len();

        let mut reported = HashSet::with_capacity(outcomes.len());
        let mut succeeded = 0;
        for outcome in outcomes {
            if outcome.succeeded {
                succeeded += 1;
            } else {
                tracing::warn!(
                    "Section {} rejected: {}",
                    outcome.key,
                    outcome.error_message.as_deref().unwrap_or("no reason given")
                );
                report.failed_ids.push(outcome.key.clone());
            }
            reported.insert(outcome.key);
        }

        // Records the sink never reported on count as failed
        for record in batch {
            if !reported.contains(&record.id) {
                tracing::warn!("Section {} missing from sink response", record.id);
                report.failed_ids.push(record.id.clone());
            }
        }

        report.succeeded += succeeded;
        tracing::info!(
            "Batch {}: {} of {} sections succeeded",
            report.batches,
            succeeded,
            batch.len()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::providers::InMemorySink;
    use crate::types::SubmitOutcome;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use proptest::prelude::*;

    fn records(count: usize) -> Vec<IndexRecord> {
        (0..count)
            .map(|i| IndexRecord {
                id: format!("doc_pdf-{}", i),
                content: format!("section {}", i),
                category: None,
                sourcepage: "doc-1.pdf".to_string(),
                sourcefile: "doc.pdf".to_string(),
            })
            .collect()
    }

    fn indexer(batch_size: usize) -> BatchIndexer {
        BatchIndexer::new(BatchConfig { batch_size }).unwrap()
    }

    /// Sink whose second call fails at the transport level
    struct FlakySink {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl IndexSink for FlakySink {
        async fn submit(&self, batch: &[IndexRecord]) -> Result<Vec<SubmitOutcome>> {
            let mut calls = self.calls.lock();
            *calls += 1;
            if *calls == 2 {
                return Err(Error::sink("connection reset"));
            }
            Ok(batch.iter().map(|r| SubmitOutcome::success(r.id.clone())).collect())
        }

        async fn delete_by_sourcefile(&self, _sourcefile: &str) -> Result<usize> {
            Ok(0)
        }

        async fn delete_all(&self) -> Result<usize> {
            Ok(0)
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    /// Sink that only reports the first record of each batch
    struct TerseSink;

    #[async_trait]
    impl IndexSink for TerseSink {
        async fn submit(&self, batch: &[IndexRecord]) -> Result<Vec<SubmitOutcome>> {
            Ok(batch
                .iter()
                .take(1)
                .map(|r| SubmitOutcome::success(r.id.clone()))
                .collect())
        }

        async fn delete_by_sourcefile(&self, _sourcefile: &str) -> Result<usize> {
            Ok(0)
        }

        async fn delete_all(&self) -> Result<usize> {
            Ok(0)
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "terse"
        }
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(BatchIndexer::new(BatchConfig { batch_size: 0 }).is_err());
        assert_eq!(BatchIndexer::new(BatchConfig::default()).unwrap().batch_size(), 1000);
    }

    #[tokio::test]
    async fn test_batches_of_thousand() {
        let sink = InMemorySink::new();
        let report = indexer(1000).index(records(2500), &sink).await.unwrap();

        assert_eq!(sink.batch_sizes(), vec![1000, 1000, 500]);
        assert_eq!(report.batches, 3);
        assert_eq!(report.submitted, 2500);
        assert_eq!(report.succeeded, 2500);
        assert!(report.failed_ids.is_empty());
        assert_eq!(sink.len(), 2500);
    }

    #[tokio::test]
    async fn test_exact_multiple_has_no_trailing_call() {
        let sink = InMemorySink::new();
        let report = indexer(10).index(records(30), &sink).await.unwrap();
        assert_eq!(sink.batch_sizes(), vec![10, 10, 10]);
        assert_eq!(report.batches, 3);
    }

    #[tokio::test]
    async fn test_empty_stream_makes_no_calls() {
        let sink = InMemorySink::new();
        let report = indexer(1000).index(Vec::<IndexRecord>::new(), &sink).await.unwrap();
        assert!(sink.batch_sizes().is_empty());
        assert_eq!(report, IndexReport::default());
    }

    #[tokio::test]
    async fn test_rejected_records_counted_without_halting() {
        let sink = InMemorySink::rejecting(|r| r.id.ends_with('7'));
        let report = indexer(10).index(records(25), &sink).await.unwrap();

        assert_eq!(sink.batch_sizes(), vec![10, 10, 5]);
        assert_eq!(report.submitted, 25);
        assert_eq!(report.succeeded, 23);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.failed_ids, vec!["doc_pdf-7", "doc_pdf-17"]);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let sink = FlakySink {
            calls: Mutex::new(0),
        };
        let result = indexer(5).index(records(12), &sink).await;

        assert!(matches!(result, Err(Error::Sink(_))));
        assert_eq!(*sink.calls.lock(), 2);
    }

    #[tokio::test]
    async fn test_unreported_records_count_as_failed() {
        let report = indexer(3).index(records(4), &TerseSink).await.unwrap();

        assert_eq!(report.submitted, 4);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed_ids, vec!["doc_pdf-1", "doc_pdf-2"]);
    }

    proptest! {
        #[test]
        fn prop_batches_fill_before_flush(count in 0usize..400, batch_size in 1usize..64) {
            let sink = InMemorySink::new();
            let report = tokio_test::block_on(indexer(batch_size).index(records(count), &sink)).unwrap();
            let sizes = sink.batch_sizes();

            prop_assert_eq!(sizes.iter().sum::<usize>(), count);
            prop_assert_eq!(sizes.len(), count.div_ceil(batch_size));
            if let Some((last, full)) = sizes.split_last() {
                prop_assert!(full.iter().all(|&size| size == batch_size));
                prop_assert!(*last >= 1 && *last <= batch_size);
            }
            prop_assert_eq!(report.succeeded, count);
        }
    }
}
