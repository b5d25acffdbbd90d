//! Document indexing pipeline: analysis, page map, sections, provenance, batches

use std::path::Path;
use std::sync::Arc;

use crate::config::{IndexerConfig, SectioningConfig};
use crate::error::{Error, Result};
use crate::mapping::build_page_map;
use crate::providers::azure::{FormRecognizerClient, SearchIndexClient};
use crate::providers::{DocumentAnalyzer, InMemorySink, IndexSink};
use crate::sectioning::{split_sections, tag_sections};
use crate::types::{AnalyzedDocument, IndexRecord, IndexReport};

use super::batch::BatchIndexer;

/// Runs documents through analysis, sectioning and submission
pub struct DocumentIndexer {
    analyzer: Option<Arc<dyn DocumentAnalyzer>>,
    sink: Arc<dyn IndexSink>,
    sectioning: SectioningConfig,
    batcher: BatchIndexer,
}

impl DocumentIndexer {
    /// Create an indexer over explicit providers
    pub fn new(
        config: &IndexerConfig,
        analyzer: Option<Arc<dyn DocumentAnalyzer>>,
        sink: Arc<dyn IndexSink>,
    ) -> Result<Self> {
        config.sectioning.validate()?;
        Ok(Self {
            analyzer,
            sink,
            sectioning: config.sectioning,
            batcher: BatchIndexer::new(config.batching)?,
        })
    }

    /// Create an indexer with providers built from configuration
    ///
    /// Without a `search` section records go to an in-memory sink.
    pub fn from_config(config: &IndexerConfig) -> Result<Self> {
        let analyzer: Option<Arc<dyn DocumentAnalyzer>> = match config.analysis {
            Some(ref analysis) => Some(Arc::new(FormRecognizerClient::new(analysis.clone())?)),
            None => None,
        };

        let sink: Arc<dyn IndexSink> = match config.search {
            Some(ref search) => Arc::new(SearchIndexClient::new(search.clone())?),
            None => {
                tracing::warn!("No search index configured, sections are kept in memory");
                Arc::new(InMemorySink::new())
            }
        };

        Self::new(config, analyzer, sink)
    }

    pub fn sink(&self) -> &Arc<dyn IndexSink> {
        &self.sink
    }

    pub fn has_analyzer(&self) -> bool {
        self.analyzer.is_some()
    }

    /// Analyze raw file bytes, then index the result
    pub async fn index_document(
        &self,
        filename: &str,
        data: &[u8],
        category: Option<&str>,
    ) -> Result<IndexReport> {
        let analyzer = self
            .analyzer
            .as_ref()
            .ok_or_else(|| Error::config("no document analyzer configured"))?;

        tracing::info!("[{}] Analyzing document with {}", filename, analyzer.name());
        let analysis = analyzer.analyze(filename, data).await?;

        self.index_analysis(filename, &analysis, category).await
    }

    /// Section an already-analysed document and submit it to the sink
    pub async fn index_analysis(
        &self,
        filename: &str,
        analysis: &AnalyzedDocument,
        category: Option<&str>,
    ) -> Result<IndexReport> {
        tracing::info!("[{}] Creating page map and sections", filename);
        let page_map = build_page_map(analysis)?;
        let records = tag_sections(split_sections(&page_map, self.sectioning), filename, category);

        tracing::info!("[{}] Indexing sections into {}", filename, self.sink.name());
        let report = self.batcher.index(records, self.sink.as_ref()).await?;

        if !report.failed_ids.is_empty() {
            tracing::warn!(
                "[{}] {} of {} sections were not indexed",
                filename,
                report.failed_ids.len(),
                report.submitted
            );
        }

        Ok(report)
    }

    /// Tagged sections of an analysed document, without submitting them
    pub fn sections(
        &self,
        filename: &str,
        analysis: &AnalyzedDocument,
        category: Option<&str>,
    ) -> Result<Vec<IndexRecord>> {
        let page_map = build_page_map(analysis)?;
        Ok(tag_sections(split_sections(&page_map, self.sectioning), filename, category).collect())
    }

    /// Remove every section of a file from the sink
    pub async fn remove_file(&self, filename: &str) -> Result<usize> {
        let filename = base_name(filename);
        tracing::info!("[{}] Removing sections from {}", filename, self.sink.name());

        let removed = self.sink.delete_by_sourcefile(filename).await?;
        tracing::info!("[{}] Removed {} sections", filename, removed);
        Ok(removed)
    }

    /// Remove every section in the sink
    pub async fn remove_all(&self) -> Result<usize> {
        tracing::warn!("Removing all sections from {}", self.sink.name());

        let removed = self.sink.delete_all().await?;
        tracing::info!("Removed {} sections", removed);
        Ok(removed)
    }
}

/// Final path component of a file name
fn base_name(filename: &str) -> &str {
    Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(filename)
}
