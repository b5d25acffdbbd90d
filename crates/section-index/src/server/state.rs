//! Application state for the indexing server

use std::sync::Arc;

use crate::config::IndexerConfig;
use crate::error::Result;
use crate::indexing::DocumentIndexer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: IndexerConfig,
    indexer: DocumentIndexer,
}

impl AppState {
    /// Create state with providers built from configuration
    pub fn new(config: IndexerConfig) -> Result<Self> {
        tracing::info!("Initializing indexing state...");
        let indexer = DocumentIndexer::from_config(&config)?;

        if indexer.has_analyzer() {
            tracing::info!("Document analysis enabled");
        } else {
            tracing::warn!("No analysis service configured, file uploads are disabled");
        }
        tracing::info!("Sections are indexed into {}", indexer.sink().name());

        Ok(Self::with_indexer(config, indexer))
    }

    /// Create state around an existing indexer
    pub fn with_indexer(config: IndexerConfig, indexer: DocumentIndexer) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, indexer }),
        }
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.inner.config
    }

    pub fn indexer(&self) -> &DocumentIndexer {
        &self.inner.indexer
    }
}
