//! Azure Cognitive Search client for uploading and removing section records

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::providers::IndexSink;
use crate::types::{IndexRecord, SubmitOutcome};

/// Records fetched per removal pass
const REMOVE_PAGE_SIZE: usize = 1000;

/// Pause between removal passes so deletes become visible to search
const REMOVE_SETTLE: Duration = Duration::from_secs(2);

/// Cognitive Search REST client bound to one index
pub struct SearchIndexClient {
    client: reqwest::Client,
    config: SearchConfig,
}

impl SearchIndexClient {
    /// Create a new client from search settings
    pub fn new(config: SearchConfig) -> Result<Self> {
        if config.endpoint.is_empty() || config.index_name.is_empty() {
            return Err(Error::config("search endpoint and index_name must be set"));
        }
        if config.api_key.is_empty() {
            return Err(Error::config("search api_key is not set"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self { client, config })
    }

    fn docs_url(&self, operation: &str) -> String {
        format!(
            "{}/indexes/{}/docs/{}?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.index_name,
            operation,
            self.config.api_version
        )
    }

    /// Send a batch of index actions and collect per-key results
    async fn index_actions<T: Serialize + Sync>(
        &self,
        actions: &[IndexAction<'_, T>],
    ) -> Result<Vec<SubmitOutcome>> {
        let response = self
            .client
            .post(self.docs_url("index"))
            .header("api-key", &self.config.api_key)
            .json(&IndexBatch { value: actions })
            .send()
            .await
            .map_err(|e| Error::Sink(format!("Search index request failed: {}", e)))?;

        // 207 carries per-document failures in the body
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Sink(format!(
                "Search index rejected batch ({}): {}",
                status, body
            )));
        }

        let result: IndexBatchResult = response
            .json()
            .await
            .map_err(|e| Error::Sink(format!("Failed to parse search index response: {}", e)))?;

        Ok(result.value.into_iter().map(IndexingResult::into_outcome).collect())
    }

    /// Fetch up to one page of record ids, all of them or one file's
    async fn matching_ids(&self, sourcefile: Option<&str>) -> Result<Vec<String>> {
        let request = SearchRequest {
            search: "",
            filter: sourcefile.map(sourcefile_filter),
            select: "id",
            top: REMOVE_PAGE_SIZE,
        };

        let response = self
            .client
            .post(self.docs_url("search"))
            .header("api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Sink(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Sink(format!("Search failed ({}): {}", status, body)));
        }

        let result: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Sink(format!("Failed to parse search response: {}", e)))?;

        Ok(result.value.into_iter().map(|hit| hit.id).collect())
    }

    /// Search-then-delete until nothing matches
    async fn delete_matching(&self, sourcefile: Option<&str>) -> Result<usize> {
        let target = sourcefile.unwrap_or("all files");
        let mut removed = 0;

        loop {
            let ids = self.matching_ids(sourcefile).await?;
            if ids.is_empty() {
                break;
            }

            let actions: Vec<_> = ids
                .iter()
                .map(|id| IndexAction {
                    action: "delete",
                    document: KeyOnly { id: id.as_str() },
                })
                .collect();

            let outcomes = self.index_actions(&actions).await?;
            let deleted = outcomes.iter().filter(|o| o.succeeded).count();
            tracing::info!("Removed {} sections from index '{}'", deleted, self.config.index_name);

            if deleted == 0 {
                return Err(Error::Sink(format!(
                    "Search index refused to delete {} sections of {}",
                    ids.len(),
                    target
                )));
            }
            removed += deleted;

            tokio::time::sleep(REMOVE_SETTLE).await;
        }

        Ok(removed)
    }
}

/// OData filter matching one source file
fn sourcefile_filter(sourcefile: &str) -> String {
    format!("sourcefile eq '{}'", sourcefile.replace('\'', "''"))
}

#[async_trait]
impl IndexSink for SearchIndexClient {
    async fn submit(&self, batch: &[IndexRecord]) -> Result<Vec<SubmitOutcome>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let actions: Vec<_> = batch
            .iter()
            .map(|record| IndexAction {
                action: "upload",
                document: record,
            })
            .collect();

        self.index_actions(&actions).await
    }

    async fn delete_by_sourcefile(&self, sourcefile: &str) -> Result<usize> {
        self.delete_matching(Some(sourcefile)).await
    }

    async fn delete_all(&self) -> Result<usize> {
        self.delete_matching(None).await
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.docs_url("$count"))
            .header("api-key", &self.config.api_key)
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    fn name(&self) -> &str {
        "azure-search"
    }
}

// Cognitive Search wire types

#[derive(Serialize)]
struct IndexBatch<'a, T> {
    value: &'a [IndexAction<'a, T>],
}

#[derive(Serialize)]
struct IndexAction<'a, T> {
    #[serde(rename = "@search.action")]
    action: &'a str,
    #[serde(flatten)]
    document: T,
}

#[derive(Serialize)]
struct KeyOnly<'a> {
    id: &'a str,
}

#[derive(Debug, Deserialize)]
struct IndexBatchResult {
    #[serde(default)]
    value: Vec<IndexingResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexingResult {
    key: String,
    status: bool,
    error_message: Option<String>,
}

impl IndexingResult {
    fn into_outcome(self) -> SubmitOutcome {
        if self.status {
            SubmitOutcome::success(self.key)
        } else {
            SubmitOutcome::failure(
                self.key,
                self.error_message.unwrap_or_else(|| "indexing failed".to_string()),
            )
        }
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    search: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<String>,
    select: &'a str,
    top: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    value: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: String,
}
