//! Azure Form Recognizer client for layout analysis
//!
//! Submits raw file bytes to a `prebuilt-layout` style model, then polls the
//! returned operation until the analysis finishes. Offsets are requested in
//! Unicode code points so they index the content string by `char`.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::providers::DocumentAnalyzer;
use crate::types::{AnalyzedDocument, CellKind, DocumentPage, DocumentTable, Span, TableCell};

/// Form Recognizer REST client
pub struct FormRecognizerClient {
    client: reqwest::Client,
    config: AnalysisConfig,
}

impl FormRecognizerClient {
    /// Create a new client from analysis settings
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        if config.endpoint.is_empty() {
            return Err(Error::config("analysis endpoint is not set"));
        }
        if config.api_key.is_empty() {
            return Err(Error::config("analysis api_key is not set"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self { client, config })
    }

    /// URL for starting an analysis
    fn analyze_url(&self) -> String {
        format!(
            "{}/formrecognizer/documentModels/{}:analyze?api-version={}&stringIndexType=unicodeCodePoint",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model_id,
            self.config.api_version
        )
    }

    /// Start an analysis and return the operation URL to poll
    async fn begin_analyze(&self, filename: &str, data: &[u8]) -> Result<String> {
        let response = self
            .client
            .post(self.analyze_url())
            .header("Ocp-Apim-Subscription-Key", &self.config.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| Error::Analysis(format!("Form Recognizer request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Analysis(format!(
                "[{}] Form Recognizer rejected document ({}): {}",
                filename, status, body
            )));
        }

        response
            .headers()
            .get("Operation-Location")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| Error::analysis("Form Recognizer response has no Operation-Location"))
    }

    /// Poll an operation until it reaches a terminal state
    async fn poll_result(&self, filename: &str, operation_url: &str) -> Result<AnalyzeResult> {
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        for attempt in 1..=self.config.max_polls {
            let response = self
                .client
                .get(operation_url)
                .header("Ocp-Apim-Subscription-Key", &self.config.api_key)
                .send()
                .await
                .map_err(|e| Error::Analysis(format!("Form Recognizer poll failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Analysis(format!(
                    "Form Recognizer poll failed ({}): {}",
                    status, body
                )));
            }

            let operation: AnalyzeOperation = response.json().await.map_err(|e| {
                Error::Analysis(format!("Failed to parse Form Recognizer response: {}", e))
            })?;

            match operation.status.as_str() {
                "succeeded" => {
                    return operation.analyze_result.ok_or_else(|| {
                        Error::analysis("Form Recognizer succeeded without a result")
                    });
                }
                "failed" => {
                    let message = operation
                        .error
                        .map(|e| format!("{}: {}", e.code, e.message))
                        .unwrap_or_else(|| "unknown error".to_string());
                    return Err(Error::Analysis(format!(
                        "[{}] Form Recognizer analysis failed: {}",
                        filename, message
                    )));
                }
                status => {
                    tracing::debug!("[{}] Analysis {} (poll {})", filename, status, attempt);
                    tokio::time::sleep(interval).await;
                }
            }
        }

        Err(Error::Analysis(format!(
            "[{}] Form Recognizer did not finish after {} polls",
            filename, self.config.max_polls
        )))
    }
}

#[async_trait]
impl DocumentAnalyzer for FormRecognizerClient {
    async fn analyze(&self, filename: &str, data: &[u8]) -> Result<AnalyzedDocument> {
        tracing::info!(
            "[{}] Sending {} bytes to Form Recognizer model {}",
            filename,
            data.len(),
            self.config.model_id
        );

        let operation_url = self.begin_analyze(filename, data).await?;
        let result = self.poll_result(filename, &operation_url).await?;
        let document = result.into_document();

        tracing::info!(
            "[{}] Form Recognizer returned {} pages and {} tables",
            filename,
            document.pages.len(),
            document.tables.len()
        );

        Ok(document)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!(
            "{}/formrecognizer/info?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.api_version
        );
        let response = self
            .client
            .get(url)
            .header("Ocp-Apim-Subscription-Key", &self.config.api_key)
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    fn name(&self) -> &str {
        "form-recognizer"
    }
}

// Form Recognizer wire types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOperation {
    status: String,
    analyze_result: Option<AnalyzeResult>,
    error: Option<OperationError>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResult {
    #[serde(default)]
    content: String,
    #[serde(default)]
    pages: Vec<WirePage>,
    #[serde(default)]
    tables: Vec<WireTable>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePage {
    page_number: u32,
    #[serde(default)]
    spans: Vec<Span>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTable {
    row_count: usize,
    column_count: usize,
    #[serde(default)]
    cells: Vec<WireCell>,
    #[serde(default)]
    bounding_regions: Vec<BoundingRegion>,
    #[serde(default)]
    spans: Vec<Span>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCell {
    #[serde(default)]
    kind: CellKind,
    row_index: usize,
    column_index: usize,
    row_span: Option<usize>,
    column_span: Option<usize>,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoundingRegion {
    page_number: u32,
}

impl AnalyzeResult {
    fn into_document(self) -> AnalyzedDocument {
        let pages = self
            .pages
            .into_iter()
            .map(|page| {
                let offset = page.spans.iter().map(|s| s.offset).min().unwrap_or(0);
                let end = page.spans.iter().map(Span::end).max().unwrap_or(offset);
                DocumentPage::new(page.page_number, offset, end - offset)
            })
            .collect();

        let tables = self
            .tables
            .into_iter()
            .map(|table| DocumentTable {
                row_count: table.row_count,
                col_count: table.column_count,
                page_number: table
                    .bounding_regions
                    .first()
                    .map(|region| region.page_number)
                    .unwrap_or(1),
                spans: table.spans,
                cells: table
                    .cells
                    .into_iter()
                    .map(|cell| {
                        TableCell::new(cell.row_index, cell.column_index, cell.content)
                            .with_kind(cell.kind)
                            .with_spans(cell.row_span.unwrap_or(1), cell.column_span.unwrap_or(1))
                    })
                    .collect(),
            })
            .collect();

        AnalyzedDocument {
            content: self.content,
            pages,
            tables,
        }
    }
}
