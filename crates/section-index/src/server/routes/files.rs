//! File upload and removal endpoints

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::IndexReport;

/// Result of indexing one file
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Stored file name
    pub uploaded: String,
    /// Sections submitted to the index
    pub sections: usize,
    /// Sections the index accepted
    pub succeeded: usize,
    pub failed_ids: Vec<String>,
}

impl UploadResponse {
    pub fn new(filename: impl Into<String>, report: IndexReport) -> Self {
        Self {
            uploaded: filename.into(),
            sections: report.submitted,
            succeeded: report.succeeded,
            failed_ids: report.failed_ids,
        }
    }
}

/// POST /api/file/upload - Analyze and index one file
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut category: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidRequest(format!("Failed to read multipart field: {}", e)))?
    {
        match field.name().unwrap_or("") {
            "file" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| Error::invalid_request("file field has no file name"))?;
                let data = field.bytes().await.map_err(|e| {
                    Error::InvalidRequest(format!("Failed to read {}: {}", filename, e))
                })?;
                file = Some((filename, data.to_vec()));
            }
            "category" => {
                let value = field.text().await.map_err(|e| {
                    Error::InvalidRequest(format!("Failed to read category: {}", e))
                })?;
                if !value.trim().is_empty() {
                    category = Some(value.trim().to_string());
                }
            }
            other => tracing::debug!("Ignoring multipart field '{}'", other),
        }
    }

    let (filename, data) = file.ok_or_else(|| Error::invalid_request("no file uploaded"))?;
    tracing::info!("[{}] Received upload ({} bytes)", filename, data.len());

    let report = state
        .indexer()
        .index_document(&filename, &data, category.as_deref())
        .await?;

    Ok(Json(UploadResponse::new(filename, report)))
}

/// Query parameters for file removal
#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    /// File whose sections are removed; omitted clears the whole index
    pub filename: Option<String>,
}

/// Result of removing sections
#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveResponse {
    pub removed: Option<String>,
    pub sections: usize,
}

/// POST /api/file/remove[?filename=] - Remove a file's sections, or all sections
pub async fn remove_file(
    State(state): State<AppState>,
    Query(params): Query<RemoveQuery>,
) -> Result<Json<RemoveResponse>> {
    let sections = match params.filename.as_deref() {
        Some(filename) if filename.trim().is_empty() => {
            return Err(Error::invalid_request("filename must not be empty"));
        }
        Some(filename) => state.indexer().remove_file(filename).await?,
        None => state.indexer().remove_all().await?,
    };

    Ok(Json(RemoveResponse {
        removed: params.filename,
        sections,
    }))
}
