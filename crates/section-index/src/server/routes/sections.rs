//! Indexing of pre-analysed documents

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::AnalyzedDocument;

use super::files::UploadResponse;

/// Request body for indexing an analysis result
#[derive(Debug, Deserialize)]
pub struct SectionsRequest {
    pub filename: String,
    #[serde(default)]
    pub category: Option<String>,
    pub analysis: AnalyzedDocument,
}

/// POST /api/sections - Section and index an analysed document
pub async fn index_sections(
    State(state): State<AppState>,
    Json(request): Json<SectionsRequest>,
) -> Result<Json<UploadResponse>> {
    if request.filename.trim().is_empty() {
        return Err(Error::invalid_request("filename must not be empty"));
    }

    let report = state
        .indexer()
        .index_analysis(&request.filename, &request.analysis, request.category.as_deref())
        .await?;

    Ok(Json(UploadResponse::new(request.filename, report)))
}
