//! API routes for the indexing server

pub mod files;
pub mod sections;

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/file/upload",
            post(files::upload_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/file/remove", post(files::remove_file))
        .route(
            "/sections",
            post(sections::index_sections).layer(DefaultBodyLimit::max(max_upload_size)),
        )
}
