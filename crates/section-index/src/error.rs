//! Error types for the section indexer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for indexing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Section indexer errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document analysis service error
    #[error("Document analysis failed: {0}")]
    Analysis(String),

    /// Table cells disagree with the declared grid
    #[error("Inconsistent table structure in table {table}: {message}")]
    TableStructure { table: usize, message: String },

    /// Indexing sink error
    #[error("Index sink error: {0}")]
    Sink(String),

    /// Malformed client request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an analysis error
    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis(message.into())
    }

    /// Create a table structure error
    pub fn table_structure(table: usize, message: impl Into<String>) -> Self {
        Self::TableStructure {
            table,
            message: message.into(),
        }
    }

    /// Create a sink error
    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink(message.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::Analysis(msg) => (StatusCode::BAD_GATEWAY, "analysis_error", msg.clone()),
            Error::TableStructure { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "table_structure_error",
                self.to_string(),
            ),
            Error::Sink(msg) => (StatusCode::BAD_GATEWAY, "sink_error", msg.clone()),
            Error::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Toml(err) => (StatusCode::BAD_REQUEST, "config_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_structure_message() {
        let err = Error::table_structure(2, "cell row 5 outside 3 rows");
        assert_eq!(
            err.to_string(),
            "Inconsistent table structure in table 2: cell row 5 outside 3 rows"
        );
    }

    #[test]
    fn test_status_mapping() {
        let response = Error::config("bad").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = Error::sink("down").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
