//! Document analyzer trait for turning raw file bytes into pages and tables

use async_trait::async_trait;

use crate::error::Result;
use crate::types::AnalyzedDocument;

/// Trait for layout analysis of uploaded documents
///
/// Implementations:
/// - `FormRecognizerClient`: Azure Form Recognizer `prebuilt-layout`
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Analyze raw file bytes
    ///
    /// `filename` is used for logging only.
    async fn analyze(&self, filename: &str, data: &[u8]) -> Result<AnalyzedDocument>;

    /// Check if the analyzer is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get analyzer name for logging
    fn name(&self) -> &str;
}
