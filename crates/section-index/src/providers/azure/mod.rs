//! Azure provider implementations
//!
//! - Form Recognizer for layout analysis of uploaded files
//! - Cognitive Search as the section index

mod form_recognizer;
mod search_index;

pub use form_recognizer::FormRecognizerClient;
pub use search_index::SearchIndexClient;
