//! section-index: turns document-analysis output into overlapping, provenance-tagged
//! sections and bulk-loads them into a search index
//!
//! Pages and tables from a layout analysis are flattened into one linear text
//! with tables rendered as HTML, split into sections at sentence or word
//! boundaries, tagged with citation names, and submitted in batches.

pub mod config;
pub mod error;
pub mod indexing;
pub mod mapping;
pub mod providers;
pub mod sectioning;
pub mod server;
pub mod types;

pub use config::IndexerConfig;
pub use error::{Error, Result};
pub use indexing::{BatchIndexer, DocumentIndexer};
pub use mapping::{build_page_map, PageMap};
pub use sectioning::{split_sections, tag_sections};
pub use types::{AnalyzedDocument, IndexRecord, IndexReport, RawSection};
