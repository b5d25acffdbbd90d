//! Core types for the section indexer

pub mod analysis;
pub mod section;

pub use analysis::{AnalyzedDocument, CellKind, DocumentPage, DocumentTable, Span, TableCell};
pub use section::{IndexRecord, IndexReport, PageMapEntry, RawSection, SubmitOutcome};
