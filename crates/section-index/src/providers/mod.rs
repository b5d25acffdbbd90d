//! Provider abstractions for document analysis and index sinks
//!
//! Trait-based seams so the pipeline can run against Azure services or
//! against in-process implementations.

pub mod analyzer;
pub mod azure;
pub mod memory;
pub mod sink;

pub use analyzer::DocumentAnalyzer;
pub use memory::InMemorySink;
pub use sink::IndexSink;
