//! Batched submission and the end-to-end document pipeline

mod batch;
mod pipeline;

pub use batch::BatchIndexer;
pub use pipeline::DocumentIndexer;
