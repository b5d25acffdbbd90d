//! Boundary-aware section splitting and provenance tagging

mod boundary;
mod provenance;
mod splitter;

pub use boundary::{
    find_section_end, find_section_start, is_sentence_end, is_word_break, Boundary, BoundaryKind,
    SENTENCE_ENDINGS, WORD_BREAKS,
};
pub use provenance::{section_id, source_page, tag_sections, ProvenanceTagger};
pub use splitter::{split_sections, Sectionizer};
