//! Forward and backward boundary scans used to cut sections

use crate::config::SectioningConfig;

/// Characters that end a sentence
pub const SENTENCE_ENDINGS: [char; 3] = ['.', '!', '?'];

/// Characters a section may be cut after when no sentence end is near
pub const WORD_BREAKS: [char; 12] = [
    ',', ';', ':', ' ', '(', ')', '[', ']', '{', '}', '\t', '\n',
];

pub fn is_sentence_end(c: char) -> bool {
    SENTENCE_ENDINGS.contains(&c)
}

pub fn is_word_break(c: char) -> bool {
    WORD_BREAKS.contains(&c)
}

/// Why a boundary landed where it did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// At a sentence terminator
    SentenceEnd,
    /// At a word-break character
    WordBreak,
    /// No break found inside the search window
    HardLimit,
    /// The text ran out first
    EndOfText,
}

/// A cut position in the linear text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub index: usize,
    pub kind: BoundaryKind,
}

/// Find the exclusive end of the section beginning at `start`
///
/// Looks up to `sentence_search_limit` characters past
/// `start + max_section_length` for a sentence end, falling back to the last
/// word break seen. The returned index is one past the cut character unless
/// the cut is at the end of the text.
pub fn find_section_end(text: &[char], start: usize, config: &SectioningConfig) -> Boundary {
    let length = text.len();
    let mut end = start + config.max_section_length;

    if end > length {
        return Boundary {
            index: length,
            kind: BoundaryKind::EndOfText,
        };
    }

    let mut last_word = None;
    while end < length
        && (end - start - config.max_section_length) < config.sentence_search_limit
        && !is_sentence_end(text[end])
    {
        if is_word_break(text[end]) {
            last_word = Some(end);
        }
        end += 1;
    }

    let kind = if end < length && is_sentence_end(text[end]) {
        BoundaryKind::SentenceEnd
    } else if let (true, Some(word)) = (end < length, last_word) {
        end = word;
        BoundaryKind::WordBreak
    } else if end < length {
        BoundaryKind::HardLimit
    } else {
        BoundaryKind::EndOfText
    };

    if end < length {
        end += 1;
    }

    Boundary { index: end, kind }
}

/// Move a section's start back to a sentence or word boundary
///
/// Walks backward from `start` no further than
/// `end - max_section_length - 2 * sentence_search_limit`, where `end` is the
/// section's already-computed end. The result is one past the boundary
/// character unless it is the start of the text.
pub fn find_section_start(
    text: &[char],
    start: usize,
    end: usize,
    config: &SectioningConfig,
) -> Boundary {
    let floor = end.saturating_sub(config.max_section_length + 2 * config.sentence_search_limit);
    let mut start = start;
    let mut last_word = None;

    while start > 0 && start > floor && !is_sentence_end(text[start]) {
        if is_word_break(text[start]) {
            last_word = Some(start);
        }
        start -= 1;
    }

    let kind = if is_sentence_end(text[start]) {
        BoundaryKind::SentenceEnd
    } else if let Some(word) = last_word {
        start = word;
        BoundaryKind::WordBreak
    } else if start == 0 {
        BoundaryKind::EndOfText
    } else {
        BoundaryKind::HardLimit
    };

    if start > 0 {
        start += 1;
    }

    Boundary { index: start, kind }
}
