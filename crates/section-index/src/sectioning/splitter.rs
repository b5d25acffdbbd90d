//! Overlapping section splitter over a page map's linear text

use crate::config::SectioningConfig;
use crate::mapping::PageMap;
use crate::types::RawSection;

use super::boundary::{find_section_end, find_section_start};

const TABLE_OPEN: &str = "<table";
const TABLE_CLOSE: &str = "</table";

/// Lazy, single-pass iterator of sections over a page map
///
/// Each section's end is cut at a sentence or word boundary near
/// `max_section_length`; its start is then pulled back to a boundary using
/// that end, so consecutive sections share roughly `section_overlap`
/// characters. A section that ends inside an unclosed table makes the next
/// section restart at the table's opening tag.
pub struct Sectionizer<'a> {
    page_map: &'a PageMap,
    config: SectioningConfig,
    start: usize,
    end: usize,
    finished: bool,
}

impl<'a> Sectionizer<'a> {
    /// `config` is expected to have passed [`SectioningConfig::validate`]
    pub fn new(page_map: &'a PageMap, config: SectioningConfig) -> Self {
        Self {
            page_map,
            config,
            start: 0,
            end: page_map.len(),
            finished: false,
        }
    }

    fn section(&self, start: usize, end: usize) -> RawSection {
        let text = &self.page_map.chars()[start..end];
        RawSection {
            text: text.iter().collect(),
            page_number: self.page_map.page_of(start).unwrap_or_default(),
            start,
            end,
        }
    }

    /// Cursor for the section after `[start, end)`
    fn next_start(&self, loop_start: usize, start: usize, end: usize) -> usize {
        let overlap_start = end.saturating_sub(self.config.section_overlap);
        let section = &self.page_map.chars()[start..end];

        let last_open = rfind_chars(section, TABLE_OPEN);
        let last_close = rfind_chars(section, TABLE_CLOSE);

        match last_open {
            Some(open)
                if open > 2 * self.config.sentence_search_limit
                    && last_close.map_or(true, |close| open > close) =>
            {
                let restart = overlap_start.min(start + open);
                if restart > loop_start {
                    restart
                } else {
                    // would loop on the same table forever
                    tracing::warn!(
                        "Unclosed table at offset {} cannot anchor the next section, using overlap",
                        start + open
                    );
                    overlap_start
                }
            }
            _ => overlap_start,
        }
    }
}

impl Iterator for Sectionizer<'_> {
    type Item = RawSection;

    fn next(&mut self) -> Option<RawSection> {
        if self.finished {
            return None;
        }

        let length = self.page_map.len();
        let overlap = self.config.section_overlap;

        if self.start + overlap < length {
            let text = self.page_map.chars();
            let loop_start = self.start;

            let end = find_section_end(text, loop_start, &self.config).index;
            let start = find_section_start(text, loop_start, end, &self.config).index;

            let section = self.section(start, end);
            self.start = self.next_start(loop_start, start, end);
            self.end = end;
            return Some(section);
        }

        self.finished = true;
        if self.start + overlap < self.end {
            return Some(self.section(self.start, self.end));
        }
        None
    }
}

/// Char index of the last occurrence of `needle` in `haystack`
fn rfind_chars(haystack: &[char], needle: &str) -> Option<usize> {
    let needle: Vec<char> = needle.chars().collect();
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .rposition(|window| window == needle.as_slice())
}

/// Split a page map into sections
pub fn split_sections(page_map: &PageMap, config: SectioningConfig) -> Sectionizer<'_> {
    Sectionizer::new(page_map, config)
}
