//! Page mapping: splices rendered tables into page text with offset tracking

use crate::error::Result;
use crate::types::{AnalyzedDocument, DocumentTable, PageMapEntry};

use super::table::render_table;

/// Linear text of a document plus the page each range came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMap {
    entries: Vec<PageMapEntry>,
    chars: Vec<char>,
}

impl PageMap {
    /// Build from already-rendered entries
    ///
    /// Entry offsets are recomputed so they stay cumulative.
    pub fn from_entries(entries: Vec<PageMapEntry>) -> Self {
        let mut chars = Vec::new();
        let entries = entries
            .into_iter()
            .map(|mut entry| {
                entry.offset = chars.len();
                chars.extend(entry.text.chars());
                entry
            })
            .collect();
        Self { entries, chars }
    }

    /// Offset-ordered page entries
    pub fn entries(&self) -> &[PageMapEntry] {
        &self.entries
    }

    /// Linear text as characters
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Linear text (concatenation of every entry)
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Length of the linear text in characters
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Page number of the entry whose range contains `offset`
    ///
    /// Offsets past the last entry resolve to the last page; an empty map has no pages.
    pub fn page_of(&self, offset: usize) -> Option<u32> {
        let idx = self.entries.partition_point(|entry| entry.offset <= offset);
        let entry = if idx == 0 {
            self.entries.last()
        } else {
            self.entries.get(idx - 1)
        };
        entry.map(|e| e.page_number)
    }
}

/// Build the page map for an analysed document
///
/// Table characters are replaced by the table's HTML, emitted once at the
/// first character the table claims. Each page ends with a single space.
pub fn build_page_map(doc: &AnalyzedDocument) -> Result<PageMap> {
    let content: Vec<char> = doc.content.chars().collect();
    let mut entries = Vec::with_capacity(doc.pages.len());
    let mut offset = 0usize;

    for page in &doc.pages {
        let available = content.len().saturating_sub(page.offset);
        let page_len = page.length.min(available);
        if page_len < page.length {
            tracing::warn!(
                "Page {} span [{}, {}) runs past content end {}, truncating",
                page.page_number,
                page.offset,
                page.offset.saturating_add(page.length),
                content.len()
            );
        }

        let tables: Vec<(usize, &DocumentTable)> = doc.tables_on_page(page.page_number).collect();
        let claimed = claim_table_chars(page.page_number, page.offset, page_len, &tables);

        let mut text = String::with_capacity(page_len + 1);
        let mut emitted = vec![false; tables.len()];
        for (idx, claim) in claimed.iter().enumerate() {
            match *claim {
                None => text.push(content[page.offset + idx]),
                Some(local) if !emitted[local] => {
                    let (table_id, table) = tables[local];
                    text.push_str(&render_table(table_id, table)?);
                    emitted[local] = true;
                }
                Some(_) => {}
            }
        }
        text.push(' ');

        let text_len = text.chars().count();
        entries.push(PageMapEntry {
            page_number: page.page_number,
            offset,
            text,
        });
        offset += text_len;
    }

    Ok(PageMap::from_entries(entries))
}

/// Per-character owner table (index into `tables`) for one page
///
/// Span parts outside the page are dropped. Later tables win on overlap.
fn claim_table_chars(
    page_number: u32,
    page_offset: usize,
    page_len: usize,
    tables: &[(usize, &DocumentTable)],
) -> Vec<Option<usize>> {
    let mut claimed = vec![None; page_len];
    let page_end = page_offset + page_len;

    for (local, (table_id, table)) in tables.iter().enumerate() {
        for span in &table.spans {
            let lo = span.offset.max(page_offset);
            let hi = span.end().min(page_end);
            if lo >= hi {
                tracing::debug!(
                    "Table {} span [{}, {}) lies outside page {}, ignoring",
                    table_id,
                    span.offset,
                    span.end(),
                    page_number
                );
                continue;
            }
            if lo != span.offset || hi != span.end() {
                tracing::debug!(
                    "Table {} span [{}, {}) clamped to page {} bounds",
                    table_id,
                    span.offset,
                    span.end(),
                    page_number
                );
            }
            for slot in &mut claimed[lo - page_offset..hi - page_offset] {
                *slot = Some(local);
            }
        }
    }

    claimed
}
