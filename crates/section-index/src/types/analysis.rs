//! Document analysis output: pages, tables and cells over one content string
//!
//! Offsets and lengths count `char`s of [`AnalyzedDocument::content`].

use serde::{Deserialize, Serialize};

/// A contiguous run of the content string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Absolute start offset
    pub offset: usize,
    /// Number of characters
    pub length: usize,
}

impl Span {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Exclusive end offset, saturating at `usize::MAX`
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }
}

/// One page of analysed content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPage {
    /// Page number as reported by the analyser (1-indexed)
    pub page_number: u32,
    /// Absolute start offset of the page text
    pub offset: usize,
    /// Number of characters on the page
    pub length: usize,
}

impl DocumentPage {
    pub fn new(page_number: u32, offset: usize, length: usize) -> Self {
        Self {
            page_number,
            offset,
            length,
        }
    }
}

/// Role of a table cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellKind {
    /// Column header
    ColumnHeader,
    /// Row header
    RowHeader,
    /// Regular content cell; unknown wire kinds land here
    #[default]
    #[serde(other)]
    Data,
}

impl CellKind {
    /// Header cells render as `<th>`
    pub fn is_header(&self) -> bool {
        matches!(self, Self::ColumnHeader | Self::RowHeader)
    }
}

/// One cell of a table grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    pub row_index: usize,
    pub col_index: usize,
    #[serde(default = "default_span")]
    pub row_span: usize,
    #[serde(default = "default_span")]
    pub col_span: usize,
    #[serde(default)]
    pub kind: CellKind,
    /// Cell text
    #[serde(default)]
    pub content: String,
}

fn default_span() -> usize {
    1
}

impl TableCell {
    /// Create a single-span data cell
    pub fn new(row_index: usize, col_index: usize, content: impl Into<String>) -> Self {
        Self {
            row_index,
            col_index,
            row_span: 1,
            col_span: 1,
            kind: CellKind::Data,
            content: content.into(),
        }
    }

    /// Set the cell kind
    pub fn with_kind(mut self, kind: CellKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set row and column spans
    pub fn with_spans(mut self, row_span: usize, col_span: usize) -> Self {
        self.row_span = row_span;
        self.col_span = col_span;
        self
    }
}

/// A table extracted by the analyser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTable {
    pub row_count: usize,
    pub col_count: usize,
    /// Page the table's bounding region lies on
    pub page_number: u32,
    /// Character runs the table occupies in the content string
    #[serde(default)]
    pub spans: Vec<Span>,
    #[serde(default)]
    pub cells: Vec<TableCell>,
}

/// Full analyser output for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedDocument {
    /// Raw text of every page, concatenated
    pub content: String,
    #[serde(default)]
    pub pages: Vec<DocumentPage>,
    #[serde(default)]
    pub tables: Vec<DocumentTable>,
}

impl AnalyzedDocument {
    /// Tables whose bounding region lies on `page_number`, with their document index
    pub fn tables_on_page(&self, page_number: u32) -> impl Iterator<Item = (usize, &DocumentTable)> {
        self.tables
            .iter()
            .enumerate()
            .filter(move |(_, table)| table.page_number == page_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_kind_wire_names() {
        let kind: CellKind = serde_json::from_str("\"columnHeader\"").unwrap();
        assert_eq!(kind, CellKind::ColumnHeader);
        let kind: CellKind = serde_json::from_str("\"rowHeader\"").unwrap();
        assert!(kind.is_header());
        let kind: CellKind = serde_json::from_str("\"stubHead\"").unwrap();
        assert_eq!(kind, CellKind::Data);
    }

    #[test]
    fn test_unknown_cell_kinds_are_data() {
        let cell: TableCell = serde_json::from_str(
            r#"{"row_index": 0, "col_index": 0, "kind": "description", "content": "x"}"#,
        )
        .unwrap();
        assert_eq!(cell.kind, CellKind::Data);
        assert!(!cell.kind.is_header());
        assert_eq!(serde_json::to_string(&CellKind::Data).unwrap(), "\"data\"");
    }

    #[test]
    fn test_span_end_saturates() {
        assert_eq!(Span::new(3, 4).end(), 7);
        assert_eq!(Span::new(usize::MAX - 1, 10).end(), usize::MAX);
    }

    #[test]
    fn test_cell_defaults() {
        let cell: TableCell =
            serde_json::from_str(r#"{"row_index": 1, "col_index": 0, "content": "x"}"#).unwrap();
        assert_eq!(cell.row_span, 1);
        assert_eq!(cell.col_span, 1);
        assert_eq!(cell.kind, CellKind::Data);
    }

    #[test]
    fn test_tables_on_page() {
        let table = |page| DocumentTable {
            row_count: 1,
            col_count: 1,
            page_number: page,
            spans: vec![],
            cells: vec![],
        };
        let doc = AnalyzedDocument {
            content: String::new(),
            pages: vec![],
            tables: vec![table(1), table(2), table(1)],
        };
        let ids: Vec<usize> = doc.tables_on_page(1).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 2]);
    }
}
