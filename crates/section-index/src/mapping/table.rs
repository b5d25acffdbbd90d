//! HTML rendering of analysed tables

use crate::error::{Error, Result};
use crate::types::{DocumentTable, TableCell};

/// Render a table grid as HTML
///
/// One `<tr>` is emitted per declared row, including rows without cells.
/// `table_id` only labels structure errors.
pub fn render_table(table_id: usize, table: &DocumentTable) -> Result<String> {
    let mut rows: Vec<Vec<&TableCell>> = vec![Vec::new(); table.row_count];

    for cell in &table.cells {
        if cell.row_index >= table.row_count {
            return Err(Error::table_structure(
                table_id,
                format!(
                    "cell row {} outside {} declared rows",
                    cell.row_index, table.row_count
                ),
            ));
        }
        if cell.col_index >= table.col_count {
            return Err(Error::table_structure(
                table_id,
                format!(
                    "cell column {} outside {} declared columns",
                    cell.col_index, table.col_count
                ),
            ));
        }
        rows[cell.row_index].push(cell);
    }

    let mut html = String::from("<table>");
    for mut row in rows {
        row.sort_by_key(|cell| cell.col_index);
        html.push_str("<tr>");
        for cell in row {
            render_cell(&mut html, cell);
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");

    Ok(html)
}

fn render_cell(html: &mut String, cell: &TableCell) {
    let tag = if cell.kind.is_header() { "th" } else { "td" };

    html.push('<');
    html.push_str(tag);
    if cell.col_span > 1 {
        html.push_str(&format!(" colSpan={}", cell.col_span));
    }
    if cell.row_span > 1 {
        html.push_str(&format!(" rowSpan={}", cell.row_span));
    }
    html.push('>');
    html.push_str(&escape_html(&cell.content));
    html.push_str("</");
    html.push_str(tag);
    html.push('>');
}

/// Escape text for embedding in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellKind;

    fn table(row_count: usize, col_count: usize, cells: Vec<TableCell>) -> DocumentTable {
        DocumentTable {
            row_count,
            col_count,
            page_number: 1,
            spans: vec![],
            cells,
        }
    }

    #[test]
    fn test_spanning_header() {
        let t = table(
            2,
            2,
            vec![
                TableCell::new(0, 0, "Quarter")
                    .with_kind(CellKind::ColumnHeader)
                    .with_spans(1, 2),
                TableCell::new(1, 0, "Q1"),
                TableCell::new(1, 1, "42"),
            ],
        );

        assert_eq!(
            render_table(0, &t).unwrap(),
            "<table><tr><th colSpan=2>Quarter</th></tr><tr><td>Q1</td><td>42</td></tr></table>"
        );
    }

    #[test]
    fn test_cells_sorted_by_column() {
        let t = table(
            1,
            3,
            vec![
                TableCell::new(0, 2, "c"),
                TableCell::new(0, 0, "a"),
                TableCell::new(0, 1, "b").with_kind(CellKind::RowHeader),
            ],
        );

        assert_eq!(
            render_table(0, &t).unwrap(),
            "<table><tr><td>a</td><th>b</th><td>c</td></tr></table>"
        );
    }

    #[test]
    fn test_empty_rows_keep_wrapper() {
        let t = table(3, 1, vec![TableCell::new(1, 0, "only")]);
        assert_eq!(
            render_table(0, &t).unwrap(),
            "<table><tr></tr><tr><td>only</td></tr><tr></tr></table>"
        );
    }

    #[test]
    fn test_both_spans_column_first() {
        let t = table(3, 3, vec![TableCell::new(0, 0, "x").with_spans(3, 2)]);
        assert_eq!(
            render_table(0, &t).unwrap(),
            "<table><tr><td colSpan=2 rowSpan=3>x</td></tr><tr></tr><tr></tr></table>"
        );
    }

    #[test]
    fn test_escapes_cell_text() {
        let t = table(1, 1, vec![TableCell::new(0, 0, "a < b & \"c\" > 'd'")]);
        assert_eq!(
            render_table(0, &t).unwrap(),
            "<table><tr><td>a &lt; b &amp; &quot;c&quot; &gt; &#x27;d&#x27;</td></tr></table>"
        );
    }

    #[test]
    fn test_row_outside_grid_is_error() {
        let t = table(2, 2, vec![TableCell::new(2, 0, "stray")]);
        let err = render_table(4, &t).unwrap_err();
        assert!(matches!(err, Error::TableStructure { table: 4, .. }));
    }

    #[test]
    fn test_column_outside_grid_is_error() {
        let t = table(1, 1, vec![TableCell::new(0, 1, "stray")]);
        assert!(render_table(0, &t).is_err());
    }

    #[test]
    fn test_deterministic() {
        let t = table(
            2,
            2,
            vec![
                TableCell::new(1, 1, "d"),
                TableCell::new(0, 0, "a"),
                TableCell::new(1, 0, "c"),
                TableCell::new(0, 1, "b"),
            ],
        );
        assert_eq!(render_table(0, &t).unwrap(), render_table(0, &t).unwrap());
    }
}
