//! Provenance tagging: record ids and source page/file citations

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::types::{IndexRecord, RawSection};

static INVALID_KEY_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9a-zA-Z_-]").expect("valid key pattern"));

/// Index key for the `index`-th section of `filename`
pub fn section_id(filename: &str, index: usize) -> String {
    INVALID_KEY_CHARS
        .replace_all(&format!("{}-{}", filename, index), "_")
        .into_owned()
}

/// Citation name for a page of `filename`
///
/// PDFs cite one page ("report-3.pdf"); every other file cites the file as a whole.
pub fn source_page(filename: &str, page_number: u32) -> String {
    let path = Path::new(filename);
    let is_pdf = path
        .extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    if is_pdf {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}-{}.pdf", stem, page_number)
    } else {
        path.file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.to_string())
    }
}

/// Attaches ids and provenance to a stream of sections
pub struct ProvenanceTagger<I> {
    sections: I,
    filename: String,
    category: Option<String>,
    index: usize,
}

impl<I> ProvenanceTagger<I>
where
    I: Iterator<Item = RawSection>,
{
    pub fn new(sections: I, filename: impl Into<String>, category: Option<String>) -> Self {
        Self {
            sections,
            filename: filename.into(),
            category,
            index: 0,
        }
    }
}

impl<I> Iterator for ProvenanceTagger<I>
where
    I: Iterator<Item = RawSection>,
{
    type Item = IndexRecord;

    fn next(&mut self) -> Option<IndexRecord> {
        let section = self.sections.next()?;
        let record = IndexRecord {
            id: section_id(&self.filename, self.index),
            content: section.text,
            category: self.category.clone(),
            sourcepage: source_page(&self.filename, section.page_number),
            sourcefile: self.filename.clone(),
        };
        self.index += 1;
        Some(record)
    }
}

/// Tag sections of `filename` with ids and citations
pub fn tag_sections<I>(sections: I, filename: &str, category: Option<&str>) -> ProvenanceTagger<I::IntoIter>
where
    I: IntoIterator<Item = RawSection>,
{
    ProvenanceTagger::new(sections.into_iter(), filename, category.map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str, page_number: u32) -> RawSection {
        RawSection {
            text: text.to_string(),
            page_number,
            start: 0,
            end: text.chars().count(),
        }
    }

    #[test]
    fn test_pdf_source_page() {
        assert_eq!(source_page("report.pdf", 3), "report-3.pdf");
        assert_eq!(source_page("Report.PDF", 1), "Report-1.pdf");
        assert_eq!(source_page("uploads/2024/report.pdf", 7), "report-7.pdf");
    }

    #[test]
    fn test_non_pdf_source_page_ignores_page() {
        assert_eq!(source_page("notes.docx", 3), "notes.docx");
        assert_eq!(source_page("notes.docx", 9), "notes.docx");
        assert_eq!(source_page("dir/readme", 2), "readme");
        assert_eq!(source_page("report.pdf.txt", 2), "report.pdf.txt");
    }

    #[test]
    fn test_section_id_sanitized() {
        assert_eq!(section_id("report.pdf", 0), "report_pdf-0");
        assert_eq!(section_id("my file (v2).pdf", 12), "my_file__v2__pdf-12");
        assert_eq!(section_id("résumé.pdf", 1), "r_sum__pdf-1");
        assert_eq!(section_id("already_ok-name", 3), "already_ok-name-3");
    }

    #[test]
    fn test_tagger_numbers_sections_in_order() {
        let sections = vec![raw("first", 1), raw("second", 2), raw("third", 2)];
        let records: Vec<IndexRecord> =
            tag_sections(sections, "guide.pdf", Some("manuals")).collect();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, "guide_pdf-0");
        assert_eq!(records[2].id, "guide_pdf-2");
        assert_eq!(records[1].sourcepage, "guide-2.pdf");
        assert_eq!(records[1].content, "second");
        assert!(records.iter().all(|r| r.sourcefile == "guide.pdf"));
        assert!(records.iter().all(|r| r.category.as_deref() == Some("manuals")));
    }

    #[test]
    fn test_tagger_without_category() {
        let records: Vec<IndexRecord> = tag_sections(vec![raw("x", 4)], "a.txt", None).collect();
        assert_eq!(records[0].category, None);
        assert_eq!(records[0].sourcepage, "a.txt");
    }

    #[test]
    fn test_record_serializes_index_fields() {
        let record = tag_sections(vec![raw("body", 1)], "f.pdf", None).next().unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "f_pdf-0",
                "content": "body",
                "category": null,
                "sourcepage": "f-1.pdf",
                "sourcefile": "f.pdf",
            })
        );
    }
}
