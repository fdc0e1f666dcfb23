//! Result types produced by an extraction run.

use serde::{Deserialize, Serialize};

/// Text of one page, exactly as the PDF engine returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Extracted text; empty when the page has no text layer.
    pub text: String,
    /// Number of Unicode scalar values in `text`.
    pub char_count: usize,
}

impl PageText {
    pub fn new(page_num: usize, text: String) -> Self {
        let char_count = text.chars().count();
        Self {
            page_num,
            text,
            char_count,
        }
    }

    /// `true` when the engine found nothing to extract (scanned or image-only page).
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Document-level information read when the PDF is opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

/// Counters describing one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages that were walked (equals `total_pages` unless a selection was set).
    pub extracted_pages: usize,
    /// 1-indexed numbers of extracted pages that produced no text.
    pub empty_pages: Vec<usize>,
    /// Characters in the assembled output, markers included.
    pub char_count: usize,
    pub duration_ms: u64,
}

/// Everything one extraction run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// The assembled dump: one marker block per extracted page.
    pub text: String,
    pub pages: Vec<PageText>,
    pub metadata: DocumentMetadata,
    pub stats: ExtractionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_count_is_unicode_aware() {
        let p = PageText::new(1, "ශ්‍රී ලංකා".to_string());
        assert_eq!(p.char_count, "ශ්‍රී ලංකා".chars().count());
        assert!(p.char_count < p.text.len());
    }

    #[test]
    fn empty_page_is_flagged() {
        assert!(PageText::new(2, String::new()).is_empty());
        assert!(!PageText::new(3, " ".into()).is_empty());
    }
}
