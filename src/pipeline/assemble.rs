//! Join per-page text into the final dump.
//!
//! Each page becomes `"\n\n" + marker + "\n" + text`, in page order. The
//! text is copied verbatim: no trimming, no whitespace normalisation. An
//! empty page still gets its marker followed by a newline, so a reader can
//! see that the page exists and produced nothing.

use crate::config::PageMarker;
use crate::output::PageText;

/// Assemble the dump for `pages`, which must already be in page order.
pub fn assemble_document(pages: &[PageText], marker: &PageMarker) -> String {
    let capacity = pages.iter().map(|p| p.text.len() + 32).sum();
    let mut out = String::with_capacity(capacity);
    for page in pages {
        out.push_str("\n\n");
        out.push_str(&marker.render(page.page_num));
        out.push('\n');
        out.push_str(&page.text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<PageText> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| PageText::new(i + 1, t.to_string()))
            .collect()
    }

    #[test]
    fn blocks_use_dump_framing() {
        let out = assemble_document(&pages(&["Alpha", "Beta"]), &PageMarker::Banner);
        assert_eq!(
            out,
            "\n\n===== PAGE 1 =====\nAlpha\n\n===== PAGE 2 =====\nBeta"
        );
    }

    #[test]
    fn empty_page_keeps_its_marker() {
        let out = assemble_document(&pages(&["a", "", "c"]), &PageMarker::Banner);
        assert_eq!(
            out,
            "\n\n===== PAGE 1 =====\na\n\n===== PAGE 2 =====\n\n\n===== PAGE 3 =====\nc"
        );
        assert_eq!(out.matches("===== PAGE ").count(), 3);
    }

    #[test]
    fn no_pages_is_empty_string() {
        assert_eq!(assemble_document(&[], &PageMarker::Banner), "");
    }

    #[test]
    fn markers_follow_real_page_numbers() {
        let selected = vec![
            PageText::new(4, "four".into()),
            PageText::new(9, "nine".into()),
        ];
        let out = assemble_document(&selected, &PageMarker::Custom("[p{n}]".into()));
        assert_eq!(out, "\n\n[p4]\nfour\n\n[p9]\nnine");
    }

    #[test]
    fn text_is_not_normalised() {
        let raw = "  line one  \r\n\tline two\u{00a0}\n\n";
        let out = assemble_document(&pages(&[raw]), &PageMarker::Banner);
        assert!(out.ends_with(raw));
    }
}
