//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`]. The CLI
//! uses it to drive its progress bar; library users can forward events to a
//! log, a channel, or nothing at all.
//!
//! # Example
//!
//! ```rust
//! use pdf_text_dump::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CharCounter(AtomicUsize);
//!
//! impl ExtractionProgressCallback for CharCounter {
//!     fn on_page_extracted(&self, _page_num: usize, _total_pages: usize, char_count: usize) {
//!         self.0.fetch_add(char_count, Ordering::SeqCst);
//!     }
//! }
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(Arc::new(CharCounter(AtomicUsize::new(0))))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the extractor as it walks the document.
///
/// Extraction is sequential, so events arrive in page order. All methods
/// default to no-ops.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once after the document is opened, before the first page.
    ///
    /// `total_pages` is the number of pages that will be extracted.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after each page's text has been read.
    ///
    /// `char_count` is 0 for a page without a text layer.
    fn on_page_extracted(&self, page_num: usize, total_pages: usize, char_count: usize) {
        let _ = (page_num, total_pages, char_count);
    }

    /// Called once after the last page.
    fn on_extraction_complete(&self, total_pages: usize, empty_pages: usize) {
        let _ = (total_pages, empty_pages);
    }
}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl ExtractionProgressCallback for Recorder {
        fn on_extraction_start(&self, total_pages: usize) {
            self.events.lock().unwrap().push(format!("start {total_pages}"));
        }

        fn on_page_extracted(&self, page_num: usize, total_pages: usize, char_count: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("page {page_num}/{total_pages} {char_count}"));
        }
    }

    struct Silent;
    impl ExtractionProgressCallback for Silent {}

    #[test]
    fn overridden_methods_fire_and_defaults_are_noops() {
        let rec = Recorder::default();
        rec.on_extraction_start(2);
        rec.on_page_extracted(1, 2, 40);
        rec.on_extraction_complete(2, 0);
        assert_eq!(*rec.events.lock().unwrap(), vec!["start 2", "page 1/2 40"]);

        let silent: ProgressCallback = Arc::new(Silent);
        silent.on_extraction_start(1);
        silent.on_page_extracted(1, 1, 0);
        silent.on_extraction_complete(1, 1);
    }
}
