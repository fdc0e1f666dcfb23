//! Configuration types for text extraction.
//!
//! Every knob lives in [`ExtractionConfig`], built through
//! [`ExtractionConfigBuilder`]. The defaults reproduce the plain dump: all
//! pages, `===== PAGE n =====` markers, no password.

use crate::error::ExtractError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder replaced by the 1-based page number in a custom marker.
pub const PAGE_NUMBER_PLACEHOLDER: &str = "{n}";

/// Configuration for one extraction run.
///
/// # Example
/// ```rust
/// use pdf_text_dump::{ExtractionConfig, PageMarker, PageSelection};
///
/// let config = ExtractionConfig::builder()
///     .pages(PageSelection::Range(1, 3))
///     .marker(PageMarker::Custom("--- page {n} ---".into()))
///     .build()
///     .unwrap();
/// assert_eq!(config.marker.render(2), "--- page 2 ---");
/// ```
#[derive(Clone, Default)]
pub struct ExtractionConfig {
    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Page selection. Default: all pages.
    pub pages: PageSelection,

    /// Marker written before each page's text. Default: [`PageMarker::Banner`].
    pub marker: PageMarker,

    /// Receives per-page events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pages", &self.pages)
            .field("marker", &self.marker)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn marker(mut self, marker: PageMarker) -> Self {
        self.config.marker = marker;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        match &c.pages {
            PageSelection::Range(start, end) if start > end => {
                return Err(ExtractError::InvalidConfig(format!(
                    "page range {start}-{end} is reversed"
                )));
            }
            PageSelection::Set(pages) if pages.is_empty() => {
                return Err(ExtractError::InvalidConfig(
                    "page set must name at least one page".into(),
                ));
            }
            _ => {}
        }
        if let PageMarker::Custom(template) = &c.marker {
            if !template.contains(PAGE_NUMBER_PLACEHOLDER) {
                return Err(ExtractError::InvalidConfig(format!(
                    "custom marker {template:?} must contain {PAGE_NUMBER_PLACEHOLDER}"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Specifies which pages of the PDF to extract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Extract all pages (default).
    #[default]
    All,
    /// Extract a single page (1-indexed).
    Single(usize),
    /// Extract a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Extract specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    ///
    /// Pages outside `1..=total_pages` are dropped.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if (1..=total_pages).contains(p) {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// First page the selection asks for, used when reporting an empty match.
    pub fn first_requested(&self) -> usize {
        match self {
            PageSelection::All => 1,
            PageSelection::Single(p) => *p,
            PageSelection::Range(start, _) => *start,
            PageSelection::Set(pages) => pages.iter().copied().min().unwrap_or(0),
        }
    }
}

/// The line written in front of each page's text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageMarker {
    /// `===== PAGE n =====` (default).
    #[default]
    Banner,
    /// Custom template; every `{n}` becomes the page number.
    Custom(String),
}

impl PageMarker {
    /// Render the marker for a 1-indexed page number.
    pub fn render(&self, page_num: usize) -> String {
        match self {
            PageMarker::Banner => format!("===== PAGE {page_num} ====="),
            PageMarker::Custom(template) => {
                template.replace(PAGE_NUMBER_PLACEHOLDER, &page_num.to_string())
            }
        }
    }
}
