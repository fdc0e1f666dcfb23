//! # pdf-text-dump
//!
//! Dump the text layer of a PDF, page by page, into one plain-text file.
//!
//! Every page becomes a block `"\n\n===== PAGE n =====\n{text}"`, in page
//! order, so a reader can see exactly what a PDF engine pulls out of each
//! page. Pages without a text layer (scans, images) keep their marker and an
//! empty body; their numbers are listed in [`ExtractionStats::empty_pages`].
//!
//! Text comes from PDFium via `pdfium-render`. The library is bound through
//! the `pdfium-auto` workspace crate, which downloads and caches it on first
//! use unless `PDFIUM_LIB_PATH` points at a local copy.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     validate path and %PDF header
//!  ├─ 2. Backend   open via pdfium, read each page's text layer
//!  ├─ 3. Assemble  "\n\n===== PAGE n =====\n" + text, in page order
//!  └─ 4. Output    atomic write + stats (pages, chars, empty pages)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_text_dump::{extract_to_file, ExtractionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stats = extract_to_file(
//!         "Assignment 1.pdf",
//!         "debug/assignment_requirements.txt",
//!         &ExtractionConfig::default(),
//!     )?;
//!     println!("{} pages, {} chars", stats.total_pages, stats.char_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2txt` binary (clap + anyhow + tracing-subscriber + indicatif + serde_json) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, PageMarker, PageSelection};
pub use error::ExtractError;
pub use extract::{
    extract_text, extract_text_with, extract_to_file, extract_to_file_with, inspect, inspect_with,
    page_count, page_count_with,
};
pub use output::{DocumentMetadata, ExtractionOutput, ExtractionStats, PageText};
pub use pipeline::backend::{MemoryBackend, PdfBackend, PdfSource, PdfiumBackend};
pub use pipeline::input::resolve_input;
pub use progress::{ExtractionProgressCallback, ProgressCallback};
