//! Extraction entry points.
//!
//! Every function comes in two flavours: a convenience one that binds
//! PDFium itself, and a `*_with` variant that takes any [`PdfBackend`], so
//! callers can reuse one bound engine for several calls (the CLI does) or
//! swap in [`crate::MemoryBackend`].

use crate::config::{ExtractionConfig, PageSelection};
use crate::error::ExtractError;
use crate::output::{DocumentMetadata, ExtractionOutput, ExtractionStats, PageText};
use crate::pipeline::assemble::assemble_document;
use crate::pipeline::backend::{PdfBackend, PdfiumBackend};
use crate::pipeline::input;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Extract the text of a PDF, one marked block per page.
///
/// # Errors
/// - File not found / permission denied / not a PDF
/// - The engine cannot open the document (corrupt, password)
/// - The page selection matches no page
pub fn extract_text(
    input: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let backend = PdfiumBackend::bind()?;
    extract_text_with(&backend, input, config)
}

/// [`extract_text`] against an explicit backend.
pub fn extract_text_with<B: PdfBackend + ?Sized>(
    backend: &B,
    input: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let started = Instant::now();
    let path = input::resolve_input(input.as_ref())?;
    info!("Starting extraction: {}", path.display());

    let source = backend.open(&path, config.password.as_deref())?;
    let metadata = source.metadata();
    let total_pages = source.page_count();

    let indices = config.pages.to_indices(total_pages);
    if indices.is_empty() && config.pages != PageSelection::All {
        return Err(ExtractError::PageOutOfRange {
            page: config.pages.first_requested(),
            total: total_pages,
        });
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(indices.len());
    }

    let selected = indices.len();
    let mut pages = Vec::with_capacity(selected);
    for idx in indices {
        let page = PageText::new(idx + 1, source.page_text(idx)?.unwrap_or_default());
        if page.is_empty() {
            debug!("Page {} has no extractable text", page.page_num);
        }
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_extracted(page.page_num, selected, page.char_count);
        }
        pages.push(page);
    }

    let text = assemble_document(&pages, &config.marker);
    let empty_pages: Vec<usize> = pages
        .iter()
        .filter(|p| p.is_empty())
        .map(|p| p.page_num)
        .collect();

    let stats = ExtractionStats {
        total_pages,
        extracted_pages: pages.len(),
        char_count: text.chars().count(),
        empty_pages,
        duration_ms: started.elapsed().as_millis() as u64,
    };

    info!(
        "Extraction complete: {} pages, {} chars, {} empty, {}ms",
        stats.extracted_pages,
        stats.char_count,
        stats.empty_pages.len(),
        stats.duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(stats.extracted_pages, stats.empty_pages.len());
    }

    Ok(ExtractionOutput {
        text,
        pages,
        metadata,
        stats,
    })
}

/// Extract a PDF and write the dump to `output_path`.
///
/// Extraction finishes before anything touches the output location, so a
/// bad input leaves an existing output file as it was. Missing parent
/// directories are created. The write is atomic (temp file + rename).
pub fn extract_to_file(
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, ExtractError> {
    let backend = PdfiumBackend::bind()?;
    extract_to_file_with(&backend, input, output_path, config)
}

/// [`extract_to_file`] against an explicit backend.
pub fn extract_to_file_with<B: PdfBackend + ?Sized>(
    backend: &B,
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, ExtractError> {
    let output = extract_text_with(backend, input, config)?;
    write_text(output_path.as_ref(), &output.text)?;
    Ok(output.stats)
}

/// Count the pages of a PDF by opening it.
pub fn page_count(input: impl AsRef<Path>) -> Result<usize, ExtractError> {
    let backend = PdfiumBackend::bind()?;
    page_count_with(&backend, input, None)
}

/// [`page_count`] against an explicit backend, with an optional password.
pub fn page_count_with<B: PdfBackend + ?Sized>(
    backend: &B,
    input: impl AsRef<Path>,
    password: Option<&str>,
) -> Result<usize, ExtractError> {
    let path = input::resolve_input(input.as_ref())?;
    Ok(backend.open(&path, password)?.page_count())
}

/// Read PDF metadata without extracting any text.
pub fn inspect(input: impl AsRef<Path>) -> Result<DocumentMetadata, ExtractError> {
    let backend = PdfiumBackend::bind()?;
    inspect_with(&backend, input, None)
}

/// [`inspect`] against an explicit backend, with an optional password.
pub fn inspect_with<B: PdfBackend + ?Sized>(
    backend: &B,
    input: impl AsRef<Path>,
    password: Option<&str>,
) -> Result<DocumentMetadata, ExtractError> {
    let path = input::resolve_input(input.as_ref())?;
    Ok(backend.open(&path, password)?.metadata())
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Write `text` as UTF-8 to `path`, creating parent directories.
fn write_text(path: &Path, text: &str) -> Result<(), ExtractError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ExtractError::OutputDirFailed {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp_path = temp_sibling(path);
    let write_failed = |source: std::io::Error| ExtractError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    std::fs::write(&tmp_path, text.as_bytes()).map_err(write_failed)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(write_failed(e));
    }

    debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

/// `debug/out.txt` → `debug/out.txt.tmp`
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
