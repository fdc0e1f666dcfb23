//! The PDF engine seam.
//!
//! The extractor never parses PDF itself. It asks a [`PdfBackend`] to open a
//! document and then reads page text through the returned [`PdfSource`].
//! [`PdfiumBackend`] is the production engine; [`MemoryBackend`] serves
//! pre-baked pages for tests and for callers that already hold the text.

use crate::error::ExtractError;
use crate::output::DocumentMetadata;
use pdfium_render::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Opens PDF documents.
pub trait PdfBackend {
    /// Open `path`, decrypting with `password` when given.
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn PdfSource + 'a>, ExtractError>;
}

/// An opened document: a fixed, ordered list of pages.
pub trait PdfSource {
    fn page_count(&self) -> usize;

    /// Text of the 0-indexed page, or `None` when the page has no text layer.
    fn page_text(&self, index: usize) -> Result<Option<String>, ExtractError>;

    fn metadata(&self) -> DocumentMetadata;
}

// ── PDFium ───────────────────────────────────────────────────────────────

/// [`PdfBackend`] backed by the PDFium engine through `pdfium-render`.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    /// Bind to PDFium, downloading the library on first use.
    pub fn bind() -> Result<Self, ExtractError> {
        Ok(Self::from_pdfium(pdfium_auto::bind(None)?))
    }

    /// Wrap an already-bound engine.
    pub fn from_pdfium(pdfium: Pdfium) -> Self {
        Self { pdfium }
    }
}

impl PdfBackend for PdfiumBackend {
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn PdfSource + 'a>, ExtractError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, password)
            .map_err(|e| classify_open_error(path, password.is_some(), &format!("{e:?}")))?;

        info!("PDF loaded: {} pages", document.pages().len());
        Ok(Box::new(PdfiumSource { document }))
    }
}

struct PdfiumSource<'a> {
    document: PdfDocument<'a>,
}

impl PdfSource for PdfiumSource<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_text(&self, index: usize) -> Result<Option<String>, ExtractError> {
        let failed = |e: PdfiumError| ExtractError::TextExtractionFailed {
            page: index + 1,
            detail: format!("{e:?}"),
        };

        let page = self.document.pages().get(index as u16).map_err(failed)?;
        let text = page.text().map_err(failed)?.all();
        debug!("Page {} → {} bytes of text", index + 1, text.len());

        Ok((!text.is_empty()).then_some(text))
    }

    fn metadata(&self) -> DocumentMetadata {
        let metadata = self.document.metadata();
        let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
            metadata
                .get(tag)
                .map(|t| t.value().to_string())
                .filter(|v| !v.is_empty())
        };

        DocumentMetadata {
            title: get_meta(PdfDocumentMetadataTagType::Title),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            subject: get_meta(PdfDocumentMetadataTagType::Subject),
            creator: get_meta(PdfDocumentMetadataTagType::Creator),
            producer: get_meta(PdfDocumentMetadataTagType::Producer),
            creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
            modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
            page_count: self.page_count(),
            pdf_version: format!("{:?}", self.document.version()),
        }
    }
}

/// Map an engine open failure onto the password / corrupt-file variants.
fn classify_open_error(path: &Path, had_password: bool, detail: &str) -> ExtractError {
    let path = path.to_path_buf();
    if detail.to_ascii_lowercase().contains("password") {
        if had_password {
            ExtractError::WrongPassword { path }
        } else {
            ExtractError::PasswordRequired { path }
        }
    } else {
        ExtractError::CorruptPdf {
            path,
            detail: detail.to_string(),
        }
    }
}

// ── In-memory ────────────────────────────────────────────────────────────

/// [`PdfBackend`] that serves the same fixed pages for every path.
///
/// Each entry of `pages` is one page; `None` models a page without a text
/// layer. Counts how many times a document was opened.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    pages: Vec<Option<String>>,
    metadata: DocumentMetadata,
    password: Option<String>,
    opens: AtomicUsize,
}

impl MemoryBackend {
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let pages: Vec<Option<String>> = pages.into_iter().map(|p| p.map(Into::into)).collect();
        let metadata = DocumentMetadata {
            page_count: pages.len(),
            pdf_version: "Pdf1_7".to_string(),
            ..DocumentMetadata::default()
        };
        Self {
            pages,
            metadata,
            password: None,
            opens: AtomicUsize::new(0),
        }
    }

    /// Require `password` to open the document.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    /// Number of successful [`PdfBackend::open`] calls so far.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl PdfBackend for MemoryBackend {
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn PdfSource + 'a>, ExtractError> {
        if let Some(expected) = self.password.as_deref() {
            match password {
                None => return Err(classify_open_error(path, false, "PasswordError")),
                Some(given) if given != expected => {
                    return Err(classify_open_error(path, true, "PasswordError"))
                }
                Some(_) => {}
            }
        }
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySource { backend: self }))
    }
}

struct MemorySource<'a> {
    backend: &'a MemoryBackend,
}

impl PdfSource for MemorySource<'_> {
    fn page_count(&self) -> usize {
        self.backend.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<Option<String>, ExtractError> {
        self.backend
            .pages
            .get(index)
            .cloned()
            .ok_or_else(|| ExtractError::TextExtractionFailed {
                page: index + 1,
                detail: "no such page".to_string(),
            })
    }

    fn metadata(&self) -> DocumentMetadata {
        self.backend.metadata.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_password_errors() {
        let p = Path::new("locked.pdf");
        assert!(matches!(
            classify_open_error(p, false, "PdfiumLibraryInternalError(PasswordError)"),
            ExtractError::PasswordRequired { .. }
        ));
        assert!(matches!(
            classify_open_error(p, true, "PdfiumLibraryInternalError(PasswordError)"),
            ExtractError::WrongPassword { .. }
        ));
    }

    #[test]
    fn classify_other_errors_as_corrupt() {
        let err = classify_open_error(Path::new("bad.pdf"), false, "FormatError");
        match err {
            ExtractError::CorruptPdf { detail, .. } => assert_eq!(detail, "FormatError"),
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn memory_backend_serves_pages_in_order() {
        let backend = MemoryBackend::new([Some("one"), None, Some("three")]);
        let source = backend.open(Path::new("x.pdf"), None).unwrap();
        assert_eq!(source.page_count(), 3);
        assert_eq!(source.page_text(0).unwrap().as_deref(), Some("one"));
        assert_eq!(source.page_text(1).unwrap(), None);
        assert!(source.page_text(3).is_err());
        assert_eq!(source.metadata().page_count, 3);
        assert_eq!(backend.open_count(), 1);
    }

    #[test]
    fn memory_backend_checks_password() {
        let backend = MemoryBackend::new([Some("secret page")]).with_password("pw");
        let p = Path::new("locked.pdf");
        assert!(matches!(
            backend.open(p, None).err(),
            Some(ExtractError::PasswordRequired { .. })
        ));
        assert!(matches!(
            backend.open(p, Some("nope")).err(),
            Some(ExtractError::WrongPassword { .. })
        ));
        assert!(backend.open(p, Some("pw")).is_ok());
        assert_eq!(backend.open_count(), 1);
    }
}
