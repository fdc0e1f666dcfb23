//! Input validation: make sure the path is a readable PDF before the engine sees it.
//!
//! PDFium reports a missing file and a non-PDF file with the same opaque
//! error code, so both are checked here first to give the user a precise
//! message. The check only reads the header; the engine does the parsing.

use crate::error::ExtractError;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// PDF header marker.
const PDF_MAGIC: &[u8] = b"%PDF";

/// Readers accept the header anywhere in the first KiB of the file.
const HEADER_WINDOW: usize = 1024;

/// Validate a local input path and return it as an owned `PathBuf`.
pub fn resolve_input(path: &Path) -> Result<PathBuf, ExtractError> {
    let path = path.to_path_buf();

    if !path.is_file() {
        return Err(ExtractError::FileNotFound { path });
    }

    let mut file = match File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied { path });
        }
        Err(_) => return Err(ExtractError::FileNotFound { path }),
    };

    let mut head = Vec::with_capacity(HEADER_WINDOW);
    if let Err(e) = file.by_ref().take(HEADER_WINDOW as u64).read_to_end(&mut head) {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            return Err(ExtractError::PermissionDenied { path });
        }
        return Err(ExtractError::CorruptPdf {
            path,
            detail: format!("cannot read header: {e}"),
        });
    }

    if !has_pdf_header(&head) {
        let magic = head.iter().take(PDF_MAGIC.len()).copied().collect();
        return Err(ExtractError::NotAPdf { path, magic });
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

fn has_pdf_header(head: &[u8]) -> bool {
    head.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}
