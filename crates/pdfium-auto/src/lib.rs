//! # pdfium-auto
//!
//! Find a usable PDFium shared library and bind [`pdfium_render`] to it, so
//! `pdf2txt` runs without the user installing libpdfium or exporting
//! `LD_LIBRARY_PATH` / `DYLD_LIBRARY_PATH` by hand.
//!
//! ## Lookup order
//!
//! 1. `PDFIUM_LIB_PATH`, if it names an existing file.
//! 2. The per-version cache directory (see [`cache_dir`]).
//! 3. A one-time download of the platform archive from
//!    [bblanchon/pdfium-binaries](https://github.com/bblanchon/pdfium-binaries),
//!    unpacked into the cache directory.
//!
//! ```rust,no_run
//! let pdfium = pdfium_auto::bind(None).expect("PDFium unavailable");
//! ```
//!
//! ## Environment variables
//!
//! - `PDFIUM_LIB_PATH`: use this library file, never download.
//! - `PDFIUM_AUTO_CACHE_DIR`: root of the download cache.

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use pdfium_render::prelude::Pdfium;
use thiserror::Error;
use tracing::{debug, info};

/// Release tag of `bblanchon/pdfium-binaries` that gets downloaded.
pub const PDFIUM_VERSION: &str = "7690";

const RELEASE_URL: &str = "https://github.com/bblanchon/pdfium-binaries/releases/download";

/// Name of the per-user cache folder shared by every tool in this workspace.
const CACHE_NAMESPACE: &str = "pdf2txt";

/// Progress hook for the download: `(bytes_so_far, total_bytes_if_known)`.
pub type DownloadProgress<'a> = &'a dyn Fn(u64, Option<u64>);

#[derive(Error, Debug)]
pub enum PdfiumAutoError {
    #[error("No prebuilt PDFium for {os}/{arch}; set PDFIUM_LIB_PATH to a local build")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Cannot prepare cache directory '{path}': {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Downloading PDFium failed: {0}")]
    Download(String),

    #[error("Unpacking PDFium archive failed: {0}")]
    Extract(String),

    #[error("Cannot load PDFium from '{path}': {reason}")]
    Bind { path: PathBuf, reason: String },
}

/// Where the library lives in the release archive and what it is called on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Platform {
    archive: &'static str,
    member: &'static str,
    file_name: &'static str,
}

impl Platform {
    fn current() -> Result<Self, PdfiumAutoError> {
        Self::for_target(std::env::consts::OS, std::env::consts::ARCH)
    }

    fn for_target(os: &str, arch: &str) -> Result<Self, PdfiumAutoError> {
        let (archive, member, file_name) = match (os, arch) {
            ("linux", "x86_64") => ("pdfium-linux-x64.tgz", "lib/libpdfium.so", "libpdfium.so"),
            ("linux", "aarch64") => ("pdfium-linux-arm64.tgz", "lib/libpdfium.so", "libpdfium.so"),
            ("macos", "x86_64") => ("pdfium-mac-x64.tgz", "lib/libpdfium.dylib", "libpdfium.dylib"),
            ("macos", "aarch64") => ("pdfium-mac-arm64.tgz", "lib/libpdfium.dylib", "libpdfium.dylib"),
            ("windows", "x86_64") => ("pdfium-win-x64.tgz", "bin/pdfium.dll", "pdfium.dll"),
            ("windows", "aarch64") => ("pdfium-win-arm64.tgz", "bin/pdfium.dll", "pdfium.dll"),
            ("windows", "x86") => ("pdfium-win-x86.tgz", "bin/pdfium.dll", "pdfium.dll"),
            _ => {
                return Err(PdfiumAutoError::UnsupportedPlatform {
                    os: os.to_string(),
                    arch: arch.to_string(),
                })
            }
        };
        Ok(Self {
            archive,
            member,
            file_name,
        })
    }

    fn download_url(&self) -> String {
        format!("{RELEASE_URL}/chromium%2F{PDFIUM_VERSION}/{}", self.archive)
    }
}

/// Per-version cache directory, e.g. `~/.cache/pdf2txt/pdfium-7690/` on Linux.
///
/// `PDFIUM_AUTO_CACHE_DIR` replaces the platform cache root.
pub fn cache_dir() -> PathBuf {
    cache_dir_under(std::env::var_os("PDFIUM_AUTO_CACHE_DIR"))
}

fn cache_dir_under(root_override: Option<OsString>) -> PathBuf {
    let versioned = format!("pdfium-{PDFIUM_VERSION}");
    match root_override {
        Some(root) if !root.is_empty() => PathBuf::from(root).join(versioned),
        _ => dirs::cache_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
            .unwrap_or_else(std::env::temp_dir)
            .join(CACHE_NAMESPACE)
            .join(versioned),
    }
}

static LIBRARY_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Path of an already-available library, without touching the network.
pub fn locate_library() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from) {
        if explicit.is_file() {
            return Some(explicit);
        }
    }
    let platform = Platform::current().ok()?;
    let cached = cache_dir().join(platform.file_name);
    cached.is_file().then_some(cached)
}

/// Make sure a PDFium library exists locally and return its path.
///
/// Downloads at most once per process; later calls hit the `OnceLock`.
pub fn ensure_library(on_progress: Option<DownloadProgress<'_>>) -> Result<PathBuf, PdfiumAutoError> {
    if let Some(path) = LIBRARY_PATH.get() {
        return Ok(path.clone());
    }

    let path = match locate_library() {
        Some(found) => {
            debug!("Using PDFium at {}", found.display());
            found
        }
        None => download_into_cache(on_progress)?,
    };

    let _ = LIBRARY_PATH.set(path.clone());
    Ok(path)
}

/// Bind to PDFium, downloading it first when nothing local is found.
pub fn bind(on_progress: Option<DownloadProgress<'_>>) -> Result<Pdfium, PdfiumAutoError> {
    let path = ensure_library(on_progress)?;
    bind_from_path(&path)
}

/// Bind to the library at `path`; never downloads.
pub fn bind_from_path(path: &Path) -> Result<Pdfium, PdfiumAutoError> {
    Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| PdfiumAutoError::Bind {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn download_into_cache(on_progress: Option<DownloadProgress<'_>>) -> Result<PathBuf, PdfiumAutoError> {
    let platform = Platform::current()?;
    let dir = cache_dir();
    std::fs::create_dir_all(&dir).map_err(|source| PdfiumAutoError::CacheDir {
        path: dir.clone(),
        source,
    })?;

    let url = platform.download_url();
    info!("PDFium not found locally, downloading {url}");
    let archive = fetch(&url, on_progress)?;

    let dest = dir.join(platform.file_name);
    unpack_member(&archive, platform.member, &dest)?;
    info!("PDFium cached at {}", dest.display());
    Ok(dest)
}

fn fetch(url: &str, on_progress: Option<DownloadProgress<'_>>) -> Result<Vec<u8>, PdfiumAutoError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pdfium-auto/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| PdfiumAutoError::Download(e.to_string()))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| PdfiumAutoError::Download(format!("GET {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(PdfiumAutoError::Download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }

    let total = response.content_length();
    let mut body = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut chunk = [0u8; 64 * 1024];
    loop {
        let n = match response.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(PdfiumAutoError::Download(format!("reading body: {e}"))),
        };
        body.extend_from_slice(&chunk[..n]);
        if let Some(report) = on_progress {
            report(body.len() as u64, total);
        }
    }
    Ok(body)
}

/// Copy the single archive entry named `member` out of a `.tgz` to `dest`.
///
/// The entry is written to a `.part` sibling first and renamed on success,
/// so an interrupted download never leaves a truncated library at `dest`.
fn unpack_member(tgz: &[u8], member: &str, dest: &Path) -> Result<(), PdfiumAutoError> {
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(tgz));
    let entries = archive
        .entries()
        .map_err(|e| PdfiumAutoError::Extract(e.to_string()))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| PdfiumAutoError::Extract(e.to_string()))?;
        let is_member = entry
            .path()
            .map(|p| p.to_string_lossy() == member)
            .map_err(|e| PdfiumAutoError::Extract(e.to_string()))?;
        if is_member {
            let part = part_path(dest);
            let failed = |e: std::io::Error| {
                let _ = std::fs::remove_file(&part);
                PdfiumAutoError::Extract(format!("writing {}: {e}", dest.display()))
            };
            entry.unpack(&part).map_err(failed)?;
            std::fs::rename(&part, dest).map_err(failed)?;
            return Ok(());
        }
    }

    Err(PdfiumAutoError::Extract(format!(
        "'{member}' is missing from the archive"
    )))
}

/// `cache/libpdfium.so` → `cache/libpdfium.so.part`
fn part_path(dest: &Path) -> PathBuf {
    let mut name: OsString = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
