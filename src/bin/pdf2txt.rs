//! CLI binary for pdf-text-dump.
//!
//! A thin shim over the library crate: maps flags to `ExtractionConfig`,
//! writes the dump, and prints where it went plus page and character counts.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_text_dump::{
    extract_to_file_with, inspect_with, page_count_with, resolve_input, ExtractionConfig,
    ExtractionProgressCallback, ExtractionStats, PageMarker, PageSelection, PdfiumBackend,
    ProgressCallback,
};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT: &str = "debug/assignment_requirements.txt";

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self::with_bar(bar)
    }

    fn with_bar(bar: ProgressBar) -> Arc<Self> {
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix("Opening");
        Arc::new(Self { bar })
    }
}

// A failed run never reaches `on_extraction_complete`; stop the spinner anyway.
impl Drop for CliProgressCallback {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        self.bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(TICKS),
        );
        self.bar.set_length(total_pages as u64);
        self.bar.set_prefix("Extracting");
    }

    fn on_page_extracted(&self, page_num: usize, _total_pages: usize, char_count: usize) {
        self.bar.set_message(format!("page {page_num}: {char_count} chars"));
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, _total_pages: usize, _empty_pages: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Dump every page to debug/assignment_requirements.txt
  pdf2txt "Assignment 1.pdf"

  # Choose the output file
  pdf2txt report.pdf -o debug/report.txt

  # Only pages 2-4, with a custom marker
  pdf2txt --pages 2-4 --marker '--- page {n} ---' report.pdf

  # Metadata only
  pdf2txt --inspect-only report.pdf

OUTPUT FORMAT:
  Each page is written as "\n\n===== PAGE n =====\n<text>", n starting at 1.
  Pages without a text layer keep their marker and have an empty body.

ENVIRONMENT VARIABLES:
  PDF2TXT_INPUT           Input PDF when no positional argument is given
  PDF2TXT_OUTPUT          Output file (default: debug/assignment_requirements.txt)
  PDFIUM_LIB_PATH         Path to an existing libpdfium; skips auto-download
  PDFIUM_AUTO_CACHE_DIR   Override the default pdfium cache directory
  RUST_LOG                Override the log filter (e.g. pdf_text_dump=debug)
"#;

/// Dump the text of a PDF, page by page, into a plain-text file.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2txt",
    version,
    about = "Dump the text of a PDF, page by page, into a plain-text file",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    #[arg(env = "PDF2TXT_INPUT")]
    input: PathBuf,

    /// File to write the dump to; parent directories are created.
    #[arg(short, long, env = "PDF2TXT_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2TXT_PAGES", default_value = "all")]
    pages: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2TXT_PASSWORD")]
    password: Option<String>,

    /// Custom page marker; `{n}` is replaced by the page number.
    #[arg(long, env = "PDF2TXT_MARKER", allow_hyphen_values = true)]
    marker: Option<String>,

    /// Print a JSON summary instead of the plain three-line report.
    #[arg(long, env = "PDF2TXT_JSON")]
    json: bool,

    /// Print PDF metadata only, no extraction.
    #[arg(long)]
    inspect_only: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2TXT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2TXT_VERBOSE")]
    verbose: bool,

    /// Suppress everything except the report and errors.
    #[arg(short, long, env = "PDF2TXT_QUIET")]
    quiet: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    output: &'a Path,
    pages: usize,
    extracted_chars: usize,
    stats: &'a ExtractionStats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let (input, backend) = prepare(&cli, || bind_engine(cli.quiet))?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect_with(&backend, &input, cli.password.as_deref())
            .context("Failed to inspect PDF")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {t}");
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {a}");
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {p}");
            }
        }
        return Ok(());
    }

    // ── Extract ──────────────────────────────────────────────────────────
    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress)?;

    let stats = extract_to_file_with(&backend, &input, &cli.output, &config)
        .context("Extraction failed")?;

    // Reported page count comes from a fresh open of the document.
    let pages = page_count_with(&backend, &input, cli.password.as_deref())
        .context("Failed to count pages")?;
    let written = std::fs::canonicalize(&cli.output)
        .with_context(|| format!("Failed to resolve {}", cli.output.display()))?;

    if !cli.quiet && !stats.empty_pages.is_empty() {
        eprintln!(
            "warning: {} page(s) have no extractable text (scanned or image-only?): {:?}",
            stats.empty_pages.len(),
            stats.empty_pages
        );
    }

    println!("{}", render_report(&written, pages, &stats, cli.json)?);

    Ok(())
}

/// Validate the input path, then bind the engine.
///
/// A missing or non-PDF input is reported as such and never triggers a
/// PDFium download.
fn prepare<B>(cli: &Cli, bind: impl FnOnce() -> Result<B>) -> Result<(PathBuf, B)> {
    let input = resolve_input(&cli.input).context("Invalid input")?;
    let backend = bind()?;
    Ok((input, backend))
}

/// The success report: three plain lines, or one JSON object with `--json`.
fn render_report(
    written: &Path,
    pages: usize,
    stats: &ExtractionStats,
    json: bool,
) -> Result<String> {
    if json {
        let report = JsonReport {
            output: written,
            pages,
            extracted_chars: stats.char_count,
            stats,
        };
        return serde_json::to_string_pretty(&report).context("Failed to serialise report");
    }

    Ok(format!(
        "Wrote: {}\nPages: {pages}\nExtracted chars: {}",
        written.display(),
        stats.char_count
    ))
}

/// Bind PDFium, showing a download bar the first time the library is fetched.
fn bind_engine(quiet: bool) -> Result<PdfiumBackend> {
    if quiet || pdfium_auto::locate_library().is_some() {
        let pdfium = pdfium_auto::bind(None).context("Failed to load PDFium engine")?;
        return Ok(PdfiumBackend::from_pdfium(pdfium));
    }

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS),
    );
    bar.set_prefix("PDF engine");
    bar.enable_steady_tick(Duration::from_millis(80));

    let report = |downloaded: u64, total: Option<u64>| {
        if let Some(t) = total {
            if bar.length() != Some(t) {
                bar.set_length(t);
            }
        }
        bar.set_position(downloaded);
    };
    let pdfium = pdfium_auto::bind(Some(&report)).context("Failed to download PDFium engine")?;
    bar.finish_with_message("ready ✓");

    Ok(PdfiumBackend::from_pdfium(pdfium))
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder().pages(parse_pages(&cli.pages)?);

    if let Some(ref marker) = cli.marker {
        builder = builder.marker(PageMarker::Custom(marker.clone()));
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    let parse_one = |p: &str| -> Result<usize> {
        let page: usize = p
            .trim()
            .parse()
            .with_context(|| format!("Invalid page number: '{}'", p.trim()))?;
        if page < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {page})");
        }
        Ok(page)
    };

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let (start, end) = (parse_one(start)?, parse_one(end)?);
        if start > end {
            anyhow::bail!("Invalid page range '{start}-{end}': start must be <= end");
        }
        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages = s.split(',').map(parse_one).collect::<Result<Vec<_>>>()?;
        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    Ok(PageSelection::Single(parse_one(&s)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_text_dump::ExtractError;
    use std::ffi::OsString;

    #[test]
    fn parse_pages_forms() {
        assert_eq!(parse_pages("all").unwrap(), PageSelection::All);
        assert_eq!(parse_pages(" ALL ").unwrap(), PageSelection::All);
        assert_eq!(parse_pages("5").unwrap(), PageSelection::Single(5));
        assert_eq!(parse_pages("3-15").unwrap(), PageSelection::Range(3, 15));
        assert_eq!(
            parse_pages("1, 3,5").unwrap(),
            PageSelection::Set(vec![1, 3, 5])
        );
    }

    #[test]
    fn parse_pages_rejects_bad_input() {
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("7-2").is_err());
        assert!(parse_pages("x").is_err());
        assert!(parse_pages("1,,2").is_err());
    }

    #[test]
    fn output_defaults_to_debug_dump() {
        let cli = Cli::try_parse_from(["pdf2txt", "in.pdf"]).unwrap();
        assert_eq!(cli.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(cli.input, PathBuf::from("in.pdf"));
    }

    #[test]
    fn build_config_maps_marker_and_password() {
        let cli = Cli::try_parse_from([
            "pdf2txt",
            "in.pdf",
            "--marker",
            "## {n}",
            "--password",
            "pw",
            "--pages",
            "2",
        ])
        .unwrap();
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.marker.render(2), "## 2");
        assert_eq!(config.password.as_deref(), Some("pw"));
        assert_eq!(config.pages, PageSelection::Single(2));
    }

    #[test]
    fn missing_input_is_reported_before_engine_is_bound() {
        let cli = Cli::try_parse_from(["pdf2txt", "/nonexistent/missing.pdf"]).unwrap();
        let mut bound = false;

        let err = prepare(&cli, || -> Result<()> {
            bound = true;
            anyhow::bail!("PDFium unavailable")
        })
        .unwrap_err();

        assert!(!bound, "engine bound before the input was checked");
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::FileNotFound { .. })
        ));
    }

    #[test]
    fn valid_input_goes_on_to_bind() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("in.pdf");
        std::fs::write(&pdf, b"%PDF-1.7\n").unwrap();
        let cli = Cli::try_parse_from([OsString::from("pdf2txt"), pdf.clone().into()]).unwrap();

        let (input, engine) = prepare(&cli, || Ok("bound")).unwrap();
        assert_eq!(input, pdf);
        assert_eq!(engine, "bound");
    }

    fn sample_stats() -> ExtractionStats {
        ExtractionStats {
            total_pages: 3,
            extracted_pages: 3,
            empty_pages: vec![2],
            char_count: 51,
            duration_ms: 4,
        }
    }

    #[test]
    fn plain_report_is_three_lines() {
        let stats = sample_stats();
        let report = render_report(
            Path::new("/work/debug/assignment_requirements.txt"),
            3,
            &stats,
            false,
        )
        .unwrap();

        assert_eq!(
            report.lines().collect::<Vec<_>>(),
            vec![
                "Wrote: /work/debug/assignment_requirements.txt",
                "Pages: 3",
                "Extracted chars: 51",
            ]
        );
        assert!(report.ends_with(&format!("Extracted chars: {}", stats.char_count)));
    }

    #[test]
    fn json_report_carries_the_same_values() {
        let stats = sample_stats();
        let report = render_report(Path::new("/work/out.txt"), 3, &stats, true).unwrap();
        let v: serde_json::Value = serde_json::from_str(&report).unwrap();

        assert_eq!(v["output"], "/work/out.txt");
        assert_eq!(v["pages"], 3);
        assert_eq!(v["extracted_chars"], stats.char_count);
        assert_eq!(v["stats"]["empty_pages"], serde_json::json!([2]));
    }

    #[test]
    fn dropping_progress_callback_clears_the_bar() {
        let bar = ProgressBar::hidden();
        let cb = CliProgressCallback::with_bar(bar.clone());
        cb.on_extraction_start(3);
        cb.on_page_extracted(1, 3, 120);
        assert!(!bar.is_finished());

        drop(cb);
        assert!(bar.is_finished());
    }

    #[test]
    fn build_config_rejects_marker_without_page_number() {
        let cli = Cli::try_parse_from(["pdf2txt", "in.pdf", "--marker", "----- PAGE -----"]).unwrap();
        assert!(build_config(&cli, None).is_err());
    }
}
