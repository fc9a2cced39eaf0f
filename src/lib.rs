//! # pdftext2md
//!
//! Convert PDF documents to Markdown from their embedded text layer, or by
//! OCR when the PDF is a scan.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Input    persist to a scoped temp file
//!  ├─ 2. Extract  text layer via pdfium, or rasterise + tesseract per page
//!  ├─ 3. Clean    drop "12/40 2024" footers, rejoin hyphens, reflow paragraphs,
//!  │              split run-together words against a ranked word list
//!  ├─ 4. Convert  paragraphs → HTML blocks → Markdown (ATX headings)
//!  └─ 5. Polish   line endings, trailing whitespace, final newline
//! ```
//!
//! Every page that yields text becomes a `# Page N` section, in page order.
//! When no page yields anything the result is
//! [`ConversionOutcome::NoText`] rather than an empty document.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdftext2md::{convert_file, ConversionConfig, ConversionOutcome};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder().dpi(400).build()?;
//!     match convert_file("document.pdf", &config)? {
//!         ConversionOutcome::Converted(output) => println!("{}", output.markdown),
//!         ConversionOutcome::NoText(report) => {
//!             for notice in &report.notices {
//!                 eprintln!("{notice}");
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2md` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdftext2md = { version = "0.1", default-features = false }
//! ```
//!
//! ## Runtime requirements
//!
//! - `libpdfium` on the system library path, next to the working directory,
//!   or given via [`ConversionConfig::pdfium_library`].
//! - The `tesseract` binary for OCR mode only.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_DPI, DPI_RANGE};
pub use convert::{convert_bytes, convert_file, convert_to_file, Converter};
pub use error::{PageError, Pdf2MdError};
pub use output::{
    ConversionOutcome, ConversionOutput, ConversionStats, ExtractionMode, NoTextReport, Notice,
    NoticeLevel, PageOutcome,
};
pub use pipeline::ocr::{OcrEngine, TesseractEngine};
pub use pipeline::render::{PdfBackend, PdfiumBackend, TextLayer};
pub use pipeline::segment::{DictionarySegmenter, UnavailableSegmenter, WordSegmenter};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
