//! Error types for the pdftext2md library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Pdf2MdError`] — **Fatal or document-level**: the input could not be
//!   read, the PDF engine could not be bound, or a whole document could not
//!   be opened or rasterised. Setup faults are returned as `Err` from the
//!   `convert*` functions; document-level extraction faults are turned into
//!   [`crate::output::Notice`]s so partial text still flows downstream.
//!
//! * [`PageError`] — **Non-fatal**: OCR failed on a single page but every
//!   other page is fine. Stored inside [`crate::output::PageOutcome::Failed`]
//!   so callers can inspect partial success rather than losing the whole
//!   document to one bad page.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal and document-level errors returned by the pdftext2md library.
///
/// Page-level OCR failures use [`PageError`] and are stored in
/// [`crate::output::PageOutcome`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Pdf2MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Any other I/O failure while reading the input.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scoped temporary file or directory could not be created or written.
    #[error("Temporary storage failed: {0}")]
    TempFile(#[source] std::io::Error),

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF is corrupt or unreadable: {detail}")]
    CorruptPdf { detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired,

    /// A password was provided but it is wrong.
    #[error("Wrong password for encrypted PDF")]
    WrongPassword,

    /// pdfium could not read the text layer of a page.
    #[error("Text extraction failed on page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    /// pdfium could not render a page, or the PNG could not be written.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium on the system library path, place it next to the binary,\n\
or set PDFIUM_LIB_PATH=/path/to/libpdfium.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Cleanup / conversion errors ───────────────────────────────────────
    /// The word list for the segmenter could not be read.
    #[error("Failed to read word list '{path}': {source}")]
    WordListUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTML-to-Markdown rule set rejected the cleaned text.
    #[error("Markdown conversion failed: {0}")]
    MarkdownConversion(String),

    /// Extraction recovered no text from any page.
    ///
    /// Only produced by [`crate::output::ConversionOutcome::into_result`];
    /// the pipeline itself reports this as a normal outcome.
    #[error("No text could be extracted from the PDF. It may be empty or an error occurred.")]
    NoExtractableText,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal error for a single page.
///
/// Stored in [`crate::output::PageOutcome::Failed`] when recognition of
/// one page image fails. The remaining pages are still processed.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The OCR engine ran but reported failure.
    #[error("OCR failed on page {page}: {detail}")]
    RecognitionFailed { page: usize, detail: String },

    /// The OCR engine binary could not be started.
    #[error("OCR failed on page {page}: could not run '{command}': {detail}")]
    EngineUnavailable {
        page: usize,
        command: String,
        detail: String,
    },

    /// The OCR engine produced output that is not valid UTF-8.
    #[error("OCR failed on page {page}: engine output is not valid UTF-8")]
    InvalidOutput { page: usize },
}

impl PageError {
    /// 1-indexed page number the error belongs to.
    pub fn page(&self) -> usize {
        match self {
            PageError::RecognitionFailed { page, .. }
            | PageError::EngineUnavailable { page, .. }
            | PageError::InvalidOutput { page } => *page,
        }
    }
}
