//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events while the pipeline processes a document: page starts and
//! completions, per-page OCR failures, and every user-facing [`Notice`].
//!
//! The same notices are also collected into the returned
//! [`crate::output::ConversionOutcome`], so the callback is only needed for
//! live display (a spinner, a sidebar, a log pane).
//!
//! # Example
//!
//! ```rust
//! use pdftext2md::{ConversionConfig, ConversionProgressCallback, Notice};
//! use std::sync::Arc;
//!
//! struct StderrNotices;
//!
//! impl ConversionProgressCallback for StderrNotices {
//!     fn on_notice(&self, notice: &Notice) {
//!         eprintln!("{notice}");
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(StderrNotices))
//!     .build()
//!     .unwrap();
//! ```

use crate::config::ConversionConfig;
use crate::error::PageError;
use crate::output::{ExtractionMode, Notice};
use std::sync::Arc;
use tracing::debug;

/// Called by the conversion pipeline as it processes a document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Page start/complete events are only delivered when
/// [`crate::ConversionConfig::show_logs`] is set; page errors and warning or
/// error notices are always delivered.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once, after the extractor has been chosen.
    fn on_conversion_start(&self, mode: ExtractionMode) {
        let _ = mode;
    }

    /// Called before a page is read or recognised.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages in the document
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page yields text.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages
    /// * `text_len`    — byte length of the recovered text
    fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        let _ = (page_num, total_pages, text_len);
    }

    /// Called when OCR fails on a page. The page is skipped.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called for every notice, in emission order.
    fn on_notice(&self, notice: &Notice) {
        let _ = notice;
    }

    /// Called once after extraction, cleanup and conversion have finished.
    ///
    /// # Arguments
    /// * `extracted_pages` — pages that contributed text
    /// * `total_pages`     — pages seen by the extractor
    fn on_conversion_complete(&self, extracted_pages: usize, total_pages: usize) {
        let _ = (extracted_pages, total_pages);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

/// Collects the notices of one conversion and forwards events to the callback.
///
/// Informational notices and page start/complete events are dropped when
/// `show_logs` is off. Warnings, errors and page failures always go through.
pub struct Reporter<'a> {
    show_logs: bool,
    callback: Option<&'a dyn ConversionProgressCallback>,
    notices: Vec<Notice>,
}

impl<'a> Reporter<'a> {
    pub fn new(show_logs: bool, callback: Option<&'a dyn ConversionProgressCallback>) -> Self {
        Self {
            show_logs,
            callback,
            notices: Vec::new(),
        }
    }

    pub fn from_config(config: &'a ConversionConfig) -> Self {
        Self::new(config.show_logs, config.progress_callback.as_deref())
    }

    /// A reporter with no callback that keeps every notice.
    pub fn silent() -> Self {
        Self::new(true, None)
    }

    pub fn callback(&self) -> Option<&'a dyn ConversionProgressCallback> {
        self.callback
    }

    pub fn info(&mut self, message: impl Into<String>) {
        if self.show_logs {
            self.push(Notice::info(message));
        }
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Notice::warning(message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Notice::error(message));
    }

    pub fn page_start(&self, page_num: usize, total_pages: usize) {
        if let (true, Some(cb)) = (self.show_logs, self.callback) {
            cb.on_page_start(page_num, total_pages);
        }
    }

    pub fn page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        if let (true, Some(cb)) = (self.show_logs, self.callback) {
            cb.on_page_complete(page_num, total_pages, text_len);
        }
    }

    /// Record a per-page failure as an error notice and a page-error event.
    pub fn page_error(&mut self, error: &PageError, total_pages: usize) {
        let message = error.to_string();
        if let Some(cb) = self.callback {
            cb.on_page_error(error.page(), total_pages, &message);
        }
        self.push(Notice::error(message));
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn into_notices(self) -> Vec<Notice> {
        self.notices
    }

    fn push(&mut self, notice: Notice) {
        debug!("notice: {notice}");
        if let Some(cb) = self.callback {
            cb.on_notice(&notice);
        }
        self.notices.push(notice);
    }
}
