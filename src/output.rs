//! Result types produced by a conversion.
//!
//! A conversion either yields Markdown ([`ConversionOutcome::Converted`]) or
//! the explicit "nothing to show" outcome ([`ConversionOutcome::NoText`]).
//! Both carry the ordered per-page outcomes and every user-facing
//! [`Notice`] emitted along the way, so a caller that never installed a
//! progress callback can still show what happened.

use crate::error::{PageError, Pdf2MdError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which extractor produced the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionMode {
    /// Embedded text layer read through pdfium.
    Digital,
    /// Rasterised pages recognised by the OCR engine.
    Ocr,
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMode::Digital => f.write_str("text layer"),
            ExtractionMode::Ocr => f.write_str("OCR"),
        }
    }
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A user-facing progress, warning or error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Info => write!(f, "{}", self.message),
            NoticeLevel::Warning => write!(f, "warning: {}", self.message),
            NoticeLevel::Error => write!(f, "error: {}", self.message),
        }
    }
}

/// What happened to one page during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageOutcome {
    /// Text was recovered (OCR pages may legitimately recover an empty string).
    Extracted { page_num: usize, text: String },
    /// The text layer of this page is empty.
    Blank { page_num: usize },
    /// Recognition failed; the page is left out of the output.
    Failed(PageError),
}

impl PageOutcome {
    /// 1-indexed page number.
    pub fn page_num(&self) -> usize {
        match self {
            PageOutcome::Extracted { page_num, .. } | PageOutcome::Blank { page_num } => *page_num,
            PageOutcome::Failed(e) => e.page(),
        }
    }

    /// The recovered text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            PageOutcome::Extracted { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PageOutcome::Failed(_))
    }
}

/// Counters and timings for one conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStats {
    pub mode: ExtractionMode,
    /// Pages seen by the extractor.
    pub total_pages: usize,
    pub extracted_pages: usize,
    pub blank_pages: usize,
    pub failed_pages: usize,
    /// Characters in the raw extracted text.
    pub raw_chars: usize,
    /// Characters after the cleanup passes.
    pub cleaned_chars: usize,
    /// Characters in the final Markdown.
    pub markdown_chars: usize,
    pub extract_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// A successful conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    pub markdown: String,
    pub pages: Vec<PageOutcome>,
    pub stats: ConversionStats,
    pub notices: Vec<Notice>,
}

/// Extraction recovered no text: the explicit "no result" outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoTextReport {
    pub mode: ExtractionMode,
    pub pages: Vec<PageOutcome>,
    pub notices: Vec<Notice>,
}

/// The result of running the pipeline on one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConversionOutcome {
    Converted(ConversionOutput),
    NoText(NoTextReport),
}

impl ConversionOutcome {
    pub fn is_converted(&self) -> bool {
        matches!(self, ConversionOutcome::Converted(_))
    }

    /// The Markdown, when the conversion produced any.
    pub fn markdown(&self) -> Option<&str> {
        match self {
            ConversionOutcome::Converted(out) => Some(&out.markdown),
            ConversionOutcome::NoText(_) => None,
        }
    }

    pub fn pages(&self) -> &[PageOutcome] {
        match self {
            ConversionOutcome::Converted(out) => &out.pages,
            ConversionOutcome::NoText(report) => &report.pages,
        }
    }

    pub fn notices(&self) -> &[Notice] {
        match self {
            ConversionOutcome::Converted(out) => &out.notices,
            ConversionOutcome::NoText(report) => &report.notices,
        }
    }

    /// Treat the no-text outcome as an error.
    pub fn into_result(self) -> Result<ConversionOutput, Pdf2MdError> {
        match self {
            ConversionOutcome::Converted(out) => Ok(out),
            ConversionOutcome::NoText(_) => Err(Pdf2MdError::NoExtractableText),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_text() -> ConversionOutcome {
        ConversionOutcome::NoText(NoTextReport {
            mode: ExtractionMode::Digital,
            pages: vec![PageOutcome::Blank { page_num: 1 }],
            notices: vec![Notice::error("boom")],
        })
    }

    #[test]
    fn no_text_into_result_is_error() {
        let err = no_text().into_result().unwrap_err();
        assert!(matches!(err, Pdf2MdError::NoExtractableText));
    }

    #[test]
    fn no_text_has_no_markdown() {
        let outcome = no_text();
        assert!(!outcome.is_converted());
        assert!(outcome.markdown().is_none());
        assert_eq!(outcome.notices().len(), 1);
        assert_eq!(outcome.pages()[0].page_num(), 1);
    }

    #[test]
    fn failed_page_reports_its_number() {
        let p = PageOutcome::Failed(PageError::InvalidOutput { page: 9 });
        assert_eq!(p.page_num(), 9);
        assert!(p.is_failed());
        assert!(p.text().is_none());
    }

    #[test]
    fn notice_display_prefixes_severity() {
        assert_eq!(Notice::info("hi").to_string(), "hi");
        assert_eq!(Notice::warning("careful").to_string(), "warning: careful");
        assert_eq!(Notice::error("bad").to_string(), "error: bad");
    }

    #[test]
    fn outcome_serialises_to_json() {
        let json = serde_json::to_string(&no_text()).unwrap();
        assert!(json.contains("NoText"));
        assert!(json.contains("boom"));
    }
}
