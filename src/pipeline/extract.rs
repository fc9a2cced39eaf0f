//! The common output of both extractors.
//!
//! The digital and OCR extractors both produce an [`Extraction`]: an ordered
//! list of [`PageOutcome`]s. Downstream stages only ever see the combined
//! text, whose "# Page N" blocks are formatted identically for both paths.

use crate::output::{ExtractionMode, PageOutcome};

/// Ordered per-page results from one extractor run.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub mode: ExtractionMode,
    pub pages: Vec<PageOutcome>,
}

impl Extraction {
    pub fn empty(mode: ExtractionMode) -> Self {
        Self {
            mode,
            pages: Vec::new(),
        }
    }

    /// Concatenate every extracted page as a "# Page N" block, in page order.
    pub fn combined_text(&self) -> String {
        self.pages
            .iter()
            .filter_map(|p| match p {
                PageOutcome::Extracted { page_num, text } => Some(page_block(*page_num, text)),
                _ => None,
            })
            .collect()
    }

    pub fn extracted_pages(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| matches!(p, PageOutcome::Extracted { .. }))
            .count()
    }

    pub fn blank_pages(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| matches!(p, PageOutcome::Blank { .. }))
            .count()
    }

    pub fn failed_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.is_failed()).count()
    }
}

/// Format one page of text with its heading marker.
pub fn page_block(page_num: usize, text: &str) -> String {
    format!("\n\n# Page {page_num}\n\n{text}")
}
