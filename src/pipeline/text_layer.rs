//! Digital extraction: read the text layer embedded in the PDF.
//!
//! Pages with no text at all become [`PageOutcome::Blank`] and contribute
//! nothing to the combined text. A whitespace-only page still gets its
//! "# Page N" heading. A
//! fault part-way through keeps the pages read so far and is reported as an
//! error notice rather than failing the conversion.

use crate::output::{ExtractionMode, PageOutcome};
use crate::pipeline::extract::Extraction;
use crate::pipeline::render::PdfBackend;
use crate::progress::Reporter;
use std::path::Path;
use tracing::{debug, warn};

pub fn extract_text_layer(
    pdf_path: &Path,
    backend: &dyn PdfBackend,
    report: &mut Reporter<'_>,
) -> Extraction {
    let layer = backend.text_layer(pdf_path);
    let total = layer.page_count.max(layer.pages.len());

    let mut pages = Vec::with_capacity(layer.pages.len());
    for (idx, text) in layer.pages.into_iter().enumerate() {
        let page_num = idx + 1;
        report.page_start(page_num, total);

        if text.is_empty() {
            debug!("Page {} has no embedded text", page_num);
            pages.push(PageOutcome::Blank { page_num });
        } else {
            report.page_complete(page_num, total, text.len());
            pages.push(PageOutcome::Extracted { page_num, text });
        }
    }

    if let Some(fault) = layer.fault {
        warn!("Text layer extraction stopped after {} pages: {}", pages.len(), fault);
        report.error(format!("Error extracting embedded text: {fault}"));
    }

    Extraction {
        mode: ExtractionMode::Digital,
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Pdf2MdError;
    use crate::output::NoticeLevel;
    use crate::pipeline::render::TextLayer;
    use std::path::PathBuf;

    struct FixedLayer {
        pages: Vec<&'static str>,
        fail_after: Option<usize>,
    }

    impl PdfBackend for FixedLayer {
        fn text_layer(&self, _pdf_path: &Path) -> TextLayer {
            let read = self.fail_after.unwrap_or(self.pages.len());
            TextLayer {
                page_count: self.pages.len(),
                pages: self.pages[..read].iter().map(|s| s.to_string()).collect(),
                fault: self.fail_after.map(|n| Pdf2MdError::TextExtractionFailed {
                    page: n + 1,
                    detail: "bad content stream".into(),
                }),
            }
        }

        fn rasterize(&self, _: &Path, _: u32, _: &Path) -> Result<Vec<PathBuf>, Pdf2MdError> {
            unreachable!("digital extraction never rasterises")
        }
    }

    #[test]
    fn blank_pages_are_skipped() {
        let backend = FixedLayer {
            pages: vec!["First", "", "Third"],
            fail_after: None,
        };
        let mut report = Reporter::silent();
        let extraction = extract_text_layer(Path::new("doc.pdf"), &backend, &mut report);

        assert_eq!(extraction.mode, ExtractionMode::Digital);
        assert_eq!(extraction.blank_pages(), 1);
        assert_eq!(
            extraction.combined_text(),
            "\n\n# Page 1\n\nFirst\n\n# Page 3\n\nThird"
        );
        assert!(report.notices().is_empty());
    }

    #[test]
    fn whitespace_only_page_keeps_its_heading() {
        let backend = FixedLayer {
            pages: vec!["   "],
            fail_after: None,
        };
        let mut report = Reporter::silent();
        let extraction = extract_text_layer(Path::new("doc.pdf"), &backend, &mut report);

        assert_eq!(extraction.blank_pages(), 0);
        assert_eq!(extraction.extracted_pages(), 1);
        assert_eq!(extraction.combined_text(), "\n\n# Page 1\n\n   ");
    }

    #[test]
    fn fault_keeps_partial_text() {
        let backend = FixedLayer {
            pages: vec!["First", "Second", "Third"],
            fail_after: Some(1),
        };
        let mut report = Reporter::silent();
        let extraction = extract_text_layer(Path::new("doc.pdf"), &backend, &mut report);

        assert_eq!(extraction.combined_text(), "\n\n# Page 1\n\nFirst");
        let notices = report.into_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(notices[0].message.contains("page 2"), "{}", notices[0].message);
    }

    #[test]
    fn unopenable_document_yields_no_pages() {
        struct Broken;
        impl PdfBackend for Broken {
            fn text_layer(&self, _: &Path) -> TextLayer {
                TextLayer {
                    fault: Some(Pdf2MdError::CorruptPdf {
                        detail: "no header".into(),
                    }),
                    ..TextLayer::default()
                }
            }
            fn rasterize(&self, _: &Path, _: u32, _: &Path) -> Result<Vec<PathBuf>, Pdf2MdError> {
                unreachable!()
            }
        }

        let mut report = Reporter::silent();
        let extraction = extract_text_layer(Path::new("x.pdf"), &Broken, &mut report);
        assert!(extraction.pages.is_empty());
        assert_eq!(report.notices().len(), 1);
    }
}
