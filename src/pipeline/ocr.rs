//! OCR extraction: rasterise every page and recognise it with Tesseract.
//!
//! Page images live in a [`tempfile::TempDir`] owned by [`extract_ocr`]; the
//! directory and everything in it is removed when the function returns.
//!
//! A page whose recognition fails is recorded as [`PageOutcome::Failed`] with
//! an error notice and the remaining pages are still processed. If the
//! document cannot be rasterised at all, the extraction is empty.

use crate::config::ConversionConfig;
use crate::error::{Pdf2MdError, PageError};
use crate::output::{ExtractionMode, PageOutcome};
use crate::pipeline::extract::Extraction;
use crate::pipeline::render::PdfBackend;
use crate::progress::Reporter;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Recognises the text in one page image.
pub trait OcrEngine {
    fn recognize(&self, page_num: usize, image_path: &Path) -> Result<String, PageError>;
}

/// [`OcrEngine`] that shells out to the `tesseract` CLI.
///
/// Runs `tesseract <image> stdout [-l <lang>]` and takes stdout as the text.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: PathBuf,
    language: Option<String>,
}

impl TesseractEngine {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn from_config(config: &ConversionConfig) -> Self {
        Self {
            command: config.tesseract_command(),
            language: config.ocr_language.clone(),
        }
    }

    pub fn command(&self) -> &Path {
        &self.command
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, page_num: usize, image_path: &Path) -> Result<String, PageError> {
        let mut cmd = Command::new(&self.command);
        cmd.arg(image_path).arg("stdout");
        if let Some(lang) = &self.language {
            cmd.arg("-l").arg(lang);
        }

        let output = cmd.output().map_err(|e| PageError::EngineUnavailable {
            page: page_num,
            command: self.command.display().to_string(),
            detail: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PageError::RecognitionFailed {
                page: page_num,
                detail: format!("tesseract {}: {}", output.status, stderr.trim()),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| PageError::InvalidOutput { page: page_num })
    }
}

/// Rasterise `pdf_path` at `dpi` and run `engine` over every page image.
///
/// Successful pages are kept even when the recognised text is empty.
pub fn extract_ocr(
    pdf_path: &Path,
    backend: &dyn PdfBackend,
    engine: &dyn OcrEngine,
    dpi: u32,
    report: &mut Reporter<'_>,
) -> Extraction {
    let temp_dir = match tempfile::Builder::new().prefix("pdf2md-ocr-").tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            report.error(format!(
                "Error converting PDF to images: {}",
                Pdf2MdError::TempFile(e)
            ));
            return Extraction::empty(ExtractionMode::Ocr);
        }
    };

    let images = match backend.rasterize(pdf_path, dpi, temp_dir.path()) {
        Ok(images) => images,
        Err(e) => {
            warn!("Rasterisation failed: {}", e);
            report.error(format!("Error converting PDF to images: {e}"));
            return Extraction::empty(ExtractionMode::Ocr);
        }
    };
    info!("Rasterised {} pages at {} DPI", images.len(), dpi);

    let total = images.len();
    let mut pages = Vec::with_capacity(total);
    for (idx, image) in images.iter().enumerate() {
        let page_num = idx + 1;
        report.info(format!("Performing OCR on page {page_num}..."));
        report.page_start(page_num, total);

        match engine.recognize(page_num, image) {
            Ok(text) => {
                debug!("OCR page {}: {} chars", page_num, text.len());
                report.page_complete(page_num, total, text.len());
                pages.push(PageOutcome::Extracted { page_num, text });
            }
            Err(e) => {
                warn!("{}", e);
                report.page_error(&e, total);
                pages.push(PageOutcome::Failed(e));
            }
        }
    }

    Extraction {
        mode: ExtractionMode::Ocr,
        pages,
    }
}
