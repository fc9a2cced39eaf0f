//! Conversion entry points.
//!
//! [`Converter`] owns the three replaceable collaborators (PDF backend, OCR
//! engine, word segmenter) and runs the pipeline for one document at a
//! time. It keeps no state between documents, so one converter can be
//! reused for a whole batch. The free functions build a converter from a
//! [`ConversionConfig`] for one-shot use.

use crate::config::ConversionConfig;
use crate::error::Pdf2MdError;
use crate::output::{
    ConversionOutcome, ConversionOutput, ConversionStats, ExtractionMode, NoTextReport,
};
use crate::pipeline::ocr::{self, OcrEngine, TesseractEngine};
use crate::pipeline::render::{PdfBackend, PdfiumBackend};
use crate::pipeline::segment::{self, WordSegmenter};
use crate::pipeline::{clean, input, markdown, postprocess, text_layer};
use crate::progress::Reporter;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Runs the extraction → cleanup → Markdown pipeline.
pub struct Converter {
    config: ConversionConfig,
    backend: Box<dyn PdfBackend>,
    ocr_engine: Box<dyn OcrEngine>,
    segmenter: Box<dyn WordSegmenter>,
}

impl Converter {
    /// Bind pdfium and build the OCR engine and word segmenter from `config`.
    ///
    /// # Errors
    /// [`Pdf2MdError::PdfiumBindingFailed`] when no pdfium library can be loaded.
    pub fn new(config: &ConversionConfig) -> Result<Self, Pdf2MdError> {
        let backend =
            PdfiumBackend::bind(config.pdfium_library.as_deref(), config.password.clone())?;
        Ok(Self::with_components(
            config,
            Box::new(backend),
            Box::new(TesseractEngine::from_config(config)),
            segment::segmenter_from_config(config),
        ))
    }

    /// Assemble a converter from explicit collaborators.
    pub fn with_components(
        config: &ConversionConfig,
        backend: Box<dyn PdfBackend>,
        ocr_engine: Box<dyn OcrEngine>,
        segmenter: Box<dyn WordSegmenter>,
    ) -> Self {
        Self {
            config: config.clone(),
            backend,
            ocr_engine,
            segmenter,
        }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Read `path` (or stdin for `-`) and convert it.
    pub fn convert_file(&self, path: impl AsRef<Path>) -> Result<ConversionOutcome, Pdf2MdError> {
        let bytes = input::read_input(path)?;
        self.convert_bytes(&bytes)
    }

    /// Convert the PDF held in `bytes`.
    ///
    /// # Returns
    /// `Ok(ConversionOutcome::NoText)` when no page yielded any text;
    /// extraction faults are reported as notices, not errors.
    ///
    /// # Errors
    /// Only setup faults: the temporary copy cannot be written, or the
    /// Markdown conversion itself fails.
    pub fn convert_bytes(&self, bytes: &[u8]) -> Result<ConversionOutcome, Pdf2MdError> {
        let total_start = Instant::now();
        let config = &self.config;
        let mut report = Reporter::from_config(config);

        let mode = if config.ocr {
            ExtractionMode::Ocr
        } else {
            ExtractionMode::Digital
        };
        info!("Starting conversion: {} bytes via {}", bytes.len(), mode);
        if let Some(cb) = report.callback() {
            cb.on_conversion_start(mode);
        }

        // ── Step 1: Extract ──────────────────────────────────────────────────
        let extract_start = Instant::now();
        let extraction = {
            let source = input::persist_temp(bytes)?;
            match mode {
                ExtractionMode::Ocr => {
                    report.info("Using OCR for text extraction.");
                    ocr::extract_ocr(
                        source.path(),
                        self.backend.as_ref(),
                        self.ocr_engine.as_ref(),
                        config.dpi,
                        &mut report,
                    )
                }
                ExtractionMode::Digital => {
                    report.info("Using the embedded text layer for extraction.");
                    text_layer::extract_text_layer(
                        source.path(),
                        self.backend.as_ref(),
                        &mut report,
                    )
                }
            }
        };
        let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

        let total_pages = extraction.pages.len();
        let extracted_pages = extraction.extracted_pages();
        let raw = extraction.combined_text();

        if raw.trim().is_empty() {
            warn!("No text recovered from {} pages", total_pages);
            if let Some(cb) = report.callback() {
                cb.on_conversion_complete(0, total_pages);
            }
            return Ok(ConversionOutcome::NoText(NoTextReport {
                mode,
                pages: extraction.pages,
                notices: report.into_notices(),
            }));
        }

        // ── Step 2: Clean ────────────────────────────────────────────────────
        let cleaned = clean::clean_extracted_text(
            &raw,
            config.split_words,
            self.segmenter.as_ref(),
            &mut report,
        );

        // ── Step 3: Convert and polish ───────────────────────────────────────
        let converted = markdown::convert_to_markdown(&cleaned)?;
        let markdown = postprocess::polish_markdown(&converted);

        // ── Step 4: Compute stats ────────────────────────────────────────────
        let stats = ConversionStats {
            mode,
            total_pages,
            extracted_pages,
            blank_pages: extraction.blank_pages(),
            failed_pages: extraction.failed_pages(),
            raw_chars: raw.chars().count(),
            cleaned_chars: cleaned.chars().count(),
            markdown_chars: markdown.chars().count(),
            extract_duration_ms,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
        };

        info!(
            "Conversion complete: {}/{} pages, {}ms total",
            extracted_pages, total_pages, stats.total_duration_ms
        );
        if let Some(cb) = report.callback() {
            cb.on_conversion_complete(extracted_pages, total_pages);
        }

        Ok(ConversionOutcome::Converted(ConversionOutput {
            markdown,
            pages: extraction.pages,
            stats,
            notices: report.into_notices(),
        }))
    }
}

/// Convert the PDF held in `bytes` with a one-shot [`Converter`].
pub fn convert_bytes(
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutcome, Pdf2MdError> {
    Converter::new(config)?.convert_bytes(bytes)
}

/// Convert the PDF at `path` (or stdin for `-`) with a one-shot [`Converter`].
pub fn convert_file(
    path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutcome, Pdf2MdError> {
    Converter::new(config)?.convert_file(path)
}

/// Convert a PDF and write the Markdown directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
///
/// # Errors
/// [`Pdf2MdError::NoExtractableText`] when nothing could be extracted; the
/// output file is not touched in that case.
pub fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2MdError> {
    let output = convert_file(input_path, config)?.into_result()?;
    write_atomically(output_path.as_ref(), &output.markdown)?;
    Ok(output)
}

/// Write `contents` to a sibling temp file, then rename it over `path`.
pub fn write_atomically(path: &Path, contents: &str) -> Result<(), Pdf2MdError> {
    let write_failed = |source| Pdf2MdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_failed)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".pdf2md-")
        .suffix(".md.tmp")
        .tempfile_in(parent)
        .map_err(write_failed)?;
    tmp.write_all(contents.as_bytes()).map_err(write_failed)?;
    tmp.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out/doc.md");
        write_atomically(&target, "# Page 1\n").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "# Page 1\n");

        let leftovers: Vec<_> = std::fs::read_dir(target.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn atomic_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("doc.md");
        std::fs::write(&target, "old").unwrap();
        write_atomically(&target, "new\n").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new\n");
    }
}
