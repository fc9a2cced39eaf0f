//! PDF access: the embedded text layer and page rasterisation via pdfium.
//!
//! Both extractors talk to the document through the [`PdfBackend`] trait.
//! [`PdfiumBackend`] is the production implementation; tests substitute
//! fakes so the extractors and the orchestrator run without libpdfium.

use crate::error::Pdf2MdError;
use crate::pipeline::postprocess::normalise_line_endings;
use image::ImageFormat;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// PDF user space is measured in points: 72 per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// The embedded text of a document, page by page.
///
/// `pages` holds the text of every page read before `fault` occurred. A
/// document that could not be opened at all has no pages and a fault.
#[derive(Debug, Default)]
pub struct TextLayer {
    /// Page count reported by the document (0 if it could not be opened).
    pub page_count: usize,
    pub pages: Vec<String>,
    pub fault: Option<Pdf2MdError>,
}

/// Read-side operations the extractors need from a PDF engine.
pub trait PdfBackend {
    /// Read the embedded text of every page, in page order.
    ///
    /// Never fails outright: a fault stops reading and is returned alongside
    /// whatever was read before it.
    fn text_layer(&self, pdf_path: &Path) -> TextLayer;

    /// Render every page to a PNG inside `out_dir` at `dpi`.
    ///
    /// Returns the image paths in page order. Any failure is document-level.
    fn rasterize(&self, pdf_path: &Path, dpi: u32, out_dir: &Path)
        -> Result<Vec<PathBuf>, Pdf2MdError>;
}

/// [`PdfBackend`] backed by a bound pdfium library.
pub struct PdfiumBackend {
    pdfium: Pdfium,
    password: Option<String>,
}

impl PdfiumBackend {
    /// Bind to libpdfium.
    ///
    /// With an explicit `library` path only that file is tried. Otherwise the
    /// platform library name in the working directory is tried first, then
    /// the system library search path.
    pub fn bind(library: Option<&Path>, password: Option<String>) -> Result<Self, Pdf2MdError> {
        let bindings = match library {
            Some(path) => Pdfium::bind_to_library(path),
            None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| Pdf2MdError::PdfiumBindingFailed(e.to_string()))?;

        debug!("Bound pdfium library");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
            password,
        })
    }

    fn open(&self, pdf_path: &Path) -> Result<PdfDocument<'_>, Pdf2MdError> {
        let password = self.password.as_deref();
        self.pdfium
            .load_pdf_from_file(pdf_path, password)
            .map_err(|e| {
                let err_str = format!("{:?}", e);
                if err_str.contains("Password") || err_str.contains("password") {
                    if password.is_some() {
                        Pdf2MdError::WrongPassword
                    } else {
                        Pdf2MdError::PasswordRequired
                    }
                } else {
                    Pdf2MdError::CorruptPdf { detail: err_str }
                }
            })
    }
}

impl PdfBackend for PdfiumBackend {
    fn text_layer(&self, pdf_path: &Path) -> TextLayer {
        let mut layer = TextLayer::default();

        let document = match self.open(pdf_path) {
            Ok(document) => document,
            Err(e) => {
                layer.fault = Some(e);
                return layer;
            }
        };

        let pages = document.pages();
        layer.page_count = pages.len() as usize;
        info!("PDF loaded: {} pages", layer.page_count);

        for (idx, page) in pages.iter().enumerate() {
            match page.text() {
                Ok(text) => {
                    let text = normalise_line_endings(&text.all());
                    debug!("Page {} text layer: {} chars", idx + 1, text.len());
                    layer.pages.push(text);
                }
                Err(e) => {
                    layer.fault = Some(Pdf2MdError::TextExtractionFailed {
                        page: idx + 1,
                        detail: format!("{:?}", e),
                    });
                    break;
                }
            }
        }

        layer
    }

    fn rasterize(
        &self,
        pdf_path: &Path,
        dpi: u32,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, Pdf2MdError> {
        let document = self.open(pdf_path)?;
        let pages = document.pages();
        info!("PDF loaded: {} pages, rendering at {} DPI", pages.len(), dpi);

        let render_config =
            PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / POINTS_PER_INCH);

        let mut paths = Vec::with_capacity(pages.len() as usize);
        for (idx, page) in pages.iter().enumerate() {
            let page_num = idx + 1;
            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                Pdf2MdError::RasterisationFailed {
                    page: page_num,
                    detail: format!("{:?}", e),
                }
            })?;

            let image = bitmap.as_image().grayscale();
            let path = out_dir.join(format!("page-{page_num:04}.png"));
            image
                .save_with_format(&path, ImageFormat::Png)
                .map_err(|e| Pdf2MdError::RasterisationFailed {
                    page: page_num,
                    detail: format!("PNG write failed: {e}"),
                })?;

            debug!(
                "Rendered page {} → {}x{} px",
                page_num,
                image.width(),
                image.height()
            );
            paths.push(path);
        }

        Ok(paths)
    }
}
