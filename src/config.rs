//! Configuration types for PDF-to-Markdown conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The pipeline reads nothing from
//! ambient or global state: the OCR toggle, DPI, engine path and logging
//! switch all travel in this one struct, so two conversions with equal
//! configs behave identically.

use crate::error::Pdf2MdError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Valid OCR rasterisation resolutions, in dots per inch.
pub const DPI_RANGE: RangeInclusive<u32> = 100..=600;

/// Default OCR rasterisation resolution.
pub const DEFAULT_DPI: u32 = 300;

/// Configuration for a PDF-to-Markdown conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdftext2md::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .ocr(true)
///     .dpi(400)
///     .ocr_language("deu")
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 400);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Rasterise pages and run OCR instead of reading the embedded text layer.
    /// Default: false.
    pub ocr: bool,

    /// Rendering DPI used when rasterising pages for OCR. Range: 100–600.
    /// Default: 300.
    ///
    /// Only consulted when `ocr` is set. Tesseract is tuned for roughly
    /// 300 DPI input; go higher for very small print.
    pub dpi: u32,

    /// Path to the `tesseract` binary. If None, `tesseract` is looked up on `PATH`.
    pub tesseract_cmd: Option<PathBuf>,

    /// Tesseract language code(s), e.g. "eng" or "eng+deu".
    /// If None, the engine default is used.
    pub ocr_language: Option<String>,

    /// Emit informational progress notices ("Performing OCR on page 3...").
    /// Warnings and errors are always emitted. Default: true.
    pub show_logs: bool,

    /// Run the concatenated-word splitting pass. Default: true.
    pub split_words: bool,

    /// Ranked word list (one word per line, most frequent first; `.gz` accepted)
    /// for the word segmenter. If None, the bundled English list is used.
    pub word_list: Option<PathBuf>,

    /// Explicit path to libpdfium. If None, the library is looked up next to
    /// the executable's working directory and then on the system path.
    pub pdfium_library: Option<PathBuf>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Receives per-page events and notices while a document is processed.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            ocr: false,
            dpi: DEFAULT_DPI,
            tesseract_cmd: None,
            ocr_language: None,
            show_logs: true,
            split_words: true,
            word_list: None,
            pdfium_library: None,
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("ocr", &self.ocr)
            .field("dpi", &self.dpi)
            .field("tesseract_cmd", &self.tesseract_cmd)
            .field("ocr_language", &self.ocr_language)
            .field("show_logs", &self.show_logs)
            .field("split_words", &self.split_words)
            .field("word_list", &self.word_list)
            .field("pdfium_library", &self.pdfium_library)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The command used to launch the OCR engine.
    pub fn tesseract_command(&self) -> PathBuf {
        self.tesseract_cmd
            .clone()
            .unwrap_or_else(|| PathBuf::from("tesseract"))
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn ocr(mut self, enabled: bool) -> Self {
        self.config.ocr = enabled;
        self
    }

    /// Set the OCR DPI. Out-of-range values are rejected by [`build`](Self::build).
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    /// An empty path counts as not provided and leaves `tesseract` on PATH.
    pub fn tesseract_cmd(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.config.tesseract_cmd = (!path.as_os_str().is_empty()).then_some(path);
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = Some(lang.into());
        self
    }

    pub fn show_logs(mut self, v: bool) -> Self {
        self.config.show_logs = v;
        self
    }

    pub fn split_words(mut self, v: bool) -> Self {
        self.config.split_words = v;
        self
    }

    pub fn word_list(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.word_list = Some(path.into());
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2MdError> {
        let c = &self.config;
        if !DPI_RANGE.contains(&c.dpi) {
            return Err(Pdf2MdError::InvalidConfig(format!(
                "DPI must be {}–{}, got {}",
                DPI_RANGE.start(),
                DPI_RANGE.end(),
                c.dpi
            )));
        }
        if c.ocr_language.as_deref().is_some_and(|l| l.trim().is_empty()) {
            return Err(Pdf2MdError::InvalidConfig(
                "OCR language must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_documented_values() {
        let c = ConversionConfig::default();
        assert!(!c.ocr);
        assert_eq!(c.dpi, 300);
        assert!(c.show_logs);
        assert!(c.split_words);
        assert_eq!(c.tesseract_command(), PathBuf::from("tesseract"));
    }

    #[test]
    fn dpi_bounds_are_inclusive() {
        assert!(ConversionConfig::builder().dpi(100).build().is_ok());
        assert!(ConversionConfig::builder().dpi(600).build().is_ok());
    }

    #[test]
    fn dpi_outside_range_is_rejected() {
        for dpi in [0, 72, 99, 601, 1200] {
            let err = ConversionConfig::builder().dpi(dpi).build().unwrap_err();
            assert!(matches!(err, Pdf2MdError::InvalidConfig(_)), "dpi {dpi}");
        }
    }

    #[test]
    fn empty_engine_path_means_default() {
        let c = ConversionConfig::builder().tesseract_cmd("").build().unwrap();
        assert!(c.tesseract_cmd.is_none());
        assert_eq!(c.tesseract_command(), PathBuf::from("tesseract"));
    }

    #[test]
    fn custom_engine_path_is_used() {
        let c = ConversionConfig::builder()
            .tesseract_cmd("/usr/local/bin/tesseract")
            .build()
            .unwrap();
        assert_eq!(
            c.tesseract_command(),
            PathBuf::from("/usr/local/bin/tesseract")
        );
    }

    #[test]
    fn debug_redacts_password() {
        let c = ConversionConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }
}
