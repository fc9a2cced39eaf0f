//! Pipeline stages for PDF-to-Markdown conversion.
//!
//! Each submodule implements exactly one transformation step, so each is
//! independently testable and the PDF engine or OCR engine can be swapped
//! behind its trait without touching the other stages.
//!
//! ## Data Flow
//!
//! ```text
//!                 ┌─▶ text_layer ─┐
//! input ──▶ render│               ├─▶ clean ──▶ markdown ──▶ postprocess
//! (bytes)  (pdfium)└─▶ ocr ───────┘   (+segment)  (htmd)      (polish)
//! ```
//!
//! 1. [`input`]       — read the source bytes and persist them to a scoped temp file
//! 2. [`render`]      — the [`render::PdfBackend`] seam and its pdfium implementation
//! 3. [`text_layer`]  — digital path: one "# Page N" block per page with text
//! 4. [`ocr`]         — OCR path: rasterise into a temp dir, recognise page by page
//! 5. [`extract`]     — the per-page outcomes both extractors produce
//! 6. [`clean`]       — header removal, hyphenation repair, paragraph reflow
//! 7. [`segment`]     — dictionary word segmentation for run-together words
//! 8. [`markdown`]    — HTML rule set conversion with ATX headings
//! 9. [`postprocess`] — final line-ending and trailing-whitespace tidy

pub mod clean;
pub mod extract;
pub mod input;
pub mod markdown;
pub mod ocr;
pub mod postprocess;
pub mod render;
pub mod segment;
pub mod text_layer;
