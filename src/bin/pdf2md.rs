//! CLI binary for pdftext2md.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdftext2md::convert::write_atomically;
use pdftext2md::{
    ConversionConfig, ConversionOutcome, ConversionProgressCallback, Converter, ExtractionMode,
    Notice, NoticeLevel, Pdf2MdError, ProgressCallback, DEFAULT_DPI,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner plus one log line per page and per
/// warning or error notice.
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, mode: ExtractionMode) {
        self.bar.set_prefix(match mode {
            ExtractionMode::Digital => "Reading text layer",
            ExtractionMode::Ocr => "Running OCR",
        });
    }

    fn on_page_start(&self, page_num: usize, total: usize) {
        self.bar.set_message(format!("page {page_num}/{total}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, text_len: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{text_len:>5} chars")),
        ));
    }

    fn on_page_error(&self, _page_num: usize, _total: usize, _error: &str) {
        // The matching error notice carries the message.
        self.errors.fetch_add(1, Ordering::SeqCst);
    }

    fn on_notice(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info => self.bar.set_message(notice.message.clone()),
            NoticeLevel::Warning => self
                .bar
                .println(format!("  {} {}", yellow("⚠"), notice.message)),
            NoticeLevel::Error => self
                .bar
                .println(format!("  {} {}", red("✗"), red(&notice.message))),
        }
    }

    fn on_conversion_complete(&self, extracted_pages: usize, total_pages: usize) {
        self.bar.finish_and_clear();
        let errors = self.errors.load(Ordering::SeqCst);

        if extracted_pages == 0 {
            eprintln!("{} no page yielded text", red("✘"));
        } else if errors == 0 {
            eprintln!(
                "{} {}/{} pages with text",
                green("✔"),
                bold(&extracted_pages.to_string()),
                total_pages
            );
        } else {
            eprintln!(
                "{} {}/{} pages with text  ({} failed)",
                yellow("⚠"),
                bold(&extracted_pages.to_string()),
                total_pages,
                red(&errors.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Digital PDF → Markdown on stdout
  pdf2md document.pdf

  # Convert to file
  pdf2md document.pdf -o output.md

  # Scanned PDF: OCR at 400 DPI in German
  pdf2md --ocr --dpi 400 --ocr-lang deu scan.pdf -o scan.md

  # Split run-together words using your own ranked word list
  pdf2md --word-list words.txt.gz document.pdf

  # Read from stdin, JSON result with per-page outcomes and notices
  cat document.pdf | pdf2md --json -

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH     Path to libpdfium (default: ./ then system library path)
  TESSERACT_CMD       Path to the tesseract binary (default: tesseract on PATH)
  PDF2MD_WORD_LIST    Ranked word list for word splitting (default: bundled English)
  RUST_LOG            Override the tracing filter (e.g. pdftext2md=debug)
"#;

/// Convert PDF files to Markdown from their text layer or via OCR.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2md",
    version,
    about = "Convert PDF files to Markdown from their text layer or via OCR",
    long_about = "Convert PDF documents to clean Markdown. Text is read from the embedded text \
layer by default; --ocr rasterises every page and runs Tesseract instead. Each page with text \
becomes a '# Page N' section.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file path, or `-` to read from stdin.
    input: PathBuf,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long, env = "PDF2MD_OUTPUT")]
    output: Option<PathBuf>,

    /// Rasterise pages and run OCR instead of reading the text layer.
    #[arg(long, env = "PDF2MD_OCR")]
    ocr: bool,

    /// Path to the tesseract binary.
    #[arg(long, env = "TESSERACT_CMD")]
    tesseract_cmd: Option<PathBuf>,

    /// Tesseract language code(s), e.g. eng or eng+deu.
    #[arg(long, env = "PDF2MD_OCR_LANG")]
    ocr_lang: Option<String>,

    /// OCR rendering DPI (100–600).
    #[arg(long, env = "PDF2MD_DPI", default_value_t = DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(100..=600))]
    dpi: u32,

    /// Skip splitting of run-together words.
    #[arg(long, env = "PDF2MD_NO_SPLIT_WORDS")]
    no_split_words: bool,

    /// Ranked word list (most frequent first, `.gz` accepted) for word splitting
    /// [default: bundled English list].
    #[arg(long, env = "PDF2MD_WORD_LIST")]
    word_list: Option<PathBuf>,

    /// Suppress informational progress notices.
    #[arg(long, env = "PDF2MD_NO_LOGS")]
    no_logs: bool,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2MD_PASSWORD")]
    password: Option<String>,

    /// Path to libpdfium.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Output the structured result as JSON instead of Markdown.
    #[arg(long, env = "PDF2MD_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2MD_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback that matters; keep library INFO
    // logs out of its way.
    let show_progress = !cli.quiet && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let converter = Converter::new(&config).context("Failed to initialise the PDF engine")?;
    let outcome = converter
        .convert_file(&cli.input)
        .with_context(|| format!("Conversion of {} failed", cli.input.display()))?;

    // Without the spinner nobody has shown the notices yet.
    if !show_progress {
        print_notices(outcome.notices(), cli.quiet);
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&outcome).context("Failed to serialise output")?;
        println!("{json}");
    }

    let output = match outcome {
        ConversionOutcome::Converted(output) => output,
        ConversionOutcome::NoText(_) => return Err(Pdf2MdError::NoExtractableText.into()),
    };

    if let Some(ref output_path) = cli.output {
        write_atomically(output_path, &output.markdown)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        if !cli.quiet {
            eprintln!(
                "{}  {}/{} pages  {}ms  →  {}",
                if output.stats.failed_pages == 0 {
                    green("✔")
                } else {
                    yellow("⚠")
                },
                output.stats.extracted_pages,
                output.stats.total_pages,
                output.stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
        }
    } else if !cli.json {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.markdown.as_bytes())
            .context("Failed to write to stdout")?;

        if !cli.quiet && !show_progress {
            eprintln!(
                "Converted {}/{} pages in {}ms",
                output.stats.extracted_pages, output.stats.total_pages, output.stats.total_duration_ms
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .ocr(cli.ocr)
        .dpi(cli.dpi)
        .split_words(!cli.no_split_words)
        .show_logs(!cli.no_logs);

    if let Some(ref cmd) = cli.tesseract_cmd {
        builder = builder.tesseract_cmd(cmd);
    }
    if let Some(ref lang) = cli.ocr_lang {
        builder = builder.ocr_language(lang);
    }
    if let Some(ref path) = cli.word_list {
        builder = builder.word_list(path);
    }
    if let Some(ref path) = cli.pdfium_lib {
        builder = builder.pdfium_library(path);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_notices(notices: &[Notice], quiet: bool) {
    for notice in notices {
        if quiet && notice.level != NoticeLevel::Error {
            continue;
        }
        eprintln!("{notice}");
    }
}
