//! Word segmentation for run-together words ("thequickbrownfox").
//!
//! [`DictionarySegmenter`] picks the most probable split of a run of letters
//! under a Zipf model of a ranked word list: the word at rank `r` (0-based)
//! costs `ln((r + 1) · ln N)` and the split with the lowest total cost wins.
//! Words outside the list cost infinity, so an unknown run falls apart into
//! single characters only when nothing better exists.
//!
//! Without a configured list the crate's bundled English list is used. When
//! a configured list can't be read the pipeline uses
//! [`UnavailableSegmenter`], and the cleaner skips the pass with a warning.

use crate::config::ConversionConfig;
use crate::error::Pdf2MdError;
use flate2::read::GzDecoder;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Splits a token into its most likely component words.
pub trait WordSegmenter {
    /// Split `token` into pieces, preserving the original letter case.
    fn segment(&self, token: &str) -> Vec<String>;

    /// Why segmentation cannot run, or `None` when it can.
    fn unavailable_reason(&self) -> Option<&str> {
        None
    }
}

/// Stand-in used when no word list could be loaded.
#[derive(Debug, Clone)]
pub struct UnavailableSegmenter {
    reason: String,
}

impl UnavailableSegmenter {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl WordSegmenter for UnavailableSegmenter {
    fn segment(&self, token: &str) -> Vec<String> {
        vec![token.to_string()]
    }

    fn unavailable_reason(&self) -> Option<&str> {
        Some(&self.reason)
    }
}

/// English words ranked by frequency, one per line, gzipped.
const ENGLISH_WORDS_GZ: &[u8] = include_bytes!("../../data/words-en.txt.gz");

/// Characters that separate independent runs inside one token.
static RE_NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9']+").unwrap());

/// Zipf-cost word segmenter over a ranked word list.
#[derive(Debug, Clone)]
pub struct DictionarySegmenter {
    costs: HashMap<String, f64>,
    max_word_len: usize,
}

impl DictionarySegmenter {
    /// Build from words ordered most frequent first.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        let ln_n = (words.len().max(2) as f64).ln();
        let max_word_len = words.iter().map(|w| w.len()).max().unwrap_or(0);
        let costs = words
            .into_iter()
            .enumerate()
            .map(|(rank, word)| (word, ((rank + 1) as f64 * ln_n).ln()))
            .collect();

        Self {
            costs,
            max_word_len,
        }
    }

    /// Load a whitespace-separated word list; `.gz` files are decompressed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Pdf2MdError> {
        let path = path.as_ref();
        let unreadable = |source| Pdf2MdError::WordListUnreadable {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(unreadable)?;
        let mut reader: Box<dyn Read> = if path.extension().is_some_and(|e| e == "gz") {
            Box::new(GzDecoder::new(BufReader::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        let mut contents = String::new();
        reader.read_to_string(&mut contents).map_err(unreadable)?;
        Ok(Self::from_words(contents.split_whitespace()))
    }

    /// The bundled English word list.
    pub fn english() -> Result<Self, Pdf2MdError> {
        let mut contents = String::new();
        GzDecoder::new(ENGLISH_WORDS_GZ)
            .read_to_string(&mut contents)
            .map_err(|source| Pdf2MdError::WordListUnreadable {
                path: PathBuf::from("<bundled>/words-en.txt.gz"),
                source,
            })?;
        Ok(Self::from_words(contents.split_whitespace()))
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    fn word_cost(&self, word: &str) -> f64 {
        self.costs.get(word).copied().unwrap_or(f64::INFINITY)
    }

    /// Cheapest last word ending at byte `i`: `(total cost, word length)`.
    /// Ties go to the shorter word.
    fn best_match(&self, lower: &str, cost: &[f64], i: usize) -> (f64, usize) {
        let longest = self.max_word_len.max(1).min(i);
        let mut best = (f64::INFINITY, 1);
        for k in 1..=longest {
            let candidate = cost[i - k] + self.word_cost(&lower[i - k..i]);
            if k == 1 || candidate < best.0 {
                best = (candidate, k);
            }
        }
        best
    }

    /// Segment one ASCII run of `[a-zA-Z0-9']`.
    fn split_run(&self, run: &str) -> Vec<String> {
        if run.is_empty() {
            return Vec::new();
        }
        let lower = run.to_ascii_lowercase();
        let n = run.len();

        let mut cost = vec![0.0; n + 1];
        for i in 1..=n {
            let (c, _) = self.best_match(&lower, &cost, i);
            cost[i] = c;
        }

        let bytes = run.as_bytes();
        let mut out: Vec<String> = Vec::new();
        let mut i = n;
        while i > 0 {
            let (_, k) = self.best_match(&lower, &cost, i);
            let piece = &run[i - k..i];

            // Glue "'s" and digit runs back onto the preceding piece.
            let mut merged = false;
            if piece != "'" {
                if let Some(last) = out.last_mut() {
                    let digits = bytes[i - 1].is_ascii_digit()
                        && last.as_bytes().first().is_some_and(u8::is_ascii_digit);
                    if *last == "'s" || digits {
                        *last = format!("{piece}{last}");
                        merged = true;
                    }
                }
            }
            if !merged {
                out.push(piece.to_string());
            }
            i -= k;
        }

        out.reverse();
        out
    }
}

impl WordSegmenter for DictionarySegmenter {
    fn segment(&self, token: &str) -> Vec<String> {
        RE_NON_WORD
            .split(token)
            .flat_map(|run| self.split_run(run))
            .collect()
    }
}

/// The segmenter described by `config.word_list`, or the bundled English
/// list when none is configured.
pub fn segmenter_from_config(config: &ConversionConfig) -> Box<dyn WordSegmenter> {
    let Some(path) = &config.word_list else {
        return match DictionarySegmenter::english() {
            Ok(segmenter) => {
                info!("Loaded {} bundled English words for segmentation", segmenter.len());
                Box::new(segmenter)
            }
            Err(e) => {
                warn!("{}", e);
                Box::new(UnavailableSegmenter::new(e.to_string()))
            }
        };
    };

    match DictionarySegmenter::from_path(path) {
        Ok(segmenter) => {
            info!(
                "Loaded {} words for segmentation from {}",
                segmenter.len(),
                path.display()
            );
            Box::new(segmenter)
        }
        Err(e) => {
            warn!("{}", e);
            Box::new(UnavailableSegmenter::new(e.to_string()))
        }
    }
}
