//! Text cleanup between extraction and Markdown conversion.
//!
//! The passes run in a fixed order over the combined "# Page N" text:
//!
//! 1. Drop running header/footer lines of the form `12/40 2024`
//! 2. Rejoin words hyphenated across a line break
//! 3. Insert a space after a period glued to a capital letter
//! 4. Split into paragraphs on blank lines, unwrap each paragraph onto one
//!    line and separate lower/upper case letters glued together
//! 5. Optionally split long run-together tokens with the [`WordSegmenter`]
//!
//! Passes 3 and 4 are lossy: "e.g.Foo" and "iPhone" are split too.

use crate::pipeline::segment::WordSegmenter;
use crate::progress::Reporter;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

/// Tokens at most this many characters long are never segmented.
pub const SEGMENT_MIN_TOKEN_CHARS: usize = 15;

static RE_LINE_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r\n|[\n\r\x0B\x0C\x1C\x1D\x1E\x{85}\x{2028}\x{2029}]").unwrap()
});
static RE_PAGE_FOOTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+/\d+\s+\d{4}\s*$").unwrap());
static RE_HYPHEN_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)-\n(\w+)").unwrap());
static RE_PERIOD_CAPITAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.([A-Z])").unwrap());
static RE_PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());
static RE_LOWER_UPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());
static RE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

/// Run every cleanup pass over `text`.
///
/// With `split_words` set and an unavailable segmenter, the segmentation
/// pass is skipped and a warning notice is recorded.
pub fn clean_extracted_text(
    text: &str,
    split_words: bool,
    segmenter: &dyn WordSegmenter,
    report: &mut Reporter<'_>,
) -> String {
    let s = remove_page_footers(text);
    let s = repair_hyphenation(&s);
    let s = space_after_periods(&s);
    let s = reflow_paragraphs(&s);

    if !split_words {
        return s;
    }
    match segmenter.unavailable_reason() {
        Some(reason) => {
            report.warning(format!(
                "Word segmentation unavailable ({reason}); skipping concatenated word splitting."
            ));
            s
        }
        None => split_long_tokens(&s, segmenter),
    }
}

/// Split on every line boundary recognised by Unicode, dropping one
/// trailing terminator.
fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<&str> = RE_LINE_BREAK.split(text).collect();
    let ends_with_break = RE_LINE_BREAK
        .find_iter(text)
        .last()
        .is_some_and(|m| m.end() == text.len());
    if ends_with_break {
        lines.pop();
    }
    lines
}

fn remove_page_footers(text: &str) -> String {
    split_lines(text)
        .into_iter()
        .filter(|line| !RE_PAGE_FOOTER.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn repair_hyphenation(text: &str) -> String {
    RE_HYPHEN_BREAK.replace_all(text, "${1}${2}").into_owned()
}

fn space_after_periods(text: &str) -> String {
    RE_PERIOD_CAPITAL.replace_all(text, ". ${1}").into_owned()
}

fn reflow_paragraphs(text: &str) -> String {
    RE_PARAGRAPH_BREAK
        .split(text)
        .map(|para| {
            let joined = para.replace('\n', " ");
            RE_LOWER_UPPER
                .replace_all(joined.trim(), "${1} ${2}")
                .into_owned()
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Rewrite long tokens in place, leaving the whitespace between them as is.
fn split_long_tokens(text: &str, segmenter: &dyn WordSegmenter) -> String {
    let mut rewritten = 0usize;
    let out = RE_TOKEN.replace_all(text, |caps: &Captures<'_>| {
        let token = &caps[0];
        if token.chars().count() <= SEGMENT_MIN_TOKEN_CHARS {
            return token.to_string();
        }
        let pieces = segmenter.segment(token);
        let joined = pieces.join(" ");
        if pieces.len() > 1 && joined != token {
            rewritten += 1;
            joined
        } else {
            token.to_string()
        }
    });
    debug!("Word segmentation rewrote {} tokens", rewritten);
    out.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::NoticeLevel;
    use crate::pipeline::segment::{DictionarySegmenter, UnavailableSegmenter};

    fn no_split() -> UnavailableSegmenter {
        UnavailableSegmenter::new("test")
    }

    fn clean(text: &str) -> String {
        clean_extracted_text(text, false, &no_split(), &mut Reporter::silent())
    }

    #[test]
    fn drops_page_footer_lines() {
        assert_eq!(
            remove_page_footers("Intro\n  12/40 2024 \nBody"),
            "Intro\nBody"
        );
        assert_eq!(
            remove_page_footers("Section 4/3 2024 notes\n4/3 2024"),
            "Section 4/3 2024 notes"
        );
    }

    #[test]
    fn footer_removal_splits_on_form_feed() {
        assert_eq!(remove_page_footers("Body\x0c3/9 2023\n"), "Body");
    }

    #[test]
    fn rejoins_hyphenated_words() {
        assert_eq!(repair_hyphenation("exam-\nple"), "example");
        assert_eq!(repair_hyphenation("exam\nple"), "exam\nple");
        assert_eq!(repair_hyphenation("well- known"), "well- known");
    }

    #[test]
    fn spaces_glued_sentences() {
        assert_eq!(space_after_periods("end.Next"), "end. Next");
        assert_eq!(space_after_periods("v1.2"), "v1.2");
    }

    #[test]
    fn reflows_paragraphs() {
        assert_eq!(
            reflow_paragraphs("first line\nsecond line\n \n\nthirdPara"),
            "first line second line\n\nthird Para"
        );
    }

    #[test]
    fn digital_sample_is_cleaned() {
        let raw = "\n\n# Page 1\n\nHello World.\n\n# Page 2\n\n49/3 2024\nSecond page.";
        assert_eq!(
            clean(raw),
            "\n\n# Page 1\n\nHello World.\n\n# Page 2\n\nSecond page."
        );
    }

    #[test]
    fn cleaning_is_idempotent() {
        let raw = "\n\n# Page 1\n\nThe quick brown\nfox jumps.\n\nSecond para-\ngraph here.Next one";
        let once = clean(raw);
        assert_eq!(
            once,
            "\n\n# Page 1\n\nThe quick brown fox jumps.\n\nSecond paragraph here. Next one"
        );
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn splits_only_long_tokens() {
        let seg = DictionarySegmenter::from_words(["the", "quick", "brown", "fox", "jumps"]);
        let mut report = Reporter::silent();
        let out = clean_extracted_text(
            "# Page 1\n\nthequickbrownfoxjumps quickbrownjumps",
            true,
            &seg,
            &mut report,
        );
        assert_eq!(out, "# Page 1\n\nthe quick brown fox jumps quickbrownjumps");
        assert!(report.notices().is_empty());
    }

    #[test]
    fn single_piece_tokens_are_kept() {
        struct Whole;
        impl WordSegmenter for Whole {
            fn segment(&self, token: &str) -> Vec<String> {
                vec![token.to_string()]
            }
        }
        let text = "supercalifragilistic";
        let out = clean_extracted_text(text, true, &Whole, &mut Reporter::silent());
        assert_eq!(out, text);
    }

    #[test]
    fn unavailable_segmenter_warns_and_skips() {
        let mut report = Reporter::new(false, None);
        let out = clean_extracted_text("thequickbrownfoxjumps", true, &no_split(), &mut report);
        assert_eq!(out, "thequickbrownfoxjumps");
        let notices = report.into_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn split_words_off_never_warns() {
        let mut report = Reporter::silent();
        clean_extracted_text("thequickbrownfoxjumps", false, &no_split(), &mut report);
        assert!(report.notices().is_empty());
    }
}
