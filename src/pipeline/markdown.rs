//! Markdown conversion of cleaned text through an HTML rule set.
//!
//! Cleaned text is plain paragraphs, so each one is wrapped as a block
//! element before handing it to `htmd`: ATX heading lines ("# Page 3")
//! become `<hN>`, everything else `<p>`. Text is HTML-escaped first, so
//! characters like `<` and `&` come back out as literal text.

use crate::error::Pdf2MdError;
use htmd::options::{HeadingStyle, Options};
use htmd::HtmlToMarkdown;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());
static RE_ATX_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})[ \t]+(.+?)[ \t#]*$").unwrap());

/// Convert cleaned text to Markdown with ATX-style headings.
pub fn convert_to_markdown(text: &str) -> Result<String, Pdf2MdError> {
    let html = to_html_blocks(text);
    debug!("Converting {} bytes of HTML", html.len());

    let converter = HtmlToMarkdown::builder()
        .options(Options {
            heading_style: HeadingStyle::Atx,
            ..Default::default()
        })
        .build();

    converter
        .convert(&html)
        .map_err(|e| Pdf2MdError::MarkdownConversion(e.to_string()))
}

fn to_html_blocks(text: &str) -> String {
    RE_PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|para| !para.is_empty())
        .map(|para| match RE_ATX_HEADING.captures(para) {
            Some(caps) => {
                let level = caps[1].len();
                format!(
                    "<h{level}>{}</h{level}>",
                    html_escape::encode_text(&caps[2])
                )
            }
            None => format!("<p>{}</p>", html_escape::encode_text(para)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
