//! Chapter text normalization: scraped paragraphs to the ASCII text the line breaker consumes.

use scraper::{Html, Selector};

/// Paragraphs are separated by one blank line; the breaker keeps it as an empty line.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Class sites use for hidden anti-scrape paragraphs.
const HIDDEN_CLASS: &str = "display-hide";

/// Text of every `<p>` in `html`, in document order, with entities decoded.
/// Paragraphs marked hidden are skipped.
pub fn paragraphs_from_html(html: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(html);
    let Ok(selector) = Selector::parse("p") else {
        return Vec::new();
    };
    fragment
        .select(&selector)
        .filter(|p| !p.value().has_class(HIDDEN_CLASS, scraper::CaseSensitivity::CaseSensitive))
        .map(|p| decode_entities(p.text().collect::<String>().trim()))
        .collect()
}

/// Decode HTML entities left in already-extracted text (e.g. double-escaped `&amp;quot;`).
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let escaped = text.replace('<', "&lt;").replace('>', "&gt;");
    let fragment = Html::parse_fragment(&escaped);
    fragment.root_element().text().collect()
}

/// Join paragraphs into one chapter string.
pub fn chapter_text<S: AsRef<str>>(paragraphs: &[S]) -> String {
    paragraphs
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}

/// Drop every character outside 7-bit ASCII.
pub fn strip_non_ascii(text: &str) -> String {
    text.chars().filter(char::is_ascii).collect()
}

/// Join then strip: the exact input the breaker is run on.
pub fn normalize<S: AsRef<str>>(paragraphs: &[S]) -> String {
    strip_non_ascii(&chapter_text(paragraphs))
}
