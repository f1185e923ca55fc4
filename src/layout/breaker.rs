//! Greedy word wrap over measured glyph widths.
//!
//! Single pass, no hyphenation, no look-ahead past the next word. Every `\n`
//! is a hard break; a blank segment between two breaks becomes an empty line.
//! A word wider than the available width is kept whole on its own line.
//! Text with no words at all gives no lines.

use crate::layout::metrics::{FontVariant, GlyphMetrics, Width};
use serde::Serialize;
use tracing::debug;

/// One laid-out line: words joined by single spaces, and its measured width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub text: String,
    pub width: Width,
}

impl Line {
    pub fn words(&self) -> std::str::SplitWhitespace<'_> {
        self.text.split_whitespace()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True when the line is wider than `available_width`. Only a single
    /// overlong word can produce this.
    pub fn overflows(&self, available_width: Width) -> bool {
        self.width > available_width
    }
}

/// Break `text` into lines using the shared metrics of `variant`.
pub fn paginate(text: &str, available_width: Width, variant: FontVariant) -> Vec<Line> {
    break_lines(text, available_width, GlyphMetrics::for_variant(variant))
}

/// Break `text` into lines no wider than `available_width` under `metrics`.
pub fn break_lines(text: &str, available_width: Width, metrics: &GlyphMetrics) -> Vec<Line> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let space = metrics.space_width();
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = Width::ZERO;
        for word in paragraph.split_whitespace() {
            let word_width = metrics.measure(word);
            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else if current_width + space + word_width <= available_width {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
            } else {
                lines.push(Line {
                    text: std::mem::take(&mut current),
                    width: current_width,
                });
                current.push_str(word);
                current_width = word_width;
            }
        }
        lines.push(Line {
            text: current,
            width: current_width,
        });
    }
    debug!(
        chars = text.len(),
        available_width = %available_width,
        lines = lines.len(),
        "broke text into lines"
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::metrics::{FontFamily, FontSize};

    const PANGRAM: &str = "The quick brown fox jumps over the lazy dog";

    fn ten_px() -> GlyphMetrics {
        GlyphMetrics::uniform(Width::from_px(10))
    }

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    fn sample_chapter() -> String {
        [
            "Zorian's eyes abruptly shot open as a sharp pain erupted from his stomach.",
            "",
            "His whole body convulsed, buckling against the object that fell on him.",
            "",
            "\"Good morning, brother!\" an annoyingly cheerful voice sounded right on top of him.",
            "",
            "Supercalifragilisticexpialidocious-and-then-some is one very long token indeed.",
        ]
        .join("\n")
    }

    #[test]
    fn pangram_breaks_where_width_would_exceed_100px() {
        let lines = break_lines(PANGRAM, Width::from_px(100), &ten_px());
        assert_eq!(
            texts(&lines),
            vec!["The quick", "brown fox", "jumps over", "the lazy", "dog"]
        );
        assert_eq!(lines[2].width, Width::from_px(100));
    }

    #[test]
    fn overlong_word_is_placed_alone_unsplit() {
        let lines = break_lines(
            "Supercalifragilisticexpialidocious",
            Width::from_px(20),
            &ten_px(),
        );
        assert_eq!(texts(&lines), vec!["Supercalifragilisticexpialidocious"]);
        assert!(lines[0].overflows(Width::from_px(20)));
    }

    #[test]
    fn overlong_word_between_short_words() {
        let lines = break_lines("a Supercalifragilistic b", Width::from_px(50), &ten_px());
        assert_eq!(texts(&lines), vec!["a", "Supercalifragilistic", "b"]);
    }

    #[test]
    fn empty_text_gives_no_lines() {
        assert!(break_lines("", Width::from_px(100), &ten_px()).is_empty());
        assert!(paginate("", Width::from_px(760), FontVariant::default()).is_empty());
    }

    #[test]
    fn whitespace_only_text_gives_no_lines() {
        let m = ten_px();
        assert!(break_lines("   ", Width::from_px(100), &m).is_empty());
        assert!(break_lines(" \n\n\t ", Width::from_px(100), &m).is_empty());
    }

    #[test]
    fn blank_line_between_paragraphs_is_kept() {
        let lines = break_lines("one\n\ntwo", Width::from_px(100), &ten_px());
        assert_eq!(texts(&lines), vec!["one", "", "two"]);
        assert!(lines[1].is_empty());
        assert_eq!(lines[1].width, Width::ZERO);
    }

    #[test]
    fn hard_break_starts_new_line_despite_room() {
        let lines = break_lines("a\nb", Width::from_px(1000), &ten_px());
        assert_eq!(texts(&lines), vec!["a", "b"]);
    }

    #[test]
    fn repeated_spaces_collapse_to_one() {
        let lines = break_lines("  a   b\t c  ", Width::from_px(1000), &ten_px());
        assert_eq!(texts(&lines), vec!["a b c"]);
        assert_eq!(lines[0].width, Width::from_px(50));
    }

    #[test]
    fn zero_width_terminates_with_one_word_per_line() {
        let lines = break_lines(PANGRAM, Width::ZERO, &ten_px());
        assert_eq!(lines.len(), 9);
        assert!(lines.iter().all(|l| l.words().count() == 1));
    }

    #[test]
    fn width_bound_holds_and_widths_are_exact() {
        let text = sample_chapter();
        let available = Width::from_px(300);
        for variant in FontVariant::all() {
            let metrics = GlyphMetrics::for_variant(variant);
            for line in break_lines(&text, available, metrics) {
                assert_eq!(line.width, metrics.measure(&line.text), "{}", variant);
                if line.words().count() > 1 {
                    assert!(line.width <= available, "{}: {:?}", variant, line);
                }
            }
        }
    }

    #[test]
    fn words_are_preserved_in_order() {
        let text = sample_chapter();
        let lines = paginate(&text, Width::from_px(240), FontVariant::default());
        let rebuilt: Vec<&str> = lines.iter().flat_map(|l| l.words()).collect();
        let original: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(rebuilt, original);
        assert!(lines.len() >= text.split('\n').count());
    }

    #[test]
    fn paragraph_boundaries_are_preserved() {
        let text = sample_chapter();
        let lines = paginate(&text, Width::from_px(240), FontVariant::default());
        let blanks = lines.iter().filter(|l| l.is_empty()).count();
        assert_eq!(blanks, 3);
    }

    #[test]
    fn output_is_deterministic() {
        let text = sample_chapter();
        let variant = FontVariant::new(FontFamily::Georgia, FontSize::Pt24);
        let first = paginate(&text, Width::from_px(500), variant);
        let second = paginate(&text, Width::from_px(500), variant);
        assert_eq!(first, second);
    }

    #[test]
    fn narrower_width_never_gives_fewer_lines() {
        let text = sample_chapter();
        let variant = FontVariant::new(FontFamily::TimesNewRoman, FontSize::Pt30);
        let mut previous = 0;
        for px in (50..=1500).rev().step_by(25) {
            let count = paginate(&text, Width::from_px(px), variant).len();
            assert!(count >= previous, "{}px gave {} < {}", px, count, previous);
            previous = count;
        }
    }

    #[test]
    fn larger_font_needs_more_lines() {
        let text = sample_chapter();
        let small = paginate(
            &text,
            Width::from_px(400),
            FontVariant::new(FontFamily::Arial, FontSize::Pt18),
        );
        let large = paginate(
            &text,
            Width::from_px(400),
            FontVariant::new(FontFamily::Arial, FontSize::Pt36),
        );
        assert!(large.len() > small.len());
    }
}
