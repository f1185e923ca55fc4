//! Text-to-page layout: glyph metrics, line breaking, and fixed-size page grouping.

pub mod breaker;
pub mod metrics;

pub use breaker::{break_lines, paginate, Line};
pub use metrics::{width, FontFamily, FontSize, FontVariant, GlyphMetrics, UnmappedGlyph, Width};

use tracing::debug;

/// Parameters for one pagination call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    /// Render width minus both horizontal paddings.
    pub available_width: Width,
    pub variant: FontVariant,
    pub lines_per_page: usize,
}

/// Number of pages needed for `line_count` lines, `lines_per_page` at a time.
///
/// `lines_per_page` of zero is treated as one.
pub fn page_count(line_count: usize, lines_per_page: usize) -> usize {
    line_count.div_ceil(lines_per_page.max(1))
}

/// Lines of one chapter and their grouping into pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    lines: Vec<Line>,
    lines_per_page: usize,
}

impl Pagination {
    /// Lay out `text` with the shared metrics for `params.variant`.
    pub fn new(text: &str, params: &LayoutParams) -> Self {
        Self::with_metrics(text, params, GlyphMetrics::for_variant(params.variant))
    }

    /// Lay out `text` with explicit metrics (e.g. a non-default unmapped-glyph policy).
    pub fn with_metrics(text: &str, params: &LayoutParams, metrics: &GlyphMetrics) -> Self {
        let lines = break_lines(text, params.available_width, metrics);
        let pagination = Self {
            lines,
            lines_per_page: params.lines_per_page.max(1),
        };
        debug!(
            font = %params.variant,
            lines = pagination.line_count(),
            pages = pagination.page_count(),
            "paginated chapter"
        );
        pagination
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines_per_page(&self) -> usize {
        self.lines_per_page
    }

    pub fn page_count(&self) -> usize {
        page_count(self.lines.len(), self.lines_per_page)
    }

    /// Lines of page `index` (1-based). `None` for 0 or past the last page.
    pub fn page(&self, index: usize) -> Option<&[Line]> {
        if index == 0 || index > self.page_count() {
            return None;
        }
        let start = (index - 1) * self.lines_per_page;
        let end = (start + self.lines_per_page).min(self.lines.len());
        Some(&self.lines[start..end])
    }

    /// All pages in order.
    pub fn pages(&self) -> std::slice::Chunks<'_, Line> {
        self.lines.chunks(self.lines_per_page)
    }
}
