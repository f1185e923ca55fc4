//! Source adapters and the chapter-to-pages pipeline.
//!
//! A site is an implementation of [NovelSource]; the pipeline functions take
//! any adapter plus explicit [ReaderSettings] and never hold state between calls.

mod error;
pub mod page_url;

pub use error::SourceError;
pub use page_url::{is_page_request, page_urls, PageRequest};

use crate::layout::{GlyphMetrics, Line, Pagination, UnmappedGlyph, Width};
use crate::model::{ChapterDetails, ChapterEntry, HomeSection, NovelDetails, PagedResults};
use crate::settings::ReaderSettings;
use crate::text;
use serde::Serialize;
use tracing::debug;

/// Capabilities a site adapter provides to the reader host.
pub trait NovelSource {
    /// Site root, without a trailing slash.
    fn base_url(&self) -> &str;

    fn fetch_details(&mut self, novel_id: &str) -> Result<NovelDetails, SourceError>;

    fn fetch_chapter_list(&mut self, novel_id: &str) -> Result<Vec<ChapterEntry>, SourceError>;

    /// Decoded paragraph texts of one chapter, in reading order.
    fn fetch_chapter_text(
        &mut self,
        novel_id: &str,
        chapter_id: &str,
    ) -> Result<Vec<String>, SourceError>;

    /// `page` is 1-based.
    fn search(&mut self, query: &str, page: u32) -> Result<PagedResults, SourceError>;

    fn list_home_sections(&mut self) -> Result<Vec<HomeSection>, SourceError>;

    fn chapter_url(&self, novel_id: &str, chapter_id: &str) -> String {
        format!("{}/{}/{}", self.base_url(), novel_id, chapter_id)
    }
}

fn metrics_for(settings: &ReaderSettings, unmapped: UnmappedGlyph) -> GlyphMetrics {
    GlyphMetrics::for_variant(settings.variant()).with_unmapped(unmapped)
}

/// Lay out normalized chapter paragraphs under `settings`.
pub fn paginate_paragraphs<S: AsRef<str>>(
    paragraphs: &[S],
    settings: &ReaderSettings,
    unmapped: UnmappedGlyph,
) -> Pagination {
    let normalized = text::normalize(paragraphs);
    Pagination::with_metrics(
        &normalized,
        &settings.layout_params(),
        &metrics_for(settings, unmapped),
    )
}

/// Fetch a chapter, count its pages, and return one page-request URL per page.
pub fn chapter_details<S: NovelSource + ?Sized>(
    source: &mut S,
    novel_id: &str,
    chapter_id: &str,
    settings: &ReaderSettings,
    unmapped: UnmappedGlyph,
) -> Result<ChapterDetails, SourceError> {
    settings.validate()?;
    let paragraphs = source.fetch_chapter_text(novel_id, chapter_id)?;
    let pagination = paginate_paragraphs(&paragraphs, settings, unmapped);
    let chapter_url = source.chapter_url(novel_id, chapter_id);
    let pages = page_urls(&chapter_url, pagination.page_count(), settings)?;
    debug!(
        novel_id = %novel_id,
        chapter_id = %chapter_id,
        lines = pagination.line_count(),
        pages = pages.len(),
        "built chapter pages"
    );
    Ok(ChapterDetails {
        id: chapter_id.to_string(),
        novel_id: novel_id.to_string(),
        pages,
        long_strip: false,
    })
}

/// Everything the rasterizer needs to draw one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRender {
    pub page: usize,
    pub page_count: usize,
    pub lines: Vec<Line>,
    pub lines_per_page: usize,
    /// Metric key of the font, e.g. `sanfrancisco18`.
    pub font: String,
    pub text_rgb: u32,
    pub background_rgb: u32,
    pub image_width: u32,
    pub available_width: Width,
    pub horizontal_padding: u32,
    pub vertical_padding: u32,
}

/// Re-derive the page named by `request` from the chapter's paragraphs.
pub fn render_page<S: AsRef<str>>(
    paragraphs: &[S],
    request: &PageRequest,
    unmapped: UnmappedGlyph,
) -> Result<PageRender, SourceError> {
    let settings = &request.settings;
    let pagination = paginate_paragraphs(paragraphs, settings, unmapped);
    let page_count = pagination.page_count();
    let lines = pagination
        .page(request.page)
        .ok_or(SourceError::PageOutOfRange {
            page: request.page,
            page_count,
        })?
        .to_vec();
    Ok(PageRender {
        page: request.page,
        page_count,
        lines,
        lines_per_page: pagination.lines_per_page(),
        font: settings.variant().key(),
        text_rgb: settings.text_color.rgb(),
        background_rgb: settings.background_color.rgb(),
        image_width: settings.image_width,
        available_width: settings.available_width(),
        horizontal_padding: settings.horizontal_padding,
        vertical_padding: settings.vertical_padding,
    })
}

/// Fetch the chapter behind `request` from `source` and render the requested page.
pub fn render_chapter_page<S: NovelSource + ?Sized>(
    source: &mut S,
    novel_id: &str,
    chapter_id: &str,
    request: &PageRequest,
    unmapped: UnmappedGlyph,
) -> Result<PageRender, SourceError> {
    let paragraphs = source.fetch_chapter_text(novel_id, chapter_id)?;
    render_page(&paragraphs, request, unmapped)
}
