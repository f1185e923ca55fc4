//! ttipage: lay out web novel chapter text as fixed-size "image" pages for a comic reader.

pub mod cli;
pub mod config;
pub mod layout;
pub mod model;
pub mod settings;
pub mod source;
pub mod text;

// Re-exports for CLI and consumers.
pub use layout::{
    break_lines, page_count, paginate, FontFamily, FontSize, FontVariant, GlyphMetrics,
    LayoutParams, Line, Pagination, UnmappedGlyph, Width,
};
pub use settings::{Color, ReaderSettings, SettingsError};
pub use source::{
    chapter_details, page_urls, render_chapter_page, render_page, NovelSource, PageRender,
    PageRequest, SourceError,
};
