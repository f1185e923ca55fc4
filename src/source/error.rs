//! Shared error type for source adapters and page requests.

use crate::settings::SettingsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Invalid URL: {input}: {reason}")]
    InvalidUrl { input: String, reason: String },

    // Page requests
    #[error("Not a page request (no ttiparse marker): {url}")]
    NotPageRequest { url: String },

    #[error("Page request {url} is missing '{param}'.")]
    MissingParam { url: String, param: &'static str },

    #[error("Invalid page index '{value}': pages are numbered from 1.")]
    InvalidPageIndex { value: String },

    #[error("Page {page} does not exist; the chapter has {page_count} page(s).")]
    PageOutOfRange { page: usize, page_count: usize },

    #[error("Invalid page settings: {0}")]
    Settings(#[from] SettingsError),

    // Adapter failures
    #[error("Not found: {0}")]
    NotFound(String),
}
