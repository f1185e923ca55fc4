//! Page-request URLs: one per page, carrying the page index and the settings
//! stamp so the rasterizer can rebuild the page on its own.
//!
//! Shape: `{chapter_url}{?|&}ttiparse&ttipage={i}&ttisettings={stamp}`.

use crate::settings::ReaderSettings;
use crate::source::error::SourceError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Url;

const MARKER_KEY: &str = "ttiparse";
const PAGE_KEY: &str = "ttipage";
const SETTINGS_KEY: &str = "ttisettings";

/// Everything except the characters a URI component may carry unescaped,
/// so the stamp decodes the same with or without form-urlencoding rules.
const STAMP_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn parse_url(input: &str) -> Result<Url, SourceError> {
    Url::parse(input).map_err(|e| SourceError::InvalidUrl {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// URLs for pages `1..=page_count` of the chapter at `chapter_url`.
/// Existing query pairs of `chapter_url` are kept ahead of the page keys.
pub fn page_urls(
    chapter_url: &str,
    page_count: usize,
    settings: &ReaderSettings,
) -> Result<Vec<String>, SourceError> {
    let base = parse_url(chapter_url)?;
    let stamp = settings.to_stamp();
    Ok((1..=page_count)
        .map(|page| {
            let mut url = base.clone();
            append_page_keys(&mut url, page, &stamp);
            url.to_string()
        })
        .collect())
}

/// Append `ttiparse&ttipage={page}&ttisettings={stamp}` after any existing query.
/// Spaces in the stamp go out as `%20`, never `+`.
fn append_page_keys(url: &mut Url, page: usize, stamp: &str) {
    let keys = format!(
        "{}&{}={}&{}={}",
        MARKER_KEY,
        PAGE_KEY,
        page,
        SETTINGS_KEY,
        utf8_percent_encode(stamp, STAMP_ENCODE_SET)
    );
    let query = match url.query() {
        Some(q) if !q.is_empty() => format!("{}&{}", q, keys),
        _ => keys,
    };
    url.set_query(Some(&query));
}

fn is_page_key(segment: &str) -> bool {
    let key = segment.split('=').next().unwrap_or(segment);
    key == MARKER_KEY || key == PAGE_KEY || key == SETTINGS_KEY
}

/// Whether `url` carries the page-request marker.
pub fn is_page_request(url: &str) -> bool {
    Url::parse(url)
        .map(|u| u.query_pairs().any(|(k, _)| k == MARKER_KEY))
        .unwrap_or(false)
}

/// A decoded page-request URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// The chapter URL with the page keys removed.
    pub chapter_url: String,
    /// 1-based page index.
    pub page: usize,
    pub settings: ReaderSettings,
}

impl PageRequest {
    pub fn parse(input: &str) -> Result<PageRequest, SourceError> {
        let mut url = parse_url(input)?;
        let mut marker = false;
        let mut page = None;
        let mut stamp = None;
        for (key, value) in url.query_pairs() {
            match &*key {
                MARKER_KEY => marker = true,
                PAGE_KEY => page = Some(value.into_owned()),
                SETTINGS_KEY => stamp = Some(value.into_owned()),
                _ => {}
            }
        }
        if !marker {
            return Err(SourceError::NotPageRequest {
                url: input.to_string(),
            });
        }
        let page = page.ok_or_else(|| SourceError::MissingParam {
            url: input.to_string(),
            param: PAGE_KEY,
        })?;
        let page = match page.trim().parse::<usize>() {
            Ok(p) if p >= 1 => p,
            _ => return Err(SourceError::InvalidPageIndex { value: page }),
        };
        let stamp = stamp.ok_or_else(|| SourceError::MissingParam {
            url: input.to_string(),
            param: SETTINGS_KEY,
        })?;
        let settings = ReaderSettings::from_stamp(&stamp)?;

        // Keep the chapter's own query segments byte for byte.
        let rest = url
            .query()
            .unwrap_or("")
            .split('&')
            .filter(|segment| !segment.is_empty() && !is_page_key(segment))
            .collect::<Vec<_>>()
            .join("&");
        if rest.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&rest));
        }
        Ok(PageRequest {
            chapter_url: url.to_string(),
            page,
            settings,
        })
    }

    /// This request's own URL (the inverse of [PageRequest::parse]).
    pub fn to_url(&self) -> Result<String, SourceError> {
        let mut url = parse_url(&self.chapter_url)?;
        append_page_keys(&mut url, self.page, &self.settings.to_stamp());
        Ok(url.to_string())
    }
}
