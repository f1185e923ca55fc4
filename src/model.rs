//! Data exchanged with the reader host at the source-adapter boundary.
//!
//! All site adapters produce these shapes; the host consumes them as JSON.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NovelStatus {
    Ongoing,
    Completed,
    Unknown,
}

/// Metadata of one novel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NovelDetails {
    pub id: String,
    /// Main title first, then alternative names.
    pub titles: Vec<String>,
    #[serde(rename = "coverUrl")]
    pub cover_url: Option<String>,
    pub status: NovelStatus,
    pub author: Option<String>,
    pub artist: Option<String>,
    pub genres: Vec<String>,
    pub description: String,
}

/// One chapter in the novel's chapter list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterEntry {
    /// Site-relative chapter id; may carry its own query (e.g. `?paperbackVolume=2`).
    pub id: String,
    #[serde(rename = "novelId")]
    pub novel_id: String,
    /// Chapter number; 0 when the site does not expose one.
    pub number: f32,
    pub volume: Option<u32>,
    pub title: Option<String>,
}

/// Search result or home-section entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NovelTile {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

/// A named list of tiles on the host's home page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeSection {
    pub id: String,
    pub title: String,
    #[serde(rename = "viewMore")]
    pub view_more: bool,
    pub items: Vec<NovelTile>,
}

/// One page of search results. `next_page` is `None` on the last page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResults {
    pub results: Vec<NovelTile>,
    #[serde(rename = "nextPage")]
    pub next_page: Option<u32>,
}

/// A chapter as the host sees it: one lazily fetched image URL per page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterDetails {
    pub id: String,
    #[serde(rename = "novelId")]
    pub novel_id: String,
    pub pages: Vec<String>,
    #[serde(rename = "longStrip")]
    pub long_strip: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn chapter_details_serializes_to_host_shape() -> Result<(), Box<dyn Error>> {
        let details = ChapterDetails {
            id: "chapter-1".to_string(),
            novel_id: "mother-of-learning".to_string(),
            pages: vec!["https://example.com/a?ttiparse&ttipage=1".to_string()],
            long_strip: false,
        };
        let value: serde_json::Value = serde_json::to_value(&details)?;
        let obj = value.as_object().ok_or("root must be object")?;
        assert_eq!(obj["novelId"].as_str(), Some("mother-of-learning"));
        assert_eq!(obj["longStrip"].as_bool(), Some(false));
        assert_eq!(obj["pages"].as_array().map(|p| p.len()), Some(1));
        Ok(())
    }

    #[test]
    fn novel_details_round_trip() -> Result<(), Box<dyn Error>> {
        let details = NovelDetails {
            id: "mother-of-learning".to_string(),
            titles: vec!["Mother of Learning".to_string(), "MoL".to_string()],
            cover_url: None,
            status: NovelStatus::Completed,
            author: Some("nobody103".to_string()),
            artist: None,
            genres: vec!["Fantasy".to_string()],
            description: "Zorian is a teenage mage in a time loop.".to_string(),
        };
        let json = serde_json::to_string(&details)?;
        assert!(json.contains("\"status\":\"completed\""));
        let back: NovelDetails = serde_json::from_str(&json)?;
        assert_eq!(back, details);
        Ok(())
    }

    #[test]
    fn tile_omits_missing_subtitle() -> Result<(), Box<dyn Error>> {
        let tile = NovelTile {
            id: "x".to_string(),
            title: "X".to_string(),
            subtitle: None,
            image_url: None,
        };
        let json = serde_json::to_string(&tile)?;
        assert!(!json.contains("subtitle"));
        Ok(())
    }
}
