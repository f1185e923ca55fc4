//! Optional config file loading. Search order: ./ttipage.toml, then
//! $XDG_CONFIG_HOME/ttipage/config.toml (or ~/.config/ttipage/config.toml).

use crate::layout::{FontSize, UnmappedGlyph, Width};
use crate::settings::{parse_font, Color, ReaderSettings, SettingsError};
use serde::Deserialize;

/// Config file contents. All fields optional; only present keys override defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// Text color name, e.g. "Dark Gray".
    pub text_color: Option<String>,
    /// Background color name, e.g. "Sepia".
    pub background_color: Option<String>,
    /// Arial, Georgia, San Francisco, or Times New Roman.
    pub font: Option<String>,
    /// 18, 24, 30, or 36.
    pub font_size: Option<u32>,
    pub horizontal_padding: Option<u32>,
    pub vertical_padding: Option<u32>,
    pub image_width: Option<u32>,
    pub lines_per_page: Option<u32>,
    /// Width in pixels for characters missing from the metrics table. Default: space width.
    pub unmapped_glyph_width: Option<u32>,
    /// Log level for this crate when RUST_LOG is unset (default "warn").
    pub log_level: Option<String>,
}

impl Config {
    /// Apply the present keys on top of `base`. The result is not validated.
    pub fn apply(&self, base: ReaderSettings) -> Result<ReaderSettings, SettingsError> {
        let mut s = base;
        if let Some(ref c) = self.text_color {
            s.text_color = Color::from_name(c)?;
        }
        if let Some(ref c) = self.background_color {
            s.background_color = Color::from_name(c)?;
        }
        if let Some(ref f) = self.font {
            s.font = parse_font(f)?;
        }
        if let Some(size) = self.font_size {
            s.font_size = FontSize::from_points(size)
                .ok_or_else(|| SettingsError::UnsupportedFontSize(size.to_string()))?;
        }
        if let Some(p) = self.horizontal_padding {
            s.horizontal_padding = p;
        }
        if let Some(p) = self.vertical_padding {
            s.vertical_padding = p;
        }
        if let Some(w) = self.image_width {
            s.image_width = w;
        }
        if let Some(n) = self.lines_per_page {
            s.lines_per_page = n;
        }
        Ok(s)
    }

    pub fn unmapped_glyph(&self) -> UnmappedGlyph {
        match self.unmapped_glyph_width {
            Some(px) => UnmappedGlyph::Fixed(Width::from_px(px)),
            None => UnmappedGlyph::SpaceWidth,
        }
    }
}

/// Search order: (1) ./ttipage.toml, (2) $XDG_CONFIG_HOME/ttipage/config.toml.
/// Missing file returns Ok(None). Invalid TOML or I/O error reading a present file returns Err.
pub fn load_config() -> Result<Option<Config>, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Cannot determine current directory: {}", e))?;
    let mut paths = vec![cwd.join("ttipage.toml")];
    if let Some(d) = dirs::config_dir() {
        paths.push(d.join("ttipage").join("config.toml"));
    }
    for path in &paths {
        if path.exists() {
            let s = std::fs::read_to_string(path)
                .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
            let config: Config = toml::from_str(&s)
                .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;
            return Ok(Some(config));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FontFamily;

    #[test]
    fn parse_empty_config() {
        let c: Config = toml::from_str("").unwrap();
        assert!(c.text_color.is_none());
        assert!(c.font.is_none());
        assert!(c.font_size.is_none());
        assert!(c.lines_per_page.is_none());
        assert!(c.unmapped_glyph_width.is_none());
        assert_eq!(c.apply(ReaderSettings::default()).unwrap(), ReaderSettings::default());
        assert_eq!(c.unmapped_glyph(), UnmappedGlyph::SpaceWidth);
    }

    #[test]
    fn parse_full_config() {
        let s = r#"
            text_color = "Light Gray"
            background_color = "dark_gray"
            font = "Times New Roman"
            font_size = 24
            horizontal_padding = 40
            vertical_padding = 10
            image_width = 1200
            lines_per_page = 45
            unmapped_glyph_width = 9
            log_level = "debug"
        "#;
        let c: Config = toml::from_str(s).unwrap();
        let settings = c.apply(ReaderSettings::default()).unwrap();
        assert_eq!(settings.text_color, Color::LightGray);
        assert_eq!(settings.background_color, Color::DarkGray);
        assert_eq!(settings.font, FontFamily::TimesNewRoman);
        assert_eq!(settings.font_size, FontSize::Pt24);
        assert_eq!(settings.horizontal_padding, 40);
        assert_eq!(settings.vertical_padding, 10);
        assert_eq!(settings.image_width, 1200);
        assert_eq!(settings.lines_per_page, 45);
        assert_eq!(c.unmapped_glyph(), UnmappedGlyph::Fixed(Width::from_px(9)));
        assert_eq!(c.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn parse_partial_config_keeps_other_defaults() {
        let c: Config = toml::from_str("lines_per_page = 30").unwrap();
        let settings = c.apply(ReaderSettings::default()).unwrap();
        assert_eq!(settings.lines_per_page, 30);
        assert_eq!(settings.image_width, 800);
        assert_eq!(settings.font, FontFamily::SanFrancisco);
    }

    #[test]
    fn unknown_names_are_rejected_on_apply() {
        let c: Config = toml::from_str("font = \"Papyrus\"").unwrap();
        assert!(matches!(
            c.apply(ReaderSettings::default()),
            Err(SettingsError::UnknownFont(_))
        ));
        let c: Config = toml::from_str("font_size = 20").unwrap();
        assert!(c.apply(ReaderSettings::default()).is_err());
    }

    #[test]
    fn invalid_toml_errors() {
        assert!(toml::from_str::<Config>("image_width = [").is_err());
    }
}
