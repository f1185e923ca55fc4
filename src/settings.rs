//! Reader style settings: colors, font, paddings, image width, lines per page.
//!
//! Settings travel inside page-request URLs as a comma-separated stamp so a
//! page can be regenerated later without server-side state:
//! `textColor,backgroundColor,fontSize,font,horizontalPadding,verticalPadding,imageWidth,linesPerPage`.

use crate::layout::{FontFamily, FontSize, FontVariant, LayoutParams, Width};
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

pub const PADDING_RANGE: RangeInclusive<u32> = 0..=100;
pub const IMAGE_WIDTH_RANGE: RangeInclusive<u32> = 800..=1600;
pub const LINES_PER_PAGE_RANGE: RangeInclusive<u32> = 1..=100;

const STAMP_FIELDS: usize = 8;

/// Errors from parsing or validating reader settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Unknown color '{0}'. Use White, Light Gray, Brown, Sepia, Dark Gray, or Black.")]
    UnknownColor(String),

    #[error("{color} is not available as a text color.")]
    UnsupportedTextColor { color: Color },

    #[error("{color} is not available as a background color.")]
    UnsupportedBackgroundColor { color: Color },

    #[error("Unknown font '{0}'. Use Arial, Georgia, San Francisco, or Times New Roman.")]
    UnknownFont(String),

    #[error("Unsupported font size '{0}'. Use 18, 24, 30, or 36.")]
    UnsupportedFontSize(String),

    #[error("Invalid {field}: '{value}' is not a whole number.")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max}, got {value}.")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("Malformed settings string: expected {expected} comma-separated fields, got {found}.")]
    MalformedStamp { expected: usize, found: usize },
}

/// Reader colors. Not every color is offered for both roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    LightGray,
    Brown,
    Sepia,
    DarkGray,
    Black,
}

impl Color {
    pub const TEXT_CHOICES: [Color; 5] = [
        Color::White,
        Color::LightGray,
        Color::Brown,
        Color::DarkGray,
        Color::Black,
    ];

    pub const BACKGROUND_CHOICES: [Color; 4] =
        [Color::White, Color::Sepia, Color::DarkGray, Color::Black];

    pub fn display_name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::LightGray => "Light Gray",
            Color::Brown => "Brown",
            Color::Sepia => "Sepia",
            Color::DarkGray => "Dark Gray",
            Color::Black => "Black",
        }
    }

    /// 0xRRGGBB.
    pub fn rgb(self) -> u32 {
        match self {
            Color::White => 0xFFFFFF,
            Color::LightGray => 0xDDDDDD,
            Color::Brown => 0x4C3320,
            Color::Sepia => 0xF2E5C9,
            Color::DarkGray => 0x444444,
            Color::Black => 0x000000,
        }
    }

    /// Case-insensitive; spaces, `_` and `-` are interchangeable ("light_gray" works).
    pub fn from_name(name: &str) -> Result<Color, SettingsError> {
        let wanted = squash(name);
        [
            Color::White,
            Color::LightGray,
            Color::Brown,
            Color::Sepia,
            Color::DarkGray,
            Color::Black,
        ]
        .into_iter()
        .find(|c| squash(c.display_name()) == wanted)
        .ok_or_else(|| SettingsError::UnknownColor(name.trim().to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub fn parse_font(name: &str) -> Result<FontFamily, SettingsError> {
    FontFamily::from_name(name).ok_or_else(|| SettingsError::UnknownFont(name.trim().to_string()))
}

pub fn parse_font_size(s: &str) -> Result<FontSize, SettingsError> {
    s.trim()
        .parse::<u32>()
        .ok()
        .and_then(FontSize::from_points)
        .ok_or_else(|| SettingsError::UnsupportedFontSize(s.trim().to_string()))
}

fn parse_number(field: &'static str, s: &str) -> Result<u32, SettingsError> {
    s.trim().parse().map_err(|_| SettingsError::InvalidNumber {
        field,
        value: s.trim().to_string(),
    })
}

fn check_range(
    field: &'static str,
    value: u32,
    range: &RangeInclusive<u32>,
) -> Result<(), SettingsError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Style settings for one chapter's pages. Passed explicitly into every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderSettings {
    pub text_color: Color,
    pub background_color: Color,
    pub font_size: FontSize,
    pub font: FontFamily,
    pub horizontal_padding: u32,
    pub vertical_padding: u32,
    pub image_width: u32,
    pub lines_per_page: u32,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            text_color: Color::Black,
            background_color: Color::White,
            font_size: FontSize::Pt18,
            font: FontFamily::SanFrancisco,
            horizontal_padding: 20,
            vertical_padding: 20,
            image_width: 800,
            lines_per_page: 60,
        }
    }
}

impl ReaderSettings {
    /// Check color roles and numeric ranges.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !Color::TEXT_CHOICES.contains(&self.text_color) {
            return Err(SettingsError::UnsupportedTextColor {
                color: self.text_color,
            });
        }
        if !Color::BACKGROUND_CHOICES.contains(&self.background_color) {
            return Err(SettingsError::UnsupportedBackgroundColor {
                color: self.background_color,
            });
        }
        check_range("horizontal padding", self.horizontal_padding, &PADDING_RANGE)?;
        check_range("vertical padding", self.vertical_padding, &PADDING_RANGE)?;
        check_range("image width", self.image_width, &IMAGE_WIDTH_RANGE)?;
        check_range("lines per page", self.lines_per_page, &LINES_PER_PAGE_RANGE)?;
        Ok(())
    }

    pub fn variant(&self) -> FontVariant {
        FontVariant::new(self.font, self.font_size)
    }

    /// Image width minus both horizontal paddings, floored at zero.
    pub fn available_width(&self) -> Width {
        Width::from_px(self.image_width)
            .saturating_sub(Width::from_px(self.horizontal_padding.saturating_mul(2)))
    }

    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            available_width: self.available_width(),
            variant: self.variant(),
            lines_per_page: self.lines_per_page as usize,
        }
    }

    /// Serialize to the comma-separated stamp, e.g. `Black,White,18,San Francisco,20,20,800,60`.
    pub fn to_stamp(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{}",
            self.text_color,
            self.background_color,
            self.font_size,
            self.font,
            self.horizontal_padding,
            self.vertical_padding,
            self.image_width,
            self.lines_per_page
        )
    }

    /// Parse and validate a stamp produced by [ReaderSettings::to_stamp].
    pub fn from_stamp(stamp: &str) -> Result<ReaderSettings, SettingsError> {
        let fields: Vec<&str> = stamp.split(',').collect();
        if fields.len() != STAMP_FIELDS {
            return Err(SettingsError::MalformedStamp {
                expected: STAMP_FIELDS,
                found: fields.len(),
            });
        }
        let settings = ReaderSettings {
            text_color: Color::from_name(fields[0])?,
            background_color: Color::from_name(fields[1])?,
            font_size: parse_font_size(fields[2])?,
            font: parse_font(fields[3])?,
            horizontal_padding: parse_number("horizontal padding", fields[4])?,
            vertical_padding: parse_number("vertical padding", fields[5])?,
            image_width: parse_number("image width", fields[6])?,
            lines_per_page: parse_number("lines per page", fields[7])?,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl fmt::Display for ReaderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_stamp())
    }
}
