//! The text-measurement seam.
//!
//! The layout engine never shapes glyphs itself. Text boxes get their
//! intrinsic width and height from a [`TextMeasurer`], parameterized by the
//! resolved font family, size, style flags, and the string content.
//! `bramble-browser` provides the font-backed implementation; the
//! [`ApproximateTextMeasurer`] here keeps layout testable without any font
//! files on disk.

use crate::cascade::{PropertyMap, value_or};
use crate::layout::values::parse_px;

/// Font size used for text when no `font-size` property resolved.
pub const DEFAULT_TEXT_SIZE: i32 = 14;

/// Normal line height as a multiple of the font size.
const LINE_HEIGHT_RATIO: f32 = 1.2;

/// The resolved font context for a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    /// Font family name.
    pub family: String,
    /// Font size in pixels.
    pub size: i32,
    /// `font-weight: bold`
    pub bold: bool,
    /// `font-style: italic`
    pub italic: bool,
    /// `text-decoration: underline`
    pub underline: bool,
    /// Explicit `line-height` in pixels, when set.
    pub line_height: Option<i32>,
}

impl TextStyle {
    /// Assemble the font context from a resolved property map.
    #[must_use]
    pub fn from_properties(styles: &PropertyMap) -> Self {
        TextStyle {
            family: value_or(styles, "font-family", "Arial").to_string(),
            size: parse_px(value_or(
                styles,
                "font-size",
                &DEFAULT_TEXT_SIZE.to_string(),
            )),
            bold: value_or(styles, "font-weight", "normal") == "bold",
            italic: value_or(styles, "font-style", "normal") == "italic",
            underline: value_or(styles, "text-decoration", "none") == "underline",
            line_height: styles.get("line-height").map(|v| parse_px(v)),
        }
    }

    /// The height one line of this text occupies: the explicit
    /// `line-height` when set, otherwise 1.2 × font size.
    #[must_use]
    pub fn line_box_height(&self) -> i32 {
        self.line_height
            .unwrap_or_else(|| (self.size as f32 * LINE_HEIGHT_RATIO).round() as i32)
    }
}

/// Measures intrinsic text extents for the layout engine.
pub trait TextMeasurer {
    /// Width of `text` rendered in `style`, in pixels.
    fn text_width(&self, text: &str, style: &TextStyle) -> i32;

    /// Height of `text` rendered in `style`, in pixels.
    fn text_height(&self, text: &str, style: &TextStyle) -> i32;
}

/// Deterministic stand-in metrics: a fixed advance per character and the
/// standard line-height rule. Good enough for tests and for running without
/// any system fonts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateTextMeasurer;

impl TextMeasurer for ApproximateTextMeasurer {
    fn text_width(&self, text: &str, style: &TextStyle) -> i32 {
        const CHAR_WIDTH_RATIO: f32 = 0.6;
        (text.chars().count() as f32 * style.size as f32 * CHAR_WIDTH_RATIO).round() as i32
    }

    fn text_height(&self, _text: &str, style: &TextStyle) -> i32 {
        style.line_box_height()
    }
}
