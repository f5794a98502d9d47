//! Font loading and font-backed text measurement.
//!
//! The store is an explicitly constructed cache of the four face variants,
//! created once by the caller and passed by reference into both the
//! measurer and the renderer. Creation and teardown are ordinary value
//! lifetime; there is no process-global registry.

use bramble_css::{ApproximateTextMeasurer, TextMeasurer, TextStyle};
use fontdue::{Font, FontSettings};

/// Common system font paths to search for a default (regular) face.
const FONT_SEARCH_PATHS: &[&str] = &[
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// System font paths for bold variants.
const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// System font paths for italic variants.
const FONT_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansOblique.ttf",
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/Library/Fonts/Arial Italic.ttf",
    "C:\\Windows\\Fonts\\ariali.ttf",
];

/// System font paths for bold-italic variants.
const FONT_BOLD_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBoldOblique.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/Library/Fonts/Arial Bold Italic.ttf",
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

/// The loaded face variants for one family.
///
/// Any variant may be missing; lookups fall back toward the regular face,
/// and with no faces at all text is measured approximately and not drawn.
#[derive(Default)]
pub struct FontStore {
    regular: Option<Font>,
    bold: Option<Font>,
    italic: Option<Font>,
    bold_italic: Option<Font>,
}

impl FontStore {
    /// An empty store: approximate metrics, no text rendering.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load whatever face variants the system provides.
    #[must_use]
    pub fn load_system() -> Self {
        let store = Self {
            regular: load_first(FONT_SEARCH_PATHS),
            bold: load_first(FONT_BOLD_SEARCH_PATHS),
            italic: load_first(FONT_ITALIC_SEARCH_PATHS),
            bold_italic: load_first(FONT_BOLD_ITALIC_SEARCH_PATHS),
        };
        if store.regular.is_none() {
            eprintln!("warning: no system font found; text will be measured approximately and not drawn");
        }
        store
    }

    /// Whether any face at all is loaded.
    #[must_use]
    pub fn has_fonts(&self) -> bool {
        self.regular.is_some()
    }

    /// The best face for a text style: exact variant, then partial match,
    /// then the regular face.
    #[must_use]
    pub fn font_for(&self, style: &TextStyle) -> Option<&Font> {
        match (style.bold, style.italic) {
            (true, true) => self
                .bold_italic
                .as_ref()
                .or(self.bold.as_ref())
                .or(self.italic.as_ref())
                .or(self.regular.as_ref()),
            (true, false) => self.bold.as_ref().or(self.regular.as_ref()),
            (false, true) => self.italic.as_ref().or(self.regular.as_ref()),
            (false, false) => self.regular.as_ref(),
        }
    }
}

/// Load the first parseable font on a path list.
fn load_first(paths: &[&str]) -> Option<Font> {
    for path in paths {
        if let Ok(data) = std::fs::read(path)
            && let Ok(font) = Font::from_bytes(data, FontSettings::default())
        {
            return Some(font);
        }
    }
    None
}

/// Text measurement backed by fontdue's per-glyph metrics.
///
/// Uses `Font::metrics()` (not `Font::rasterize()`) so measuring never pays
/// for bitmap generation. Falls back to [`ApproximateTextMeasurer`] when the
/// store has no usable face.
pub struct FontTextMeasurer<'a> {
    store: &'a FontStore,
}

impl<'a> FontTextMeasurer<'a> {
    /// Create a measurer over a font store.
    #[must_use]
    pub fn new(store: &'a FontStore) -> Self {
        Self { store }
    }
}

impl TextMeasurer for FontTextMeasurer<'_> {
    fn text_width(&self, text: &str, style: &TextStyle) -> i32 {
        let Some(font) = self.store.font_for(style) else {
            return ApproximateTextMeasurer.text_width(text, style);
        };
        // Sum of per-character advances, matching the cursor advancement the
        // renderer uses when drawing.
        let width: f32 = text
            .chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| font.metrics(ch, style.size as f32).advance_width)
            .sum();
        width.ceil() as i32
    }

    fn text_height(&self, text: &str, style: &TextStyle) -> i32 {
        // An explicit line-height property always wins.
        if let Some(line_height) = style.line_height {
            return line_height;
        }
        let Some(font) = self.store.font_for(style) else {
            return ApproximateTextMeasurer.text_height(text, style);
        };
        font.horizontal_line_metrics(style.size as f32)
            .map_or_else(
                || ApproximateTextMeasurer.text_height(text, style),
                |metrics| metrics.new_line_size.ceil() as i32,
            )
    }
}
