//! CSS color value parsing.

use bramble_common::warning::warn_once;

/// Color keywords the engine understands, normalized to hex.
const COLOR_KEYWORDS: &[(&str, &str)] = &[
    ("white", "#FFFFFF"),
    ("black", "#000000"),
    ("red", "#FF0000"),
    ("lime", "#00FF00"),
    ("green", "#008000"),
    ("blue", "#0000FF"),
    ("magenta", "#FF00FF"),
    ("purple", "#800080"),
    ("orange", "#FFA500"),
    ("yellow", "#FFFF00"),
    ("cyan", "#00FFFF"),
    ("gray", "#808080"),
];

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 0 means fully transparent.
    pub a: u8,
}

impl Color {
    /// Fully transparent black; drawing it is a no-op.
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Opaque black, the default text color.
    pub const BLACK: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    /// Opaque white, the canvas background.
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    /// Whether drawing this color would change any pixel.
    #[must_use]
    pub fn is_visible(self) -> bool {
        self.a > 0
    }
}

/// Parse a CSS color value: a keyword, `#rgb`/`#rrggbb` hex, or
/// `rgb(r, g, b)`.
///
/// `inherit` and `transparent` produce [`Color::TRANSPARENT`], as does any
/// malformed value (with a deduplicated warning) - a bad color never aborts
/// a paint pass.
#[must_use]
pub fn parse_color(raw: &str) -> Color {
    let value = raw.trim().to_ascii_lowercase();
    if value.is_empty() || value == "inherit" || value == "transparent" {
        return Color::TRANSPARENT;
    }

    let value = COLOR_KEYWORDS
        .iter()
        .find(|(keyword, _)| *keyword == value)
        .map_or(value.as_str(), |(_, hex)| *hex)
        .to_ascii_lowercase();

    if let Some(body) = value.strip_prefix("rgb(").and_then(|v| v.strip_suffix(')')) {
        return parse_rgb_components(body).unwrap_or_else(|| malformed(raw));
    }
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex).unwrap_or_else(|| malformed(raw));
    }
    malformed(raw)
}

fn malformed(raw: &str) -> Color {
    warn_once("color", &format!("unparseable color value '{raw}'"));
    Color::TRANSPARENT
}

/// The `r, g, b` component list of an `rgb()` value.
fn parse_rgb_components(body: &str) -> Option<Color> {
    let mut parts = body.split(',').map(str::trim);
    let r = parts.next()?.parse::<u8>().ok()?;
    let g = parts.next()?.parse::<u8>().ok()?;
    let b = parts.next()?.parse::<u8>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Color { r, g, b, a: 255 })
}

/// Three- or six-digit hex, without the leading `#`.
fn parse_hex(hex: &str) -> Option<Color> {
    let expanded: String = match hex.len() {
        // Abbreviated form: each digit doubles.
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some(Color {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
        a: 255,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_six_digit() {
        let c = parse_color("#2563eb");
        assert_eq!((c.r, c.g, c.b, c.a), (0x25, 0x63, 0xeb, 255));
    }

    #[test]
    fn test_hex_three_digit_expands() {
        let c = parse_color("#f0a");
        assert_eq!((c.r, c.g, c.b), (0xff, 0x00, 0xaa));
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(parse_color("RED"), parse_color("#ff0000"));
        assert_eq!(parse_color("gray"), parse_color("#808080"));
    }

    #[test]
    fn test_rgb_functional_form() {
        let c = parse_color("rgb(12, 34, 56)");
        assert_eq!((c.r, c.g, c.b, c.a), (12, 34, 56, 255));
    }

    #[test]
    fn test_transparent_and_inherit() {
        assert!(!parse_color("transparent").is_visible());
        assert!(!parse_color("inherit").is_visible());
        assert!(!parse_color("").is_visible());
    }

    #[test]
    fn test_malformed_degrades_to_transparent() {
        assert!(!parse_color("#12345").is_visible());
        assert!(!parse_color("rgb(1,2)").is_visible());
        assert!(!parse_color("chartreuse-ish").is_visible());
    }
}
