//! Length value parsing for the box model.

use bramble_common::warning::warn_once;

/// Parse a bare numeric length into integer pixels.
///
/// Malformed values are a recoverable error: they resolve to 0 with a
/// deduplicated warning, never a panic, so one bad declaration cannot take
/// down the whole layout pass.
#[must_use]
pub fn parse_px(value: &str) -> i32 {
    if value.is_empty() {
        return 0;
    }
    if let Ok(n) = value.parse::<i32>() {
        return n;
    }
    if let Ok(f) = value.parse::<f32>() {
        return f.round() as i32;
    }
    warn_once("layout", &format!("malformed length '{value}' treated as 0"));
    0
}

/// A length that may be the `auto` sentinel.
///
/// Only `width`, `margin-left`, and `margin-right` take part in auto
/// resolution; everywhere else `auto` reads as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoLength {
    /// Resolved later against the container.
    Auto,
    /// A fixed pixel length.
    Px(i32),
}

impl AutoLength {
    /// Parse a raw property value.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == "auto" {
            AutoLength::Auto
        } else {
            AutoLength::Px(parse_px(value))
        }
    }

    /// Whether this is the `auto` sentinel.
    #[must_use]
    pub fn is_auto(self) -> bool {
        matches!(self, AutoLength::Auto)
    }

    /// The pixel value, or `fallback` for `auto`.
    #[must_use]
    pub fn px_or(self, fallback: i32) -> i32 {
        match self {
            AutoLength::Auto => fallback,
            AutoLength::Px(v) => v,
        }
    }

    /// The pixel value clamped to zero; `auto` contributes nothing.
    /// This is the contribution a length makes to an edge total.
    #[must_use]
    pub fn non_negative(self) -> i32 {
        match self {
            AutoLength::Auto => 0,
            AutoLength::Px(v) => v.max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_px_integer_and_fractional() {
        assert_eq!(parse_px("42"), 42);
        assert_eq!(parse_px("-3"), -3);
        assert_eq!(parse_px("1.6"), 2);
        assert_eq!(parse_px(""), 0);
    }

    #[test]
    fn test_parse_px_malformed_is_zero() {
        assert_eq!(parse_px("abc"), 0);
        assert_eq!(parse_px("12pt"), 0);
    }

    #[test]
    fn test_auto_length() {
        assert!(AutoLength::parse("auto").is_auto());
        assert_eq!(AutoLength::parse("auto").px_or(7), 7);
        assert_eq!(AutoLength::parse("10").px_or(7), 10);
        assert_eq!(AutoLength::parse("-5").non_negative(), 0);
        assert_eq!(AutoLength::parse("auto").non_negative(), 0);
        assert_eq!(AutoLength::parse("5").non_negative(), 5);
    }
}
