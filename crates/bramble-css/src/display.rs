//! Display-type keywords and per-tag defaults.

use bramble_dom::TAG_TEXT;
use serde::Serialize;
use strum_macros::{Display, EnumString};

/// Tags that lay out inline when no `display` property says otherwise.
const INLINE_TAGS: &[&str] = &["em", "i", "span", "a", "b", "img"];

/// How a box participates in flow layout.
///
/// `FlexChild` is not a real CSS keyword: a `display: flex` parent stamps it
/// onto its element children during the cascade, and the layout engine gives
/// such children shrink-to-fit inline behavior unless they carry an explicit
/// width. There is no flex distribution beyond that marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DisplayType {
    /// A text run; width and height come from text metrics.
    Text,
    /// Flows left-to-right, sizes to its content.
    Inline,
    /// Starts a new line, stretches to fill its container.
    Block,
    /// Flows left-to-right but resolves width like a block.
    InlineBlock,
    /// Block that marks its children as `flex-child`.
    Flex,
    /// Child of a flex container.
    FlexChild,
    /// `display: none` - laid out as nothing and never painted.
    #[strum(serialize = "none")]
    #[serde(rename = "none")]
    Invisible,
}

impl DisplayType {
    /// Parse a `display` keyword, falling back to `Block` for anything
    /// unrecognized.
    #[must_use]
    pub fn parse(keyword: &str) -> Self {
        keyword.parse().unwrap_or(DisplayType::Block)
    }

    /// The display type a tag gets when no `display` property applies.
    #[must_use]
    pub fn default_for_tag(tag: &str) -> Self {
        if tag == TAG_TEXT {
            DisplayType::Text
        } else if INLINE_TAGS.contains(&tag) {
            DisplayType::Inline
        } else {
            DisplayType::Block
        }
    }

    /// Block-like boxes always start (and end) a line of their own.
    #[must_use]
    pub fn is_block_like(self) -> bool {
        matches!(self, DisplayType::Block | DisplayType::Flex)
    }

    /// Inline-like boxes flow against the outer container's width.
    #[must_use]
    pub fn is_inline_like(self) -> bool {
        matches!(self, DisplayType::Inline | DisplayType::FlexChild)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        assert_eq!(DisplayType::parse("inline"), DisplayType::Inline);
        assert_eq!(DisplayType::parse("inline-block"), DisplayType::InlineBlock);
        assert_eq!(DisplayType::parse("flex-child"), DisplayType::FlexChild);
        assert_eq!(DisplayType::parse("none"), DisplayType::Invisible);
        assert_eq!(DisplayType::Invisible.to_string(), "none");
        assert_eq!(DisplayType::FlexChild.to_string(), "flex-child");
    }

    #[test]
    fn test_unknown_keyword_falls_back_to_block() {
        assert_eq!(DisplayType::parse("grid"), DisplayType::Block);
        assert_eq!(DisplayType::parse(""), DisplayType::Block);
    }

    #[test]
    fn test_tag_defaults() {
        assert_eq!(DisplayType::default_for_tag("text"), DisplayType::Text);
        assert_eq!(DisplayType::default_for_tag("span"), DisplayType::Inline);
        assert_eq!(DisplayType::default_for_tag("img"), DisplayType::Inline);
        assert_eq!(DisplayType::default_for_tag("div"), DisplayType::Block);
        assert_eq!(DisplayType::default_for_tag("custom"), DisplayType::Block);
    }
}
