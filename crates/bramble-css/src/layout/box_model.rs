//! Box model geometry.
//!
//! Each box nests four rectangles: content inside padding inside border
//! inside margin. Only the content rectangle is stored; each outer
//! rectangle is derived by symmetric expansion of the one inside it by the
//! corresponding edge widths. All units are integer pixels.

use serde::Serialize;

/// An axis-aligned rectangle positioned relative to the document origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: i32,
    /// Vertical position of the top-left corner.
    pub y: i32,
    /// Width of the rectangle.
    pub width: i32,
    /// Height of the rectangle.
    pub height: i32,
}

/// Edge widths for padding, border, or margin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EdgeSizes {
    /// Left edge width.
    pub left: i32,
    /// Right edge width.
    pub right: i32,
    /// Top edge width.
    pub top: i32,
    /// Bottom edge width.
    pub bottom: i32,
}

/// The nested rectangles describing one box's on-screen geometry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    /// Position and size of the content area.
    pub content: Rect,
    /// Padding edge widths.
    pub padding: EdgeSizes,
    /// Border edge widths.
    pub border: EdgeSizes,
    /// Margin edge widths.
    pub margin: EdgeSizes,
}

impl Rect {
    /// This rectangle grown outward by `edge` on every side.
    #[must_use]
    pub fn expanded_by(self, edge: EdgeSizes) -> Rect {
        Rect {
            x: self.x - edge.left,
            y: self.y - edge.top,
            width: self.width + edge.left + edge.right,
            height: self.height + edge.top + edge.bottom,
        }
    }
}

impl Dimensions {
    /// The content area plus padding.
    #[must_use]
    pub fn padding_box(&self) -> Rect {
        self.content.expanded_by(self.padding)
    }

    /// The padding box plus border.
    #[must_use]
    pub fn border_box(&self) -> Rect {
        self.padding_box().expanded_by(self.border)
    }

    /// The border box plus margin; the outermost rectangle.
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        self.border_box().expanded_by(self.margin)
    }
}
