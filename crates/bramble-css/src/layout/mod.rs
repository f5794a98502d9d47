//! Flow layout engine.
//!
//! Converts a styled tree into a tree of pixel-positioned boxes. Layout is
//! single-threaded and synchronous: child order drives a left-to-right,
//! top-to-bottom flow cursor, so a single pass has a genuine sequential
//! dependency and is never parallelized internally. Each pass builds a
//! fresh tree from the styled tree and discards the previous one; a new
//! viewport size means a full rebuild, not a mutation.
//!
//! # Module structure
//!
//! - [`box_model`] - rectangles, edge sizes, box expansion
//! - [`values`] - pixel parsing and the `auto` sentinel
//! - [`metrics`] - the text-measurement seam

pub mod box_model;
pub mod metrics;
pub mod values;

use serde::Serialize;
use strum_macros::Display;

use bramble_dom::{DomTree, TAG_BULLET, TAG_TEXT};

use crate::cascade::{PropertyMap, StyledNode, value_or};
use crate::display::DisplayType;

use box_model::Dimensions;
use metrics::{TextMeasurer, TextStyle};
use values::{AutoLength, parse_px};

/// What a box draws as: an image, a text run, a list bullet, or a plain
/// rectangle shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BoxKind {
    /// An `img` element; the payload is its source path.
    Image,
    /// A text run; the payload is the text itself.
    Text,
    /// The synthetic list marker.
    Bullet,
    /// Everything else: a background/border rectangle.
    Shape,
}

impl BoxKind {
    /// The box kind a tag produces.
    #[must_use]
    pub fn for_tag(tag: &str) -> Self {
        match tag {
            "img" => BoxKind::Image,
            TAG_TEXT => BoxKind::Text,
            TAG_BULLET => BoxKind::Bullet,
            _ => BoxKind::Shape,
        }
    }
}

/// One box in the layout tree.
///
/// Owns its children exclusively; carries the resolved property map and the
/// raw payload (text content or image source) copied out of the document,
/// so a finished layout tree no longer needs the styled tree or the DOM.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutElement {
    children: Vec<LayoutElement>,
    raw_data: String,
    style_values: PropertyMap,
    box_kind: BoxKind,
    display: DisplayType,
    /// The box's resolved geometry.
    pub dimensions: Dimensions,
}

/// Build the layout tree skeleton from a styled tree, with no geometry yet.
///
/// The result is in one-to-one structural correspondence with the styled
/// tree (and therefore with the displayable subset of the document), in
/// document order.
#[must_use]
pub fn build_layout_tree(dom: &DomTree, styled: &StyledNode) -> LayoutElement {
    let display = styled.display(dom);
    let box_kind = BoxKind::for_tag(dom.tag_name(styled.node()));
    let raw_data = match box_kind {
        BoxKind::Text => dom.as_text(styled.node()).unwrap_or_default().to_string(),
        BoxKind::Image => dom
            .as_element(styled.node())
            .map_or("/", |e| e.attr_or("src", "/"))
            .to_string(),
        BoxKind::Bullet | BoxKind::Shape => String::new(),
    };
    LayoutElement {
        children: styled
            .children()
            .iter()
            .map(|child| build_layout_tree(dom, child))
            .collect(),
        raw_data,
        style_values: styled.specified().clone(),
        box_kind,
        display,
        dimensions: Dimensions::default(),
    }
}

/// Lay out a styled tree inside `viewport` and return the finished tree.
///
/// The viewport's content height is zeroed first: height is always derived
/// bottom-up from children, never pre-supplied.
#[must_use]
pub fn layout_tree(
    dom: &DomTree,
    styled: &StyledNode,
    mut viewport: Dimensions,
    measurer: &dyn TextMeasurer,
) -> LayoutElement {
    viewport.content.height = 0;
    let mut root = build_layout_tree(dom, styled);
    root.apply_layout(&viewport, 0, 0, true, measurer);
    root
}

impl LayoutElement {
    /// Children in document order.
    #[must_use]
    pub fn children(&self) -> &[LayoutElement] {
        &self.children
    }

    /// The raw payload: text content or image source path.
    #[must_use]
    pub fn raw_data(&self) -> &str {
        &self.raw_data
    }

    /// What this box draws as.
    #[must_use]
    pub fn box_kind(&self) -> BoxKind {
        self.box_kind
    }

    /// How this box participates in flow.
    #[must_use]
    pub fn display(&self) -> DisplayType {
        self.display
    }

    /// Look up a resolved property, falling back to `default` when unset.
    #[must_use]
    pub fn style_or<'a>(&'a self, property: &str, default: &'a str) -> &'a str {
        value_or(&self.style_values, property, default)
    }

    /// The font context for this box's text.
    #[must_use]
    pub fn text_style(&self) -> TextStyle {
        TextStyle::from_properties(&self.style_values)
    }

    /// Lay this box out at `(x_cursor, y_cursor)` within `container`.
    ///
    /// `starts_line` records whether the flow placed this box at the start
    /// of a new line; when it is set the x cursor has been reset to 0.
    pub fn apply_layout(
        &mut self,
        container: &Dimensions,
        x_cursor: i32,
        y_cursor: i32,
        starts_line: bool,
        measurer: &dyn TextMeasurer,
    ) {
        // Child width can depend on parent width, so this box's width must
        // resolve before its children lay out.
        self.calculate_width(container, measurer);
        self.calculate_position(container, x_cursor, y_cursor, starts_line);
        self.layout_children(container.content.width, measurer);
        // An explicit height overrides whatever the children accumulated.
        self.set_height(measurer);
    }

    /// Resolve this box's width and horizontal edges against the container
    /// (CSS 2.1 § 10.3.3, restricted to the horizontal axis).
    fn calculate_width(&mut self, container: &Dimensions, measurer: &dyn TextMeasurer) {
        let padding_left = parse_px(self.style_or("padding-left", "0"));
        let padding_right = parse_px(self.style_or("padding-right", "0"));
        let border_left = parse_px(self.style_or("border-left-width", "0"));
        let border_right = parse_px(self.style_or("border-right-width", "0"));
        let mut margin_left = AutoLength::parse(self.style_or("margin-left", "0"));
        let mut margin_right = AutoLength::parse(self.style_or("margin-right", "0"));

        // Text width is always the measured intrinsic width, never CSS.
        let mut width = if self.display == DisplayType::Text {
            AutoLength::Px(measurer.text_width(&self.raw_data, &self.text_style()))
        } else {
            AutoLength::parse(self.style_or("width", "auto"))
        };

        let total = padding_left
            + padding_right
            + border_left
            + border_right
            + margin_left.non_negative()
            + margin_right.non_negative()
            + width.non_negative();

        // A fixed width already wider than the container never gains more
        // room through auto margins.
        if !width.is_auto() && total > container.content.width {
            if margin_left.is_auto() {
                margin_left = AutoLength::Px(0);
            }
            if margin_right.is_auto() {
                margin_right = AutoLength::Px(0);
            }
        }

        // What remains of the container once this box's edges are placed.
        let underflow = container.content.width - total;

        if matches!(self.display, DisplayType::Text | DisplayType::Inline)
            || (self.display == DisplayType::FlexChild && width.is_auto())
        {
            // Inline-type boxes size to their own content plus edges; they
            // never stretch to fill the remaining space. Margins still auto
            // at this point are used as 0.
            width = AutoLength::Px(total);
            margin_left = AutoLength::Px(margin_left.px_or(0));
            margin_right = AutoLength::Px(margin_right.px_or(0));
        } else if width.is_auto() {
            // Auto width absorbs the underflow; any other auto becomes 0.
            margin_left = AutoLength::Px(margin_left.px_or(0));
            margin_right = AutoLength::Px(margin_right.px_or(0));
            if underflow > 0 {
                width = AutoLength::Px(underflow);
            } else {
                // Width cannot go negative; the right margin soaks up the
                // overflow instead (and may go negative).
                width = AutoLength::Px(0);
                margin_right = AutoLength::Px(margin_right.px_or(0) + underflow);
            }
        } else if margin_left.is_auto() && margin_right.is_auto() {
            // Both margins auto: split the underflow evenly.
            margin_left = AutoLength::Px(underflow / 2);
            margin_right = AutoLength::Px(underflow / 2);
        } else if margin_left.is_auto() {
            margin_left = AutoLength::Px(underflow);
        } else if margin_right.is_auto() {
            margin_right = AutoLength::Px(underflow);
        } else {
            // Over-constrained: the right margin absorbs the difference.
            margin_right = AutoLength::Px(margin_right.px_or(0) + underflow);
        }

        self.dimensions.padding.left = padding_left;
        self.dimensions.padding.right = padding_right;
        self.dimensions.border.left = border_left;
        self.dimensions.border.right = border_right;
        self.dimensions.margin.left = margin_left.px_or(0);
        self.dimensions.margin.right = margin_right.px_or(0);
        self.dimensions.content.width = width.px_or(0);
    }

    /// Resolve vertical edges and the absolute content origin.
    ///
    /// Vertical edges never auto-resolve (auto margins are a horizontal
    /// concept here); `auto` reads as 0.
    fn calculate_position(
        &mut self,
        container: &Dimensions,
        x_cursor: i32,
        y_cursor: i32,
        starts_line: bool,
    ) {
        // A box that starts a new line always starts at the left edge.
        debug_assert!(!starts_line || x_cursor == 0);

        self.dimensions.padding.top = AutoLength::parse(self.style_or("padding-top", "0")).px_or(0);
        self.dimensions.padding.bottom =
            AutoLength::parse(self.style_or("padding-bottom", "0")).px_or(0);
        self.dimensions.border.top =
            AutoLength::parse(self.style_or("border-top-width", "0")).px_or(0);
        self.dimensions.border.bottom =
            AutoLength::parse(self.style_or("border-bottom-width", "0")).px_or(0);
        self.dimensions.margin.top = AutoLength::parse(self.style_or("margin-top", "0")).px_or(0);
        self.dimensions.margin.bottom =
            AutoLength::parse(self.style_or("margin-bottom", "0")).px_or(0);

        // Content origin: container content origin, plus the flow cursor,
        // plus this box's own leading edges.
        self.dimensions.content.x = container.content.x
            + x_cursor
            + self.dimensions.padding.left
            + self.dimensions.border.left
            + self.dimensions.margin.left;
        self.dimensions.content.y = container.content.y
            + y_cursor
            + self.dimensions.padding.top
            + self.dimensions.border.top
            + self.dimensions.margin.top;
    }

    /// Lay out children along a single flow cursor and accumulate this
    /// box's content size from theirs.
    fn layout_children(&mut self, container_content_width: i32, measurer: &dyn TextMeasurer) {
        let mut x_cursor = 0;
        let mut y_cursor = 0;
        let mut prev_is_block = false;
        let mut prev_height = 0;

        // Inline-like boxes flow their children against the outer
        // container's width; everything else constrains children to its own
        // just-resolved content width.
        let available_width = if self.display.is_inline_like() {
            container_content_width
        } else {
            self.dimensions.content.width
        };
        let width_is_auto = AutoLength::parse(self.style_or("width", "auto")).is_auto();

        // The children are moved out so this box's dimensions can serve as
        // their container while they are mutated.
        let mut children = std::mem::take(&mut self.children);
        for child in &mut children {
            let child_is_block = child.display.is_block_like();

            // Width resolves early so the wrap test can see it.
            child.calculate_width(&self.dimensions, measurer);
            let overflow = x_cursor + child.dimensions.content.width > available_width;

            // Block-like children, children following one, and children
            // that no longer fit on the line all render below.
            let starts_line = prev_is_block || child_is_block || overflow;
            if starts_line {
                y_cursor += prev_height;
                x_cursor = 0;
            }

            child.apply_layout(&self.dimensions, x_cursor, y_cursor, starts_line, measurer);

            if !child_is_block {
                // The next sibling may share the line.
                x_cursor += child.dimensions.border_box().width;
                if self.display == DisplayType::Inline
                    || (self.display == DisplayType::FlexChild && width_is_auto)
                {
                    // Shrink-to-fit: an inline container grows along the
                    // flow axis with each child it gains.
                    self.dimensions.content.width += child.dimensions.content.width;
                }
            }

            // Each new line contributes its height once...
            if starts_line {
                self.dimensions.content.height += child.dimensions.margin_box().height;
            }
            // ...and independently the box is at least as tall as its
            // tallest child. Both updates can fire for the same child; the
            // resulting accrual is part of the observable layout behavior
            // and must not be "simplified" into a single update.
            if child.dimensions.margin_box().height > self.dimensions.content.height {
                self.dimensions.content.height = child.dimensions.margin_box().height;
            }

            prev_height = child.dimensions.margin_box().height;
            prev_is_block = child_is_block;
        }
        self.children = children;
    }

    /// Override the accumulated content height where something else rules:
    /// text metrics for text boxes, then any explicit `height` property.
    fn set_height(&mut self, measurer: &dyn TextMeasurer) {
        if self.display == DisplayType::Text {
            self.dimensions.content.height =
                measurer.text_height(&self.raw_data, &self.text_style());
        } else {
            let height = self.style_or("height", "auto");
            if height != "auto" {
                self.dimensions.content.height = parse_px(height);
            }
        }
    }
}
