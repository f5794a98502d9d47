//! Display-list construction.
//!
//! Walks a finished layout tree and flattens it into drawing commands in
//! painting order (parents before children, so children paint on top). The
//! renderer executes the list without knowing anything about CSS or boxes.

use bramble_css::{BoxKind, DisplayType, LayoutElement, Rect, TextStyle};

use crate::color::{Color, parse_color};

/// One drawing command, in device pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCommand {
    /// Fill a rectangle with a solid color.
    FillRect {
        /// Target rectangle.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// Draw a run of text.
    DrawText {
        /// Left edge of the first glyph.
        x: i32,
        /// Top of the line box.
        y: i32,
        /// The text to draw.
        content: String,
        /// Resolved font context.
        style: TextStyle,
        /// Text color.
        color: Color,
    },
    /// Draw an image scaled into a rectangle.
    DrawImage {
        /// Destination rectangle.
        rect: Rect,
        /// Source path from the document.
        src: String,
    },
}

/// An ordered sequence of drawing commands.
#[derive(Debug, Default)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// The commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }
}

/// Side length of the square drawn for a list bullet.
const BULLET_SIZE: i32 = 5;

/// Flatten a layout tree into a display list.
#[must_use]
pub fn build_display_list(root: &LayoutElement) -> DisplayList {
    let mut list = DisplayList::default();
    paint_element(root, &mut list);
    list
}

fn paint_element(element: &LayoutElement, list: &mut DisplayList) {
    // display:none removes the whole subtree from painting.
    if element.display() == DisplayType::Invisible {
        return;
    }
    match element.box_kind() {
        BoxKind::Image => paint_image(element, list),
        BoxKind::Text => paint_text(element, list),
        BoxKind::Bullet => paint_bullet(element, list),
        BoxKind::Shape => paint_shape(element, list),
    }
    for child in element.children() {
        paint_element(child, list);
    }
}

/// Border rectangle behind a background rectangle; children go on top.
fn paint_shape(element: &LayoutElement, list: &mut DisplayList) {
    let border_color = parse_color(element.style_or("border-color", ""));
    if border_color.is_visible() {
        list.commands.push(DisplayCommand::FillRect {
            rect: element.dimensions.border_box(),
            color: border_color,
        });
    }
    let background = parse_color(element.style_or("background-color", ""));
    if background.is_visible() {
        list.commands.push(DisplayCommand::FillRect {
            rect: element.dimensions.padding_box(),
            color: background,
        });
    }
}

/// A small square vertically centered at the left of the padding box.
fn paint_bullet(element: &LayoutElement, list: &mut DisplayList) {
    let r = element.dimensions.padding_box();
    let color = match parse_color(element.style_or("color", "")) {
        c if c.is_visible() => c,
        _ => Color::BLACK,
    };
    list.commands.push(DisplayCommand::FillRect {
        rect: Rect {
            x: r.x,
            y: r.y + r.height / 2,
            width: BULLET_SIZE,
            height: BULLET_SIZE,
        },
        color,
    });
}

fn paint_text(element: &LayoutElement, list: &mut DisplayList) {
    if element.raw_data().is_empty() {
        return;
    }
    let rect = element.dimensions.border_box();
    let color = match parse_color(element.style_or("color", "")) {
        c if c.is_visible() => c,
        _ => Color::BLACK,
    };
    list.commands.push(DisplayCommand::DrawText {
        x: rect.x,
        y: rect.y,
        content: element.raw_data().to_string(),
        style: element.text_style(),
        color,
    });
}

fn paint_image(element: &LayoutElement, list: &mut DisplayList) {
    list.commands.push(DisplayCommand::DrawImage {
        rect: element.dimensions.border_box(),
        src: element.raw_data().to_string(),
    });
}
