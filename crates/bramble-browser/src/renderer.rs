//! Software rasterizer.
//!
//! Executes a [`DisplayList`] onto an RGBA pixel buffer using fontdue for
//! glyph rasterization and `image` for decoding sources and saving PNGs.
//! The renderer knows nothing about CSS, boxes, or the DOM; it only draws.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use bramble_css::{Rect, TextStyle};
use image::{ImageBuffer, Rgba, RgbaImage};

use crate::color::Color;
use crate::font_store::FontStore;
use crate::paint::{DisplayCommand, DisplayList};

/// Renders display lists onto an owned pixel buffer.
///
/// The font store is borrowed: it is constructed (and torn down) by the
/// caller and can outlive any number of renderers.
pub struct Renderer<'a> {
    buffer: RgbaImage,
    width: u32,
    height: u32,
    fonts: &'a FontStore,
    /// Decoded images keyed by source path.
    images: HashMap<String, RgbaImage>,
}

impl<'a> Renderer<'a> {
    /// Create a renderer with a white canvas of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32, fonts: &'a FontStore) -> Self {
        Self {
            buffer: ImageBuffer::from_pixel(width, height, Rgba([255, 255, 255, 255])),
            width,
            height,
            fonts,
            images: HashMap::new(),
        }
    }

    /// Decode and register an image so `DrawImage` commands can find it.
    /// Undecodable sources are skipped with a message; a missing image is
    /// never fatal.
    pub fn preload_image(&mut self, src: &str, base_dir: &Path) {
        let path = base_dir.join(src);
        match image::open(&path) {
            Ok(img) => {
                let _ = self.images.insert(src.to_string(), img.to_rgba8());
            }
            Err(e) => eprintln!("warning: could not load image '{}': {e}", path.display()),
        }
    }

    /// Execute a display list in order (back to front).
    pub fn render(&mut self, display_list: &DisplayList) {
        for command in display_list.commands() {
            self.execute_command(command);
        }
    }

    /// The finished pixel buffer.
    #[must_use]
    pub fn buffer(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Save the canvas as a PNG.
    ///
    /// # Errors
    /// Returns an error when the file cannot be written or encoded.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.buffer
            .save(path)
            .with_context(|| format!("failed to save render to '{}'", path.display()))
    }

    fn execute_command(&mut self, command: &DisplayCommand) {
        match command {
            DisplayCommand::FillRect { rect, color } => self.fill_rect(*rect, *color),
            DisplayCommand::DrawText {
                x,
                y,
                content,
                style,
                color,
            } => self.draw_text(content, *x, *y, style, *color),
            DisplayCommand::DrawImage { rect, src } => self.draw_image(src, *rect),
        }
    }

    /// Fill a rectangle, clipped to the canvas.
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if !color.is_visible() {
            return;
        }
        let rgba = Rgba([color.r, color.g, color.b, color.a]);
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = (rect.x + rect.width).min(self.width as i32);
        let y1 = (rect.y + rect.height).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.buffer.put_pixel(px as u32, py as u32, rgba);
            }
        }
    }

    /// Draw a text run, glyph by glyph, with optional underline.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, style: &TextStyle, color: Color) {
        let Some(font) = self.fonts.font_for(style) else {
            return;
        };
        let rgba = Rgba([color.r, color.g, color.b, color.a]);
        let size = style.size as f32;
        let mut cursor_x = x as f32;

        for ch in text.chars() {
            if ch.is_control() {
                continue;
            }
            let (metrics, bitmap) = font.rasterize(ch, size);

            // fontdue's bitmap offsets are relative to the baseline; place
            // the baseline one em below the top of the line box.
            let glyph_x = cursor_x as i32 + metrics.xmin;
            let glyph_y = y + (style.size - metrics.ymin - metrics.height as i32);

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let alpha = bitmap[gy * metrics.width + gx];
                    if alpha > 0 {
                        self.blend_pixel(glyph_x + gx as i32, glyph_y + gy as i32, rgba, alpha);
                    }
                }
            }
            cursor_x += metrics.advance_width;
        }

        if style.underline {
            // A one-pixel rule just under the baseline.
            let underline_y = y + style.size + 1;
            self.fill_rect(
                Rect {
                    x,
                    y: underline_y,
                    width: (cursor_x as i32 - x).max(0),
                    height: 1,
                },
                color,
            );
        }
    }

    /// Draw a registered image scaled into `rect` with nearest-neighbor
    /// sampling, alpha-blended onto the canvas.
    fn draw_image(&mut self, src: &str, rect: Rect) {
        let Some(img) = self.images.get(src).cloned() else {
            return;
        };
        let (src_w, src_h) = img.dimensions();
        if src_w == 0 || src_h == 0 || rect.width <= 0 || rect.height <= 0 {
            return;
        }
        for dy in 0..rect.height {
            for dx in 0..rect.width {
                let sx = ((dx as u32 as u64 * u64::from(src_w)) / rect.width as u64)
                    .min(u64::from(src_w) - 1) as u32;
                let sy = ((dy as u32 as u64 * u64::from(src_h)) / rect.height as u64)
                    .min(u64::from(src_h) - 1) as u32;
                let pixel = *img.get_pixel(sx, sy);
                if pixel[3] > 0 {
                    self.blend_pixel(rect.x + dx, rect.y + dy, pixel, pixel[3]);
                }
            }
        }
    }

    /// Alpha-blend one pixel onto the canvas, clipped.
    fn blend_pixel(&mut self, px: i32, py: i32, fg: Rgba<u8>, alpha: u8) {
        if px < 0 || py < 0 || px >= self.width as i32 || py >= self.height as i32 {
            return;
        }
        let (px, py) = (px as u32, py as u32);
        if alpha == 255 {
            self.buffer.put_pixel(px, py, Rgba([fg[0], fg[1], fg[2], 255]));
            return;
        }
        let bg = *self.buffer.get_pixel(px, py);
        self.buffer.put_pixel(px, py, alpha_blend(fg, bg, alpha));
    }
}

/// Blend a foreground color onto a background by `alpha`.
fn alpha_blend(fg: Rgba<u8>, bg: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = f32::from(alpha) / 255.0;
    let inv_a = 1.0 - a;
    Rgba([
        f32::from(fg[0]).mul_add(a, f32::from(bg[0]) * inv_a) as u8,
        f32::from(fg[1]).mul_add(a, f32::from(bg[1]) * inv_a) as u8,
        f32::from(fg[2]).mul_add(a, f32::from(bg[2]) * inv_a) as u8,
        255,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_is_clipped_to_canvas() {
        let fonts = FontStore::empty();
        let mut renderer = Renderer::new(10, 10, &fonts);
        renderer.fill_rect(
            Rect {
                x: -5,
                y: -5,
                width: 100,
                height: 100,
            },
            Color {
                r: 1,
                g: 2,
                b: 3,
                a: 255,
            },
        );
        assert_eq!(renderer.buffer().get_pixel(0, 0).0, [1, 2, 3, 255]);
        assert_eq!(renderer.buffer().get_pixel(9, 9).0, [1, 2, 3, 255]);
    }

    #[test]
    fn test_transparent_fill_is_a_no_op() {
        let fonts = FontStore::empty();
        let mut renderer = Renderer::new(4, 4, &fonts);
        renderer.fill_rect(
            Rect {
                x: 0,
                y: 0,
                width: 4,
                height: 4,
            },
            Color::TRANSPARENT,
        );
        assert_eq!(renderer.buffer().get_pixel(2, 2).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_alpha_blend_midpoint() {
        let blended = alpha_blend(
            Rgba([0, 0, 0, 255]),
            Rgba([255, 255, 255, 255]),
            128,
        );
        // Roughly halfway between black and white.
        assert!((120..=135).contains(&blended[0]));
        assert_eq!(blended[3], 255);
    }

    #[test]
    fn test_missing_font_skips_text_quietly() {
        let fonts = FontStore::empty();
        let mut renderer = Renderer::new(8, 8, &fonts);
        let style = TextStyle {
            family: "Arial".to_string(),
            size: 12,
            bold: false,
            italic: false,
            underline: false,
            line_height: None,
        };
        renderer.draw_text("hi", 0, 0, &style, Color::BLACK);
        // Canvas untouched.
        assert_eq!(renderer.buffer().get_pixel(1, 1).0, [255, 255, 255, 255]);
    }
}
