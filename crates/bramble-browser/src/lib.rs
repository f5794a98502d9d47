//! High-level document pipeline for the Bramble engine.
//!
//! # Scope
//!
//! This crate glues the stages together and supplies the collaborators the
//! core delegates to:
//! - **Document loading** - read and parse an HTML file, extract inline
//!   `<style>` CSS, optionally merge a standalone stylesheet file
//! - **Styled tree** - built once per document via `bramble-css`
//! - **Layout & paint per viewport** - every render lays the whole tree out
//!   from scratch for the requested size; nothing is cached or patched
//! - **Fonts** - an explicitly constructed [`font_store::FontStore`] backing
//!   both text measurement and glyph drawing
//! - **Software rendering** - display-list execution onto an RGBA canvas
//!
//! # Not implemented
//!
//! - network fetching: documents, stylesheets, and images are local files
//! - scripting of any kind
//! - incremental re-layout

/// CSS color value parsing.
pub mod color;
/// Font loading and font-backed text measurement.
pub mod font_store;
/// Display-list construction from a layout tree.
pub mod paint;
/// Display-list execution onto pixels.
pub mod renderer;

pub use bramble_css as css;
pub use bramble_dom as dom;
pub use bramble_html as html;

pub use color::{Color, parse_color};
pub use font_store::{FontStore, FontTextMeasurer};
pub use paint::{DisplayCommand, DisplayList, build_display_list};
pub use renderer::Renderer;

use std::path::Path;

use thiserror::Error;

use bramble_common::warning::clear_warnings;
use bramble_css::{
    BoxKind, Dimensions, LayoutElement, Rect, StyledNode, Stylesheet, TextMeasurer, layout_tree,
    parse_css, style_tree,
};
use bramble_dom::{DomTree, NodeId, NodeType};
use bramble_html::parse_html;
use image::RgbaImage;

/// Errors surfaced while loading a document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// The path that failed.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The HTML failed to parse.
    #[error("html parse error: {0}")]
    Html(#[from] bramble_html::HtmlError),

    /// A stylesheet failed to parse.
    #[error("css parse error: {0}")]
    Css(#[from] bramble_css::CssError),

    /// The document produced no styleable content.
    #[error("document has no styleable content")]
    EmptyDocument,
}

/// A fully loaded and styled document, ready to lay out at any viewport
/// size.
#[derive(Debug)]
pub struct LoadedDocument {
    /// Original HTML source text.
    pub html_source: String,
    /// Parsed document tree.
    pub dom: DomTree,
    /// The author stylesheet (inline `<style>` content plus any external
    /// file), without the built-in default rules.
    pub stylesheet: Stylesheet,
    /// The styled tree, built once; layout reuses it per viewport.
    pub styled: StyledNode,
}

/// Load a document from an HTML file, plus an optional standalone CSS file.
///
/// # Errors
/// Returns [`LoadError`] for unreadable files, parse failures, or an empty
/// document. Parse failures surface here, before styling or layout run.
pub fn load_document(html_path: &Path, css_path: Option<&Path>) -> Result<LoadedDocument, LoadError> {
    let html = read_file(html_path)?;
    let extra_css = match css_path {
        Some(path) => Some(read_file(path)?),
        None => None,
    };
    parse_document(&html, extra_css.as_deref())
}

/// Parse an HTML string (plus optional extra CSS) into a styled document.
///
/// Inline `<style>` content is extracted from the document itself; the
/// extra CSS is appended after it, so it wins equal-specificity ties.
///
/// # Errors
/// Returns [`LoadError`] for parse failures or an empty document.
pub fn parse_document(html: &str, extra_css: Option<&str>) -> Result<LoadedDocument, LoadError> {
    // Warnings are per-document; a new load starts a clean slate.
    clear_warnings();

    let dom = parse_html(html)?;

    let mut css_text = extract_style_content(&dom);
    if let Some(extra) = extra_css {
        css_text.push('\n');
        css_text.push_str(extra);
    }
    let stylesheet = parse_css(&css_text)?;

    let styled = style_tree(&dom, &stylesheet).ok_or(LoadError::EmptyDocument)?;

    Ok(LoadedDocument {
        html_source: html.to_string(),
        dom,
        stylesheet,
        styled,
    })
}

/// Extract CSS text from every `<style>` element in the tree, in document
/// order.
#[must_use]
pub fn extract_style_content(dom: &DomTree) -> String {
    let mut css = String::new();
    collect_style_content(dom, dom.root(), &mut css);
    css
}

fn collect_style_content(dom: &DomTree, id: NodeId, css: &mut String) {
    if let Some(node) = dom.get(id) {
        if let NodeType::Element(data) = &node.node_type
            && data.tag_name == "style"
        {
            for &child in dom.children(id) {
                if let Some(text) = dom.as_text(child) {
                    css.push_str(text);
                    css.push('\n');
                }
            }
        }
        for &child in dom.children(id) {
            collect_style_content(dom, child, css);
        }
    }
}

impl LoadedDocument {
    /// Lay the document out for a viewport, using the given text measurer.
    ///
    /// Builds a fresh layout tree every call; a resize is a full re-layout.
    #[must_use]
    pub fn layout(&self, width: i32, height: i32, measurer: &dyn TextMeasurer) -> LayoutElement {
        let viewport = Dimensions {
            content: Rect {
                x: 0,
                y: 0,
                width,
                height,
            },
            ..Dimensions::default()
        };
        layout_tree(&self.dom, &self.styled, viewport, measurer)
    }

    /// Lay out and rasterize the document onto a fresh canvas.
    ///
    /// `base_dir` anchors relative image sources (usually the HTML file's
    /// directory).
    #[must_use]
    pub fn render(
        &self,
        width: u32,
        height: u32,
        fonts: &FontStore,
        base_dir: &Path,
    ) -> RgbaImage {
        let measurer = FontTextMeasurer::new(fonts);
        let layout_root = self.layout(width as i32, height as i32, &measurer);
        let display_list = build_display_list(&layout_root);

        let mut renderer = Renderer::new(width, height, fonts);
        for src in image_sources(&layout_root) {
            renderer.preload_image(&src, base_dir);
        }
        renderer.render(&display_list);
        renderer.buffer().clone()
    }
}

/// Collect the image sources a layout tree references.
fn image_sources(root: &LayoutElement) -> Vec<String> {
    let mut sources = Vec::new();
    collect_image_sources(root, &mut sources);
    sources
}

fn collect_image_sources(element: &LayoutElement, sources: &mut Vec<String>) {
    if element.box_kind() == BoxKind::Image && !element.raw_data().is_empty() {
        sources.push(element.raw_data().to_string());
    }
    for child in element.children() {
        collect_image_sources(child, sources);
    }
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html>
        <head>
            <style>
                p { color: #336699; }
            </style>
        </head>
        <body>
            <p>styled text</p>
        </body>
    </html>"#;

    #[test]
    fn test_inline_style_extraction() {
        let doc = parse_document(PAGE, None).unwrap();
        assert_eq!(doc.stylesheet.rules.len(), 1);
        let body = &doc.styled.children()[1];
        let p = &body.children()[0];
        assert_eq!(p.value_or("color", ""), "#336699");
    }

    #[test]
    fn test_extra_css_wins_ties() {
        let doc = parse_document(PAGE, Some("p { color: #111111; }")).unwrap();
        let body = &doc.styled.children()[1];
        let p = &body.children()[0];
        assert_eq!(p.value_or("color", ""), "#111111");
    }

    #[test]
    fn test_layout_at_two_viewports_is_independent() {
        let doc = parse_document(PAGE, None).unwrap();
        let measurer = bramble_css::ApproximateTextMeasurer;
        let wide = doc.layout(800, 600, &measurer);
        let narrow = doc.layout(200, 600, &measurer);
        assert_eq!(wide.dimensions.content.width, 800);
        assert_eq!(narrow.dimensions.content.width, 200);
        // Re-running at the first size reproduces the first result.
        let wide_again = doc.layout(800, 600, &measurer);
        assert_eq!(wide.dimensions, wide_again.dimensions);
    }

    #[test]
    fn test_render_produces_canvas_without_fonts() {
        let doc = parse_document(
            "<html><body><div></div></body></html>",
            Some("div { background-color: #102030; height: 20px; }"),
        )
        .unwrap();
        let fonts = FontStore::empty();
        let img = doc.render(40, 30, &fonts, Path::new("."));
        assert_eq!(img.dimensions(), (40, 30));
        // The div's background fills the top of the canvas.
        assert_eq!(img.get_pixel(5, 5).0, [0x10, 0x20, 0x30, 255]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_document(Path::new("/no/such/file.html"), None).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
