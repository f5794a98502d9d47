//! Integration tests driving the full parse → cascade → layout pipeline.

use bramble_css::{
    ApproximateTextMeasurer, BoxKind, Dimensions, DisplayType, LayoutElement, Rect, StyledNode,
    TextMeasurer, layout_tree, parse_css, style_tree,
};
use bramble_dom::DomTree;
use bramble_html::parse_html;

/// Parse HTML + CSS and build the styled tree.
fn style_html(html: &str, css: &str) -> (DomTree, StyledNode) {
    let dom = parse_html(html).expect("html parses");
    let sheet = parse_css(css).expect("css parses");
    let styled = style_tree(&dom, &sheet).expect("styled tree");
    (dom, styled)
}

/// Lay out HTML + CSS inside a viewport of the given width.
fn layout_html(html: &str, css: &str, viewport_width: i32) -> LayoutElement {
    let (dom, styled) = style_html(html, css);
    let viewport = Dimensions {
        content: Rect {
            x: 0,
            y: 0,
            width: viewport_width,
            height: 600,
        },
        ..Dimensions::default()
    };
    layout_tree(&dom, &styled, viewport, &ApproximateTextMeasurer)
}

#[test]
fn test_styled_tree_mirrors_displayable_document() {
    let (_dom, styled) = style_html(
        "<html><head><style></style></head><body><p>hi</p></body></html>",
        "",
    );
    // html has two children: head (kept as an empty leaf) and body.
    assert_eq!(styled.children().len(), 2);
    let head = &styled.children()[0];
    assert!(head.specified().is_empty());
    assert!(head.children().is_empty());

    let body = &styled.children()[1];
    assert_eq!(body.children().len(), 1); // p
    // "hi" plus the trailing space node the parser appends.
    assert_eq!(body.children()[0].children().len(), 2);
}

#[test]
fn test_structural_congruence_with_layout_tree() {
    let root = layout_html(
        "<html><body><div><span>a</span><span>b</span></div></body></html>",
        "",
        800,
    );
    let body = &root.children()[0];
    let div = &body.children()[0];
    assert_eq!(div.children().len(), 2);
    for span in div.children() {
        assert_eq!(span.display(), DisplayType::Inline);
        // word + trailing space text nodes
        assert_eq!(span.children().len(), 2);
        assert_eq!(span.children()[0].box_kind(), BoxKind::Text);
    }
}

#[test]
fn test_end_to_end_fixed_width_div_with_inline_span() {
    let root = layout_html(
        r##"<html><body><div id="box"><span>Hi</span></div></body></html>"##,
        "#box { width: 200px; padding: 10px; }",
        300,
    );
    let body = &root.children()[0];
    let div = &body.children()[0];

    // The div's padding box is 200 + 10 + 10 wide.
    assert_eq!(div.dimensions.content.width, 200);
    assert_eq!(div.dimensions.padding_box().width, 220);

    // The span sizes to its own text metrics (word + trailing space), not
    // to the div's 200.
    let span = &div.children()[0];
    let word = &span.children()[0];
    let space = &span.children()[1];
    let expected_word = ApproximateTextMeasurer.text_width("Hi", &word.text_style());
    assert_eq!(word.dimensions.content.width, expected_word);
    assert_eq!(
        span.dimensions.content.width,
        word.dimensions.content.width + space.dimensions.content.width
    );
    assert!(span.dimensions.content.width < 200);
}

#[test]
fn test_heading_defaults_flow_into_text() {
    let (dom, styled) = style_html("<html><body><h1>Title</h1></body></html>", "");
    let body = &styled.children()[0];
    let h1 = &body.children()[0];
    assert_eq!(h1.value_or("font-size", ""), "30");
    assert_eq!(h1.value_or("font-weight", ""), "bold");
    // The text node inherits the heading's font properties.
    let text = &h1.children()[0];
    assert_eq!(text.value_or("font-size", ""), "30");
    assert_eq!(text.value_or("font-weight", ""), "bold");
    assert_eq!(text.display(&dom), DisplayType::Text);
}

#[test]
fn test_list_bullet_is_inline_em_square() {
    let root = layout_html("<html><body><ul><li>item</li></ul></body></html>", "", 800);
    let body = &root.children()[0];
    let ul = &body.children()[0];
    let li = &ul.children()[0];
    let bullet = &li.children()[0];
    assert_eq!(bullet.box_kind(), BoxKind::Bullet);
    assert_eq!(bullet.display(), DisplayType::Inline);
    // width: 1em against the default 12px font.
    assert_eq!(bullet.dimensions.content.width, 12);
}

#[test]
fn test_display_none_subtree_is_still_built() {
    // Invisible boxes stay in the layout tree (structural congruence); the
    // renderer is what skips them.
    let root = layout_html(
        "<html><body><div class=\"hide\">gone</div></body></html>",
        ".hide { display: none; }",
        800,
    );
    let body = &root.children()[0];
    assert_eq!(body.children().len(), 1);
    assert_eq!(body.children()[0].display(), DisplayType::Invisible);
}

#[test]
fn test_text_height_comes_from_metrics() {
    let root = layout_html(
        "<html><body><p>word</p></body></html>",
        "p { font-size: 20px; }",
        800,
    );
    let body = &root.children()[0];
    let p = &body.children()[0];
    let word = &p.children()[0];
    // 1.2 × the resolved 20px font size.
    assert_eq!(word.dimensions.content.height, 24);
}

#[test]
fn test_rerunning_cascade_is_byte_identical() {
    let html = "<html><body><div class=\"a b\"><p>text here</p></div></body></html>";
    let css = ".a { margin: 1em; } .b { color: red; } div { width: 100px; }";
    let (dom, first) = style_html(html, css);
    let sheet = parse_css(css).unwrap();
    let second = style_tree(&dom, &sheet).unwrap();

    fn dump(node: &StyledNode, out: &mut String) {
        out.push_str(&format!("{:?}\n", node.specified()));
        for child in node.children() {
            dump(child, out);
        }
    }
    let mut a = String::new();
    let mut b = String::new();
    dump(&first, &mut a);
    dump(&second, &mut b);
    assert_eq!(a, b);
}

#[test]
fn test_root_height_accumulates_bottom_up() {
    let root = layout_html(
        "<html><body><div></div></body></html>",
        "div { height: 40px; }",
        800,
    );
    // html's height derives from body, which derives from the div.
    assert_eq!(root.dimensions.content.height, 40);
}

#[test]
fn test_em_margins_scale_with_font_size() {
    let root = layout_html(
        "<html><body><div class=\"pad\"></div></body></html>",
        ".pad { font-size: 20px; margin: 1em; height: 10px; }",
        800,
    );
    let body = &root.children()[0];
    let div = &body.children()[0];
    assert_eq!(div.dimensions.margin.top, 20);
    assert_eq!(div.dimensions.margin.left, 20);
}
