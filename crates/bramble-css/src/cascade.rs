//! Cascade resolution: joins the document tree and a stylesheet into a
//! styled tree.
//!
//! For every displayable element the resolver collects matching rules,
//! orders them by specificity (stable, so source order breaks ties), merges
//! their declarations over the inherited subset of the parent's properties,
//! and expands shorthands. The result is a plain string property map per
//! node; value errors surface later, in the box model, never here.

use std::collections::BTreeMap;

use bramble_common::warning::warn_once;
use bramble_dom::{DomTree, ElementData, NodeId, NodeType};

use crate::defaults::default_stylesheet;
use crate::display::DisplayType;
use crate::parser::{Declaration, Rule, Stylesheet};
use crate::selector::Specificity;

/// A node's resolved properties: name → raw string value, keys unique,
/// later writes overwriting earlier ones.
///
/// A `BTreeMap` keeps iteration order deterministic, so resolving the same
/// inputs twice yields byte-identical dumps.
pub type PropertyMap = BTreeMap<String, String>;

/// Font size used to resolve `em` lengths when no `font-size` has been
/// resolved yet. Matches the default stylesheet's `html` rule.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Properties that flow from parent to child.
const INHERITED_PROPERTIES: &[&str] = &[
    "color",
    "background-color",
    "font-size",
    "font-family",
    "font-weight",
    "font-style",
    "line-height",
    "text-decoration",
];

/// Shorthands that expand into `-left`/`-right`/`-top`/`-bottom`.
const EXPANDABLE_PROPERTIES: &[&str] = &["margin", "padding"];

/// Border shorthands; `border-width` expands into `border-left-width` and
/// friends, keeping the trailing word in place.
const BORDER_SHORTHANDS: &[(&str, &str)] =
    &[("border", "width"), ("border", "color"), ("border", "style")];

const SIDES: &[&str] = &["left", "right", "top", "bottom"];

/// A document node paired with its resolved properties.
///
/// The styled tree mirrors the displayable subset of the document tree in
/// document order: children are exclusively owned, the document node is
/// referenced by id. It is built fresh each time styles are computed and
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct StyledNode {
    node: NodeId,
    specified: PropertyMap,
    children: Vec<StyledNode>,
}

impl StyledNode {
    /// The document node this style applies to.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The resolved property map.
    #[must_use]
    pub fn specified(&self) -> &PropertyMap {
        &self.specified
    }

    /// Styled children, one per displayable document child.
    #[must_use]
    pub fn children(&self) -> &[StyledNode] {
        &self.children
    }

    /// Look up a property, falling back to `default` when unset.
    #[must_use]
    pub fn value_or<'a>(&'a self, property: &str, default: &'a str) -> &'a str {
        value_or(&self.specified, property, default)
    }

    /// This node's display type: the `display` property when present,
    /// otherwise the tag's default (text nodes are always `Text`).
    #[must_use]
    pub fn display(&self, dom: &DomTree) -> DisplayType {
        match self.specified.get("display") {
            Some(keyword) => DisplayType::parse(keyword),
            None => DisplayType::default_for_tag(dom.tag_name(self.node)),
        }
    }
}

/// Look up `property` in a map, falling back to `default` when unset.
///
/// Unresolved lookups are never an error; every consumer supplies the
/// default it wants.
#[must_use]
pub fn value_or<'a>(styles: &'a PropertyMap, property: &str, default: &'a str) -> &'a str {
    styles.get(property).map_or(default, String::as_str)
}

/// Whether a property inherits from parent to child.
#[must_use]
pub fn is_inherited(property: &str) -> bool {
    INHERITED_PROPERTIES.contains(&property)
}

/// Build the styled tree for a document against an author stylesheet.
///
/// The built-in default rules are prepended ahead of the author rules on
/// every resolution. Returns `None` only for an id pointing outside the
/// tree, which a parser-produced tree never does.
#[must_use]
pub fn style_tree(dom: &DomTree, author: &Stylesheet) -> Option<StyledNode> {
    let rules: Vec<&Rule> = default_stylesheet()
        .rules
        .iter()
        .chain(author.rules.iter())
        .collect();
    build_styled(dom, dom.root(), &rules, &PropertyMap::new())
}

fn build_styled(
    dom: &DomTree,
    id: NodeId,
    rules: &[&Rule],
    parent: &PropertyMap,
) -> Option<StyledNode> {
    let node = dom.get(id)?;
    match &node.node_type {
        // Text carries no selectors: it receives only the inherited subset.
        NodeType::Text(_) => Some(StyledNode {
            node: id,
            specified: inherited_subset(parent),
            children: Vec::new(),
        }),
        NodeType::Element(element) => {
            // Metadata elements stay in the tree as empty leaves so the
            // styled tree keeps one node per document node; nothing below
            // them is styled or laid out.
            if !element.is_displayable() {
                return Some(StyledNode {
                    node: id,
                    specified: PropertyMap::new(),
                    children: Vec::new(),
                });
            }
            let specified = element_style_values(element, rules, parent);
            let children = dom
                .children(id)
                .iter()
                .filter_map(|&child| build_styled(dom, child, rules, &specified))
                .collect();
            Some(StyledNode {
                node: id,
                specified,
                children,
            })
        }
    }
}

/// A matched rule with the specificity of whichever selector hit first.
struct MatchedRule<'a> {
    specificity: Specificity,
    rule: &'a Rule,
}

/// Construct the full property map for one element.
fn element_style_values(
    element: &ElementData,
    rules: &[&Rule],
    parent: &PropertyMap,
) -> PropertyMap {
    // Seed with the inherited subset of the parent's properties.
    let mut styles = inherited_subset(parent);

    // A flex container stamps the flex-child marker onto its children. This
    // is a propagation, not an inheritance: the child's own `display`
    // declaration, applied below, still overrides it.
    if parent.get("display").map(String::as_str) == Some("flex") {
        let _ = styles.insert("display".to_string(), "flex-child".to_string());
    }

    // Collect matching rules. A rule registers once, with the specificity
    // of the first of its selectors that matches.
    let mut matched: Vec<MatchedRule> = rules
        .iter()
        .filter_map(|&rule| {
            rule.selectors
                .iter()
                .find(|selector| selector.matches(element))
                .map(|selector| MatchedRule {
                    specificity: selector.specificity(),
                    rule,
                })
        })
        .collect();

    // Ascending specificity so later applications override earlier ones.
    // `sort_by` is stable: equal-specificity rules keep rule-set order,
    // which puts default rules before author rules.
    matched.sort_by(|a, b| a.specificity.cmp(&b.specificity));

    for m in matched {
        for declaration in &m.rule.declarations {
            apply_declaration(&mut styles, declaration);
        }
    }

    expand_shorthands(&mut styles);
    styles
}

/// The subset of `parent` that children inherit.
fn inherited_subset(parent: &PropertyMap) -> PropertyMap {
    parent
        .iter()
        .filter(|(name, _)| is_inherited(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Apply one declaration into the accumulating map.
fn apply_declaration(styles: &mut PropertyMap, declaration: &Declaration) {
    if declaration.name == "border" {
        // Recognized but intentionally not expanded into per-side
        // properties; report it so stylesheets relying on it fail loudly.
        warn_once(
            "css",
            &format!(
                "the 'border' shorthand is not expanded; use border-width/border-color/border-style (got 'border: {}')",
                declaration.value
            ),
        );
        return;
    }
    if let Some(value) = resolve_length(&declaration.value, styles) {
        let _ = styles.insert(declaration.name.clone(), value);
    }
}

/// Resolve unit suffixes on a raw value.
///
/// `em` lengths are converted immediately against the `font-size` already
/// accumulated on this node (the inherited value until a font-size
/// declaration on the node itself has applied); `px` suffixes are stripped
/// to a bare number; `%` is reported and dropped. Anything else passes
/// through untouched.
fn resolve_length(raw: &str, styles: &PropertyMap) -> Option<String> {
    if raw.len() < 2 {
        return Some(raw.to_string());
    }
    if let Some(number) = raw.strip_suffix("em") {
        // Keyword values like "lorem" also end in "em"; only a numeric
        // prefix makes this a length.
        if let Ok(n) = number.trim().parse::<f32>() {
            let font_size = styles
                .get("font-size")
                .and_then(|v| v.parse::<f32>().ok())
                .unwrap_or(DEFAULT_FONT_SIZE);
            return Some(((n * font_size).round() as i64).to_string());
        }
        return Some(raw.to_string());
    }
    if let Some(number) = raw.strip_suffix("px") {
        if number.trim().parse::<f32>().is_ok() {
            return Some(number.trim().to_string());
        }
        return Some(raw.to_string());
    }
    if raw.ends_with('%') {
        warn_once(
            "css",
            &format!("percent-based sizing is not supported ('{raw}')"),
        );
        return None;
    }
    Some(raw.to_string())
}

/// Expand `margin`/`padding` and the directional border shorthands into
/// their four per-side properties. Runs after all declarations have
/// applied, so the shorthand's final value wins.
fn expand_shorthands(styles: &mut PropertyMap) {
    for shorthand in EXPANDABLE_PROPERTIES {
        if let Some(value) = styles.get(*shorthand).cloned() {
            for side in SIDES {
                let _ = styles.insert(format!("{shorthand}-{side}"), value.clone());
            }
        }
    }
    for (prefix, suffix) in BORDER_SHORTHANDS {
        if let Some(value) = styles.get(format!("{prefix}-{suffix}").as_str()).cloned() {
            for side in SIDES {
                let _ = styles.insert(format!("{prefix}-{side}-{suffix}"), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_css;
    use bramble_dom::{AttributesMap, DomTree, ElementData, NodeType};

    fn make_element(tag: &str, id: Option<&str>, classes: &[&str]) -> NodeType {
        let mut attrs = AttributesMap::new();
        if let Some(id_val) = id {
            let _ = attrs.insert("id".to_string(), id_val.to_string());
        }
        if !classes.is_empty() {
            let _ = attrs.insert("class".to_string(), classes.join(" "));
        }
        NodeType::Element(ElementData::new(tag, attrs))
    }

    /// html > div tree with the div carrying the given id/classes.
    fn two_level_tree(tag: &str, id: Option<&str>, classes: &[&str]) -> (DomTree, NodeId) {
        let mut tree = DomTree::new();
        let html = tree.alloc(make_element("html", None, &[]));
        let child = tree.alloc(make_element(tag, id, classes));
        tree.append_child(html, child);
        (tree, child)
    }

    fn styled_child(dom: &DomTree, css: &str) -> StyledNode {
        let sheet = parse_css(css).unwrap();
        let styled = style_tree(dom, &sheet).unwrap();
        styled.children()[0].clone()
    }

    #[test]
    fn test_specificity_beats_declaration_order() {
        let (dom, _) = two_level_tree("p", None, &["highlight"]);
        // The class rule comes first in source order but still wins.
        let child = styled_child(&dom, ".highlight { color: green; } p { color: red; }");
        assert_eq!(child.value_or("color", ""), "green");
    }

    #[test]
    fn test_id_beats_class_beats_tag() {
        let (dom, _) = two_level_tree("p", Some("lead"), &["big"]);
        let child = styled_child(
            &dom,
            "p { color: red; } .big { color: blue; } #lead { color: black; }",
        );
        assert_eq!(child.value_or("color", ""), "black");
    }

    #[test]
    fn test_equal_specificity_resolves_by_source_order() {
        let (dom, _) = two_level_tree("p", None, &[]);
        let child = styled_child(&dom, "p { color: red; } p { color: blue; }");
        assert_eq!(child.value_or("color", ""), "blue");
    }

    #[test]
    fn test_inheritance_of_fixed_subset() {
        let (dom, _) = two_level_tree("p", None, &[]);
        let child = styled_child(&dom, "html { color: #333; width: 500px; }");
        // color inherits; width does not.
        assert_eq!(child.value_or("color", ""), "#333");
        assert_eq!(child.value_or("width", "unset"), "unset");
    }

    #[test]
    fn test_text_node_gets_inherited_subset_only() {
        let mut dom = DomTree::new();
        let html = dom.alloc(make_element("html", None, &[]));
        let p = dom.alloc(make_element("p", None, &[]));
        let text = dom.alloc(NodeType::Text("hi".to_string()));
        dom.append_child(html, p);
        dom.append_child(p, text);

        let sheet = parse_css("p { color: red; padding-left: 4px; }").unwrap();
        let styled = style_tree(&dom, &sheet).unwrap();
        let styled_text = &styled.children()[0].children()[0];
        assert_eq!(styled_text.value_or("color", ""), "red");
        // Box properties never inherit into text.
        assert_eq!(styled_text.value_or("padding-left", "unset"), "unset");
        assert_eq!(styled_text.display(&dom), DisplayType::Text);
    }

    #[test]
    fn test_flex_parent_marks_children() {
        let (dom, _) = two_level_tree("div", None, &[]);
        let child = styled_child(&dom, "html { display: flex; }");
        assert_eq!(child.value_or("display", ""), "flex-child");
        assert_eq!(child.display(&dom), DisplayType::FlexChild);
    }

    #[test]
    fn test_own_display_overrides_flex_marker() {
        let (dom, _) = two_level_tree("div", None, &["keep"]);
        let child = styled_child(&dom, "html { display: flex; } .keep { display: block; }");
        assert_eq!(child.display(&dom), DisplayType::Block);
    }

    #[test]
    fn test_em_resolves_against_accumulated_font_size() {
        let (dom, _) = two_level_tree("p", None, &[]);
        // font-size resolves first (2em of the inherited 12 = 24), then the
        // margin's 1em sees the new value.
        let child = styled_child(&dom, "p { font-size: 2em; margin-top: 1em; }");
        assert_eq!(child.value_or("font-size", ""), "24");
        assert_eq!(child.value_or("margin-top", ""), "24");
    }

    #[test]
    fn test_em_before_font_size_uses_inherited_value() {
        let (dom, _) = two_level_tree("p", None, &[]);
        let child = styled_child(&dom, "p { margin-top: 1em; font-size: 2em; }");
        // The margin resolved before the font-size declaration applied.
        assert_eq!(child.value_or("margin-top", ""), "12");
        assert_eq!(child.value_or("font-size", ""), "24");
    }

    #[test]
    fn test_px_suffix_stripped() {
        let (dom, _) = two_level_tree("p", None, &[]);
        let child = styled_child(&dom, "p { width: 120px; }");
        assert_eq!(child.value_or("width", ""), "120");
    }

    #[test]
    fn test_percent_reported_and_dropped() {
        let (dom, _) = two_level_tree("p", None, &[]);
        let child = styled_child(&dom, "p { width: 50%; }");
        assert_eq!(child.value_or("width", "unset"), "unset");
    }

    #[test]
    fn test_border_shorthand_is_a_no_op() {
        let (dom, _) = two_level_tree("p", None, &[]);
        let child = styled_child(&dom, "p { border: 1px solid red; }");
        assert_eq!(child.value_or("border", "unset"), "unset");
        assert_eq!(child.value_or("border-left-width", "unset"), "unset");
    }

    #[test]
    fn test_margin_padding_shorthand_expansion() {
        let (dom, _) = two_level_tree("div", None, &[]);
        let child = styled_child(&dom, "div { margin: 20px; padding: 16px; }");
        for side in ["left", "right", "top", "bottom"] {
            assert_eq!(child.value_or(&format!("margin-{side}"), ""), "20");
            assert_eq!(child.value_or(&format!("padding-{side}"), ""), "16");
        }
    }

    #[test]
    fn test_border_width_shorthand_expansion() {
        let (dom, _) = two_level_tree("div", None, &[]);
        let child = styled_child(
            &dom,
            "div { border-width: 2px; border-color: red; border-style: solid; }",
        );
        assert_eq!(child.value_or("border-left-width", ""), "2");
        assert_eq!(child.value_or("border-top-color", ""), "red");
        assert_eq!(child.value_or("border-bottom-style", ""), "solid");
    }

    #[test]
    fn test_metadata_elements_become_empty_leaves() {
        let mut dom = DomTree::new();
        let html = dom.alloc(make_element("html", None, &[]));
        let head = dom.alloc(make_element("head", None, &[]));
        let style = dom.alloc(make_element("style", None, &[]));
        let body = dom.alloc(make_element("body", None, &[]));
        dom.append_child(html, head);
        dom.append_child(head, style);
        dom.append_child(html, body);

        let styled = style_tree(&dom, &Stylesheet::default()).unwrap();
        // One styled node per document child, in document order.
        assert_eq!(styled.children().len(), 2);
        let styled_head = &styled.children()[0];
        assert!(styled_head.specified().is_empty());
        assert!(styled_head.children().is_empty());
    }

    #[test]
    fn test_default_rules_apply_and_author_overrides() {
        let (dom, _) = two_level_tree("a", None, &[]);
        let plain = styled_child(&dom, "");
        assert_eq!(plain.value_or("text-decoration", ""), "underline");
        assert_eq!(plain.value_or("color", ""), "#0000EE");

        let overridden = styled_child(&dom, "a { color: #111111; }");
        assert_eq!(overridden.value_or("color", ""), "#111111");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let mut dom = DomTree::new();
        let html = dom.alloc(make_element("html", None, &[]));
        let div = dom.alloc(make_element("div", Some("a"), &["b", "c"]));
        dom.append_child(html, div);
        let sheet =
            parse_css("div { margin: 1em; } .b { color: red; } #a { width: 10px; }").unwrap();

        let first = style_tree(&dom, &sheet).unwrap();
        let second = style_tree(&dom, &sheet).unwrap();
        assert_eq!(
            format!("{:?}", first.children()[0].specified()),
            format!("{:?}", second.children()[0].specified())
        );
    }
}
