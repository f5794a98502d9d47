//! HTML parser for the Bramble engine.
//!
//! # Scope
//!
//! A small recursive-descent parser producing a [`bramble_dom::DomTree`]:
//! - elements with single- or double-quoted attributes
//! - self-closing tags (`<img ... />`)
//! - `<!-- -->` and `{# #}` comments
//! - text runs normalized into word + single-space text nodes
//! - a synthetic `bullet` element prepended to every `li`'s children, which
//!   the default stylesheet sizes and the renderer draws as the list marker
//!
//! # Not implemented
//!
//! - implicit/omitted tags, doctype, character references
//! - error recovery: malformed markup is returned as an [`HtmlError`], not
//!   repaired

mod parser;

pub use parser::{HtmlError, parse_html};

use bramble_dom::{DomTree, NodeId, NodeType};

/// Print an indented outline of the tree to stdout, for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId, depth: usize) {
    let indent = "  ".repeat(depth);
    let Some(node) = tree.get(id) else { return };
    match &node.node_type {
        NodeType::Element(data) => {
            let mut attrs: Vec<String> = data
                .attrs
                .iter()
                .map(|(k, v)| format!("{k}=\"{v}\""))
                .collect();
            attrs.sort();
            if attrs.is_empty() {
                println!("{indent}<{}>", data.tag_name);
            } else {
                println!("{indent}<{} {}>", data.tag_name, attrs.join(" "));
            }
        }
        NodeType::Text(text) => println!("{indent}{text:?}"),
    }
    for &child in tree.children(id) {
        print_tree(tree, child, depth + 1);
    }
}
