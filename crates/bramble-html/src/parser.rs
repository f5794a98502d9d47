//! Recursive-descent HTML parsing.

use bramble_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType, TAG_BULLET};
use thiserror::Error;

/// Errors surfaced while parsing HTML.
///
/// Parse failures are raised to the caller before styling or layout ever
/// run; the core stages only see well-formed trees.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Input ended in the middle of a construct.
    #[error("unexpected end of input at offset {0}")]
    UnexpectedEof(usize),

    /// A specific character was required.
    #[error("expected {expected:?} at offset {pos}, found {found:?}")]
    UnexpectedChar {
        /// The character the grammar required.
        expected: char,
        /// The character actually present.
        found: char,
        /// Offset into the input, in characters.
        pos: usize,
    },

    /// Open/close tag names do not line up.
    #[error("mismatched tags: <{open}> closed by </{close}>")]
    MismatchedTag {
        /// Tag name from the opening tag.
        open: String,
        /// Tag name from the closing tag.
        close: String,
    },

    /// The input contained no nodes at all.
    #[error("document has no content")]
    EmptyDocument,
}

/// Parse an HTML document into a [`DomTree`].
///
/// The first top-level node becomes the tree root; leading comments and
/// whitespace are skipped, and anything after the root element's closing tag
/// is ignored.
pub fn parse_html(source: &str) -> Result<DomTree, HtmlError> {
    let mut tree = DomTree::new();
    let mut parser = HtmlParser::new(source);
    let roots = parser.parse_nodes(&mut tree)?;
    if roots.is_empty() {
        return Err(HtmlError::EmptyDocument);
    }
    // The root is always the first node allocated: elements allocate before
    // descending into children, so `roots[0] == NodeId::ROOT` holds.
    debug_assert_eq!(roots[0], tree.root());
    Ok(tree)
}

/// Character-cursor parser over the source text.
struct HtmlParser {
    input: Vec<char>,
    pos: usize,
}

impl HtmlParser {
    fn new(source: &str) -> Self {
        Self {
            input: source.chars().collect(),
            pos: 0,
        }
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn next_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        let mut i = self.pos;
        for c in prefix.chars() {
            if self.input.get(i) != Some(&c) {
                return false;
            }
            i += 1;
        }
        true
    }

    fn consume_char(&mut self) -> Result<char, HtmlError> {
        let c = self
            .next_char()
            .ok_or(HtmlError::UnexpectedEof(self.pos))?;
        self.pos += 1;
        Ok(c)
    }

    fn expect(&mut self, expected: char) -> Result<(), HtmlError> {
        let pos = self.pos;
        let found = self.consume_char()?;
        if found == expected {
            Ok(())
        } else {
            Err(HtmlError::UnexpectedChar {
                expected,
                found,
                pos,
            })
        }
    }

    fn consume_while(&mut self, condition: impl Fn(char) -> bool) -> String {
        let mut result = String::new();
        while let Some(c) = self.next_char() {
            if !condition(c) {
                break;
            }
            result.push(c);
            self.pos += 1;
        }
        result
    }

    fn consume_whitespace(&mut self) {
        let _ = self.consume_while(char::is_whitespace);
    }

    /// Parse sibling nodes until end of input or a closing tag.
    fn parse_nodes(&mut self, tree: &mut DomTree) -> Result<Vec<NodeId>, HtmlError> {
        let mut nodes = Vec::new();
        self.consume_whitespace();
        while !self.eof() && !self.starts_with("</") {
            self.consume_whitespace();
            if self.starts_with("<!--") {
                self.parse_comment()?;
            } else if self.starts_with("{#") {
                self.parse_line_comment()?;
            } else if self.next_char() == Some('<') {
                nodes.push(self.parse_element(tree)?);
            } else {
                self.parse_text_nodes(tree, &mut nodes);
            }
            self.consume_whitespace();
        }
        Ok(nodes)
    }

    /// Parse one element, its attributes, and its subtree.
    fn parse_element(&mut self, tree: &mut DomTree) -> Result<NodeId, HtmlError> {
        self.expect('<')?;
        let tag = self.parse_name();
        let attrs = self.parse_attributes()?;
        self.consume_whitespace();

        // Allocate before descending so the document root claims the first
        // arena slot.
        let id = tree.alloc(NodeType::Element(ElementData::new(&tag, attrs)));

        if self.starts_with("/>") {
            self.expect('/')?;
            self.expect('>')?;
            return Ok(id);
        }
        self.expect('>')?;

        let mut children = self.parse_nodes(tree)?;

        // Every list item gets a marker element in front of its content; the
        // default stylesheet gives it inline display and an em-square size.
        if tag == "li" {
            let bullet = tree.alloc(NodeType::Element(ElementData::new(
                TAG_BULLET,
                AttributesMap::new(),
            )));
            children.insert(0, bullet);
        }
        for child in children {
            tree.append_child(id, child);
        }

        self.expect('<')?;
        self.expect('/')?;
        let closing = self.parse_name();
        if closing != tag {
            return Err(HtmlError::MismatchedTag {
                open: tag,
                close: closing,
            });
        }
        self.expect('>')?;
        Ok(id)
    }

    /// Parse a run of text into word nodes, each followed by a single-space
    /// node, collapsing the source whitespace.
    fn parse_text_nodes(&mut self, tree: &mut DomTree, nodes: &mut Vec<NodeId>) {
        while !self.eof() && self.next_char() != Some('<') {
            let word = self.consume_while(|c| !c.is_whitespace() && c != '<');
            if word.is_empty() {
                break;
            }
            nodes.push(tree.alloc(NodeType::Text(word)));
            nodes.push(tree.alloc(NodeType::Text(" ".to_string())));
            self.consume_whitespace();
        }
    }

    fn parse_comment(&mut self) -> Result<(), HtmlError> {
        for _ in 0..4 {
            let _ = self.consume_char()?; // "<!--"
        }
        while !self.starts_with("-->") {
            let _ = self.consume_char()?;
        }
        for _ in 0..3 {
            let _ = self.consume_char()?;
        }
        Ok(())
    }

    fn parse_line_comment(&mut self) -> Result<(), HtmlError> {
        for _ in 0..2 {
            let _ = self.consume_char()?; // "{#"
        }
        while !self.starts_with("#}") {
            let _ = self.consume_char()?;
        }
        for _ in 0..2 {
            let _ = self.consume_char()?;
        }
        Ok(())
    }

    fn parse_attributes(&mut self) -> Result<AttributesMap, HtmlError> {
        self.consume_whitespace();
        let mut attrs = AttributesMap::new();
        loop {
            self.consume_whitespace();
            match self.next_char() {
                None => return Err(HtmlError::UnexpectedEof(self.pos)),
                Some('>') => break,
                Some('/') if self.starts_with("/>") => break,
                Some(_) => {
                    let (name, value) = self.parse_attribute()?;
                    let _ = attrs.insert(name, value);
                }
            }
        }
        Ok(attrs)
    }

    fn parse_attribute(&mut self) -> Result<(String, String), HtmlError> {
        let name = self.parse_name();
        self.expect('=')?;
        let value = self.parse_attr_value()?;
        Ok((name, value))
    }

    fn parse_attr_value(&mut self) -> Result<String, HtmlError> {
        let pos = self.pos;
        let quote = self.consume_char()?;
        if quote != '"' && quote != '\'' {
            return Err(HtmlError::UnexpectedChar {
                expected: '"',
                found: quote,
                pos,
            });
        }
        let value = self.consume_while(|c| c != quote);
        self.expect(quote)?;
        Ok(value)
    }

    /// Consume a tag or attribute name, lowercased.
    fn parse_name(&mut self) -> String {
        self.consume_while(|c| {
            !c.is_whitespace() && c != '=' && c != '>' && c != '<' && c != '/'
        })
        .to_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_of(tree: &DomTree, id: NodeId) -> &str {
        tree.as_element(id).map(|e| e.tag_name.as_str()).unwrap()
    }

    #[test]
    fn test_parse_nested_elements() {
        let tree = parse_html("<html><body><div></div></body></html>").unwrap();
        let root = tree.root();
        assert_eq!(tag_of(&tree, root), "html");
        let body = tree.children(root)[0];
        assert_eq!(tag_of(&tree, body), "body");
        let div = tree.children(body)[0];
        assert_eq!(tag_of(&tree, div), "div");
        assert!(tree.children(div).is_empty());
    }

    #[test]
    fn test_parse_attributes_both_quote_styles() {
        let tree =
            parse_html(r#"<div id="main" class='a b'></div>"#).unwrap();
        let data = tree.as_element(tree.root()).unwrap();
        assert_eq!(data.id(), Some("main"));
        assert_eq!(data.classes(), vec!["a", "b"]);
    }

    #[test]
    fn test_text_splits_into_words_and_spaces() {
        let tree = parse_html("<p>hello   brave world</p>").unwrap();
        let p = tree.root();
        let texts: Vec<&str> = tree
            .children(p)
            .iter()
            .map(|&c| tree.as_text(c).unwrap())
            .collect();
        assert_eq!(texts, vec!["hello", " ", "brave", " ", "world", " "]);
    }

    #[test]
    fn test_self_closing_tag() {
        let tree = parse_html(r#"<div><img src="cat.png"/></div>"#).unwrap();
        let img = tree.children(tree.root())[0];
        assert_eq!(tag_of(&tree, img), "img");
        assert_eq!(
            tree.as_element(img).unwrap().attr_or("src", "/"),
            "cat.png"
        );
    }

    #[test]
    fn test_li_gains_bullet_marker() {
        let tree = parse_html("<ul><li>one</li></ul>").unwrap();
        let li = tree.children(tree.root())[0];
        let first = tree.children(li)[0];
        assert_eq!(tag_of(&tree, first), TAG_BULLET);
        assert_eq!(tree.as_text(tree.children(li)[1]), Some("one"));
    }

    #[test]
    fn test_comments_are_skipped() {
        let tree =
            parse_html("<div><!-- ignore me -->{# and me #}<p>x</p></div>").unwrap();
        let div = tree.root();
        assert_eq!(tree.children(div).len(), 1);
        assert_eq!(tag_of(&tree, tree.children(div)[0]), "p");
    }

    #[test]
    fn test_mismatched_tags_error() {
        let err = parse_html("<div></span>").unwrap_err();
        assert!(matches!(err, HtmlError::MismatchedTag { .. }));
    }

    #[test]
    fn test_empty_document_error() {
        assert!(matches!(
            parse_html("   "),
            Err(HtmlError::EmptyDocument)
        ));
    }

    #[test]
    fn test_uppercase_tags_normalized() {
        let tree = parse_html("<DIV></DIV>").unwrap();
        assert_eq!(tag_of(&tree, tree.root()), "div");
    }
}
