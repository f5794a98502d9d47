//! CSS rule parsing.
//!
//! A recursive-descent parser over the stylesheet source. Rules are kept in
//! source order; the cascade depends on that order for equal-specificity
//! tie-breaks, so the parser never reorders or merges anything.

use crate::selector::{Selector, UNIVERSAL};
use thiserror::Error;

/// Errors surfaced while parsing CSS.
///
/// Like HTML parsing, stylesheet syntax errors are raised to the caller up
/// front; the cascade itself never fails.
#[derive(Debug, Error)]
pub enum CssError {
    /// Input ended in the middle of a construct.
    #[error("unexpected end of stylesheet at offset {0}")]
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

    /// A selector list was not followed by `,` or `{`.
    #[error("invalid selector at offset {0}")]
    InvalidSelector(usize),
}

/// A single `name: value` declaration. Values stay raw strings; unit
/// handling happens in the cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name, e.g. `margin-left`.
    pub name: String,
    /// Raw value text, whitespace-normalized.
    pub value: String,
}

/// A rule: one or more selectors sharing a declaration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// The comma-separated selectors, in source order.
    pub selectors: Vec<Selector>,
    /// The declarations, in source order.
    pub declarations: Vec<Declaration>,
}

/// An ordered sequence of rules.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    /// Rules in source order.
    pub rules: Vec<Rule>,
}

/// Parse a stylesheet from source text.
pub fn parse_css(source: &str) -> Result<Stylesheet, CssError> {
    let mut parser = CssParser::new(source);
    let rules = parser.parse_rules()?;
    Ok(Stylesheet { rules })
}

fn valid_selector_char(c: char) -> bool {
    !c.is_whitespace() && c != '{' && c != '}' && c != ',' && c != '/' && c != '#' && c != '.'
}

fn valid_property_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Character-cursor parser over the stylesheet text.
struct CssParser {
    input: Vec<char>,
    pos: usize,
}

impl CssParser {
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

    fn consume_char(&mut self) -> Result<char, CssError> {
        let c = self.next_char().ok_or(CssError::UnexpectedEof(self.pos))?;
        self.pos += 1;
        Ok(c)
    }

    fn expect(&mut self, expected: char) -> Result<(), CssError> {
        let pos = self.pos;
        let found = self.consume_char()?;
        if found == expected {
            Ok(())
        } else {
            Err(CssError::UnexpectedChar {
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

    fn skip_whitespace_and_comments(&mut self) -> Result<(), CssError> {
        loop {
            self.consume_whitespace();
            if self.starts_with("/*") {
                self.parse_comment()?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_comment(&mut self) -> Result<(), CssError> {
        for _ in 0..2 {
            let _ = self.consume_char()?; // "/*"
        }
        while !self.starts_with("*/") {
            let _ = self.consume_char()?;
        }
        for _ in 0..2 {
            let _ = self.consume_char()?;
        }
        Ok(())
    }

    fn parse_rules(&mut self) -> Result<Vec<Rule>, CssError> {
        let mut rules = Vec::new();
        loop {
            self.skip_whitespace_and_comments()?;
            if self.eof() {
                return Ok(rules);
            }
            rules.push(self.parse_rule()?);
        }
    }

    fn parse_rule(&mut self) -> Result<Rule, CssError> {
        let selectors = self.parse_selectors()?;
        let declarations = self.parse_declarations()?;
        Ok(Rule {
            selectors,
            declarations,
        })
    }

    /// Parse the comma-separated selector list up to and including `{`.
    fn parse_selectors(&mut self) -> Result<Vec<Selector>, CssError> {
        let mut selectors = Vec::new();
        loop {
            selectors.push(self.parse_simple_selector()?);
            self.consume_whitespace();
            match self.next_char() {
                Some(',') => {
                    let _ = self.consume_char()?;
                    self.consume_whitespace();
                }
                Some('{') => {
                    let _ = self.consume_char()?;
                    return Ok(selectors);
                }
                _ => return Err(CssError::InvalidSelector(self.pos)),
            }
        }
    }

    fn parse_simple_selector(&mut self) -> Result<Selector, CssError> {
        let mut selector = Selector::default();
        loop {
            self.consume_whitespace();
            match self.next_char() {
                Some('#') => {
                    let _ = self.consume_char()?;
                    selector.id = Some(self.parse_identifier());
                }
                Some('.') => {
                    let _ = self.consume_char()?;
                    selector.classes.push(self.parse_identifier());
                }
                Some('*') => {
                    let _ = self.consume_char()?;
                    selector.tag = Some(UNIVERSAL.to_string());
                }
                Some(c) if valid_selector_char(c) => {
                    selector.tag = Some(self.parse_identifier());
                }
                _ => return Ok(selector),
            }
        }
    }

    fn parse_identifier(&mut self) -> String {
        self.consume_while(valid_selector_char)
    }

    fn parse_declarations(&mut self) -> Result<Vec<Declaration>, CssError> {
        let mut declarations = Vec::new();
        loop {
            self.skip_whitespace_and_comments()?;
            match self.next_char() {
                None => return Err(CssError::UnexpectedEof(self.pos)),
                Some('}') => {
                    let _ = self.consume_char()?;
                    return Ok(declarations);
                }
                Some(_) => declarations.push(self.parse_declaration()?),
            }
        }
    }

    fn parse_declaration(&mut self) -> Result<Declaration, CssError> {
        self.consume_whitespace();
        let name = self.consume_while(valid_property_char);
        self.consume_whitespace();
        self.expect(':')?;
        self.consume_whitespace();
        let value = self.consume_while(|c| c != ';' && c != '}');
        // The final declaration in a block may omit its semicolon.
        if self.next_char() == Some(';') {
            let _ = self.consume_char()?;
        }
        Ok(Declaration {
            name,
            value: normalize_whitespace(&value),
        })
    }
}

/// Collapse runs of whitespace to single spaces and trim the ends.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
