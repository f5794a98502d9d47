//! Built-in default rules.
//!
//! Every resolution prepends these ahead of author rules, so author rules of
//! equal specificity win by source order. The set covers heading sizes and
//! weights, paragraph and list spacing, the synthetic list bullet, anchor
//! underline and color, horizontal-rule appearance, and the emphasis/bold
//! font tags.

use std::sync::OnceLock;

use crate::parser::{Stylesheet, parse_css};

/// Default CSS for the handful of tags the engine ships styling for.
const DEFAULT_CSS: &str = r"
html { font-size: 12px; }

h1 { font-size: 30px; font-weight: bold; margin-top: 10px; margin-bottom: 10px; }
h2 { font-size: 24px; font-weight: bold; margin-top: 10px; margin-bottom: 10px; }
h3 { font-size: 18px; font-weight: bold; margin-top: 10px; margin-bottom: 10px; }
h4 { font-size: 14px; font-weight: bold; margin-top: 10px; margin-bottom: 10px; }

p { margin-top: 10px; margin-bottom: 10px; }

ul { margin-top: 1em; margin-bottom: 1em; }
li { padding-left: 20px; }

/* The marker element bramble-html injects in front of li content. */
bullet { display: inline; width: 1em; height: 1em; }

a { text-decoration: underline; color: #0000EE; }

hr { height: 1px; background-color: #000000; }

em { font-style: italic; }
b { font-weight: bold; }
";

/// The parsed default stylesheet, parsed once per process.
///
/// # Panics
/// Panics if the built-in CSS text fails to parse, which would be a defect
/// in this file rather than a runtime condition.
pub fn default_stylesheet() -> &'static Stylesheet {
    static SHEET: OnceLock<Stylesheet> = OnceLock::new();
    SHEET.get_or_init(|| parse_css(DEFAULT_CSS).expect("built-in default stylesheet parses"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stylesheet_parses() {
        let sheet = default_stylesheet();
        assert!(!sheet.rules.is_empty());
    }

    #[test]
    fn test_anchor_rule_present() {
        let sheet = default_stylesheet();
        let a_rule = sheet
            .rules
            .iter()
            .find(|r| r.selectors.iter().any(|s| s.tag.as_deref() == Some("a")))
            .expect("anchor rule");
        assert!(
            a_rule
                .declarations
                .iter()
                .any(|d| d.name == "text-decoration" && d.value == "underline")
        );
    }

    #[test]
    fn test_bullet_rule_is_inline_em_square() {
        let sheet = default_stylesheet();
        let bullet = sheet
            .rules
            .iter()
            .find(|r| {
                r.selectors
                    .iter()
                    .any(|s| s.tag.as_deref() == Some("bullet"))
            })
            .expect("bullet rule");
        assert!(
            bullet
                .declarations
                .iter()
                .any(|d| d.name == "display" && d.value == "inline")
        );
        assert!(
            bullet
                .declarations
                .iter()
                .any(|d| d.name == "width" && d.value == "1em")
        );
    }
}
