//! Selector matching and specificity.
//!
//! Matching here is deliberately permissive: a selector matches when *any*
//! of its parts hits (logical OR across universal/tag/id/class), not when
//! all of them do. Standard CSS compounds these conditions with AND; the
//! stylesheets this engine serves rely on the OR behavior, so it is kept
//! as-is rather than "fixed".

use bramble_dom::ElementData;

/// The universal selector token.
pub const UNIVERSAL: &str = "*";

/// A simple selector: optional tag name, optional id, and class names.
///
/// No combinators, no attribute selectors, no pseudo-classes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    /// Tag name, `Some("*")` for the universal selector.
    pub tag: Option<String>,
    /// Id from a `#id` part.
    pub id: Option<String>,
    /// Class names from `.class` parts.
    pub classes: Vec<String>,
}

/// A selector's precedence weight: `(has-id, class-count, has-tag)`,
/// compared lexicographically. Higher sorts later and therefore wins ties
/// on the same property.
///
/// The universal selector carries no weight at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity {
    /// Whether the selector names an id.
    pub has_id: bool,
    /// How many class names the selector carries.
    pub class_count: usize,
    /// Whether the selector names a (non-universal) tag.
    pub has_tag: bool,
}

impl Selector {
    /// The selector's cascade weight.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        Specificity {
            has_id: self.id.as_deref().is_some_and(|id| !id.is_empty()),
            class_count: self.classes.len(),
            has_tag: self.tag.as_deref().is_some_and(|t| t != UNIVERSAL),
        }
    }

    /// Whether this selector applies to `element`.
    ///
    /// Evaluated as an OR across the selector's parts:
    /// - the universal selector always matches
    /// - tag name equality matches
    /// - non-empty id equality matches
    /// - any overlap between the selector's classes and the element's
    ///   class list matches
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        if self.tag.as_deref() == Some(UNIVERSAL) {
            return true;
        }
        if self.tag.as_deref() == Some(element.tag_name.as_str()) {
            return true;
        }
        if let (Some(selector_id), Some(element_id)) = (self.id.as_deref(), element.id())
            && !element_id.is_empty()
            && selector_id == element_id
        {
            return true;
        }
        let element_classes = element.classes();
        self.classes
            .iter()
            .any(|class| element_classes.contains(&class.as_str()))
    }
}
