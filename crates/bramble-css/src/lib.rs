//! CSS parsing, cascade resolution, and flow layout for the Bramble engine.
//!
//! # Scope
//!
//! This crate implements the middle of the rendering pipeline:
//!
//! - **CSS Parser** - recursive descent over rules, simple selectors
//!   (tag / `#id` / `.class` / `*`), declarations, and comments
//! - **Selector Matcher** - permissive OR matching across a selector's parts
//!   (see [`selector`] for why this deliberately diverges from standard CSS)
//! - **Cascade Resolver** - builds a styled tree: matching rules ordered by
//!   specificity with stable source-order tie-breaks, property inheritance,
//!   `em`/`px` resolution, and shorthand expansion
//! - **Box Model** - integer-pixel content/padding/border/margin rectangles
//!   with CSS2.1-style automatic width and margin resolution
//! - **Flow Layout** - block/inline flow with a left-to-right, top-to-bottom
//!   cursor, line wrapping, and shrink-to-fit inline sizing
//!
//! Text measurement is delegated through the [`layout::metrics::TextMeasurer`]
//! trait; `bramble-browser` supplies the font-backed implementation.
//!
//! # Not implemented
//!
//! - selector combinators, attribute selectors, pseudo-classes
//! - percentage lengths (reported and dropped, never applied)
//! - real flexbox distribution; `display: flex` only marks children as
//!   `flex-child`

/// Cascade resolution and the styled tree.
pub mod cascade;
/// The built-in default rules prepended to every resolution.
pub mod defaults;
/// Display-type keywords and per-tag defaults.
pub mod display;
/// Box model, flow layout, and the text-measurement seam.
pub mod layout;
/// CSS rule/selector/declaration parsing.
pub mod parser;
/// Selector matching and specificity.
pub mod selector;

// Re-exports for convenience
pub use cascade::{DEFAULT_FONT_SIZE, PropertyMap, StyledNode, style_tree, value_or};
pub use defaults::default_stylesheet;
pub use display::DisplayType;
pub use layout::box_model::{Dimensions, EdgeSizes, Rect};
pub use layout::metrics::{ApproximateTextMeasurer, TextMeasurer, TextStyle};
pub use layout::values::{AutoLength, parse_px};
pub use layout::{BoxKind, LayoutElement, build_layout_tree, layout_tree};
pub use parser::{CssError, Declaration, Rule, Stylesheet, parse_css};
pub use selector::{Selector, Specificity};
