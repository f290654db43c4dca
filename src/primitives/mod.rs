//! Element Primitives - Immutable descriptions of the desired tree.
//!
//! This module provides the element model consumed by `render()`:
//! - [`create_element`] - Tag element with props and normalized children
//! - [`text`] - Text element (`TEXT` type, `nodeValue` prop, no children)
//! - [`Element`] - Builder-style construction of the same descriptions
//!
//! # Normalization
//!
//! Children are given as [`Child`] values. Elements pass through unchanged;
//! every other value (strings, numbers, booleans) becomes a text element:
//!
//! ```ignore
//! use spark_fiber::primitives::{create_element, Child};
//! use spark_fiber::Props;
//!
//! let title = create_element("h1", Props::new().with("id", "title"), ["Hello"]);
//! let page = create_element("div", Props::new(), [Child::from(title), Child::from(42)]);
//! // page.children()[1] is a TEXT element with nodeValue = 42
//! ```
//!
//! Construction is pure. Equal inputs produce equal (not shared) elements.

mod element;
mod text;
mod types;

pub use element::{create_element, Element};
pub use text::text;
pub use types::Child;
