//! Element - Immutable node description.
//!
//! Elements are built once per `render()` call and consumed by the
//! reconciler, which moves their props and children into fibers.
//!
//! # Example
//!
//! ```ignore
//! use spark_fiber::primitives::{create_element, Element};
//! use spark_fiber::{Listener, Props};
//!
//! // Functional form
//! let list = create_element("ul", Props::new(), [
//!     create_element("li", Props::new(), ["one"]),
//!     create_element("li", Props::new(), ["two"]),
//! ]);
//!
//! // Builder form
//! let button = Element::tag("button")
//!     .prop("class", "primary")
//!     .prop("onClick", Listener::new(|_| println!("clicked")))
//!     .child("Save");
//! ```

use crate::types::{NodeType, PropValue, Props};
use super::types::Child;

// =============================================================================
// Element
// =============================================================================

/// Immutable description of a desired host node and its children.
///
/// Only [`NodeType`] takes part in diffing; props and children are compared
/// by the commit phase, never by the reconciler.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    node_type: NodeType,
    props: Props,
    children: Vec<Element>,
}

impl Element {
    /// Start a tag element with no props and no children.
    pub fn tag(name: &str) -> Self {
        Self::from_parts(NodeType::tag(name), Props::new(), Vec::new())
    }

    /// Add a property.
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key, value);
        self
    }

    /// Add a child, normalizing non-elements into text.
    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.children.push(child.into().into_element());
        self
    }

    /// Add several children.
    pub fn children_from<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Child>,
    {
        self.children
            .extend(children.into_iter().map(|c| c.into().into_element()));
        self
    }

    pub fn node_type(&self) -> &NodeType {
        &self.node_type
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub(crate) fn from_parts(node_type: NodeType, props: Props, children: Vec<Element>) -> Self {
        Self {
            node_type,
            props,
            children,
        }
    }

    pub(crate) fn into_parts(self) -> (NodeType, Props, Vec<Element>) {
        (self.node_type, self.props, self.children)
    }
}

/// Create a tag element.
///
/// Each child is normalized: elements pass through, any other value becomes
/// a `TEXT` element whose `nodeValue` is that value.
pub fn create_element<I>(tag: &str, props: Props, children: I) -> Element
where
    I: IntoIterator,
    I::Item: Into<Child>,
{
    Element::from_parts(
        NodeType::tag(tag),
        props,
        children
            .into_iter()
            .map(|child| child.into().into_element())
            .collect(),
    )
}

// =============================================================================
// Tests
// =============================================================================
