//! Child type - What `create_element` accepts as children.

use crate::types::PropValue;
use super::element::Element;
use super::text::text;

// =============================================================================
// Child
// =============================================================================

/// A child passed to [`create_element`](super::create_element).
///
/// Non-element values are normalized into text elements by [`Child::into_element`].
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Element(Element),
    Value(PropValue),
}

impl Child {
    /// Normalize into an element.
    pub fn into_element(self) -> Element {
        match self {
            Child::Element(element) => element,
            Child::Value(value) => text(value),
        }
    }
}

impl From<Element> for Child {
    fn from(element: Element) -> Self {
        Child::Element(element)
    }
}

impl From<PropValue> for Child {
    fn from(value: PropValue) -> Self {
        Child::Value(value)
    }
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Child::Value(value.into())
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Child::Value(value.into())
    }
}

impl From<i64> for Child {
    fn from(value: i64) -> Self {
        Child::Value(value.into())
    }
}

impl From<i32> for Child {
    fn from(value: i32) -> Self {
        Child::Value(value.into())
    }
}

impl From<f64> for Child {
    fn from(value: f64) -> Self {
        Child::Value(value.into())
    }
}

impl From<bool> for Child {
    fn from(value: bool) -> Self {
        Child::Value(value.into())
    }
}
