//! Text Primitive - The reserved `TEXT` element.
//!
//! A text element has type [`NodeType::Text`], a single `nodeValue` prop and
//! no children. The host materializes it with `create_text_node`.

use crate::types::{NodeType, PropValue, Props, NODE_VALUE};
use super::element::Element;

/// Create a text element.
///
/// Any value convertible into a [`PropValue`] works; the host receives its
/// display form.
pub fn text(value: impl Into<PropValue>) -> Element {
    Element::from_parts(
        NodeType::Text,
        Props::new().with(NODE_VALUE, value),
        Vec::new(),
    )
}
