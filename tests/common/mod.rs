//! Shared helpers for the integration tests.

#![allow(dead_code)]

use spark_fiber::{Element, Engine, MemoryHost, NodeId, NodeType, NODE_VALUE};

pub fn engine() -> (Engine<MemoryHost>, NodeId) {
    let mut host = MemoryHost::new();
    let container = host.create_container("root");
    (Engine::new(host), container)
}

/// Markup a host should hold for `element`, listeners left out.
pub fn expected_markup(element: &Element) -> String {
    match element.node_type() {
        NodeType::Text => element
            .props()
            .get(NODE_VALUE)
            .map(ToString::to_string)
            .unwrap_or_default(),
        node_type => {
            let mut out = format!("<{}", node_type.name());
            for (key, value) in element.props().iter() {
                if !value.is_listener() {
                    out.push_str(&format!(" {key}=\"{value}\""));
                }
            }
            out.push('>');
            for child in element.children() {
                out.push_str(&expected_markup(child));
            }
            out.push_str(&format!("</{}>", node_type.name()));
            out
        }
    }
}

/// Markup of a `root` container holding `element`.
pub fn expected_container(element: &Element) -> String {
    format!("<root>{}</root>", expected_markup(element))
}
