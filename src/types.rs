//! Core types shared by the element model, the fiber arena and the commit phase.
//!
//! - [`NodeType`] - what a fiber stands for (root container, host tag, text)
//! - [`PropValue`] / [`Props`] - the property bag carried by elements and fibers
//! - [`Listener`] - event handler with pointer identity
//! - [`PropKind`] - the two host capability classes (attribute vs listener)
//! - [`EffectTag`] / [`PropChanges`] - what a commit does to a host node

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

// =============================================================================
// Node Type
// =============================================================================

/// Reserved type name of text elements.
pub const TEXT_TYPE: &str = "TEXT";

/// Reserved type name of the container fiber armed by `render()`.
pub const ROOT_TYPE: &str = "ROOT";

/// Property holding the content of a text element.
pub const NODE_VALUE: &str = "nodeValue";

/// What an element or fiber stands for in the host tree.
///
/// Two fibers at the same position are diffed as an Update only when their
/// node types are equal. Nothing else about the element is compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// The container fiber created by `render()`. Elements never carry it.
    Root,
    /// A host node created through `create_node(tag)`.
    Tag(Rc<str>),
    /// A host text node.
    Text,
}

impl NodeType {
    /// Create a tag node type.
    pub fn tag(name: &str) -> Self {
        Self::Tag(Rc::from(name))
    }

    /// Get the type name (`ROOT`, `TEXT` or the tag).
    pub fn name(&self) -> &str {
        match self {
            NodeType::Root => ROOT_TYPE,
            NodeType::Tag(tag) => tag,
            NodeType::Text => TEXT_TYPE,
        }
    }

    /// Check if this is the text variant.
    pub fn is_text(&self) -> bool {
        matches!(self, NodeType::Text)
    }

    /// Check if this is the root container.
    pub fn is_root(&self) -> bool {
        matches!(self, NodeType::Root)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Listener
// =============================================================================

/// An event handler bound through `add_event_listener`.
///
/// The payload is host-defined, so handlers receive it as `&dyn Any` and
/// downcast what they expect. Two listeners are equal only when they share
/// the same closure allocation; cloning a listener keeps its identity.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&dyn Any)>);

impl Listener {
    /// Wrap a closure.
    pub fn new(handler: impl Fn(&dyn Any) + 'static) -> Self {
        Self(Rc::new(handler))
    }

    /// Invoke the handler with an event payload.
    pub fn call(&self, event: &dyn Any) {
        (self.0)(event)
    }

    /// Check if both listeners wrap the same closure.
    pub fn same(&self, other: &Listener) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

// =============================================================================
// Prop Value
// =============================================================================

/// A single property value.
#[derive(Debug, Clone)]
pub enum PropValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Event handler. Only valid under listener-class keys.
    Handler(Listener),
}

impl PropValue {
    /// Get the handler if this value is one.
    pub fn as_listener(&self) -> Option<&Listener> {
        match self {
            PropValue::Handler(listener) => Some(listener),
            _ => None,
        }
    }

    /// Check if this value is an event handler.
    pub fn is_listener(&self) -> bool {
        matches!(self, PropValue::Handler(_))
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            // Bitwise so that NaN compares equal to itself and never re-applies.
            (PropValue::Float(a), PropValue::Float(b)) => a.to_bits() == b.to_bits(),
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Handler(a), PropValue::Handler(b)) => a.same(b),
            _ => false,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Str(s) => f.write_str(s),
            PropValue::Int(i) => write!(f, "{i}"),
            PropValue::Float(x) => write!(f, "{x}"),
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Handler(_) => f.write_str("[listener]"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Int(value as i64)
    }
}

impl From<u32> for PropValue {
    fn from(value: u32) -> Self {
        PropValue::Int(value as i64)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<Listener> for PropValue {
    fn from(value: Listener) -> Self {
        PropValue::Handler(value)
    }
}

// =============================================================================
// Props
// =============================================================================

/// Property bag of an element or fiber.
///
/// Keys iterate in sorted order, which keeps host call order deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(BTreeMap<String, PropValue>);

impl Props {
    /// Create an empty property bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a property.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Props
where
    K: Into<String>,
    V: Into<PropValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// =============================================================================
// Prop Classification
// =============================================================================

/// Default structural marker of listener keys (`onClick`, `onInput`, ...).
pub const LISTENER_PREFIX: &str = "on";

/// Host capability class a property key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    /// Set/cleared through `set_attribute` / `remove_attribute`.
    Attribute,
    /// Bound/unbound through `add_event_listener` / `remove_event_listener`.
    Listener,
}

/// Classify a property key by its structural marker.
///
/// A key is a listener when it starts with `prefix` and has a name after it.
/// An empty prefix disables listeners entirely.
pub fn classify_prop(key: &str, prefix: &str) -> PropKind {
    if !prefix.is_empty() && key.len() > prefix.len() && key.starts_with(prefix) {
        PropKind::Listener
    } else {
        PropKind::Attribute
    }
}

/// Host event name of a listener key: the part after the prefix, lowercased.
///
/// `onClick` → `click`, `onMouseMove` → `mousemove`.
pub fn event_name(key: &str, prefix: &str) -> String {
    key.get(prefix.len()..).unwrap_or_default().to_lowercase()
}

// =============================================================================
// Effects
// =============================================================================

/// Host mutation a fiber requires at commit time.
///
/// Only meaningful between reconciliation and the end of the following
/// commit; the commit resets every surviving fiber back to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectTag {
    #[default]
    None,
    /// New host node, inserted under the nearest host ancestor.
    Placement,
    /// Reused host node, property diff applied.
    Update,
    /// Host node removed from its parent.
    Deletion,
}

bitflags::bitflags! {
    /// Which capability classes an Update actually touched.
    ///
    /// `PropChanges::NONE` is the empty diff of an unchanged fiber.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PropChanges: u8 {
        const NONE = 0;
        const ATTRS_SET = 1 << 0;
        const ATTRS_REMOVED = 1 << 1;
        const LISTENERS_BOUND = 1 << 2;
        const LISTENERS_UNBOUND = 1 << 3;
    }
}

// =============================================================================
// Tests
// =============================================================================
