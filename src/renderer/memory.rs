//! Memory Host - An in-process host tree.
//!
//! Reference [`HostAdapter`] used by tests and headless embedders. Nodes live
//! in a flat vector addressed by [`NodeId`]; containers are created directly
//! by the embedder and count as attached, so every mutation reaching a node
//! below a container is a visible one.
//!
//! Besides the tree itself the host keeps:
//! - a log of every capability call ([`HostCall`])
//! - a counter of mutations that touched attached nodes
//!
//! which is what the scheduling tests assert against.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::HostError;
use crate::types::{Listener, PropValue, NODE_VALUE};
use super::host::{HostAdapter, HostResult};

/// Handle of a node in a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One capability call as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    CreateNode { node: NodeId, tag: String },
    CreateTextNode { node: NodeId, value: String },
    SetAttribute { node: NodeId, key: String },
    RemoveAttribute { node: NodeId, key: String },
    AddEventListener { node: NodeId, event: String },
    RemoveEventListener { node: NodeId, event: String },
    AppendChild { parent: NodeId, child: NodeId },
    InsertBefore { parent: NodeId, child: NodeId, before: NodeId },
    RemoveChild { parent: NodeId, child: NodeId },
}

impl HostCall {
    /// Calls that attach or detach nodes.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            HostCall::AppendChild { .. }
                | HostCall::InsertBefore { .. }
                | HostCall::RemoveChild { .. }
        )
    }
}

// =============================================================================
// Nodes
// =============================================================================

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attributes: BTreeMap<String, PropValue>,
        listeners: Vec<(String, Listener)>,
        children: Vec<NodeId>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct MemoryNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    container: bool,
}

/// In-memory host tree.
#[derive(Debug, Default)]
pub struct MemoryHost {
    nodes: Vec<MemoryNode>,
    calls: Vec<HostCall>,
    attached_mutations: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a container node to render into. Not logged as a call.
    pub fn create_container(&mut self, tag: &str) -> NodeId {
        let id = self.push(NodeKind::Element {
            tag: tag.to_string(),
            attributes: BTreeMap::new(),
            listeners: Vec::new(),
            children: Vec::new(),
        });
        self.nodes[id.0].container = true;
        id
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(MemoryNode {
            kind,
            parent: None,
            container: false,
        });
        NodeId(self.nodes.len() - 1)
    }

    fn node(&self, id: NodeId) -> HostResult<&MemoryNode> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| HostError::UnknownNode(id.to_string()))
    }

    fn node_mut(&mut self, id: NodeId) -> HostResult<&mut MemoryNode> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| HostError::UnknownNode(id.to_string()))
    }

    fn record(&mut self, call: HostCall, attached: bool) {
        if attached {
            self.attached_mutations += 1;
        }
        self.calls.push(call);
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Check if `id` is a container or hangs below one.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            match self.nodes.get(current.0) {
                Some(node) if node.container => return true,
                Some(node) => cursor = node.parent,
                None => return false,
            }
        }
        false
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    /// Child handles in order. Empty for text nodes and unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(id.0).map(|node| &node.kind) {
            Some(NodeKind::Element { children, .. }) => children,
            _ => &[],
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.nodes.get(id.0).map(|node| &node.kind) {
            Some(NodeKind::Element { tag, .. }) => Some(tag),
            _ => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.nodes.get(id.0).map(|node| &node.kind) {
            Some(NodeKind::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&PropValue> {
        match self.nodes.get(id.0).map(|node| &node.kind) {
            Some(NodeKind::Element { attributes, .. }) => attributes.get(key),
            _ => None,
        }
    }

    pub fn listener_count(&self, id: NodeId, event: &str) -> usize {
        match self.nodes.get(id.0).map(|node| &node.kind) {
            Some(NodeKind::Element { listeners, .. }) => {
                listeners.iter().filter(|(name, _)| name == event).count()
            }
            _ => 0,
        }
    }

    /// Invoke every listener bound for `event` on `id`. Returns how many ran.
    pub fn dispatch(&self, id: NodeId, event: &str, payload: &dyn Any) -> usize {
        let handlers: Vec<Listener> = match self.nodes.get(id.0).map(|node| &node.kind) {
            Some(NodeKind::Element { listeners, .. }) => listeners
                .iter()
                .filter(|(name, _)| name == event)
                .map(|(_, handler)| handler.clone())
                .collect(),
            _ => Vec::new(),
        };
        for handler in &handlers {
            handler.call(payload);
        }
        handlers.len()
    }

    /// Every capability call since creation or the last [`clear_calls`](Self::clear_calls).
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of calls that changed an attached node.
    pub fn attached_mutations(&self) -> usize {
        self.attached_mutations
    }

    /// Total nodes ever created, containers included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Serialize the subtree at `id`.
    ///
    /// Elements render as `<tag k="v">children</tag>` with attributes in key
    /// order, text nodes as their raw value. Listeners are left out and
    /// nothing is escaped.
    pub fn to_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(id.0) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(value) => out.push_str(value),
            NodeKind::Element {
                tag,
                attributes,
                children,
                ..
            } => {
                out.push('<');
                out.push_str(tag);
                for (key, value) in attributes {
                    out.push_str(&format!(" {key}=\"{value}\""));
                }
                out.push('>');
                for child in children {
                    self.write_markup(*child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    /// Link `child` under `parent`, before `before` or at the end. Returns
    /// whether the move touched an attached tree.
    fn attach(
        &mut self,
        parent: NodeId,
        child: NodeId,
        before: Option<NodeId>,
    ) -> HostResult<bool> {
        self.node(child)?;
        if !matches!(self.node(parent)?.kind, NodeKind::Element { .. }) {
            return Err(HostError::NotAnElement(parent.to_string()));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(HostError::Rejected(format!(
                "appending {child} under {parent} would create a cycle"
            )));
        }
        if let Some(before) = before {
            if before == child || !self.children(parent).contains(&before) {
                return Err(HostError::NotAChild {
                    parent: parent.to_string(),
                    child: before.to_string(),
                });
            }
        }

        let was_attached = self.is_attached(child);
        if let Some(old_parent) = self.parent(child) {
            if let NodeKind::Element { children, .. } = &mut self.node_mut(old_parent)?.kind {
                children.retain(|c| *c != child);
            }
        }
        if let NodeKind::Element { children, .. } = &mut self.node_mut(parent)?.kind {
            let index = before
                .and_then(|before| children.iter().position(|c| *c == before))
                .unwrap_or(children.len());
            children.insert(index, child);
        }
        self.node_mut(child)?.parent = Some(parent);

        Ok(was_attached || self.is_attached(parent))
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut cursor = Some(of);
        while let Some(current) = cursor {
            if current == candidate {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }
}

// =============================================================================
// HostAdapter
// =============================================================================

impl HostAdapter for MemoryHost {
    type Node = NodeId;

    fn create_node(&mut self, node_type: &str) -> HostResult<NodeId> {
        if node_type.is_empty() {
            return Err(HostError::Rejected("empty element type".into()));
        }
        let node = self.push(NodeKind::Element {
            tag: node_type.to_string(),
            attributes: BTreeMap::new(),
            listeners: Vec::new(),
            children: Vec::new(),
        });
        self.record(
            HostCall::CreateNode {
                node,
                tag: node_type.to_string(),
            },
            false,
        );
        Ok(node)
    }

    fn create_text_node(&mut self, value: &str) -> HostResult<NodeId> {
        let node = self.push(NodeKind::Text(value.to_string()));
        self.record(
            HostCall::CreateTextNode {
                node,
                value: value.to_string(),
            },
            false,
        );
        Ok(node)
    }

    /// On text nodes only `nodeValue` is accepted; it replaces the text.
    fn set_attribute(&mut self, node: &NodeId, key: &str, value: &PropValue) -> HostResult<()> {
        let id = *node;
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element { attributes, .. } => {
                attributes.insert(key.to_string(), value.clone());
            }
            NodeKind::Text(text) if key == NODE_VALUE => *text = value.to_string(),
            NodeKind::Text(_) => return Err(HostError::NotAnElement(id.to_string())),
        }
        let attached = self.is_attached(id);
        self.record(
            HostCall::SetAttribute {
                node: id,
                key: key.to_string(),
            },
            attached,
        );
        Ok(())
    }

    fn remove_attribute(&mut self, node: &NodeId, key: &str) -> HostResult<()> {
        let id = *node;
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element { attributes, .. } => {
                attributes.remove(key);
            }
            NodeKind::Text(_) => return Err(HostError::NotAnElement(id.to_string())),
        }
        let attached = self.is_attached(id);
        self.record(
            HostCall::RemoveAttribute {
                node: id,
                key: key.to_string(),
            },
            attached,
        );
        Ok(())
    }

    fn add_event_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        handler: &Listener,
    ) -> HostResult<()> {
        let id = *node;
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element { listeners, .. } => {
                listeners.push((event.to_string(), handler.clone()));
            }
            NodeKind::Text(_) => return Err(HostError::NotAnElement(id.to_string())),
        }
        let attached = self.is_attached(id);
        self.record(
            HostCall::AddEventListener {
                node: id,
                event: event.to_string(),
            },
            attached,
        );
        Ok(())
    }

    /// Removes the first binding of exactly this handler; unknown bindings are ignored.
    fn remove_event_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        handler: &Listener,
    ) -> HostResult<()> {
        let id = *node;
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element { listeners, .. } => {
                if let Some(pos) = listeners
                    .iter()
                    .position(|(name, bound)| name == event && bound.same(handler))
                {
                    listeners.remove(pos);
                }
            }
            NodeKind::Text(_) => return Err(HostError::NotAnElement(id.to_string())),
        }
        let attached = self.is_attached(id);
        self.record(
            HostCall::RemoveEventListener {
                node: id,
                event: event.to_string(),
            },
            attached,
        );
        Ok(())
    }

    /// Moves `child` if it already has a parent.
    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> HostResult<()> {
        let attached = self.attach(*parent, *child, None)?;
        self.record(
            HostCall::AppendChild {
                parent: *parent,
                child: *child,
            },
            attached,
        );
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: &NodeId,
        child: &NodeId,
        before: &NodeId,
    ) -> HostResult<()> {
        let attached = self.attach(*parent, *child, Some(*before))?;
        self.record(
            HostCall::InsertBefore {
                parent: *parent,
                child: *child,
                before: *before,
            },
            attached,
        );
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> HostResult<()> {
        let (parent, child) = (*parent, *child);
        self.node(child)?;
        let attached = self.is_attached(parent);
        match &mut self.node_mut(parent)?.kind {
            NodeKind::Element { children, .. } => match children.iter().position(|c| *c == child) {
                Some(pos) => {
                    children.remove(pos);
                }
                None => {
                    return Err(HostError::NotAChild {
                        parent: parent.to_string(),
                        child: child.to_string(),
                    });
                }
            },
            NodeKind::Text(_) => return Err(HostError::NotAnElement(parent.to_string())),
        }
        self.node_mut(child)?.parent = None;
        self.record(HostCall::RemoveChild { parent, child }, attached);
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
