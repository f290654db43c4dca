//! Host Adapter - The capability set the engine mutates the host tree with.
//!
//! The engine never knows what a host node is. It holds opaque
//! [`HostAdapter::Node`] handles and asks the adapter to create, wire and
//! remove them:
//!
//! ```text
//! render phase:  create_node / create_text_node, initial set_attribute + add_event_listener
//!                (nodes are still detached, nothing visible changes)
//! commit phase:  remove_child, append_child / insert_before, attribute and listener diffs
//! ```
//!
//! Plain attributes and event listeners are separate capability classes;
//! which one a prop uses is decided by the listener prefix on its key.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::HostError;
use crate::types::{Listener, PropValue};

/// Result of a host capability call.
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Externally supplied capability set for a rendering surface.
///
/// Handles must be cheap to clone: an Update fiber holds a clone of its
/// alternate's handle and both refer to the same host node.
pub trait HostAdapter {
    /// Handle to a host node.
    type Node: Clone;

    fn create_node(&mut self, node_type: &str) -> HostResult<Self::Node>;

    fn create_text_node(&mut self, value: &str) -> HostResult<Self::Node>;

    fn set_attribute(&mut self, node: &Self::Node, key: &str, value: &PropValue) -> HostResult<()>;

    fn remove_attribute(&mut self, node: &Self::Node, key: &str) -> HostResult<()>;

    fn add_event_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: &Listener,
    ) -> HostResult<()>;

    /// `handler` is the exact listener bound earlier, compare it by identity.
    fn remove_event_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: &Listener,
    ) -> HostResult<()>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> HostResult<()>;

    /// Insert `child` into `parent` right before `before`, an existing child.
    fn insert_before(
        &mut self,
        parent: &Self::Node,
        child: &Self::Node,
        before: &Self::Node,
    ) -> HostResult<()>;

    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> HostResult<()>;
}

/// Shared host, so several engines (independent roots) can drive one surface.
///
/// Each call borrows the host mutably for its duration. A listener that calls
/// back into an engine while the host is dispatching would double-borrow and
/// panic; dispatch outside of engine calls.
impl<H: HostAdapter> HostAdapter for Rc<RefCell<H>> {
    type Node = H::Node;

    fn create_node(&mut self, node_type: &str) -> HostResult<Self::Node> {
        self.borrow_mut().create_node(node_type)
    }

    fn create_text_node(&mut self, value: &str) -> HostResult<Self::Node> {
        self.borrow_mut().create_text_node(value)
    }

    fn set_attribute(&mut self, node: &Self::Node, key: &str, value: &PropValue) -> HostResult<()> {
        self.borrow_mut().set_attribute(node, key, value)
    }

    fn remove_attribute(&mut self, node: &Self::Node, key: &str) -> HostResult<()> {
        self.borrow_mut().remove_attribute(node, key)
    }

    fn add_event_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: &Listener,
    ) -> HostResult<()> {
        self.borrow_mut().add_event_listener(node, event, handler)
    }

    fn remove_event_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: &Listener,
    ) -> HostResult<()> {
        self.borrow_mut().remove_event_listener(node, event, handler)
    }

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> HostResult<()> {
        self.borrow_mut().append_child(parent, child)
    }

    fn insert_before(
        &mut self,
        parent: &Self::Node,
        child: &Self::Node,
        before: &Self::Node,
    ) -> HostResult<()> {
        self.borrow_mut().insert_before(parent, child, before)
    }

    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> HostResult<()> {
        self.borrow_mut().remove_child(parent, child)
    }
}
