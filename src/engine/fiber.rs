//! Fiber - One tree position's working state.
//!
//! A fiber records what a position in the tree is (`node_type`, `props`),
//! which host node backs it, and how it links to its neighbours:
//!
//! ```text
//!            parent
//!              │
//!   alternate ─┼─ fiber ── sibling ──▶ ...
//!              │
//!            child
//! ```
//!
//! All links are [`FiberId`]s into the owning [`FiberArena`](super::FiberArena).
//! `alternate` is lookup only: it points at the fiber that occupied the same
//! position in the last committed tree and is dropped once that tree is released.

use std::fmt;

use crate::primitives::Element;
use crate::types::{EffectTag, NodeType, Props};

/// Index of a fiber in its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FiberId(pub(crate) usize);

impl FiberId {
    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FiberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fiber#{}", self.0)
    }
}

/// A unit of work, generic over the host's node handle.
#[derive(Debug)]
pub struct Fiber<N> {
    pub(crate) node_type: NodeType,
    pub(crate) props: Props,
    /// Child elements not yet reconciled. Taken by the unit of work.
    pub(crate) pending_children: Vec<Element>,
    pub(crate) host_node: Option<N>,
    /// Initial props reached `host_node`. Only placements apply them.
    pub(crate) host_props_applied: bool,
    pub(crate) parent: Option<FiberId>,
    pub(crate) child: Option<FiberId>,
    pub(crate) sibling: Option<FiberId>,
    pub(crate) alternate: Option<FiberId>,
    pub(crate) effect_tag: EffectTag,
}

impl<N> Fiber<N> {
    /// Create an unlinked fiber.
    pub(crate) fn new(node_type: NodeType, props: Props, pending_children: Vec<Element>) -> Self {
        Self {
            node_type,
            props,
            pending_children,
            host_node: None,
            host_props_applied: false,
            parent: None,
            child: None,
            sibling: None,
            alternate: None,
            effect_tag: EffectTag::None,
        }
    }

    pub fn node_type(&self) -> &NodeType {
        &self.node_type
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn host_node(&self) -> Option<&N> {
        self.host_node.as_ref()
    }

    pub fn parent(&self) -> Option<FiberId> {
        self.parent
    }

    pub fn child(&self) -> Option<FiberId> {
        self.child
    }

    pub fn sibling(&self) -> Option<FiberId> {
        self.sibling
    }

    pub fn alternate(&self) -> Option<FiberId> {
        self.alternate
    }

    pub fn effect_tag(&self) -> EffectTag {
        self.effect_tag
    }

    /// Check if this fiber's children still await reconciliation.
    pub fn has_pending_children(&self) -> bool {
        !self.pending_children.is_empty()
    }
}
