//! Engine - Owns the fiber trees and the host for one render root.
//!
//! # Example
//!
//! ```
//! use spark_fiber::{create_element, text, Engine, MemoryHost, Props};
//!
//! let mut host = MemoryHost::new();
//! let container = host.create_container("root");
//! let mut engine = Engine::new(host);
//!
//! engine.render(
//!     create_element("p", Props::new().with("class", "greeting"), [text("hello")]),
//!     container,
//! );
//! engine.flush().unwrap();
//!
//! assert_eq!(
//!     engine.host().to_markup(container),
//!     r#"<root><p class="greeting">hello</p></root>"#,
//! );
//! ```
//!
//! `render` only schedules. Nothing reaches the host until the work loop
//! ([`tick`](Engine::tick), [`work_loop`](Engine::work_loop) or
//! [`flush`](Engine::flush)) has walked the whole tree and committed it.

use std::mem;

use tracing::{debug, warn};

use crate::engine::{Fiber, FiberArena, FiberId};
use crate::primitives::Element;
use crate::renderer::HostAdapter;
use crate::types::{EffectTag, NodeType, Props};
use super::commit::CommitReport;
use super::config::EngineConfig;

/// Reconciliation engine for a single root.
///
/// Several engines may drive the same host (see the `HostAdapter` impl for
/// `Rc<RefCell<H>>`), each with its own container.
pub struct Engine<H: HostAdapter> {
    pub(crate) host: H,
    pub(crate) config: EngineConfig,
    pub(crate) arena: FiberArena<H::Node>,
    /// Next fiber the work loop will process.
    pub(crate) next_unit_of_work: Option<FiberId>,
    pub(crate) wip_root: Option<FiberId>,
    pub(crate) current_root: Option<FiberId>,
    /// Old fibers queued for removal by the pending commit.
    pub(crate) deletions: Vec<FiberId>,
    pub(crate) last_commit: Option<CommitReport>,
    pub(crate) commit_count: u64,
}

impl<H: HostAdapter> Engine<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, EngineConfig::default())
    }

    pub fn with_config(host: H, config: EngineConfig) -> Self {
        Self {
            host,
            config,
            arena: FiberArena::new(),
            next_unit_of_work: None,
            wip_root: None,
            current_root: None,
            deletions: Vec::new(),
            last_commit: None,
            commit_count: 0,
        }
    }

    /// Schedule `element` to become the only child of `container`.
    ///
    /// Builds a new work-in-progress root whose alternate is the current root
    /// and points the work loop at it. An unfinished render is discarded
    /// first; the host is never touched here.
    ///
    /// Keep using the same container for one engine: reused host nodes are
    /// never re-parented.
    pub fn render(&mut self, element: Element, container: H::Node) {
        self.discard_work_in_progress("superseded by a new render");

        let mut root = Fiber::new(NodeType::Root, Props::new(), vec![element]);
        root.host_node = Some(container);
        root.alternate = self.current_root;

        let id = self.arena.allocate(root);
        self.wip_root = Some(id);
        self.next_unit_of_work = Some(id);
        self.deletions.clear();

        debug!(root = %id, alternate = ?self.current_root, "render scheduled");
    }

    /// Drop the work-in-progress tree, if any, and stop the work loop.
    ///
    /// Host nodes created for its placements are abandoned. Deletion marks
    /// it left on the current tree are cleared.
    pub(crate) fn discard_work_in_progress(&mut self, reason: &'static str) {
        let Some(stale) = self.wip_root.take() else {
            return;
        };
        self.next_unit_of_work = None;

        let abandoned = self
            .arena
            .subtree(stale)
            .into_iter()
            .filter(|id| {
                let fiber = &self.arena[*id];
                fiber.effect_tag == EffectTag::Placement && fiber.host_node.is_some()
            })
            .count();

        for old in mem::take(&mut self.deletions) {
            if let Some(fiber) = self.arena.get_mut(old) {
                fiber.effect_tag = EffectTag::None;
            }
        }

        let released = self.arena.release_subtree(stale);
        warn!(
            root = %stale,
            released,
            abandoned_host_nodes = abandoned,
            reason,
            "discarding work in progress"
        );
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutating the host directly bypasses the fiber trees; keep it to
    /// things the engine does not track (containers, dispatch state).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Root fiber of the last committed tree.
    pub fn current_root(&self) -> Option<FiberId> {
        self.current_root
    }

    /// Root fiber of the tree under construction.
    pub fn work_in_progress(&self) -> Option<FiberId> {
        self.wip_root
    }

    /// Check if a render is waiting to be worked on or committed.
    pub fn has_pending_work(&self) -> bool {
        self.wip_root.is_some()
    }

    pub fn fiber(&self, id: FiberId) -> Option<&Fiber<H::Node>> {
        self.arena.get(id)
    }

    /// Live fibers across the current and work-in-progress trees.
    pub fn fiber_count(&self) -> usize {
        self.arena.len()
    }

    pub fn last_commit(&self) -> Option<&CommitReport> {
        self.last_commit.as_ref()
    }

    pub fn commit_count(&self) -> u64 {
        self.commit_count
    }
}
