//! Fiber Registry - Index allocation for the fiber arena.
//!
//! Manages the lifecycle of fiber indices:
//! - Slot vector addressed by [`FiberId`]
//! - Free index pool for O(1) reuse
//! - Bounded pre-order traversal used by both the work loop and the commit
//! - Subtree release once a tree generation is superseded

use std::ops::{Index, IndexMut};

use super::fiber::{Fiber, FiberId};

// =============================================================================
// Arena
// =============================================================================

/// Owns every fiber of the current and the work-in-progress tree.
///
/// Fibers never hold references to each other, only indices, so the two
/// generations can point at one another through `alternate` freely.
#[derive(Debug)]
pub struct FiberArena<N> {
    slots: Vec<Option<Fiber<N>>>,
    /// Pool of freed indices for reuse.
    free: Vec<usize>,
}

impl<N> Default for FiberArena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> FiberArena<N> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store a fiber, reusing a freed index when one is available.
    pub fn allocate(&mut self, fiber: Fiber<N>) -> FiberId {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(fiber);
                FiberId(index)
            }
            None => {
                self.slots.push(Some(fiber));
                FiberId(self.slots.len() - 1)
            }
        }
    }

    /// Remove a fiber and return its index to the pool.
    pub fn release(&mut self, id: FiberId) -> Option<Fiber<N>> {
        let fiber = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);

        // All fibers gone: drop the backing storage too
        if self.is_empty() {
            self.slots.clear();
            self.free.clear();
        }

        Some(fiber)
    }

    pub fn get(&self, id: FiberId) -> Option<&Fiber<N>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: FiberId) -> Option<&mut Fiber<N>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: FiberId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live fibers.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Next fiber after `id` in pre-order, without leaving `root`'s subtree.
    ///
    /// Child first; otherwise the first sibling found walking up through the
    /// ancestors; `None` once the walk climbs back to `root`.
    pub fn next_preorder(&self, id: FiberId, root: FiberId) -> Option<FiberId> {
        if let Some(child) = self[id].child {
            return Some(child);
        }

        let mut cursor = id;
        loop {
            if cursor == root {
                return None;
            }
            let fiber = &self[cursor];
            if let Some(sibling) = fiber.sibling {
                return Some(sibling);
            }
            cursor = fiber.parent?;
        }
    }

    /// Collect `root` and all of its descendants in pre-order.
    pub fn subtree(&self, root: FiberId) -> Vec<FiberId> {
        let mut ids = Vec::new();
        let mut cursor = Some(root);
        while let Some(id) = cursor {
            ids.push(id);
            cursor = self.next_preorder(id, root);
        }
        ids
    }

    /// Release `root` and all of its descendants. Returns how many were freed.
    pub fn release_subtree(&mut self, root: FiberId) -> usize {
        if !self.contains(root) {
            return 0;
        }
        self.subtree(root)
            .into_iter()
            .filter_map(|id| self.release(id))
            .count()
    }
}

impl<N> Index<FiberId> for FiberArena<N> {
    type Output = Fiber<N>;

    /// Panics on a released id: links are kept consistent by the engine,
    /// so a dangling one is a bug, not an input error.
    fn index(&self, id: FiberId) -> &Self::Output {
        match self.get(id) {
            Some(fiber) => fiber,
            None => panic!("dangling {id}"),
        }
    }
}

impl<N> IndexMut<FiberId> for FiberArena<N> {
    fn index_mut(&mut self, id: FiberId) -> &mut Self::Output {
        match self.get_mut(id) {
            Some(fiber) => fiber,
            None => panic!("dangling {id}"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
