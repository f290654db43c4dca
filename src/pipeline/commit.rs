//! Commit - Applies a finished work-in-progress tree to the host.
//!
//! Runs synchronously inside the tick that completed the tree:
//!
//! 1. Deletions: detach each queued old fiber's host node from its nearest
//!    host-bearing ancestor in the old tree
//! 2. Effects, pre-order from the root's first child:
//!    - Placement: insert the host node under the nearest host-bearing
//!      ancestor, in front of the next reused sibling or at the end
//!    - Update: apply the prop diff against the alternate
//! 3. Promote: the work-in-progress tree becomes current, the old tree is
//!    released and alternates are cleared
//!
//! The commit is not transactional. A failing host call aborts it with the
//! earlier mutations in place; the caller then drops the work-in-progress
//! tree instead of replaying it.

use tracing::{debug, debug_span, trace};

use crate::engine::FiberId;
use crate::error::{Error, Result};
use crate::renderer::{HostAdapter, PropDiff};
use crate::types::{EffectTag, NodeType, PropChanges};
use super::engine::Engine;

/// One host-visible effect of a commit.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectRecord {
    /// Only meaningful until the next commit releases or reuses the index.
    pub fiber: FiberId,
    pub node_type: NodeType,
    pub tag: EffectTag,
    /// Prop classes an Update touched; empty for placements and deletions.
    pub changes: PropChanges,
}

/// What the last commit did, in the order it did it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitReport {
    pub effects: Vec<EffectRecord>,
    /// Fibers of the superseded tree that were freed.
    pub released: usize,
}

impl CommitReport {
    fn count(&self, tag: EffectTag) -> usize {
        self.effects.iter().filter(|e| e.tag == tag).count()
    }

    pub fn placements(&self) -> usize {
        self.count(EffectTag::Placement)
    }

    pub fn updates(&self) -> usize {
        self.count(EffectTag::Update)
    }

    pub fn deletions(&self) -> usize {
        self.count(EffectTag::Deletion)
    }

    /// Updates whose props actually differed.
    pub fn changed_updates(&self) -> impl Iterator<Item = &EffectRecord> {
        self.effects
            .iter()
            .filter(|e| e.tag == EffectTag::Update && !e.changes.is_empty())
    }
}

impl<H: HostAdapter> Engine<H> {
    pub(crate) fn commit_root(&mut self, root: FiberId) -> Result<()> {
        let _span = debug_span!("commit", root = %root).entered();
        debug!(deletions = self.deletions.len(), "commit started");

        let mut report = CommitReport::default();

        for index in 0..self.deletions.len() {
            let old = self.deletions[index];
            self.commit_deletion(old)?;
            report.effects.push(EffectRecord {
                fiber: old,
                node_type: self.arena[old].node_type.clone(),
                tag: EffectTag::Deletion,
                changes: PropChanges::NONE,
            });
        }

        let mut cursor = self.arena[root].child;
        while let Some(id) = cursor {
            if let Some(record) = self.commit_work(id)? {
                report.effects.push(record);
            }
            cursor = self.arena.next_preorder(id, root);
        }

        report.released = self.promote(root);

        debug!(
            placements = report.placements(),
            updates = report.updates(),
            deletions = report.deletions(),
            released = report.released,
            "commit finished"
        );
        self.last_commit = Some(report);
        self.commit_count += 1;
        Ok(())
    }

    fn commit_deletion(&mut self, old: FiberId) -> Result<()> {
        let child = self.arena[old]
            .host_node
            .clone()
            .ok_or_else(|| Error::Invariant(format!("deleted {old} has no host node")))?;
        let parent = self.host_parent(old)?;
        trace!(fiber = %old, "remove_child");
        self.host.remove_child(&parent, &child)?;
        Ok(())
    }

    fn commit_work(&mut self, id: FiberId) -> Result<Option<EffectRecord>> {
        let fiber = &self.arena[id];
        let changes = match fiber.effect_tag {
            EffectTag::Placement => {
                let child = fiber
                    .host_node
                    .clone()
                    .ok_or_else(|| Error::Invariant(format!("placed {id} has no host node")))?;
                let parent = self.host_parent(id)?;
                match self.placement_anchor(id) {
                    Some(before) => {
                        trace!(fiber = %id, "insert_before");
                        self.host.insert_before(&parent, &child, &before)?;
                    }
                    None => {
                        trace!(fiber = %id, "append_child");
                        self.host.append_child(&parent, &child)?;
                    }
                }
                PropChanges::NONE
            }
            EffectTag::Update => {
                let alternate = fiber
                    .alternate
                    .ok_or_else(|| Error::Invariant(format!("updated {id} has no alternate")))?;
                let node = fiber
                    .host_node
                    .clone()
                    .ok_or_else(|| Error::Invariant(format!("updated {id} has no host node")))?;
                let diff = PropDiff::between(
                    &self.arena[alternate].props,
                    &fiber.props,
                    self.config.listener_prefix,
                );
                if !diff.is_empty() {
                    trace!(fiber = %id, changes = ?diff.changes(), "update props");
                    diff.apply(&mut self.host, &node)?;
                }
                diff.changes()
            }
            EffectTag::None => return Ok(None),
            EffectTag::Deletion => {
                return Err(Error::Invariant(format!(
                    "{id} in the work-in-progress tree is tagged for deletion"
                )));
            }
        };

        let fiber = &self.arena[id];
        Ok(Some(EffectRecord {
            fiber: id,
            node_type: fiber.node_type.clone(),
            tag: fiber.effect_tag,
            changes,
        }))
    }

    /// Host node of the nearest ancestor that has one.
    fn host_parent(&self, id: FiberId) -> Result<H::Node> {
        let mut cursor = self.arena[id].parent;
        while let Some(parent) = cursor {
            let fiber = &self.arena[parent];
            if let Some(node) = &fiber.host_node {
                return Ok(node.clone());
            }
            cursor = fiber.parent;
        }
        Err(Error::Invariant(format!("{id} has no host-bearing ancestor")))
    }

    /// Host node a placed fiber has to go in front of: that of the first later
    /// sibling that kept its node. Reused nodes never move, so they still sit
    /// in the parent in order; `None` means append.
    fn placement_anchor(&self, id: FiberId) -> Option<H::Node> {
        let mut cursor = self.arena[id].sibling;
        while let Some(sibling) = cursor {
            let fiber = &self.arena[sibling];
            if fiber.effect_tag == EffectTag::Update {
                return fiber.host_node.clone();
            }
            cursor = fiber.sibling;
        }
        None
    }

    /// Make `root` current and free the tree it replaces. Returns how many
    /// fibers were released.
    fn promote(&mut self, root: FiberId) -> usize {
        let mut released = 0;
        if let Some(old_root) = self.current_root.take() {
            released += self.arena.release_subtree(old_root);
        }
        // Normally already gone with the old tree
        for old in std::mem::take(&mut self.deletions) {
            released += self.arena.release_subtree(old);
        }

        for id in self.arena.subtree(root) {
            let fiber = &mut self.arena[id];
            fiber.alternate = None;
            fiber.effect_tag = EffectTag::None;
        }

        self.current_root = Some(root);
        self.wip_root = None;
        self.next_unit_of_work = None;
        released
    }
}

// =============================================================================
// Tests
// =============================================================================
