//! Scheduler - Cooperative work loop.
//!
//! Rendering is split into units of work, one fiber each. A tick processes
//! units until the caller's deadline runs low, then hands control back:
//!
//! ```text
//! tick(deadline)
//!   ├── perform_unit_of_work(cursor)   at least once
//!   ├── ... while time_remaining >= yield_threshold
//!   └── cursor exhausted + WIP root  →  commit_root
//! ```
//!
//! The engine never sleeps or spawns. The embedder calls [`Engine::tick`]
//! from whatever idle hook its platform has, or [`Engine::work_loop`] to
//! have the callback re-registered through an [`IdleScheduler`].

use std::mem;
use std::time::{Duration, Instant};

use tracing::{trace, trace_span};

use crate::engine::{reconcile_children, validate_children, FiberId};
use crate::error::{Error, Result};
use crate::renderer::{HostAdapter, PropDiff};
use crate::types::{EffectTag, NodeType, Props, NODE_VALUE};
use super::engine::Engine;

// =============================================================================
// Deadlines
// =============================================================================

/// How much time the current slice has left.
pub trait Deadline {
    fn time_remaining(&self) -> Duration;
}

impl<F: Fn() -> Duration> Deadline for F {
    fn time_remaining(&self) -> Duration {
        self()
    }
}

/// Wall-clock budget starting when it is created.
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    started: Instant,
    budget: Duration,
}

impl TimeBudget {
    pub fn new(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }
}

impl Deadline for TimeBudget {
    fn time_remaining(&self) -> Duration {
        self.budget.saturating_sub(self.started.elapsed())
    }
}

/// A deadline that always reports the same remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDeadline(pub Duration);

impl FixedDeadline {
    /// Already expired: every tick does exactly one unit.
    pub fn zero() -> Self {
        Self(Duration::ZERO)
    }

    /// Never expires: a tick runs to the commit.
    pub fn unlimited() -> Self {
        Self(Duration::MAX)
    }
}

impl Deadline for FixedDeadline {
    fn time_remaining(&self) -> Duration {
        self.0
    }
}

// =============================================================================
// Idle registration
// =============================================================================

/// Platform hook that runs the work loop again once the host is idle.
pub trait IdleScheduler {
    fn register_idle_callback(&mut self);
}

/// Counts registrations instead of scheduling anything.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IdleQueue {
    registrations: usize,
}

impl IdleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registrations(&self) -> usize {
        self.registrations
    }

    /// Consume one pending registration, if any.
    pub fn take(&mut self) -> bool {
        if self.registrations == 0 {
            return false;
        }
        self.registrations -= 1;
        true
    }
}

impl IdleScheduler for IdleQueue {
    fn register_idle_callback(&mut self) {
        self.registrations += 1;
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkStatus {
    /// No render was pending.
    Idle,
    /// Ran out of time with units left.
    Yielded,
    /// The work-in-progress tree was committed.
    Committed,
}

// =============================================================================
// Work loop
// =============================================================================

impl<H: HostAdapter> Engine<H> {
    /// Process units of work until the deadline runs low, committing once
    /// the tree is complete.
    ///
    /// At least one unit runs per call, however little time is left. When a
    /// unit fails the cursor stays on that fiber and ticking again retries
    /// it. When the commit fails the work-in-progress tree is dropped, the
    /// host keeps the mutations already made and the next tick is idle.
    pub fn tick(&mut self, deadline: &impl Deadline) -> Result<WorkStatus> {
        let _span = trace_span!("tick").entered();

        let mut units = 0usize;
        while let Some(id) = self.next_unit_of_work {
            self.next_unit_of_work = self.perform_unit_of_work(id)?;
            units += 1;
            if deadline.time_remaining() < self.config.yield_threshold {
                break;
            }
        }

        if self.next_unit_of_work.is_some() {
            trace!(units, "yielding");
            return Ok(WorkStatus::Yielded);
        }

        match self.wip_root {
            Some(root) => match self.commit_root(root) {
                Ok(()) => Ok(WorkStatus::Committed),
                Err(err) => {
                    // Host mutations already made cannot be replayed
                    self.discard_work_in_progress("commit failed");
                    Err(err)
                }
            },
            None => Ok(WorkStatus::Idle),
        }
    }

    /// One tick, then ask `idle` to call back again.
    ///
    /// The callback is registered after every successful tick, pending work
    /// or not; a failed tick registers nothing.
    pub fn work_loop(
        &mut self,
        deadline: &impl Deadline,
        idle: &mut impl IdleScheduler,
    ) -> Result<WorkStatus> {
        let status = self.tick(deadline)?;
        idle.register_idle_callback();
        Ok(status)
    }

    /// Run all pending work and commit, ignoring time.
    pub fn flush(&mut self) -> Result<WorkStatus> {
        self.tick(&FixedDeadline::unlimited())
    }

    /// Create the fiber's host node if missing, reconcile its children and
    /// return the next fiber in pre-order within the work-in-progress tree.
    fn perform_unit_of_work(&mut self, id: FiberId) -> Result<Option<FiberId>> {
        let wip_root = self.wip_root.ok_or_else(|| {
            Error::Invariant(format!("{id} scheduled without a work-in-progress root"))
        })?;

        if self.arena[id].host_node.is_none() {
            let node = self.create_host_node(id)?;
            self.arena[id].host_node = Some(node);
        }
        let fiber = &self.arena[id];
        if fiber.effect_tag == EffectTag::Placement && !fiber.host_props_applied {
            self.apply_initial_props(id)?;
            self.arena[id].host_props_applied = true;
        }

        validate_children(&self.arena[id].pending_children, self.config.listener_prefix)?;
        let elements = mem::take(&mut self.arena[id].pending_children);
        let count = elements.len();
        reconcile_children(&mut self.arena, id, elements, &mut self.deletions);

        trace!(
            fiber = %id,
            node_type = %self.arena[id].node_type,
            children = count,
            "unit of work"
        );
        Ok(self.arena.next_preorder(id, wip_root))
    }

    /// Detached host node for the fiber. Stored on the fiber before any prop
    /// is applied, so a failed unit never creates a second one.
    fn create_host_node(&mut self, id: FiberId) -> Result<H::Node> {
        let fiber = &self.arena[id];
        let node = match &fiber.node_type {
            NodeType::Root => {
                return Err(Error::Invariant(format!("{id} is a root without a container")));
            }
            NodeType::Text => {
                let value = fiber
                    .props
                    .get(NODE_VALUE)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                self.host.create_text_node(&value)?
            }
            NodeType::Tag(tag) => self.host.create_node(tag)?,
        };
        Ok(node)
    }

    /// Apply a placed fiber's props to its still detached host node. Text
    /// nodes got their `nodeValue` at creation.
    fn apply_initial_props(&mut self, id: FiberId) -> Result<()> {
        let fiber = &self.arena[id];
        let node = fiber
            .host_node
            .clone()
            .ok_or_else(|| Error::Invariant(format!("placed {id} has no host node")))?;
        let initial = PropDiff::between(&Props::new(), &fiber.props, self.config.listener_prefix);
        let initial = match fiber.node_type {
            NodeType::Text => initial.skip_attribute(NODE_VALUE),
            _ => initial,
        };
        initial.apply(&mut self.host, &node)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
