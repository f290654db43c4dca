//! Fiber Engine - Arena, fiber records and the reconciler.
//!
//! The engine manages the core data structures:
//! - Registry: [`FiberArena`] index allocation with a free pool
//! - Fiber: one tree position's working state, linked by [`FiberId`]s
//! - Reconcile: positional diff producing Placement / Update / Deletion
//!
//! # Architecture
//!
//! Fibers are NOT linked by references. They are indices into one arena
//! shared by the committed tree and the tree under construction:
//!
//! ```text
//! Index 0: ROOT (child=1)                      ← current
//! Index 1: div  (parent=0, child=2)
//! Index 2: TEXT (parent=1)
//! Index 3: ROOT (child=4, alternate=0)         ← work in progress
//! Index 4: div  (parent=3, alternate=1, Update)
//! ```
//!
//! Back-references (parent, alternate) are plain indices, so the two
//! generations can point at each other without aliasing mutable borrows.

mod fiber;
mod registry;
pub mod reconcile;

pub use fiber::{Fiber, FiberId};
pub use registry::FiberArena;
pub use reconcile::{reconcile_children, validate_children};
