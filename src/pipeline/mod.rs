//! Render Pipeline
//!
//! Connects element trees to host mutations through two phases.
//!
//! # Pipeline Architecture
//!
//! ```text
//! render(element) → WIP root → units of work (tick, tick, ...) → commit_root → host
//! ```
//!
//! ## Data Flow
//!
//! 1. **render** - Builds a work-in-progress root, discards any unfinished one
//! 2. **units of work** - One fiber per unit: create its detached host node,
//!    reconcile its children, move the cursor on in pre-order
//! 3. **commit** - Deletions, placements and prop updates in one synchronous pass,
//!    then the work-in-progress tree becomes current
//!
//! ## Key Design Principles
//!
//! - **Interruptible render**: yields between units, never touches attached host nodes
//! - **Atomic-looking commit**: all visible mutations happen within one tick
//! - **No hidden scheduling**: the embedder drives every tick

pub mod commit;
pub mod config;
pub mod engine;
pub mod scheduler;

// Re-exports
pub use commit::{CommitReport, EffectRecord};
pub use config::EngineConfig;
pub use engine::Engine;
pub use scheduler::{Deadline, FixedDeadline, IdleQueue, IdleScheduler, TimeBudget, WorkStatus};
