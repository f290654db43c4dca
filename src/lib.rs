//! # spark-fiber
//!
//! Incremental UI-tree reconciliation engine for Rust.
//!
//! ## Architecture
//!
//! Declarative [`Element`] trees are diffed against the last committed tree
//! one fiber at a time. Fibers live in an arena and link to each other by
//! index (parent, first child, next sibling, alternate), so the committed
//! tree and the one under construction can coexist and point at each other.
//!
//! Rendering runs in two phases:
//! ```text
//! render → units of work (interruptible, host untouched) → commit (synchronous) → host
//! ```
//!
//! The embedder owns time: it calls [`Engine::tick`] with a [`Deadline`] and
//! the engine yields whenever the deadline runs low. All host access goes
//! through the [`HostAdapter`] trait; [`MemoryHost`] is an in-memory one.
//!
//! ## Modules
//!
//! - [`types`] - Node types, prop values, effect tags
//! - [`primitives`] - Element construction (`create_element`, `text`)
//! - [`engine`] - Fiber arena and the positional reconciler
//! - [`pipeline`] - Engine, scheduler, commit
//! - [`renderer`] - Host adapter trait, prop diff, in-memory host
//! - [`error`] - Error types

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{Error, HostError, Result};

pub use engine::{Fiber, FiberId};

pub use primitives::{create_element, text, Child, Element};

pub use pipeline::{
    CommitReport, Deadline, EffectRecord, Engine, EngineConfig, FixedDeadline, IdleQueue,
    IdleScheduler, TimeBudget, WorkStatus,
};

pub use renderer::{HostAdapter, HostCall, HostResult, MemoryHost, NodeId, PropDiff};
