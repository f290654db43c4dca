//! Renderer - The host side of the engine.
//!
//! The engine never touches a rendering surface directly. It talks to a
//! [`HostAdapter`] and hands it [`PropDiff`]s to apply. [`MemoryHost`] is an
//! in-process host tree for tests and headless use.

pub mod diff;
pub mod host;
pub mod memory;

pub use diff::PropDiff;
pub use host::{HostAdapter, HostResult};
pub use memory::{HostCall, MemoryHost, NodeId};
