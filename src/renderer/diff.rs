//! Property diff for Update fibers.
//!
//! The commit phase compares the alternate's props with the fiber's props and
//! only touches what changed:
//!
//! 1. Unbind listeners that are gone or were replaced by another handler
//! 2. Clear attributes that are gone
//! 3. Set attributes that are new or changed
//! 4. Bind listeners that are new or were replaced
//!
//! The same diff taken against an empty bag is the initial property
//! application of a freshly created node.

use crate::types::{classify_prop, event_name, Listener, PropChanges, PropKind, PropValue, Props};
use super::host::{HostAdapter, HostResult};

/// Host calls needed to turn one property bag into another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropDiff {
    /// (event name, previously bound handler)
    pub unbind: Vec<(String, Listener)>,
    pub clear: Vec<String>,
    pub set: Vec<(String, PropValue)>,
    /// (event name, handler to bind)
    pub bind: Vec<(String, Listener)>,
}

impl PropDiff {
    /// Compute the diff from `prev` to `next`.
    pub fn between(prev: &Props, next: &Props, listener_prefix: &str) -> Self {
        let mut diff = Self::default();

        for (key, old) in prev.iter() {
            let new = next.get(key);
            match classify_prop(key, listener_prefix) {
                PropKind::Listener => {
                    if new != Some(old) {
                        if let Some(handler) = old.as_listener() {
                            diff.unbind
                                .push((event_name(key, listener_prefix), handler.clone()));
                        }
                    }
                }
                PropKind::Attribute => {
                    if new.is_none() {
                        diff.clear.push(key.to_string());
                    }
                }
            }
        }

        for (key, new) in next.iter() {
            if prev.get(key) == Some(new) {
                continue;
            }
            match classify_prop(key, listener_prefix) {
                PropKind::Listener => {
                    if let Some(handler) = new.as_listener() {
                        diff.bind
                            .push((event_name(key, listener_prefix), handler.clone()));
                    }
                }
                PropKind::Attribute => diff.set.push((key.to_string(), new.clone())),
            }
        }

        diff
    }

    /// Drop an attribute from the set list (used for `nodeValue` of new text nodes).
    pub fn skip_attribute(mut self, key: &str) -> Self {
        self.set.retain(|(k, _)| k != key);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.unbind.is_empty()
            && self.clear.is_empty()
            && self.set.is_empty()
            && self.bind.is_empty()
    }

    /// Which capability classes this diff touches.
    pub fn changes(&self) -> PropChanges {
        let mut changes = PropChanges::NONE;
        if !self.set.is_empty() {
            changes |= PropChanges::ATTRS_SET;
        }
        if !self.clear.is_empty() {
            changes |= PropChanges::ATTRS_REMOVED;
        }
        if !self.bind.is_empty() {
            changes |= PropChanges::LISTENERS_BOUND;
        }
        if !self.unbind.is_empty() {
            changes |= PropChanges::LISTENERS_UNBOUND;
        }
        changes
    }

    /// Issue the host calls, in unbind → clear → set → bind order.
    ///
    /// Stops at the first failing call; earlier calls stay applied.
    pub fn apply<H: HostAdapter>(&self, host: &mut H, node: &H::Node) -> HostResult<()> {
        for (event, handler) in &self.unbind {
            host.remove_event_listener(node, event, handler)?;
        }
        for key in &self.clear {
            host.remove_attribute(node, key)?;
        }
        for (key, value) in &self.set {
            host.set_attribute(node, key, value)?;
        }
        for (event, handler) in &self.bind {
            host.add_event_listener(node, event, handler)?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
