//! Engine configuration.

use std::time::Duration;

use crate::types::LISTENER_PREFIX;

/// Tunables for an [`Engine`](super::Engine).
///
/// ```
/// use std::time::Duration;
/// use spark_fiber::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_yield_threshold(Duration::from_micros(500))
///     .with_listener_prefix("on");
/// assert_eq!(config.yield_threshold, Duration::from_micros(500));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// The work loop yields once the deadline has less than this left.
    pub yield_threshold: Duration,
    /// Prop keys starting with this prefix are event listeners.
    /// An empty prefix makes every prop an attribute.
    pub listener_prefix: &'static str,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            yield_threshold: Duration::from_millis(1),
            listener_prefix: LISTENER_PREFIX,
        }
    }
}

impl EngineConfig {
    pub fn with_yield_threshold(mut self, threshold: Duration) -> Self {
        self.yield_threshold = threshold;
        self
    }

    pub fn with_listener_prefix(mut self, prefix: &'static str) -> Self {
        self.listener_prefix = prefix;
        self
    }
}
