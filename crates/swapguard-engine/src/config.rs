//! Engine configuration

use std::time::Duration;
use swapguard_types::EscrowStatus;

/// Behavior knobs for the escrow engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// States from which either trade party may cancel
    ///
    /// The observed contract leaves CANCELLED reachability unspecified, so
    /// the cancellation edges live in configuration rather than being
    /// hardcoded to a single source state.
    pub cancellation_sources: Vec<EscrowStatus>,

    /// Bounded wait for the per-escrow lock; expiry surfaces as the
    /// retryable contention error instead of hanging the caller
    pub lock_wait: Duration,

    /// Buffered capacity of each per-escrow event channel
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cancellation_sources: vec![EscrowStatus::PendingPayment],
            lock_wait: Duration::from_secs(2),
            event_capacity: 64,
        }
    }
}

impl EngineConfig {
    /// Config that also allows cancelling a funded-but-unshipped escrow
    pub fn with_cancellation_sources(mut self, sources: Vec<EscrowStatus>) -> Self {
        self.cancellation_sources = sources;
        self
    }
}
