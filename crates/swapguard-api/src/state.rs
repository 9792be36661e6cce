//! Application state shared across handlers

use std::sync::Arc;
use swapguard_engine::EscrowService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The escrow transaction engine
    pub escrow: Arc<EscrowService>,
}

impl AppState {
    /// Create a new application state
    pub fn new(escrow: Arc<EscrowService>) -> Self {
        Self { escrow }
    }
}
