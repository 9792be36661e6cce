//! State-change events
//!
//! Each escrow carries its own broadcast channel so consumers can observe
//! transitions without polling; polling `get_escrow` remains a valid
//! degraded mode. One event is published per committed transition, in
//! version order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use swapguard_types::{AuditActor, EscrowId, EscrowStatus, PaymentStatus};

/// Notification of one committed transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowEvent {
    pub escrow_id: EscrowId,
    pub previous_state: EscrowStatus,
    pub new_state: EscrowStatus,
    pub payment_status: PaymentStatus,
    /// Commit counter after this transition; consecutive events for one
    /// escrow carry consecutive versions
    pub version: u64,
    pub action_by: AuditActor,
    pub timestamp: DateTime<Utc>,
}
