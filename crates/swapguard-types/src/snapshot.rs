//! Public escrow snapshots
//!
//! The snapshot is the only read surface the engine exposes. It is a
//! value copy: two consecutive reads with no intervening commit are
//! identical, and holding one never blocks a writer.

use crate::{Amount, AuditEntry, EscrowId, EscrowStatus, PaymentStatus, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current state pair shown to consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMatrix {
    /// Lifecycle state
    pub escrow_status: EscrowStatus,
    /// Money-position label derived from the lifecycle state
    pub payment_status: PaymentStatus,
}

/// Money-relevant facts of one escrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerView {
    /// Sale price in minor units; immutable after creation
    pub amount: Amount,
    /// Dispute lock engaged
    pub is_locked: bool,
    /// Terminal state reached; no further mutation accepted
    pub is_closed: bool,
}

/// Full read-only view of one escrow transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowSnapshot {
    pub escrow_id: EscrowId,
    pub product_id: ProductId,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    /// ISO currency code fixed at creation
    pub currency: String,
    pub status_matrix: StatusMatrix,
    pub ledger: LedgerView,
    /// Audit trail, newest entry first
    pub audit_trail: Vec<AuditEntry>,
    /// Monotonic commit counter; bumps by one per accepted transition
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EscrowSnapshot {
    /// Convenience accessor for the lifecycle state
    pub fn status(&self) -> EscrowStatus {
        self.status_matrix.escrow_status
    }

    /// Whether a user is the buyer or seller of this escrow
    pub fn involves(&self, user_id: UserId) -> bool {
        self.buyer_id == user_id || self.seller_id == user_id
    }
}
