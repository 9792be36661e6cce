//! The escrow record
//!
//! Owned state of one transaction: identity, lifecycle status, ledger,
//! and audit trail. Records are created once, mutated only through
//! [`EscrowRecord::commit`], and never deleted; closing marks them
//! retired while preserving the trail for inspection.

use crate::audit::AuditTrail;
use crate::events::EscrowEvent;
use crate::ledger::Ledger;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use swapguard_types::{
    AuditActor, CreateEscrowRequest, EscrowId, EscrowSnapshot, EscrowStatus, ProductId,
    StatusMatrix, UserId,
};

/// Genesis reason recorded when an escrow is opened
pub const CREATED_REASON: &str = "ESCROW_CREATED";

/// One escrow transaction and everything it owns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowRecord {
    pub escrow_id: EscrowId,
    pub product_id: ProductId,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    pub currency: String,
    pub status: EscrowStatus,
    pub ledger: Ledger,
    pub audit: AuditTrail,
    /// Monotonic commit counter, zero at creation
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EscrowRecord {
    /// Open a new record in PENDING_PAYMENT with a genesis audit entry
    ///
    /// Caller validates the request first; amounts here are known
    /// positive.
    pub fn open(request: CreateEscrowRequest) -> Self {
        let now = Utc::now();
        let mut audit = AuditTrail::new();
        audit.append(
            AuditActor::System,
            EscrowStatus::PendingPayment,
            EscrowStatus::PendingPayment,
            CREATED_REASON.to_string(),
        );
        Self {
            escrow_id: EscrowId::new(),
            product_id: request.product_id,
            buyer_id: request.buyer_id,
            seller_id: request.seller_id,
            currency: request.currency,
            status: EscrowStatus::PendingPayment,
            ledger: Ledger::open(request.amount),
            audit,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Commit one validated transition atomically
    ///
    /// Sets the status, recomputes the ledger's derived fields, bumps the
    /// version, and appends exactly one audit entry. Returns the event to
    /// publish once the record lock is released.
    pub fn commit(
        &mut self,
        target: EscrowStatus,
        action_by: AuditActor,
        reason: String,
    ) -> EscrowEvent {
        let previous = self.status;
        self.status = target;
        self.ledger.apply(target);
        self.version += 1;
        self.updated_at = Utc::now();
        self.audit.append(action_by, previous, target, reason);
        EscrowEvent {
            escrow_id: self.escrow_id,
            previous_state: previous,
            new_state: target,
            payment_status: self.ledger.payment_status(),
            version: self.version,
            action_by,
            timestamp: self.updated_at,
        }
    }

    /// Value-copy view for readers
    pub fn snapshot(&self) -> EscrowSnapshot {
        EscrowSnapshot {
            escrow_id: self.escrow_id,
            product_id: self.product_id,
            buyer_id: self.buyer_id,
            seller_id: self.seller_id,
            currency: self.currency.clone(),
            status_matrix: StatusMatrix {
                escrow_status: self.status,
                payment_status: self.ledger.payment_status(),
            },
            ledger: self.ledger.view(),
            audit_trail: self.audit.newest_first(),
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

}
