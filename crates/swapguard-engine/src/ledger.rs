//! Per-escrow ledger and lock/dispute management
//!
//! The ledger holds the money-relevant facts of one transaction. The
//! amount is immutable after creation; `payment_status` is recomputed from
//! the lifecycle state on every commit, never set independently. Entering
//! DISPUTED engages the lock in the same commit; reaching any terminal
//! state closes the ledger permanently.

use serde::{Deserialize, Serialize};
use swapguard_types::{Amount, EscrowError, EscrowId, EscrowStatus, LedgerView, PaymentStatus, Result};

/// Money-relevant facts of one escrow transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    amount: Amount,
    is_locked: bool,
    is_closed: bool,
    payment_status: PaymentStatus,
}

impl Ledger {
    /// Open a new ledger awaiting funding
    pub fn open(amount: Amount) -> Self {
        Self {
            amount,
            is_locked: false,
            is_closed: false,
            payment_status: EscrowStatus::PendingPayment.payment_status(),
        }
    }

    /// Immutable sale amount
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Dispute lock engaged
    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    /// Terminal state reached
    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    /// Derived money-position label
    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Check whether the ledger currently accepts this mutation
    ///
    /// A closed ledger rejects everything, including repeated dispute or
    /// resolution attempts. A locked ledger rejects everything except the
    /// distinguished administrative resolution path.
    pub fn assert_mutable(&self, escrow_id: EscrowId, is_resolution_path: bool) -> Result<()> {
        if self.is_closed {
            return Err(EscrowError::ClosedLedger {
                escrow_id: escrow_id.to_string(),
            });
        }
        if self.is_locked && !is_resolution_path {
            return Err(EscrowError::LockedLedger {
                escrow_id: escrow_id.to_string(),
            });
        }
        Ok(())
    }

    /// Apply a committed lifecycle state
    ///
    /// Caller has already validated the transition; this only maintains
    /// the derived fields, within the same atomic commit that changes
    /// `status`.
    pub fn apply(&mut self, new_status: EscrowStatus) {
        self.is_locked = new_status == EscrowStatus::Disputed;
        if new_status.is_terminal() {
            self.is_closed = true;
        }
        self.payment_status = new_status.payment_status();
    }

    /// Public view of this ledger
    pub fn view(&self) -> LedgerView {
        LedgerView {
            amount: self.amount,
            is_locked: self.is_locked,
            is_closed: self.is_closed,
        }
    }
}
