//! Audit trail recorder
//!
//! Append-only history of every transition. Storage order is commit order
//! and is never altered; readers get a newest-first copy.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use swapguard_types::{AuditActor, AuditEntry, AuditEntryId, EscrowStatus};

/// Ordered, append-only collection of audit entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrail {
    entries: Vec<AuditEntry>,
}

impl AuditTrail {
    /// Empty trail
    pub fn new() -> Self {
        Self::default()
    }

    /// Append exactly one entry for a committed transition
    pub fn append(
        &mut self,
        action_by: AuditActor,
        previous_state: EscrowStatus,
        new_state: EscrowStatus,
        reason: String,
    ) -> &AuditEntry {
        let entry = AuditEntry {
            entry_id: AuditEntryId::new(),
            sequence: self.entries.len() as u64 + 1,
            timestamp: Utc::now(),
            action_by,
            previous_state,
            new_state,
            reason,
        };
        self.entries.push(entry);
        self.entries.last().expect("just pushed")
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the trail is empty (only before the genesis entry)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in commit order
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Presentation copy, newest entry first
    pub fn newest_first(&self) -> Vec<AuditEntry> {
        let mut copy = self.entries.clone();
        copy.reverse();
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences_are_one_based_and_monotonic() {
        let mut trail = AuditTrail::new();
        trail.append(
            AuditActor::System,
            EscrowStatus::PendingPayment,
            EscrowStatus::PendingPayment,
            "ESCROW_CREATED".into(),
        );
        trail.append(
            AuditActor::System,
            EscrowStatus::PendingPayment,
            EscrowStatus::Funded,
            "Manual update".into(),
        );
        let seqs: Vec<u64> = trail.entries().iter().map(|e| e.sequence).collect();
        assert_eq!(seqs, vec![1, 2]);
    }

    #[test]
    fn newest_first_does_not_touch_storage_order() {
        let mut trail = AuditTrail::new();
        for (prev, next) in [
            (EscrowStatus::PendingPayment, EscrowStatus::Funded),
            (EscrowStatus::Funded, EscrowStatus::Shipped),
        ] {
            trail.append(AuditActor::System, prev, next, "Manual update".into());
        }
        let presented = trail.newest_first();
        assert_eq!(presented[0].new_state, EscrowStatus::Shipped);
        assert_eq!(trail.entries()[0].new_state, EscrowStatus::Funded);
        assert_eq!(trail.len(), 2);
    }
}
