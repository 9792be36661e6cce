//! Audit trail entries
//!
//! Every accepted transition appends exactly one entry. Entries are stored
//! in commit order and never edited or removed, even after the escrow
//! closes; snapshots present them newest-first.

use crate::{AuditEntryId, EscrowStatus, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default reason recorded for non-dispute transitions
pub const DEFAULT_REASON: &str = "Manual update";

/// Who performed an audited action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditActor {
    /// The engine itself (escrow creation)
    System,
    /// A buyer, seller, or arbiter
    User { id: UserId },
}

impl fmt::Display for AuditActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => f.write_str("system"),
            Self::User { id } => write!(f, "{id}"),
        }
    }
}

/// One immutable record of a committed state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Entry ID
    pub entry_id: AuditEntryId,
    /// 1-based position in commit order
    pub sequence: u64,
    /// When the transition committed
    pub timestamp: DateTime<Utc>,
    /// Who requested the transition
    pub action_by: AuditActor,
    /// State before the commit
    pub previous_state: EscrowStatus,
    /// State after the commit
    pub new_state: EscrowStatus,
    /// Supplied reason, or [`DEFAULT_REASON`] for ordinary transitions
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_actor_displays_as_system() {
        assert_eq!(AuditActor::System.to_string(), "system");
    }

    #[test]
    fn entry_serializes_wire_states() {
        let entry = AuditEntry {
            entry_id: AuditEntryId::new(),
            sequence: 1,
            timestamp: Utc::now(),
            action_by: AuditActor::System,
            previous_state: EscrowStatus::PendingPayment,
            new_state: EscrowStatus::PendingPayment,
            reason: "ESCROW_CREATED".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["new_state"], "PENDING_PAYMENT");
        assert_eq!(json["action_by"], "system");
    }
}
