//! Request payloads accepted by the escrow engine
//!
//! Identity and role are explicit on every call. The engine holds no
//! ambient session state; `actor_id`/`actor_role` arrive from the external
//! authentication layer and are trusted as authenticated inputs.

use crate::{ActorRole, Amount, EscrowId, EscrowStatus, ProductId, UserId};
use serde::{Deserialize, Serialize};

fn default_currency() -> String {
    "INR".to_string()
}

/// Request to open a new escrow at the moment a buyer commits to buy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEscrowRequest {
    /// Product being purchased (supplied by the catalog)
    pub product_id: ProductId,
    /// The committing buyer
    pub buyer_id: UserId,
    /// The listing seller
    pub seller_id: UserId,
    /// Sale price in minor units; must be positive
    pub amount: Amount,
    /// ISO currency code
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Request for exactly one state transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessActionRequest {
    /// Escrow to advance
    pub escrow_id: EscrowId,
    /// Requested target state
    pub target_state: EscrowStatus,
    /// Requesting user
    pub actor_id: UserId,
    /// Role the requester claims
    pub actor_role: ActorRole,
    /// Mandatory free text when targeting DISPUTED, optional otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// How an arbiter settles a dispute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisputeOutcome {
    /// Pay the seller
    Release,
    /// Return funds to the buyer
    Refund,
    /// Abandon the transaction
    Cancel,
}

impl DisputeOutcome {
    /// Terminal state this outcome commits
    pub fn target_state(&self) -> EscrowStatus {
        match self {
            Self::Release => EscrowStatus::Released,
            Self::Refund => EscrowStatus::Refunded,
            Self::Cancel => EscrowStatus::Cancelled,
        }
    }
}

/// Request to settle a disputed escrow through the administrative path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveDisputeRequest {
    /// Escrow under dispute
    pub escrow_id: EscrowId,
    /// Administrative credential holder
    pub arbiter_id: UserId,
    /// Decision
    pub outcome: DisputeOutcome,
    /// Mandatory justification for the settlement
    pub reason: String,
}
