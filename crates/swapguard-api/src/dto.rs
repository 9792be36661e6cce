//! Wire payloads for the escrow endpoints
//!
//! Bodies carry ids and enum literals as strings, exactly as the
//! marketplace client sends them; parsing failures surface as
//! `VALIDATION_ERROR` rather than a framework rejection.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use swapguard_types::{
    ActorRole, Amount, CreateEscrowRequest, DisputeOutcome, EscrowId, EscrowSnapshot,
    EscrowStatus, ProcessActionRequest, ProductId, ResolveDisputeRequest, UserId,
};

fn default_currency() -> String {
    "INR".to_string()
}

/// Body of `POST /api/escrow/order`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderBody {
    pub product_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    /// Sale price in minor units
    pub amount: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl CreateOrderBody {
    pub fn into_request(self) -> ApiResult<CreateEscrowRequest> {
        Ok(CreateEscrowRequest {
            product_id: parse_id::<ProductId>("product_id", &self.product_id)?,
            buyer_id: parse_id::<UserId>("buyer_id", &self.buyer_id)?,
            seller_id: parse_id::<UserId>("seller_id", &self.seller_id)?,
            amount: Amount::from_minor(self.amount),
            currency: self.currency,
        })
    }
}

/// Body of `POST /api/escrow/process-action`
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessActionBody {
    pub escrow_id: String,
    pub target_state: String,
    #[serde(alias = "user_id")]
    pub actor_id: String,
    #[serde(alias = "role")]
    pub actor_role: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl ProcessActionBody {
    pub fn into_request(self) -> ApiResult<ProcessActionRequest> {
        Ok(ProcessActionRequest {
            escrow_id: parse_escrow_id(&self.escrow_id)?,
            target_state: parse_status(&self.target_state)?,
            actor_id: parse_id::<UserId>("actor_id", &self.actor_id)?,
            actor_role: parse_role(&self.actor_role)?,
            reason: self.reason,
        })
    }
}

/// Body of `POST /api/escrow/:id/resolve`
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveDisputeBody {
    pub arbiter_id: String,
    pub outcome: String,
    pub reason: String,
}

impl ResolveDisputeBody {
    pub fn into_request(self, escrow_id: EscrowId) -> ApiResult<ResolveDisputeRequest> {
        let outcome = match self.outcome.as_str() {
            "release" => DisputeOutcome::Release,
            "refund" => DisputeOutcome::Refund,
            "cancel" => DisputeOutcome::Cancel,
            other => {
                return Err(ApiError::InvalidParameter(format!(
                    "unknown dispute outcome: {other}"
                )))
            }
        };
        Ok(ResolveDisputeRequest {
            escrow_id,
            arbiter_id: parse_id::<UserId>("arbiter_id", &self.arbiter_id)?,
            outcome,
            reason: self.reason,
        })
    }
}

/// Query of `GET /api/escrow/:id/actions`
#[derive(Debug, Clone, Deserialize)]
pub struct ActionsQuery {
    #[serde(alias = "user_id")]
    pub actor_id: String,
    #[serde(alias = "role")]
    pub actor_role: String,
}

/// Success envelope around one escrow snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowEnvelope {
    pub success: bool,
    pub escrow: EscrowSnapshot,
}

impl From<EscrowSnapshot> for EscrowEnvelope {
    fn from(escrow: EscrowSnapshot) -> Self {
        Self {
            success: true,
            escrow,
        }
    }
}

/// Success envelope around a snapshot list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowListEnvelope {
    pub success: bool,
    pub escrows: Vec<EscrowSnapshot>,
}

/// Success envelope around currently available actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsEnvelope {
    pub success: bool,
    pub actions: Vec<EscrowStatus>,
}

// ============================================================================
// Literal parsing
// ============================================================================

trait ParsableId: Sized {
    fn parse_str(s: &str) -> Result<Self, uuid::Error>;
}

impl ParsableId for ProductId {
    fn parse_str(s: &str) -> Result<Self, uuid::Error> {
        Self::parse(s)
    }
}

impl ParsableId for UserId {
    fn parse_str(s: &str) -> Result<Self, uuid::Error> {
        Self::parse(s)
    }
}

fn parse_id<T: ParsableId>(field: &str, value: &str) -> ApiResult<T> {
    T::parse_str(value).map_err(|_| ApiError::InvalidParameter(format!("{field}: {value}")))
}

/// Parse an escrow id from a path segment or body field
pub fn parse_escrow_id(value: &str) -> ApiResult<EscrowId> {
    EscrowId::parse(value).map_err(|_| ApiError::InvalidParameter(format!("escrow_id: {value}")))
}

/// Parse a status literal, surfacing unknown targets as validation errors
pub fn parse_status(value: &str) -> ApiResult<EscrowStatus> {
    value
        .parse()
        .map_err(|_| ApiError::InvalidParameter(format!("unknown target state: {value}")))
}

/// Parse a role literal
pub fn parse_role(value: &str) -> ApiResult<ActorRole> {
    value
        .parse()
        .map_err(|_| ApiError::InvalidParameter(format!("unknown actor role: {value}")))
}
