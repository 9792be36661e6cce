//! Escrow status, derived payment status, and actor roles
//!
//! Wire representation is SCREAMING_SNAKE_CASE to match the marketplace
//! client contract (`PENDING_PAYMENT`, `FUNDED`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of an escrow transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EscrowStatus {
    /// Created, waiting for the buyer to fund
    PendingPayment,
    /// Funds held by the escrow
    Funded,
    /// Seller confirmed shipment
    Shipped,
    /// Buyer confirmed delivery
    Delivered,
    /// Funds released to the seller (terminal)
    Released,
    /// A party raised a dispute; ledger locked until resolution
    Disputed,
    /// Funds returned to the buyer (terminal)
    Refunded,
    /// Transaction abandoned before completion (terminal)
    Cancelled,
}

impl EscrowStatus {
    /// All defined states, in declaration order
    pub const ALL: [EscrowStatus; 8] = [
        Self::PendingPayment,
        Self::Funded,
        Self::Shipped,
        Self::Delivered,
        Self::Released,
        Self::Disputed,
        Self::Refunded,
        Self::Cancelled,
    ];

    /// Check if this is a terminal state (no outgoing transitions)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Released | Self::Refunded | Self::Cancelled)
    }

    /// Wire literal for this state
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingPayment => "PENDING_PAYMENT",
            Self::Funded => "FUNDED",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Released => "RELEASED",
            Self::Disputed => "DISPUTED",
            Self::Refunded => "REFUNDED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Payment status label derived from this state
    ///
    /// This is a total function: the ledger never stores a payment status
    /// independently, it recomputes it on every committed transition.
    pub fn payment_status(&self) -> PaymentStatus {
        match self {
            Self::PendingPayment => PaymentStatus::Awaiting,
            Self::Funded | Self::Shipped | Self::Delivered => PaymentStatus::Held,
            Self::Disputed => PaymentStatus::Frozen,
            Self::Released => PaymentStatus::Released,
            Self::Refunded => PaymentStatus::Refunded,
            Self::Cancelled => PaymentStatus::Cancelled,
        }
    }
}

impl fmt::Display for EscrowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized status literals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown escrow status literal: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for EscrowStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Money-position label derived from [`EscrowStatus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Nothing funded yet
    Awaiting,
    /// Funds held in escrow
    Held,
    /// Funds held but progress suspended by a dispute
    Frozen,
    /// Funds paid out to the seller
    Released,
    /// Funds returned to the buyer
    Refunded,
    /// Transaction abandoned before funds moved
    Cancelled,
}

impl PaymentStatus {
    /// Wire literal for this payment status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Awaiting => "AWAITING",
            Self::Held => "HELD",
            Self::Frozen => "FROZEN",
            Self::Released => "RELEASED",
            Self::Refunded => "REFUNDED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role a requester claims when asking for a transition
///
/// Supplied by the external authentication layer; the engine treats it as
/// a trusted input and still verifies it against the escrow's parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Buyer,
    Seller,
    Arbiter,
}

impl ActorRole {
    /// Wire literal for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
            Self::Arbiter => "arbiter",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized role literals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown actor role literal: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for ActorRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Self::Buyer),
            "seller" => Ok(Self::Seller),
            "arbiter" => Ok(Self::Arbiter),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
