//! Error types for SwapGuard
//!
//! Every failure is explicit and machine-readable. A failed call leaves
//! status, ledger flags, and audit trail completely unchanged.

use crate::EscrowStatus;
use thiserror::Error;

/// Result type for SwapGuard operations
pub type Result<T> = std::result::Result<T, EscrowError>;

/// SwapGuard error taxonomy
///
/// All variants are permanent for the issuing request except
/// [`EscrowError::Contention`], which the caller may retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EscrowError {
    /// Malformed input: missing dispute reason, non-positive amount,
    /// unknown target state literal
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// Unknown escrow id
    #[error("Escrow {escrow_id} not found")]
    NotFound { escrow_id: String },

    /// Requester is not a party to the transaction, or the wrong party
    /// for the requested transition
    #[error("Actor not authorized: {message}")]
    UnauthorizedActor { message: String },

    /// No such edge from the current state, regardless of actor
    #[error("No transition from {from} to {to}")]
    InvalidTransition { from: EscrowStatus, to: EscrowStatus },

    /// Mutation attempted while disputed, outside the resolution path
    #[error("Escrow {escrow_id} is locked by an open dispute")]
    LockedLedger { escrow_id: String },

    /// Mutation attempted after a terminal state was reached
    #[error("Escrow {escrow_id} is closed; the ledger is final")]
    ClosedLedger { escrow_id: String },

    /// Per-escrow lock could not be acquired within the bounded wait
    #[error("Escrow {escrow_id} is busy; retry the request")]
    Contention { escrow_id: String },
}

impl EscrowError {
    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::UnauthorizedActor { .. } => "UNAUTHORIZED_ACTOR",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::LockedLedger { .. } => "LOCKED_LEDGER",
            Self::ClosedLedger { .. } => "CLOSED_LEDGER",
            Self::Contention { .. } => "CONTENTION",
        }
    }

    /// Whether the caller may retry the same request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Contention { .. })
    }

    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for an authorization failure
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::UnauthorizedActor {
            message: message.into(),
        }
    }
}
