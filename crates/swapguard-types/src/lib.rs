//! SwapGuard Types - Canonical domain types for the escrow engine
//!
//! This crate contains all foundational types for SwapGuard with zero
//! dependencies on other swapguard crates. It defines the complete type
//! system for:
//!
//! - Identity types (EscrowId, ProductId, UserId, AuditEntryId)
//! - Amount type in minor currency units
//! - Escrow status, payment status, and actor roles
//! - Audit trail entries
//! - Public escrow snapshots and request payloads
//! - The error taxonomy for every engine operation
//!
//! # Architectural Invariants
//!
//! These types support the core SwapGuard safety invariants:
//!
//! 1. `amount` never changes after escrow creation
//! 2. A closed ledger accepts no further mutation of any kind
//! 3. A locked ledger accepts only the arbiter resolution path
//! 4. Every accepted transition appends exactly one audit entry

pub mod amount;
pub mod audit;
pub mod error;
pub mod identity;
pub mod request;
pub mod snapshot;
pub mod status;

pub use amount::*;
pub use audit::*;
pub use error::*;
pub use identity::*;
pub use request::*;
pub use snapshot::*;
pub use status::*;

/// Version of the SwapGuard types schema
pub const TYPES_VERSION: &str = "0.1.0";
