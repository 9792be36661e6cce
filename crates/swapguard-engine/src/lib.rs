//! SwapGuard Engine - the escrow transaction engine
//!
//! Mediates a sale between a buyer and a seller: the directed graph of
//! legal status changes, who may advance it, when it must freeze, and how
//! its history is recorded.
//!
//! # Control flow
//!
//! A caller submits `(escrow_id, target_state, actor_id, actor_role,
//! reason)`. The [`EscrowService`] loads the record, asks the guard
//! whether this actor may request this transition, asks the
//! [`TransitionTable`] whether the edge exists, asks the ledger whether it
//! currently accepts mutation, and only if all three agree commits the new
//! status and appends one audit entry, atomically under the per-escrow
//! lock.
//!
//! ```
//! # use swapguard_engine::{EscrowService, EngineConfig};
//! # use swapguard_types::*;
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let service = EscrowService::new(EngineConfig::default());
//! let buyer = UserId::new();
//! let snap = service
//!     .create_escrow(CreateEscrowRequest {
//!         product_id: ProductId::new(),
//!         buyer_id: buyer,
//!         seller_id: UserId::new(),
//!         amount: Amount::from_major(1000),
//!         currency: "INR".to_string(),
//!     })
//!     .await
//!     .unwrap();
//! let snap = service
//!     .process_action(ProcessActionRequest {
//!         escrow_id: snap.escrow_id,
//!         target_state: EscrowStatus::Funded,
//!         actor_id: buyer,
//!         actor_role: ActorRole::Buyer,
//!         reason: None,
//!     })
//!     .await
//!     .unwrap();
//! assert_eq!(snap.status_matrix.payment_status, PaymentStatus::Held);
//! # });
//! ```

pub mod audit;
pub mod config;
pub mod events;
pub mod guard;
pub mod ledger;
pub mod record;
pub mod service;
pub mod transitions;

pub use audit::AuditTrail;
pub use config::EngineConfig;
pub use events::EscrowEvent;
pub use ledger::Ledger;
pub use record::EscrowRecord;
pub use service::EscrowService;
pub use transitions::{ActorTier, TransitionRule, TransitionTable};
