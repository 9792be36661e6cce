//! The declarative transition table
//!
//! One table answers both questions the marketplace needs: "is this
//! requested transition legal?" and "which actions are currently
//! available?". The reference UI duplicated these rules across per-button
//! visibility conditions; here they exist exactly once.

use crate::EngineConfig;
use serde::{Deserialize, Serialize};
use swapguard_types::{ActorRole, EscrowStatus};

/// Actor tier a transition rule demands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorTier {
    /// Only the buyer
    Buyer,
    /// Only the seller
    Seller,
    /// Either trade party
    Party,
    /// Administrative dispute-resolution credential
    Arbiter,
}

impl ActorTier {
    /// Whether a claimed role satisfies this tier
    pub fn admits(&self, role: ActorRole) -> bool {
        match self {
            Self::Buyer => role == ActorRole::Buyer,
            Self::Seller => role == ActorRole::Seller,
            Self::Party => matches!(role, ActorRole::Buyer | ActorRole::Seller),
            Self::Arbiter => role == ActorRole::Arbiter,
        }
    }
}

/// One edge of the escrow state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule {
    pub from: EscrowStatus,
    pub to: EscrowStatus,
    pub actor: ActorTier,
    /// Whether a non-empty free-text reason is mandatory
    pub requires_reason: bool,
}

impl TransitionRule {
    const fn new(from: EscrowStatus, to: EscrowStatus, actor: ActorTier) -> Self {
        Self {
            from,
            to,
            actor,
            requires_reason: false,
        }
    }

    const fn with_reason(mut self) -> Self {
        self.requires_reason = true;
        self
    }

    /// Whether this edge is the distinguished administrative path out of
    /// a dispute
    pub fn is_resolution(&self) -> bool {
        self.from == EscrowStatus::Disputed && self.actor == ActorTier::Arbiter
    }
}

/// The directed graph of legal status changes
#[derive(Debug, Clone)]
pub struct TransitionTable {
    rules: Vec<TransitionRule>,
}

impl TransitionTable {
    /// Build the standard marketplace table
    ///
    /// Happy path (strictly linear), dispute edges from every funded
    /// pre-terminal state, arbiter resolution edges out of DISPUTED, and
    /// the configured cancellation edges. PENDING_PAYMENT has no dispute
    /// path because nothing has been funded yet.
    pub fn standard(config: &EngineConfig) -> Self {
        use ActorTier::{Arbiter, Buyer, Party, Seller};
        use EscrowStatus::*;

        let mut rules = vec![
            TransitionRule::new(PendingPayment, Funded, Buyer),
            TransitionRule::new(Funded, Shipped, Seller),
            TransitionRule::new(Shipped, Delivered, Buyer),
            TransitionRule::new(Delivered, Released, Buyer),
            TransitionRule::new(Funded, Disputed, Party).with_reason(),
            TransitionRule::new(Shipped, Disputed, Party).with_reason(),
            TransitionRule::new(Delivered, Disputed, Party).with_reason(),
            TransitionRule::new(Disputed, Released, Arbiter).with_reason(),
            TransitionRule::new(Disputed, Refunded, Arbiter).with_reason(),
            TransitionRule::new(Disputed, Cancelled, Arbiter).with_reason(),
        ];
        for &source in &config.cancellation_sources {
            if !source.is_terminal() && source != Disputed {
                rules.push(TransitionRule::new(source, Cancelled, Party));
            }
        }
        Self { rules }
    }

    /// Look up the edge `from -> to`, if the table defines one
    pub fn find(&self, from: EscrowStatus, to: EscrowStatus) -> Option<&TransitionRule> {
        self.rules.iter().find(|r| r.from == from && r.to == to)
    }

    /// All edges leaving `from`
    pub fn rules_from(&self, from: EscrowStatus) -> impl Iterator<Item = &TransitionRule> {
        self.rules.iter().filter(move |r| r.from == from)
    }

    /// Target states a given role may currently request from `from`
    ///
    /// This is the presentation-side answer; validation consults the same
    /// rules through [`TransitionTable::find`].
    pub fn available_for(&self, from: EscrowStatus, role: ActorRole) -> Vec<EscrowStatus> {
        self.rules_from(from)
            .filter(|r| r.actor.admits(role))
            .map(|r| r.to)
            .collect()
    }
}
