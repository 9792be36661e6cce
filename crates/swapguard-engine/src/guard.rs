//! Authorization guard
//!
//! Decides whether a given actor may request a given transition. Two
//! distinct failure modes: the requester is not a party to the transaction
//! at all, or the edge exists but demands a different actor. Both surface
//! as [`EscrowError::UnauthorizedActor`], kept separate from
//! [`EscrowError::InvalidTransition`] (no such edge).

use crate::transitions::TransitionRule;
use swapguard_types::{ActorRole, EscrowError, Result, UserId};
use tracing::debug;

/// Confirm the requester is who their role claims
///
/// Buyers and sellers must match the ids recorded on the escrow. The
/// arbiter role is an administrative credential issued by the external
/// authentication layer; the engine trusts it but still refuses it on
/// ordinary party transitions via the tier check.
pub fn verify_party(
    buyer_id: UserId,
    seller_id: UserId,
    actor_id: UserId,
    role: ActorRole,
) -> Result<()> {
    let claimed_ok = match role {
        ActorRole::Buyer => actor_id == buyer_id,
        ActorRole::Seller => actor_id == seller_id,
        ActorRole::Arbiter => true,
    };
    if !claimed_ok {
        debug!(%actor_id, %role, "requester is not the party they claim");
        return Err(EscrowError::unauthorized(format!(
            "{actor_id} is not the {role} of this escrow"
        )));
    }
    Ok(())
}

/// Confirm the resolved role matches the actor tier the edge demands
pub fn verify_tier(rule: &TransitionRule, role: ActorRole) -> Result<()> {
    if !rule.actor.admits(role) {
        debug!(from = %rule.from, to = %rule.to, %role, "role rejected by transition rule");
        return Err(EscrowError::unauthorized(format!(
            "a {role} may not move this escrow from {} to {}",
            rule.from, rule.to
        )));
    }
    Ok(())
}
