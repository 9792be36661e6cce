//! End-to-end lifecycle tests for the escrow engine
//!
//! Exercises the full happy path, wrong-actor rejections, dispute
//! locking, closed-ledger finality, arbiter resolution, concurrency, and
//! the subscribe/notify channel.

use std::time::Duration;

use swapguard_engine::{EngineConfig, EscrowService};
use swapguard_types::{
    ActorRole, Amount, CreateEscrowRequest, DisputeOutcome, EscrowSnapshot, EscrowStatus,
    PaymentStatus, ProcessActionRequest, ProductId, ResolveDisputeRequest, UserId,
};

struct Market {
    service: EscrowService,
    buyer: UserId,
    seller: UserId,
    arbiter: UserId,
}

impl Market {
    fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    fn with_config(config: EngineConfig) -> Self {
        Self {
            service: EscrowService::new(config),
            buyer: UserId::new(),
            seller: UserId::new(),
            arbiter: UserId::new(),
        }
    }

    async fn open(&self, amount_major: u64) -> EscrowSnapshot {
        self.service
            .create_escrow(CreateEscrowRequest {
                product_id: ProductId::new(),
                buyer_id: self.buyer,
                seller_id: self.seller,
                amount: Amount::from_major(amount_major),
                currency: "INR".to_string(),
            })
            .await
            .expect("escrow opens")
    }

    async fn act(
        &self,
        snap: &EscrowSnapshot,
        target: EscrowStatus,
        actor: UserId,
        role: ActorRole,
        reason: Option<&str>,
    ) -> Result<EscrowSnapshot, swapguard_types::EscrowError> {
        self.service
            .process_action(ProcessActionRequest {
                escrow_id: snap.escrow_id,
                target_state: target,
                actor_id: actor,
                actor_role: role,
                reason: reason.map(str::to_string),
            })
            .await
    }

    /// Drive an escrow along the happy path up to (and including) `until`
    async fn advance_to(&self, snap: &EscrowSnapshot, until: EscrowStatus) -> EscrowSnapshot {
        let mut current = snap.clone();
        while current.status() != until {
            let (target, actor, role) = match current.status() {
                EscrowStatus::PendingPayment => (EscrowStatus::Funded, self.buyer, ActorRole::Buyer),
                EscrowStatus::Funded => (EscrowStatus::Shipped, self.seller, ActorRole::Seller),
                EscrowStatus::Shipped => (EscrowStatus::Delivered, self.buyer, ActorRole::Buyer),
                EscrowStatus::Delivered => (EscrowStatus::Released, self.buyer, ActorRole::Buyer),
                other => panic!("cannot advance past {other}"),
            };
            current = self.act(&current, target, actor, role, None).await.unwrap();
        }
        current
    }
}

// ============================================================================
// Lifecycle scenarios
// ============================================================================

#[tokio::test]
async fn scenario_a_create_and_fund() {
    let market = Market::new();
    let snap = market.open(1000).await;
    assert_eq!(snap.status(), EscrowStatus::PendingPayment);
    assert_eq!(snap.status_matrix.payment_status, PaymentStatus::Awaiting);
    assert_eq!(snap.ledger.amount, Amount::from_major(1000));

    let snap = market
        .act(&snap, EscrowStatus::Funded, market.buyer, ActorRole::Buyer, None)
        .await
        .unwrap();
    assert_eq!(snap.status(), EscrowStatus::Funded);
    assert_eq!(snap.status_matrix.payment_status, PaymentStatus::Held);
}

#[tokio::test]
async fn scenario_b_only_the_seller_ships() {
    let market = Market::new();
    let snap = market.open(1000).await;
    let snap = market.advance_to(&snap, EscrowStatus::Funded).await;

    let err = market
        .act(&snap, EscrowStatus::Shipped, market.buyer, ActorRole::Buyer, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "UNAUTHORIZED_ACTOR");

    let snap = market
        .act(&snap, EscrowStatus::Shipped, market.seller, ActorRole::Seller, None)
        .await
        .unwrap();
    assert_eq!(snap.status(), EscrowStatus::Shipped);
}

#[tokio::test]
async fn scenario_c_dispute_locks_the_ledger() {
    let market = Market::new();
    let snap = market.open(1000).await;
    let snap = market.advance_to(&snap, EscrowStatus::Shipped).await;

    let snap = market
        .act(
            &snap,
            EscrowStatus::Disputed,
            market.buyer,
            ActorRole::Buyer,
            Some("item damaged"),
        )
        .await
        .unwrap();
    assert_eq!(snap.status(), EscrowStatus::Disputed);
    assert!(snap.ledger.is_locked);
    assert_eq!(snap.status_matrix.payment_status, PaymentStatus::Frozen);

    let err = market
        .act(&snap, EscrowStatus::Delivered, market.buyer, ActorRole::Buyer, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "LOCKED_LEDGER");
}

#[tokio::test]
async fn scenario_d_closed_ledger_rejects_everything() {
    let market = Market::new();
    let snap = market.open(1000).await;
    let snap = market.advance_to(&snap, EscrowStatus::Released).await;
    assert!(snap.ledger.is_closed);
    let before = snap.audit_trail.len();

    // any arguments, including a repeated dispute attempt
    for (target, actor, role, reason) in [
        (EscrowStatus::Funded, market.buyer, ActorRole::Buyer, None),
        (
            EscrowStatus::Disputed,
            market.seller,
            ActorRole::Seller,
            Some("too late"),
        ),
        (
            EscrowStatus::Refunded,
            market.arbiter,
            ActorRole::Arbiter,
            Some("resolution after close"),
        ),
    ] {
        let err = market.act(&snap, target, actor, role, reason).await.unwrap_err();
        assert_eq!(err.kind(), "CLOSED_LEDGER");
    }

    let after = market.service.get_escrow(snap.escrow_id).await.unwrap();
    assert_eq!(after.status(), EscrowStatus::Released);
    assert_eq!(after.audit_trail.len(), before);
}

#[tokio::test]
async fn idempotent_reads_return_identical_snapshots() {
    let market = Market::new();
    let snap = market.open(1000).await;
    let first = market.service.get_escrow(snap.escrow_id).await.unwrap();
    let second = market.service.get_escrow(snap.escrow_id).await.unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// Invariants
// ============================================================================

#[tokio::test]
async fn audit_trail_grows_by_one_per_accepted_transition() {
    let market = Market::new();
    let snap = market.open(1000).await;
    // genesis entry only
    assert_eq!(snap.audit_trail.len(), 1);
    assert_eq!(snap.version, 0);

    let mut previous_len = 1;
    let mut current = snap.clone();
    for status in [
        EscrowStatus::Funded,
        EscrowStatus::Shipped,
        EscrowStatus::Delivered,
        EscrowStatus::Released,
    ] {
        current = market.advance_to(&current, status).await;
        assert_eq!(current.audit_trail.len(), previous_len + 1);
        assert_eq!(current.version as usize + 1, current.audit_trail.len());
        previous_len = current.audit_trail.len();
    }
}

#[tokio::test]
async fn rejected_transitions_leave_no_trace() {
    let market = Market::new();
    let snap = market.open(1000).await;
    let snap = market.advance_to(&snap, EscrowStatus::Funded).await;
    let before = market.service.get_escrow(snap.escrow_id).await.unwrap();

    // wrong actor, missing edge, and stranger in turn
    let _ = market
        .act(&snap, EscrowStatus::Shipped, market.buyer, ActorRole::Buyer, None)
        .await
        .unwrap_err();
    let _ = market
        .act(&snap, EscrowStatus::Released, market.seller, ActorRole::Seller, None)
        .await
        .unwrap_err();
    let _ = market
        .act(&snap, EscrowStatus::Shipped, UserId::new(), ActorRole::Seller, None)
        .await
        .unwrap_err();

    let after = market.service.get_escrow(snap.escrow_id).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn audit_trail_is_presented_newest_first() {
    let market = Market::new();
    let snap = market.open(1000).await;
    let snap = market.advance_to(&snap, EscrowStatus::Shipped).await;

    let states: Vec<EscrowStatus> = snap.audit_trail.iter().map(|e| e.new_state).collect();
    assert_eq!(
        states,
        vec![
            EscrowStatus::Shipped,
            EscrowStatus::Funded,
            EscrowStatus::PendingPayment, // genesis
        ]
    );
    let sequences: Vec<u64> = snap.audit_trail.iter().map(|e| e.sequence).collect();
    assert_eq!(sequences, vec![3, 2, 1]);
}

#[tokio::test]
async fn default_reason_is_recorded_for_ordinary_transitions() {
    let market = Market::new();
    let snap = market.open(1000).await;
    let snap = market.advance_to(&snap, EscrowStatus::Funded).await;
    assert_eq!(snap.audit_trail[0].reason, "Manual update");
}

// ============================================================================
// Dispute resolution
// ============================================================================

#[tokio::test]
async fn arbiter_refund_unlocks_and_closes() {
    let market = Market::new();
    let snap = market.open(1000).await;
    let snap = market.advance_to(&snap, EscrowStatus::Shipped).await;
    let snap = market
        .act(
            &snap,
            EscrowStatus::Disputed,
            market.seller,
            ActorRole::Seller,
            Some("buyer unreachable"),
        )
        .await
        .unwrap();

    let resolved = market
        .service
        .resolve_dispute(ResolveDisputeRequest {
            escrow_id: snap.escrow_id,
            arbiter_id: market.arbiter,
            outcome: DisputeOutcome::Refund,
            reason: "seller at fault".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(resolved.status(), EscrowStatus::Refunded);
    assert!(!resolved.ledger.is_locked);
    assert!(resolved.ledger.is_closed);
    assert_eq!(resolved.status_matrix.payment_status, PaymentStatus::Refunded);
    assert_eq!(resolved.audit_trail[0].reason, "seller at fault");
}

#[tokio::test]
async fn parties_cannot_use_the_resolution_path() {
    let market = Market::new();
    let snap = market.open(1000).await;
    let snap = market.advance_to(&snap, EscrowStatus::Funded).await;
    let snap = market
        .act(
            &snap,
            EscrowStatus::Disputed,
            market.buyer,
            ActorRole::Buyer,
            Some("never shipped"),
        )
        .await
        .unwrap();

    // the buyer pretending the dispute resolved in their favor
    let err = market
        .act(
            &snap,
            EscrowStatus::Refunded,
            market.buyer,
            ActorRole::Buyer,
            Some("refund me"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "LOCKED_LEDGER");
}

#[tokio::test]
async fn resolution_requires_a_reason() {
    let market = Market::new();
    let snap = market.open(1000).await;
    let snap = market.advance_to(&snap, EscrowStatus::Funded).await;
    let snap = market
        .act(
            &snap,
            EscrowStatus::Disputed,
            market.buyer,
            ActorRole::Buyer,
            Some("never shipped"),
        )
        .await
        .unwrap();

    let err = market
        .service
        .resolve_dispute(ResolveDisputeRequest {
            escrow_id: snap.escrow_id,
            arbiter_id: market.arbiter,
            outcome: DisputeOutcome::Release,
            reason: "  ".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "VALIDATION_ERROR");

    let err = market
        .act(&snap, EscrowStatus::Released, market.arbiter, ActorRole::Arbiter, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn no_dispute_from_pending_payment() {
    let market = Market::new();
    let snap = market.open(1000).await;
    let err = market
        .act(
            &snap,
            EscrowStatus::Disputed,
            market.buyer,
            ActorRole::Buyer,
            Some("cold feet"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "INVALID_TRANSITION");
}

// ============================================================================
// Cancellation configurability
// ============================================================================

#[tokio::test]
async fn cancellation_follows_the_configured_sources() {
    let market = Market::new();
    let snap = market.open(1000).await;
    let cancelled = market
        .act(&snap, EscrowStatus::Cancelled, market.seller, ActorRole::Seller, None)
        .await
        .unwrap();
    assert!(cancelled.ledger.is_closed);

    // default config: a funded escrow cannot be cancelled
    let snap = market.open(500).await;
    let snap = market.advance_to(&snap, EscrowStatus::Funded).await;
    let err = market
        .act(&snap, EscrowStatus::Cancelled, market.buyer, ActorRole::Buyer, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "INVALID_TRANSITION");

    // widened config: it can
    let market = Market::with_config(EngineConfig::default().with_cancellation_sources(vec![
        EscrowStatus::PendingPayment,
        EscrowStatus::Funded,
    ]));
    let snap = market.open(500).await;
    let snap = market.advance_to(&snap, EscrowStatus::Funded).await;
    let snap = market
        .act(&snap, EscrowStatus::Cancelled, market.buyer, ActorRole::Buyer, None)
        .await
        .unwrap();
    assert_eq!(snap.status(), EscrowStatus::Cancelled);
}

// ============================================================================
// Available actions
// ============================================================================

#[tokio::test]
async fn available_actions_track_lock_and_close() {
    let market = Market::new();
    let snap = market.open(1000).await;

    let actions = market
        .service
        .available_actions(snap.escrow_id, market.buyer, ActorRole::Buyer)
        .await
        .unwrap();
    assert_eq!(actions, vec![EscrowStatus::Funded, EscrowStatus::Cancelled]);

    // a stranger gets an authorization error, not an empty list
    let err = market
        .service
        .available_actions(snap.escrow_id, UserId::new(), ActorRole::Buyer)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "UNAUTHORIZED_ACTOR");

    let snap = market.advance_to(&snap, EscrowStatus::Funded).await;
    let snap = market
        .act(
            &snap,
            EscrowStatus::Disputed,
            market.buyer,
            ActorRole::Buyer,
            Some("wrong item"),
        )
        .await
        .unwrap();

    // locked: parties see nothing, the arbiter sees the three outcomes
    let actions = market
        .service
        .available_actions(snap.escrow_id, market.seller, ActorRole::Seller)
        .await
        .unwrap();
    assert!(actions.is_empty());
    let actions = market
        .service
        .available_actions(snap.escrow_id, market.arbiter, ActorRole::Arbiter)
        .await
        .unwrap();
    assert_eq!(actions.len(), 3);

    // closed: everyone sees nothing
    let resolved = market
        .service
        .resolve_dispute(ResolveDisputeRequest {
            escrow_id: snap.escrow_id,
            arbiter_id: market.arbiter,
            outcome: DisputeOutcome::Release,
            reason: "dispute withdrawn".to_string(),
        })
        .await
        .unwrap();
    assert!(resolved.ledger.is_closed);
    let actions = market
        .service
        .available_actions(snap.escrow_id, market.buyer, ActorRole::Buyer)
        .await
        .unwrap();
    assert!(actions.is_empty());
}

// ============================================================================
// Concurrency & events
// ============================================================================

#[tokio::test]
async fn concurrent_release_and_dispute_commit_exactly_once() {
    let market = Market::new();
    let snap = market.open(1000).await;
    let snap = market.advance_to(&snap, EscrowStatus::Delivered).await;

    let service = &market.service;
    let release = service.process_action(ProcessActionRequest {
        escrow_id: snap.escrow_id,
        target_state: EscrowStatus::Released,
        actor_id: market.buyer,
        actor_role: ActorRole::Buyer,
        reason: None,
    });
    let dispute = service.process_action(ProcessActionRequest {
        escrow_id: snap.escrow_id,
        target_state: EscrowStatus::Disputed,
        actor_id: market.seller,
        actor_role: ActorRole::Seller,
        reason: Some("payment concern".to_string()),
    });

    let (first, second) = tokio::join!(release, dispute);
    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one writer may commit");

    // the loser failed against the committed state, not the stale one
    let loser = if first.is_err() { first } else { second };
    let kind = loser.unwrap_err().kind();
    assert!(
        kind == "CLOSED_LEDGER" || kind == "LOCKED_LEDGER" || kind == "INVALID_TRANSITION",
        "unexpected loser error kind {kind}"
    );

    let after = service.get_escrow(snap.escrow_id).await.unwrap();
    assert_eq!(after.version, snap.version + 1);
}

#[tokio::test]
async fn lock_wait_expiry_surfaces_retryable_contention() {
    let market = Market::with_config(EngineConfig {
        lock_wait: Duration::from_millis(100),
        ..EngineConfig::default()
    });
    let snap = market.open(1000).await;

    let holder = market
        .service
        .hold_commit_lock(snap.escrow_id, Duration::from_millis(600));
    let attempt = async {
        // let the holder win the lock first
        tokio::time::sleep(Duration::from_millis(100)).await;
        market
            .act(&snap, EscrowStatus::Funded, market.buyer, ActorRole::Buyer, None)
            .await
    };
    let (held, result) = tokio::join!(holder, attempt);
    held.unwrap();
    let err = result.unwrap_err();
    assert_eq!(err.kind(), "CONTENTION");
    assert!(err.is_retryable());

    // nothing committed, and the lock is free again for the retry
    let after = market.service.get_escrow(snap.escrow_id).await.unwrap();
    assert_eq!(after.version, snap.version);
    let snap = market
        .act(&snap, EscrowStatus::Funded, market.buyer, ActorRole::Buyer, None)
        .await
        .unwrap();
    assert_eq!(snap.status(), EscrowStatus::Funded);
}

#[tokio::test]
async fn reads_answer_while_a_writer_holds_the_commit_lock() {
    let market = Market::with_config(EngineConfig {
        lock_wait: Duration::from_millis(100),
        ..EngineConfig::default()
    });
    let snap = market.open(1000).await;

    let holder = market
        .service
        .hold_commit_lock(snap.escrow_id, Duration::from_millis(400));
    let reads = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let read = market.service.get_escrow(snap.escrow_id).await.unwrap();
        assert_eq!(read, snap);
        let actions = market
            .service
            .available_actions(snap.escrow_id, market.buyer, ActorRole::Buyer)
            .await
            .unwrap();
        assert_eq!(actions, vec![EscrowStatus::Funded, EscrowStatus::Cancelled]);
        let listed = market.service.list_escrows_for_user(market.buyer).await.unwrap();
        assert_eq!(listed.len(), 1);
    };
    let (held, ()) = tokio::join!(holder, reads);
    held.unwrap();
}

#[tokio::test]
async fn transitions_on_different_escrows_are_independent() {
    let market = Market::new();
    let a = market.open(100).await;
    let b = market.open(200).await;

    let fund_a = market.act(&a, EscrowStatus::Funded, market.buyer, ActorRole::Buyer, None);
    let fund_b = market.act(&b, EscrowStatus::Funded, market.buyer, ActorRole::Buyer, None);
    let (ra, rb) = tokio::join!(fund_a, fund_b);
    assert!(ra.is_ok() && rb.is_ok());
}

#[tokio::test]
async fn subscribers_observe_each_commit_in_version_order() {
    let market = Market::new();
    let snap = market.open(1000).await;
    let mut rx = market.service.subscribe(snap.escrow_id).unwrap();

    let snap = market.advance_to(&snap, EscrowStatus::Shipped).await;
    assert_eq!(snap.version, 2);

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(first.new_state, EscrowStatus::Funded);
    assert_eq!(first.version, 1);
    assert_eq!(second.previous_state, EscrowStatus::Funded);
    assert_eq!(second.new_state, EscrowStatus::Shipped);
    assert_eq!(second.version, 2);
}

#[tokio::test]
async fn list_escrows_for_user_filters_by_party() {
    let market = Market::new();
    let mine = market.open(100).await;
    let _other_market = {
        // an unrelated pair trading on the same engine
        let buyer = UserId::new();
        let seller = UserId::new();
        market
            .service
            .create_escrow(CreateEscrowRequest {
                product_id: ProductId::new(),
                buyer_id: buyer,
                seller_id: seller,
                amount: Amount::from_major(50),
                currency: "INR".to_string(),
            })
            .await
            .unwrap()
    };

    let listed = market.service.list_escrows_for_user(market.buyer).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].escrow_id, mine.escrow_id);
}
