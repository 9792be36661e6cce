//! The escrow service façade
//!
//! Combines the transition table, authorization guard, ledger, and audit
//! recorder into one atomic `process_action`. Each escrow is an
//! independently lockable unit of work: transitions on different escrows
//! proceed in parallel, transitions on the same escrow serialize behind
//! its own commit lock, held for the whole validate-then-commit. Readers
//! are served from a snapshot cache refreshed at each commit and never
//! touch the commit lock.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tokio::time::timeout;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::events::EscrowEvent;
use crate::guard;
use crate::record::EscrowRecord;
use crate::transitions::TransitionTable;
use swapguard_types::{
    ActorRole, AuditActor, CreateEscrowRequest, EscrowError, EscrowId, EscrowSnapshot,
    EscrowStatus, ProcessActionRequest, ResolveDisputeRequest, Result, UserId, DEFAULT_REASON,
};

/// One escrow's serialized state, its read cache, and its event channel
struct EscrowCell {
    record: Mutex<EscrowRecord>,
    /// Value copy of the record, replaced under the commit lock
    snapshot: RwLock<Arc<EscrowSnapshot>>,
    events: broadcast::Sender<EscrowEvent>,
}

impl EscrowCell {
    fn new(record: EscrowRecord, snapshot: EscrowSnapshot, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        Self {
            record: Mutex::new(record),
            snapshot: RwLock::new(Arc::new(snapshot)),
            events,
        }
    }

    /// Latest committed snapshot, without drawing the commit lock
    fn read_snapshot(&self) -> Arc<EscrowSnapshot> {
        match self.snapshot.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    fn store_snapshot(&self, snapshot: Arc<EscrowSnapshot>) {
        match self.snapshot.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
    }
}

/// The escrow transaction engine
///
/// Self-contained business logic over its own state; the product catalog
/// and the identity provider are external collaborators that feed it
/// `product_id`/`amount` and `actor_id`/`actor_role` respectively.
pub struct EscrowService {
    config: EngineConfig,
    table: TransitionTable,
    escrows: DashMap<EscrowId, Arc<EscrowCell>>,
}

impl EscrowService {
    /// Create an engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        let table = TransitionTable::standard(&config);
        Self {
            config,
            table,
            escrows: DashMap::new(),
        }
    }

    /// The transition table this engine consults
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Open a new escrow in PENDING_PAYMENT
    pub async fn create_escrow(&self, request: CreateEscrowRequest) -> Result<EscrowSnapshot> {
        if request.amount.is_zero() {
            return Err(EscrowError::validation("amount must be positive"));
        }
        if request.buyer_id == request.seller_id {
            return Err(EscrowError::validation(
                "buyer and seller must be different users",
            ));
        }
        if request.currency.trim().is_empty() {
            return Err(EscrowError::validation("currency must not be empty"));
        }

        let record = EscrowRecord::open(request);
        let snapshot = record.snapshot();
        info!(escrow_id = %record.escrow_id, amount = %record.ledger.amount(), "escrow created");
        self.escrows.insert(
            record.escrow_id,
            Arc::new(EscrowCell::new(
                record,
                snapshot.clone(),
                self.config.event_capacity,
            )),
        );
        Ok(snapshot)
    }

    /// Attempt exactly one transition
    ///
    /// On success the full updated snapshot is returned and one event is
    /// published; on failure nothing changes.
    pub async fn process_action(&self, request: ProcessActionRequest) -> Result<EscrowSnapshot> {
        let ProcessActionRequest {
            escrow_id,
            target_state,
            actor_id,
            actor_role,
            reason,
        } = request;

        // A dispute without a reason fails before any other check runs.
        let reason = reason.filter(|r| !r.trim().is_empty());
        if target_state == EscrowStatus::Disputed && reason.is_none() {
            return Err(EscrowError::validation(
                "a non-empty reason is mandatory when raising a dispute",
            ));
        }

        let cell = self.cell(escrow_id)?;
        let mut record = self.acquire(escrow_id, &cell).await?;

        // The resolution path is the only mutation a locked ledger accepts.
        let is_resolution_path = record.status == EscrowStatus::Disputed
            && actor_role == ActorRole::Arbiter
            && target_state.is_terminal();
        record.ledger.assert_mutable(escrow_id, is_resolution_path)?;

        guard::verify_party(record.buyer_id, record.seller_id, actor_id, actor_role)?;

        let rule = self
            .table
            .find(record.status, target_state)
            .copied()
            .ok_or(EscrowError::InvalidTransition {
                from: record.status,
                to: target_state,
            })?;
        guard::verify_tier(&rule, actor_role)?;

        if rule.requires_reason && reason.is_none() {
            return Err(EscrowError::validation(format!(
                "a non-empty reason is mandatory for {} -> {}",
                rule.from, rule.to
            )));
        }

        let reason = reason.unwrap_or_else(|| DEFAULT_REASON.to_string());
        let event = record.commit(target_state, AuditActor::User { id: actor_id }, reason);
        info!(
            %escrow_id,
            from = %event.previous_state,
            to = %event.new_state,
            actor = %actor_id,
            version = event.version,
            "transition committed"
        );
        let snapshot = record.snapshot();
        // Cache refreshed and event published before the commit lock
        // drops, so readers and subscribers see commits in version order.
        cell.store_snapshot(Arc::new(snapshot.clone()));
        let _ = cell.events.send(event);
        Ok(snapshot)
    }

    /// Settle a disputed escrow through the administrative path
    pub async fn resolve_dispute(&self, request: ResolveDisputeRequest) -> Result<EscrowSnapshot> {
        if request.reason.trim().is_empty() {
            return Err(EscrowError::validation(
                "a non-empty reason is mandatory when resolving a dispute",
            ));
        }
        self.process_action(ProcessActionRequest {
            escrow_id: request.escrow_id,
            target_state: request.outcome.target_state(),
            actor_id: request.arbiter_id,
            actor_role: ActorRole::Arbiter,
            reason: Some(request.reason),
        })
        .await
    }

    /// Read-only snapshot of one escrow
    ///
    /// Answered from the commit-refreshed cache; an in-flight writer is
    /// never blocked by a reader.
    pub async fn get_escrow(&self, escrow_id: EscrowId) -> Result<EscrowSnapshot> {
        Ok((*self.cell(escrow_id)?.read_snapshot()).clone())
    }

    /// Target states the actor may currently request
    ///
    /// Answered from the same table that validates requests. Empty once
    /// the ledger is closed, and empty for ordinary parties while a
    /// dispute holds the lock.
    pub async fn available_actions(
        &self,
        escrow_id: EscrowId,
        actor_id: UserId,
        actor_role: ActorRole,
    ) -> Result<Vec<EscrowStatus>> {
        let snapshot = self.cell(escrow_id)?.read_snapshot();
        guard::verify_party(snapshot.buyer_id, snapshot.seller_id, actor_id, actor_role)?;
        if snapshot.ledger.is_closed {
            return Ok(Vec::new());
        }
        if snapshot.ledger.is_locked && actor_role != ActorRole::Arbiter {
            return Ok(Vec::new());
        }
        Ok(self.table.available_for(snapshot.status(), actor_role))
    }

    /// All escrows a user participates in, newest first
    pub async fn list_escrows_for_user(&self, user_id: UserId) -> Result<Vec<EscrowSnapshot>> {
        let mut snapshots: Vec<EscrowSnapshot> = self
            .escrows
            .iter()
            .map(|entry| (*entry.value().read_snapshot()).clone())
            .filter(|snapshot| snapshot.involves(user_id))
            .collect();
        snapshots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(snapshots)
    }

    /// Observe state-change events for one escrow
    ///
    /// Consumers that miss events (lagged receiver) can always fall back
    /// to polling `get_escrow`.
    pub fn subscribe(&self, escrow_id: EscrowId) -> Result<broadcast::Receiver<EscrowEvent>> {
        Ok(self.cell(escrow_id)?.events.subscribe())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Hold one escrow's commit lock for `hold`, serializing against
    /// writers, without mutating anything. Test support.
    #[doc(hidden)]
    pub async fn hold_commit_lock(
        &self,
        escrow_id: EscrowId,
        hold: std::time::Duration,
    ) -> Result<()> {
        let cell = self.cell(escrow_id)?;
        let _record = self.acquire(escrow_id, &cell).await?;
        tokio::time::sleep(hold).await;
        Ok(())
    }

    fn cell(&self, escrow_id: EscrowId) -> Result<Arc<EscrowCell>> {
        self.escrows
            .get(&escrow_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| EscrowError::NotFound {
                escrow_id: escrow_id.to_string(),
            })
    }

    /// Bounded-wait acquisition of one escrow's lock
    async fn acquire<'a>(
        &self,
        escrow_id: EscrowId,
        cell: &'a EscrowCell,
    ) -> Result<MutexGuard<'a, EscrowRecord>> {
        match timeout(self.config.lock_wait, cell.record.lock()).await {
            Ok(record) => Ok(record),
            Err(_) => {
                debug!(%escrow_id, wait = ?self.config.lock_wait, "lock wait expired");
                Err(EscrowError::Contention {
                    escrow_id: escrow_id.to_string(),
                })
            }
        }
    }
}

impl Default for EscrowService {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
