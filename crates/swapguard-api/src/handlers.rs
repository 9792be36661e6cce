//! Escrow endpoint handlers
//!
//! Thin translation layer: parse the wire payload, call the engine, wrap
//! the snapshot in the success envelope the marketplace client expects.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::instrument;

use crate::dto::{
    parse_escrow_id, parse_role, ActionsEnvelope, ActionsQuery, CreateOrderBody, EscrowEnvelope,
    EscrowListEnvelope, ProcessActionBody, ResolveDisputeBody,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use swapguard_types::UserId;

/// `GET /api/health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "swapguard" }))
}

/// `POST /api/escrow/order` - buyer commits to a purchase
#[instrument(skip_all)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<CreateOrderBody>,
) -> ApiResult<(StatusCode, Json<EscrowEnvelope>)> {
    let request = body.into_request()?;
    let snapshot = state.escrow.create_escrow(request).await?;
    Ok((StatusCode::CREATED, Json(snapshot.into())))
}

/// `POST /api/escrow/process-action` - exactly one transition attempt
#[instrument(skip_all)]
pub async fn process_action(
    State(state): State<AppState>,
    Json(body): Json<ProcessActionBody>,
) -> ApiResult<Json<EscrowEnvelope>> {
    let request = body.into_request()?;
    let snapshot = state.escrow.process_action(request).await?;
    Ok(Json(snapshot.into()))
}

/// `POST /api/escrow/:id/resolve` - administrative dispute settlement
#[instrument(skip_all)]
pub async fn resolve_dispute(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ResolveDisputeBody>,
) -> ApiResult<Json<EscrowEnvelope>> {
    let escrow_id = parse_escrow_id(&id)?;
    let request = body.into_request(escrow_id)?;
    let snapshot = state.escrow.resolve_dispute(request).await?;
    Ok(Json(snapshot.into()))
}

/// `GET /api/escrow/:id` - read-only snapshot
pub async fn get_escrow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<EscrowEnvelope>> {
    let escrow_id = parse_escrow_id(&id)?;
    let snapshot = state.escrow.get_escrow(escrow_id).await?;
    Ok(Json(snapshot.into()))
}

/// `GET /api/escrow/:id/actions` - targets the actor may request now
pub async fn available_actions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ActionsQuery>,
) -> ApiResult<Json<ActionsEnvelope>> {
    let escrow_id = parse_escrow_id(&id)?;
    let actor_id = UserId::parse(&query.actor_id)
        .map_err(|_| ApiError::InvalidParameter(format!("actor_id: {}", query.actor_id)))?;
    let role = parse_role(&query.actor_role)?;
    let actions = state
        .escrow
        .available_actions(escrow_id, actor_id, role)
        .await?;
    Ok(Json(ActionsEnvelope {
        success: true,
        actions,
    }))
}

/// `GET /api/escrow/user/:user_id` - a user's transactions, newest first
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<EscrowListEnvelope>> {
    let user_id = UserId::parse(&user_id)
        .map_err(|_| ApiError::InvalidParameter(format!("user_id: {user_id}")))?;
    let escrows = state.escrow.list_escrows_for_user(user_id).await?;
    Ok(Json(EscrowListEnvelope {
        success: true,
        escrows,
    }))
}
