//! API routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Build the full API router over the given state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .nest("/api/escrow", escrow_routes())
        .with_state(state)
}

/// Escrow endpoints, mirroring the marketplace client contract
fn escrow_routes() -> Router<AppState> {
    Router::new()
        .route("/order", post(handlers::create_order))
        .route("/process-action", post(handlers::process_action))
        .route("/user/:user_id", get(handlers::list_for_user))
        .route("/:id", get(handlers::get_escrow))
        .route("/:id/actions", get(handlers::available_actions))
        .route("/:id/resolve", post(handlers::resolve_dispute))
}
