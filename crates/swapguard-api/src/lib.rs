//! SwapGuard API - REST surface over the escrow engine
//!
//! Exposes the engine's operations to the marketplace UI (and any other
//! client) under `/api/escrow`. Identity and role arrive as explicit
//! request fields from the external authentication layer; the API passes
//! them through untouched.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use routes::create_router;
pub use state::AppState;
