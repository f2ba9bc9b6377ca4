// HTTP surface over the ledger service.

mod error;
mod handlers;
pub mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::application::LedgerService;

pub type AppState = Arc<LedgerService>;

pub fn create_router(service: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/accounts/create", post(handlers::create_account))
        .route("/accounts/deposit", post(handlers::deposit))
        .route("/accounts/withdraw", post(handlers::withdraw))
        .route("/accounts/:account_id/balance", get(handlers::balance))
        .route("/accounts/:account_id/transactions", get(handlers::transactions))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}
