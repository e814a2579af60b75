//! Route definitions for the DocShare HTTP API.
//!
//! All routes are mounted under `/api`. The segment after
//! `/document-shares/` is the share token on public routes and the share id
//! on owner routes.

use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

/// Build the API router and thread `AppState` through every route.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(public_routes())
        .merge(share_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Recipient-facing endpoints; the share token is the credential.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/document-shares/{share}",
            get(handlers::access::resolve_share),
        )
        .route(
            "/document-shares/{share}/documents/{document_id}",
            post(handlers::access::access_document),
        )
        .route("/document-access-logs", post(handlers::access::log_access))
}

/// Owner-facing share management (bearer token required).
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/document-shares", post(handlers::share::create_share))
        .route(
            "/document-shares/batch-revoke",
            post(handlers::share::batch_revoke),
        )
        .route(
            "/document-shares/by-id/{id}",
            get(handlers::share::get_share),
        )
        .route(
            "/document-shares/{share}/revoke",
            post(handlers::share::revoke_share),
        )
        .route(
            "/document-shares/{share}/extend",
            post(handlers::share::extend_share),
        )
        .route(
            "/document-shares/{share}/access-logs",
            get(handlers::share::list_access_logs),
        )
        .route(
            "/document-shares/{share}/access-logs/verify",
            get(handlers::share::verify_access_logs),
        )
        .route(
            "/vessels/{vessel_id}/document-shares",
            get(handlers::share::list_vessel_shares),
        )
        .route(
            "/send-document-share-email",
            post(handlers::share::send_share_email),
        )
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
