//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use docshare_auth::jwt::JwtDecoder;
use docshare_core::config::AppConfig;
use docshare_database::DatabasePool;
use docshare_service::share::ShareLifecycleService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL pool, absent on the memory backend
    pub db_pool: Option<DatabasePool>,

    // ── Auth ─────────────────────────────────────────────────
    /// Bearer token verifier
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Share lifecycle service
    pub share_service: Arc<ShareLifecycleService>,
}
