//! Share management handlers for authenticated platform users.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use docshare_core::types::{ShareId, VesselId};
use docshare_database::store::BatchRevokeOutcome;
use docshare_entity::access_log::{AccessLogEntry, ChainVerification};
use docshare_entity::share::{ShareCreated, ShareSummary};
use docshare_service::notification::DeliveryReport;
use docshare_service::share::CreateShareRequest;

use crate::dto::request::{BatchRevokeRequest, ExtendShareRequest, SendShareEmailRequest};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/document-shares
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateShareRequest>,
) -> Result<(StatusCode, Json<ShareCreated>), ApiError> {
    let created = state.share_service.create_share(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/document-shares/by-id/{id}
pub async fn get_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ShareId>,
) -> Result<Json<ShareSummary>, ApiError> {
    Ok(Json(state.share_service.get_share(&auth, id).await?))
}

/// GET /api/vessels/{vessel_id}/document-shares
pub async fn list_vessel_shares(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(vessel_id): Path<VesselId>,
) -> Result<Json<Vec<ShareSummary>>, ApiError> {
    Ok(Json(
        state
            .share_service
            .list_vessel_shares(&auth, vessel_id)
            .await?,
    ))
}

/// POST /api/document-shares/{id}/revoke
pub async fn revoke_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ShareId>,
) -> Result<Json<ShareSummary>, ApiError> {
    Ok(Json(state.share_service.revoke_share(&auth, id).await?))
}

/// POST /api/document-shares/{id}/extend
pub async fn extend_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ShareId>,
    Json(req): Json<ExtendShareRequest>,
) -> Result<Json<ShareSummary>, ApiError> {
    Ok(Json(
        state
            .share_service
            .extend_share(&auth, id, req.expires_at)
            .await?,
    ))
}

/// POST /api/document-shares/batch-revoke
pub async fn batch_revoke(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BatchRevokeRequest>,
) -> Result<Json<BatchRevokeOutcome>, ApiError> {
    Ok(Json(
        state
            .share_service
            .batch_revoke_shares(&auth, &req.ids)
            .await?,
    ))
}

/// POST /api/send-document-share-email
pub async fn send_share_email(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SendShareEmailRequest>,
) -> Result<Json<DeliveryReport>, ApiError> {
    Ok(Json(
        state
            .share_service
            .send_share_email(&auth, req.share_id)
            .await?,
    ))
}

/// GET /api/document-shares/{id}/access-logs
pub async fn list_access_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ShareId>,
) -> Result<Json<Vec<AccessLogEntry>>, ApiError> {
    Ok(Json(state.share_service.list_access_logs(&auth, id).await?))
}

/// GET /api/document-shares/{id}/access-logs/verify
pub async fn verify_access_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ShareId>,
) -> Result<Json<ChainVerification>, ApiError> {
    Ok(Json(
        state.share_service.verify_access_logs(&auth, id).await?,
    ))
}
