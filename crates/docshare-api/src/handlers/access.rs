//! Public recipient-facing handlers. No platform account required; the
//! share token is the credential.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use tracing::debug;

use docshare_core::types::DocumentId;
use docshare_service::share::DocumentAccessOutcome;

use crate::dto::request::{DocumentActionRequest, LogAccessRequest, ResolveQuery};
use crate::dto::response::{ResolutionResponse, SuccessResponse};
use crate::error::ApiError;
use crate::extractors::ClientMeta;
use crate::state::AppState;

/// GET /api/document-shares/{token}?email=
pub async fn resolve_share(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<ResolveQuery>,
    ClientMeta(client): ClientMeta,
) -> ResolutionResponse {
    ResolutionResponse(
        state
            .share_service
            .resolve_share(&token, query.email.as_deref(), client)
            .await,
    )
}

/// POST /api/document-shares/{token}/documents/{document_id}
pub async fn access_document(
    State(state): State<AppState>,
    Path((token, document_id)): Path<(String, DocumentId)>,
    ClientMeta(client): ClientMeta,
    Json(req): Json<DocumentActionRequest>,
) -> Result<Response, ApiError> {
    let outcome = state
        .share_service
        .access_document(
            &token,
            document_id,
            req.action,
            req.recipient_email.as_deref(),
            client,
        )
        .await?;

    Ok(match outcome {
        DocumentAccessOutcome::Granted(access) => Json(access).into_response(),
        DocumentAccessOutcome::Unavailable(resolution) => {
            ResolutionResponse(resolution).into_response()
        }
    })
}

/// POST /api/document-access-logs
///
/// Always answers `{ "success": true }`, even for malformed bodies.
pub async fn log_access(
    State(state): State<AppState>,
    ClientMeta(client): ClientMeta,
    body: Result<Json<LogAccessRequest>, JsonRejection>,
) -> Json<SuccessResponse> {
    match body {
        Ok(Json(req)) => {
            state
                .share_service
                .log_access(
                    req.share_id,
                    req.document_id,
                    req.action,
                    req.recipient_email,
                    client,
                )
                .await;
        }
        Err(rejection) => {
            debug!(error = %rejection, "Malformed access log event ignored");
        }
    }
    Json(SuccessResponse::ok())
}
