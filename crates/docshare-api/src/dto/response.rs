//! Response DTOs.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use docshare_core::error::ErrorKind;
use docshare_entity::share::ShareInfo;
use docshare_service::share::ShareResolution;

/// `{ "success": true }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Always `true`.
    pub success: bool,
}

impl SuccessResponse {
    /// Creates a successful response.
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Store backend state: `connected`, `unavailable` or `memory`.
    pub database: String,
}

/// The share is email-gated and no email was supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequiredBody {
    /// Always `true`.
    pub requires_email_verification: bool,
}

/// The supplied email did not pass the gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRejectedBody {
    /// `EMAIL_NOT_AUTHORIZED`.
    pub error: String,
    /// Generic message; never echoes the supplied email.
    pub message: String,
    /// Always `true`.
    pub requires_email_verification: bool,
}

/// No share has this token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundBody {
    /// Always `true`.
    pub not_found: bool,
}

/// The share exists but is expired or revoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadLinkBody {
    /// Always `true`: the link no longer opens.
    pub expired: bool,
    /// Whether the owner revoked it.
    pub revoked: bool,
    /// Display data for the dead-link page.
    pub share_info: ShareInfo,
}

/// Renders a [`ShareResolution`] as an HTTP response.
#[derive(Debug)]
pub struct ResolutionResponse(pub ShareResolution);

impl IntoResponse for ResolutionResponse {
    fn into_response(self) -> Response {
        match self.0 {
            ShareResolution::View(view) => (StatusCode::OK, Json(*view)).into_response(),
            ShareResolution::RequiresVerification => (
                StatusCode::OK,
                Json(VerificationRequiredBody {
                    requires_email_verification: true,
                }),
            )
                .into_response(),
            ShareResolution::EmailNotAuthorized => (
                StatusCode::FORBIDDEN,
                Json(EmailRejectedBody {
                    error: ErrorKind::EmailNotAuthorized.code().to_string(),
                    message: "This email address is not authorized to view this share"
                        .to_string(),
                    requires_email_verification: true,
                }),
            )
                .into_response(),
            ShareResolution::Expired(share_info) => (
                StatusCode::GONE,
                Json(DeadLinkBody {
                    expired: true,
                    revoked: false,
                    share_info,
                }),
            )
                .into_response(),
            ShareResolution::Revoked(share_info) => (
                StatusCode::GONE,
                Json(DeadLinkBody {
                    expired: true,
                    revoked: true,
                    share_info,
                }),
            )
                .into_response(),
            ShareResolution::NotFound => {
                (StatusCode::NOT_FOUND, Json(NotFoundBody { not_found: true })).into_response()
            }
        }
    }
}
