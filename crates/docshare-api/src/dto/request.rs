//! Request DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docshare_core::types::{DocumentId, ShareId};
use docshare_entity::access_log::AccessAction;

/// Query string of the public resolve endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveQuery {
    /// Email the recipient typed into the verification prompt.
    pub email: Option<String>,
}

/// Body of a document view/download request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentActionRequest {
    /// `view_document` or `download`.
    pub action: AccessAction,
    /// Email used to pass the share's email gate.
    #[serde(default)]
    pub recipient_email: Option<String>,
}

/// Client-reported access event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAccessRequest {
    /// Share the event belongs to.
    pub share_id: ShareId,
    /// Document acted on, if any.
    #[serde(default)]
    pub document_id: Option<DocumentId>,
    /// What happened.
    pub action: AccessAction,
    /// Recipient email as entered.
    #[serde(default)]
    pub recipient_email: Option<String>,
}

/// New expiry for a share.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendShareRequest {
    /// Must be later than the current expiry and in the future.
    pub expires_at: DateTime<Utc>,
}

/// Shares to revoke in one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRevokeRequest {
    /// Share ids.
    pub ids: Vec<ShareId>,
}

/// Share whose link should be emailed to its recipients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendShareEmailRequest {
    /// Share id.
    pub share_id: ShareId,
}
