//! Response shapes produced from shares for the frontend.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use docshare_core::types::{DocumentId, ShareId, VesselId};

use super::model::{Recipient, SecurityOptions, Share, ShareStatus};
use crate::access_log::AccessAction;
use crate::catalog::{DocumentSummary, VesselSummary};

/// Result of creating a share.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareCreated {
    /// Share id.
    pub id: ShareId,
    /// Public token.
    pub token: String,
    /// Full public URL.
    pub share_url: String,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

/// Display-safe subset of a dead (expired or revoked) share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareInfo {
    /// Vessel name, when the catalog knows the vessel.
    pub vessel_name: Option<String>,
    /// Port of registry.
    pub port: Option<String>,
    /// Name of the person who shared.
    pub sender_name: String,
    /// Expiry of the share.
    pub expires_at: DateTime<Utc>,
    /// Whether the share was revoked.
    pub is_revoked: bool,
}

impl ShareInfo {
    /// Builds the display subset from a share and optional vessel data.
    pub fn from_share(share: &Share, vessel: Option<&VesselSummary>) -> Self {
        Self {
            vessel_name: vessel.map(|v| v.name.clone()),
            port: vessel.and_then(|v| v.port.clone()),
            sender_name: share.created_by_name.clone(),
            expires_at: share.expires_at,
            is_revoked: share.is_revoked,
        }
    }
}

/// A document as listed to a recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedDocument {
    /// Document id.
    pub id: DocumentId,
    /// Title.
    pub title: String,
    /// Category.
    pub document_type: String,
    /// Issuing authority.
    pub issuer: Option<String>,
    /// Issue date.
    pub issued_on: Option<NaiveDate>,
    /// Validity end.
    pub valid_until: Option<NaiveDate>,
}

impl From<&DocumentSummary> for SharedDocument {
    fn from(doc: &DocumentSummary) -> Self {
        Self {
            id: doc.id,
            title: doc.title.clone(),
            document_type: doc.document_type.clone(),
            issuer: doc.issuer.clone(),
            issued_on: doc.issued_on,
            valid_until: doc.valid_until,
        }
    }
}

/// Content returned to a recipient who passed every gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareView {
    /// Share id (used for follow-up access logging).
    pub share_id: ShareId,
    /// Vessel id.
    pub vessel_id: VesselId,
    /// Vessel name.
    pub vessel_name: Option<String>,
    /// Port of registry.
    pub port: Option<String>,
    /// IMO number.
    pub imo_number: Option<String>,
    /// Documents in share order.
    pub documents: Vec<SharedDocument>,
    /// Sender's note.
    pub message: Option<String>,
    /// Sender display name.
    pub sender_name: String,
    /// When the share was created.
    pub shared_at: DateTime<Utc>,
    /// Expiry.
    pub expires_at: DateTime<Utc>,
    /// Policy flags the recipient UI must honour.
    pub security_options: SecurityOptions,
    /// Whether the download action is available.
    pub can_download: bool,
    /// The recipient the caller identified as, when an email was supplied
    /// and matched.
    pub recipient: Option<Recipient>,
}

/// Grant for a single document action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAccess {
    /// Share id.
    pub share_id: ShareId,
    /// Document id.
    pub document_id: DocumentId,
    /// Granted action.
    pub action: AccessAction,
    /// File location to fetch.
    pub file_url: String,
    /// Whether the client must watermark the rendition.
    pub watermark: bool,
    /// Text to stamp when `watermark` is set.
    pub watermark_text: Option<String>,
}

/// A share as listed to its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareSummary {
    /// The share record.
    #[serde(flatten)]
    pub share: Share,
    /// Full public URL.
    pub share_url: String,
    /// Derived status.
    pub status: ShareStatus,
}
