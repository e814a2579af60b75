//! Share entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docshare_core::types::{DocumentId, ShareId, TeamId, UserId, VesselId};

/// The kind of external party a share is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientType {
    /// Port state control or harbour master.
    PortAuthority,
    /// Ship or port agent.
    Agent,
    /// Class or flag surveyor.
    Surveyor,
    /// Anyone else.
    Other,
}

impl Default for RecipientType {
    fn default() -> Self {
        Self::Other
    }
}

/// An external recipient. The email address is the recipient's only
/// identity; there is no recipient account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    /// Email address as entered by the sharer.
    pub email: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Recipient category.
    #[serde(rename = "type", default)]
    pub recipient_type: RecipientType,
}

impl Recipient {
    /// Email in the form used for gate comparisons.
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

/// Normalizes an email for comparison: surrounding whitespace removed and
/// lowercased. No other folding is applied.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Policy flags fixed at share creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityOptions {
    /// Documents are rendered with a recipient watermark.
    #[serde(default)]
    pub watermark: bool,
    /// The download action is refused; viewing is still allowed.
    #[serde(default)]
    pub prevent_downloads: bool,
    /// The recipient is told that access is recorded.
    #[serde(default)]
    pub access_tracking: bool,
    /// A matching recipient email must be supplied before content is shown.
    #[serde(default)]
    pub email_verification: bool,
}

/// Derived lifecycle status of a share at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareStatus {
    /// Not revoked and not yet expired.
    Active,
    /// Past its expiry and not revoked.
    Expired,
    /// Revoked. Terminal.
    Revoked,
}

/// A share exposing a bundle of vessel documents through one token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    /// Internal identifier.
    pub id: ShareId,
    /// Public URL token.
    pub token: String,
    /// Vessel the documents belong to.
    pub vessel_id: VesselId,
    /// Ordered document bundle.
    pub document_ids: Vec<DocumentId>,
    /// Authorized recipients.
    pub recipients: Vec<Recipient>,
    /// Policy flags.
    pub security_options: SecurityOptions,
    /// Optional note shown to recipients.
    pub message: Option<String>,
    /// Absolute expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Whether the share has been revoked.
    pub is_revoked: bool,
    /// When the share was revoked.
    pub revoked_at: Option<DateTime<Utc>>,
    /// Platform user who created the share.
    pub created_by: UserId,
    /// Creator's display name, shown to recipients as the sender.
    pub created_by_name: String,
    /// Creator's team at creation time.
    pub team_id: Option<TeamId>,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
    /// Incremented on every mutation.
    pub version: i64,
}

impl Share {
    /// Whether the share may be accessed at `now`.
    pub fn is_accessible_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked && now < self.expires_at
    }

    /// Whether the share may be accessed right now.
    pub fn is_accessible(&self) -> bool {
        self.is_accessible_at(Utc::now())
    }

    /// Status at `now`. Revocation takes precedence over expiry.
    pub fn status_at(&self, now: DateTime<Utc>) -> ShareStatus {
        if self.is_revoked {
            ShareStatus::Revoked
        } else if now >= self.expires_at {
            ShareStatus::Expired
        } else {
            ShareStatus::Active
        }
    }

    /// Finds the recipient whose email matches `email` after normalization.
    pub fn find_recipient(&self, email: &str) -> Option<&Recipient> {
        let wanted = normalize_email(email);
        if wanted.is_empty() {
            return None;
        }
        self.recipients
            .iter()
            .find(|r| r.normalized_email() == wanted)
    }

    /// Whether `document_id` is part of this share's bundle.
    pub fn contains_document(&self, document_id: DocumentId) -> bool {
        self.document_ids.contains(&document_id)
    }
}

/// Data required to insert a new share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShare {
    /// Pre-generated public token.
    pub token: String,
    /// Vessel the documents belong to.
    pub vessel_id: VesselId,
    /// Ordered, de-duplicated document bundle.
    pub document_ids: Vec<DocumentId>,
    /// Authorized recipients.
    pub recipients: Vec<Recipient>,
    /// Policy flags.
    pub security_options: SecurityOptions,
    /// Optional note.
    pub message: Option<String>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Creator.
    pub created_by: UserId,
    /// Creator display name.
    pub created_by_name: String,
    /// Creator's team.
    pub team_id: Option<TeamId>,
}

impl NewShare {
    /// Materializes the share record with a fresh id and creation time.
    pub fn into_share(self, created_at: DateTime<Utc>) -> Share {
        Share {
            id: ShareId::new(),
            token: self.token,
            vessel_id: self.vessel_id,
            document_ids: self.document_ids,
            recipients: self.recipients,
            security_options: self.security_options,
            message: self.message,
            expires_at: self.expires_at,
            is_revoked: false,
            revoked_at: None,
            created_by: self.created_by,
            created_by_name: self.created_by_name,
            team_id: self.team_id,
            created_at,
            version: 0,
        }
    }
}
