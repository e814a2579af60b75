//! Access log entry entity model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docshare_core::types::{AccessLogId, DocumentId, ShareId};

use super::chain;

/// A recipient-facing action on a share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "access_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccessAction {
    /// The share link was opened.
    ViewShare,
    /// A document was previewed.
    ViewDocument,
    /// A document was downloaded.
    Download,
}

impl AccessAction {
    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewShare => "view_share",
            Self::ViewDocument => "view_document",
            Self::Download => "download",
        }
    }
}

impl fmt::Display for AccessAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view_share" => Ok(Self::ViewShare),
            "view_document" => Ok(Self::ViewDocument),
            "download" => Ok(Self::Download),
            other => Err(format!("Unknown access action: {other}")),
        }
    }
}

/// Network metadata of the request that triggered an access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Client IP address.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
}

/// An immutable, hash-chained access log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogEntry {
    /// Entry identifier.
    pub id: AccessLogId,
    /// Share the access belongs to.
    pub share_id: ShareId,
    /// Position in the share's chain, starting at 0.
    pub sequence: i64,
    /// Document accessed; `None` means the share itself was opened.
    pub document_id: Option<DocumentId>,
    /// What was done.
    pub action: AccessAction,
    /// Email the recipient typed in. Unverified.
    pub actor_email: Option<String>,
    /// When the access happened (microsecond precision).
    #[sqlx(rename = "occurred_at")]
    pub timestamp: DateTime<Utc>,
    /// Client IP address.
    pub client_ip: Option<String>,
    /// Client User-Agent.
    pub user_agent: Option<String>,
    /// Hash of the previous entry, or [`chain::GENESIS_HASH`].
    pub prev_hash: String,
    /// Hash over this entry's content and `prev_hash`.
    pub entry_hash: String,
}

/// An access event waiting to be appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAccessLogEntry {
    /// Share the access belongs to.
    pub share_id: ShareId,
    /// Document accessed, if any.
    pub document_id: Option<DocumentId>,
    /// What was done.
    pub action: AccessAction,
    /// Unverified recipient email.
    pub actor_email: Option<String>,
    /// Client IP address.
    pub client_ip: Option<String>,
    /// Client User-Agent.
    pub user_agent: Option<String>,
    /// When the access happened.
    pub timestamp: DateTime<Utc>,
}

impl NewAccessLogEntry {
    /// Creates an entry stamped with the current time.
    ///
    /// The timestamp is truncated to microseconds so it survives a round
    /// trip through `TIMESTAMPTZ` without changing the entry hash.
    pub fn now(
        share_id: ShareId,
        document_id: Option<DocumentId>,
        action: AccessAction,
        actor_email: Option<String>,
        client: ClientInfo,
    ) -> Self {
        Self {
            share_id,
            document_id,
            action,
            actor_email: actor_email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            client_ip: client.ip_address,
            user_agent: client.user_agent,
            timestamp: Utc::now().trunc_subsecs(6),
        }
    }

    /// Seals the entry into the chain at `sequence` after `prev_hash`.
    pub fn seal(self, id: AccessLogId, sequence: i64, prev_hash: &str) -> AccessLogEntry {
        let entry_hash = chain::compute_entry_hash(prev_hash, sequence, &self);
        AccessLogEntry {
            id,
            share_id: self.share_id,
            sequence,
            document_id: self.document_id,
            action: self.action,
            actor_email: self.actor_email,
            timestamp: self.timestamp,
            client_ip: self.client_ip,
            user_agent: self.user_agent,
            prev_hash: prev_hash.to_string(),
            entry_hash,
        }
    }
}

impl From<&AccessLogEntry> for NewAccessLogEntry {
    fn from(entry: &AccessLogEntry) -> Self {
        Self {
            share_id: entry.share_id,
            document_id: entry.document_id,
            action: entry.action,
            actor_email: entry.actor_email.clone(),
            client_ip: entry.client_ip.clone(),
            user_agent: entry.user_agent.clone(),
            timestamp: entry.timestamp,
        }
    }
}
