//! Per-share SHA-256 hash chain over access log entries.
//!
//! Each entry commits to its predecessor through `prev_hash`. Editing,
//! removing or reordering any stored entry breaks every later link, which
//! [`verify_chain`] reports.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::model::{AccessLogEntry, NewAccessLogEntry};

/// `prev_hash` of the first entry of every share.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Outcome of re-walking a share's chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainVerification {
    /// Whether every link matched.
    pub valid: bool,
    /// Number of entries checked.
    pub entries: usize,
    /// Sequence of the first entry that failed, if any.
    pub broken_at_sequence: Option<i64>,
    /// Hash of the last entry.
    pub head_hash: Option<String>,
}

/// Computes the hash of an entry about to be stored at `sequence`.
///
/// Fields are length-prefixed so no two distinct entries share an encoding.
pub fn compute_entry_hash(prev_hash: &str, sequence: i64, entry: &NewAccessLogEntry) -> String {
    let mut hasher = Sha256::new();
    let mut field = |bytes: &[u8]| {
        hasher.update((bytes.len() as u64).to_be_bytes());
        hasher.update(bytes);
    };

    let share_id = entry.share_id.to_string();
    let document_id = entry.document_id.map(|d| d.to_string()).unwrap_or_default();
    let timestamp = entry
        .timestamp
        .to_rfc3339_opts(SecondsFormat::Micros, true);

    field(prev_hash.as_bytes());
    field(share_id.as_bytes());
    field(&sequence.to_be_bytes());
    field(document_id.as_bytes());
    field(entry.action.as_str().as_bytes());
    field(entry.actor_email.as_deref().unwrap_or_default().as_bytes());
    field(timestamp.as_bytes());
    field(entry.client_ip.as_deref().unwrap_or_default().as_bytes());
    field(entry.user_agent.as_deref().unwrap_or_default().as_bytes());

    hex::encode(hasher.finalize())
}

/// Verifies a share's entries, which must be in ascending sequence order.
pub fn verify_chain(entries: &[AccessLogEntry]) -> ChainVerification {
    let mut prev_hash = GENESIS_HASH.to_string();

    for (position, entry) in entries.iter().enumerate() {
        let expected = compute_entry_hash(&prev_hash, entry.sequence, &NewAccessLogEntry::from(entry));
        if entry.sequence != position as i64
            || entry.prev_hash != prev_hash
            || entry.entry_hash != expected
        {
            return ChainVerification {
                valid: false,
                entries: entries.len(),
                broken_at_sequence: Some(position as i64),
                head_hash: entries.last().map(|e| e.entry_hash.clone()),
            };
        }
        prev_hash = entry.entry_hash.clone();
    }

    ChainVerification {
        valid: true,
        entries: entries.len(),
        broken_at_sequence: None,
        head_hash: entries.last().map(|e| e.entry_hash.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access_log::model::{AccessAction, ClientInfo};
    use docshare_core::types::{AccessLogId, DocumentId, ShareId};

    fn build_chain(share_id: ShareId, n: usize) -> Vec<AccessLogEntry> {
        let mut entries: Vec<AccessLogEntry> = Vec::new();
        for i in 0..n {
            let prev = entries
                .last()
                .map(|e| e.entry_hash.clone())
                .unwrap_or_else(|| GENESIS_HASH.to_string());
            let new = NewAccessLogEntry::now(
                share_id,
                (i % 2 == 1).then(DocumentId::new),
                if i == 0 {
                    AccessAction::ViewShare
                } else {
                    AccessAction::ViewDocument
                },
                Some("ops@port.gov".to_string()),
                ClientInfo {
                    ip_address: Some("10.0.0.1".to_string()),
                    user_agent: Some("Mozilla/5.0".to_string()),
                },
            );
            entries.push(new.seal(AccessLogId::new(), i as i64, &prev));
        }
        entries
    }

    #[test]
    fn test_fresh_chain_verifies() {
        let entries = build_chain(ShareId::new(), 5);
        let result = verify_chain(&entries);
        assert!(result.valid);
        assert_eq!(result.entries, 5);
        assert_eq!(result.head_hash.as_deref(), Some(entries[4].entry_hash.as_str()));
    }

    #[test]
    fn test_empty_chain_is_valid() {
        let result = verify_chain(&[]);
        assert!(result.valid);
        assert_eq!(result.head_hash, None);
    }

    #[test]
    fn test_edited_entry_is_detected() {
        let mut entries = build_chain(ShareId::new(), 4);
        entries[2].actor_email = Some("attacker@port.gov".to_string());
        let result = verify_chain(&entries);
        assert!(!result.valid);
        assert_eq!(result.broken_at_sequence, Some(2));
    }

    #[test]
    fn test_removed_entry_is_detected() {
        let mut entries = build_chain(ShareId::new(), 4);
        entries.remove(1);
        let result = verify_chain(&entries);
        assert!(!result.valid);
        assert_eq!(result.broken_at_sequence, Some(1));
    }

    #[test]
    fn test_length_prefix_prevents_field_shifting() {
        let share_id = ShareId::new();
        let base = NewAccessLogEntry::now(
            share_id,
            None,
            AccessAction::ViewShare,
            Some("ab".to_string()),
            ClientInfo {
                ip_address: Some("c".to_string()),
                user_agent: None,
            },
        );
        let mut shifted = base.clone();
        shifted.actor_email = Some("a".to_string());
        shifted.client_ip = Some("bc".to_string());
        assert_ne!(
            compute_entry_hash(GENESIS_HASH, 0, &base),
            compute_entry_hash(GENESIS_HASH, 0, &shifted)
        );
    }
}
