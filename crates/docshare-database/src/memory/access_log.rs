//! In-memory access log store.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use docshare_core::result::AppResult;
use docshare_core::types::{AccessLogId, ShareId};
use docshare_entity::access_log::{AccessLogEntry, GENESIS_HASH, NewAccessLogEntry};

use crate::store::AccessLogStore;

/// `DashMap`-backed [`AccessLogStore`]. One vector per share; appends hold
/// that share's entry guard while sealing.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccessLogStore {
    chains: Arc<DashMap<ShareId, Vec<AccessLogEntry>>>,
}

impl MemoryAccessLogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites a stored entry in place. Only for exercising chain
    /// verification against tampered history.
    #[doc(hidden)]
    pub fn tamper(&self, share_id: ShareId, sequence: usize, edit: impl FnOnce(&mut AccessLogEntry)) {
        if let Some(mut chain) = self.chains.get_mut(&share_id) {
            if let Some(entry) = chain.get_mut(sequence) {
                edit(entry);
            }
        }
    }
}

#[async_trait]
impl AccessLogStore for MemoryAccessLogStore {
    async fn append(&self, entry: NewAccessLogEntry) -> AppResult<AccessLogEntry> {
        let mut chain = self.chains.entry(entry.share_id).or_default();
        let prev_hash = chain
            .last()
            .map(|last| last.entry_hash.clone())
            .unwrap_or_else(|| GENESIS_HASH.to_string());
        let sealed = entry.seal(AccessLogId::new(), chain.len() as i64, &prev_hash);
        chain.push(sealed.clone());
        Ok(sealed)
    }

    async fn list_for_share(&self, share_id: ShareId) -> AppResult<Vec<AccessLogEntry>> {
        Ok(self
            .chains
            .get(&share_id)
            .map(|chain| chain.value().clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docshare_entity::access_log::{AccessAction, ClientInfo, verify_chain};

    fn event(share_id: ShareId, action: AccessAction) -> NewAccessLogEntry {
        NewAccessLogEntry::now(
            share_id,
            None,
            action,
            Some("agent@shipping.co".to_string()),
            ClientInfo::default(),
        )
    }

    #[tokio::test]
    async fn test_append_links_entries() {
        let store = MemoryAccessLogStore::new();
        let share = ShareId::new();

        let first = store.append(event(share, AccessAction::ViewShare)).await.unwrap();
        let second = store.append(event(share, AccessAction::Download)).await.unwrap();

        assert_eq!(first.sequence, 0);
        assert_eq!(first.prev_hash, GENESIS_HASH);
        assert_eq!(second.sequence, 1);
        assert_eq!(second.prev_hash, first.entry_hash);

        let entries = store.list_for_share(share).await.unwrap();
        assert!(verify_chain(&entries).valid);
    }

    #[tokio::test]
    async fn test_chains_are_per_share() {
        let store = MemoryAccessLogStore::new();
        let a = ShareId::new();
        let b = ShareId::new();
        store.append(event(a, AccessAction::ViewShare)).await.unwrap();
        let first_b = store.append(event(b, AccessAction::ViewShare)).await.unwrap();
        assert_eq!(first_b.sequence, 0);
        assert!(store.list_for_share(ShareId::new()).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_keep_chain_intact() {
        let store = MemoryAccessLogStore::new();
        let share = ShareId::new();
        let mut handles = Vec::new();
        for _ in 0..64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append(event(share, AccessAction::ViewDocument)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let entries = store.list_for_share(share).await.unwrap();
        assert_eq!(entries.len(), 64);
        let verification = verify_chain(&entries);
        assert!(verification.valid);
        assert_eq!(verification.entries, 64);
    }

    #[tokio::test]
    async fn test_tampering_is_detected() {
        let store = MemoryAccessLogStore::new();
        let share = ShareId::new();
        for _ in 0..3 {
            store.append(event(share, AccessAction::ViewShare)).await.unwrap();
        }
        store.tamper(share, 1, |entry| {
            entry.actor_email = Some("someone-else@shipping.co".to_string())
        });

        let verification = verify_chain(&store.list_for_share(share).await.unwrap());
        assert!(!verification.valid);
        assert_eq!(verification.broken_at_sequence, Some(1));
    }
}
