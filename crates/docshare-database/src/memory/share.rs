//! In-memory share store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_core::types::{ShareId, VesselId};
use docshare_entity::share::{NewShare, Share};

use crate::store::{ShareStore, extend_rejection, validate_new_share};

/// `DashMap`-backed [`ShareStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryShareStore {
    shares: Arc<DashMap<ShareId, Share>>,
    tokens: Arc<DashMap<String, ShareId>>,
}

impl MemoryShareStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored shares.
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Whether the store holds no shares.
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

#[async_trait]
impl ShareStore for MemoryShareStore {
    async fn create(&self, data: NewShare) -> AppResult<Share> {
        validate_new_share(&data)?;

        match self.tokens.entry(data.token.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict("Share token already issued")),
            Entry::Vacant(slot) => {
                let share = data.into_share(Utc::now());
                slot.insert(share.id);
                self.shares.insert(share.id, share.clone());
                debug!(share_id = %share.id, "Share stored");
                Ok(share)
            }
        }
    }

    async fn get_by_token(&self, token: &str) -> AppResult<Share> {
        let id = self
            .tokens
            .get(token)
            .map(|entry| *entry.value())
            .ok_or_else(|| AppError::not_found("Share not found"))?;
        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: ShareId) -> AppResult<Share> {
        self.shares
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found("Share not found"))
    }

    async fn revoke(&self, id: ShareId) -> AppResult<Share> {
        let mut share = self
            .shares
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Share not found"))?;
        if !share.is_revoked {
            share.is_revoked = true;
            share.revoked_at = Some(Utc::now());
            share.version += 1;
        }
        Ok(share.clone())
    }

    async fn extend(&self, id: ShareId, new_expires_at: DateTime<Utc>) -> AppResult<Share> {
        let mut share = self
            .shares
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Share not found"))?;
        if share.is_revoked || new_expires_at <= share.expires_at {
            return Err(extend_rejection(&share, new_expires_at));
        }
        share.expires_at = new_expires_at;
        share.version += 1;
        Ok(share.clone())
    }

    async fn list_by_vessel(&self, vessel_id: VesselId) -> AppResult<Vec<Share>> {
        let mut shares: Vec<Share> = self
            .shares
            .iter()
            .filter(|entry| entry.vessel_id == vessel_id)
            .map(|entry| entry.value().clone())
            .collect();
        shares.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(shares)
    }
}
