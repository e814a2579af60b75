//! Store traits the service layer depends on.
//!
//! Every mutation is atomic per record: implementations either run a
//! single conditional statement or hold the record's write guard for the
//! whole read-check-write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_core::types::{DocumentId, ShareId, VesselId};
use docshare_entity::access_log::{AccessLogEntry, NewAccessLogEntry};
use docshare_entity::catalog::{DocumentSummary, VesselSummary};
use docshare_entity::share::{NewShare, Share};

/// Per-id result of a batch revocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRevokeOutcome {
    /// Ids that are now revoked (including ones that already were).
    pub revoked: Vec<ShareId>,
    /// Ids that could not be revoked.
    pub failed: Vec<ShareId>,
}

/// Durable share records.
#[async_trait]
pub trait ShareStore: Send + Sync + std::fmt::Debug + 'static {
    /// Inserts a new share. Rejects empty bundles and recipient lists with
    /// `InvalidShareSpec` and duplicate tokens with `Conflict`.
    async fn create(&self, share: NewShare) -> AppResult<Share>;

    /// Looks a share up by its public token.
    async fn get_by_token(&self, token: &str) -> AppResult<Share>;

    /// Looks a share up by id.
    async fn get_by_id(&self, id: ShareId) -> AppResult<Share>;

    /// Revokes a share. Revoking an already revoked share returns it
    /// unchanged.
    async fn revoke(&self, id: ShareId) -> AppResult<Share>;

    /// Moves the expiry forward. Fails with `ExpiryMustIncrease` when
    /// `new_expires_at` is not after the current expiry and with
    /// `ShareRevoked` when the share is revoked.
    async fn extend(&self, id: ShareId, new_expires_at: DateTime<Utc>) -> AppResult<Share>;

    /// All shares of a vessel, newest first.
    async fn list_by_vessel(&self, vessel_id: VesselId) -> AppResult<Vec<Share>>;

    /// Revokes each id independently; one failure does not stop the rest.
    async fn batch_revoke(&self, ids: &[ShareId]) -> AppResult<BatchRevokeOutcome> {
        let mut outcome = BatchRevokeOutcome::default();
        for id in ids {
            match self.revoke(*id).await {
                Ok(_) => outcome.revoked.push(*id),
                Err(e) => {
                    warn!(share_id = %id, error = %e, "Batch revoke entry failed");
                    outcome.failed.push(*id);
                }
            }
        }
        Ok(outcome)
    }
}

/// Append-only, hash-chained access history.
#[async_trait]
pub trait AccessLogStore: Send + Sync + std::fmt::Debug + 'static {
    /// Appends an entry to the end of its share's chain.
    async fn append(&self, entry: NewAccessLogEntry) -> AppResult<AccessLogEntry>;

    /// A share's entries in append order.
    async fn list_for_share(&self, share_id: ShareId) -> AppResult<Vec<AccessLogEntry>>;
}

/// Read-only access to the platform's vessel and document catalog.
#[async_trait]
pub trait DocumentCatalog: Send + Sync + std::fmt::Debug + 'static {
    /// Looks up display data for a vessel.
    async fn find_vessel(&self, id: VesselId) -> AppResult<Option<VesselSummary>>;

    /// Returns the documents of `vessel_id` among `ids`, in the order of
    /// `ids`. Unknown ids and documents of other vessels are omitted.
    async fn find_documents(
        &self,
        vessel_id: VesselId,
        ids: &[DocumentId],
    ) -> AppResult<Vec<DocumentSummary>>;
}

/// Shared validation applied by every [`ShareStore::create`] implementation.
pub fn validate_new_share(share: &NewShare) -> AppResult<()> {
    if share.document_ids.is_empty() {
        return Err(AppError::invalid_share_spec(
            "A share must include at least one document",
        ));
    }
    if share.recipients.is_empty() {
        return Err(AppError::invalid_share_spec(
            "A share must include at least one recipient",
        ));
    }
    if share.token.is_empty() {
        return Err(AppError::internal("Share token was not generated"));
    }
    Ok(())
}

/// Classifies why a conditional extend matched no row.
pub fn extend_rejection(current: &Share, new_expires_at: DateTime<Utc>) -> AppError {
    if current.is_revoked {
        AppError::share_revoked("A revoked share cannot be extended")
    } else if new_expires_at <= current.expires_at {
        AppError::expiry_must_increase(format!(
            "New expiry must be after the current expiry ({})",
            current.expires_at.to_rfc3339()
        ))
    } else {
        AppError::conflict("Share was modified concurrently")
    }
}
