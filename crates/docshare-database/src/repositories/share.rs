//! Share repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_core::types::{DocumentId, ShareId, TeamId, UserId, VesselId};
use docshare_entity::share::{NewShare, Recipient, SecurityOptions, Share};

use crate::store::{ShareStore, extend_rejection, validate_new_share};

/// Row shape of `document_shares`.
#[derive(Debug, FromRow)]
struct ShareRow {
    id: Uuid,
    token: String,
    vessel_id: Uuid,
    document_ids: Vec<Uuid>,
    recipients: Json<Vec<Recipient>>,
    security_options: Json<SecurityOptions>,
    message: Option<String>,
    expires_at: DateTime<Utc>,
    is_revoked: bool,
    revoked_at: Option<DateTime<Utc>>,
    created_by: Uuid,
    created_by_name: String,
    team_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    version: i64,
}

impl From<ShareRow> for Share {
    fn from(row: ShareRow) -> Self {
        Self {
            id: ShareId::from_uuid(row.id),
            token: row.token,
            vessel_id: VesselId::from_uuid(row.vessel_id),
            document_ids: row.document_ids.into_iter().map(DocumentId::from).collect(),
            recipients: row.recipients.0,
            security_options: row.security_options.0,
            message: row.message,
            expires_at: row.expires_at,
            is_revoked: row.is_revoked,
            revoked_at: row.revoked_at,
            created_by: UserId::from_uuid(row.created_by),
            created_by_name: row.created_by_name,
            team_id: row.team_id.map(TeamId::from_uuid),
            created_at: row.created_at,
            version: row.version,
        }
    }
}

/// PostgreSQL-backed [`ShareStore`].
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: PgPool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_id(&self, id: ShareId) -> AppResult<Option<Share>> {
        sqlx::query_as::<_, ShareRow>("SELECT * FROM document_shares WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Share::from))
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share", e))
    }
}

#[async_trait]
impl ShareStore for ShareRepository {
    async fn create(&self, data: NewShare) -> AppResult<Share> {
        validate_new_share(&data)?;

        let document_ids: Vec<Uuid> = data.document_ids.iter().map(|d| d.into_uuid()).collect();

        sqlx::query_as::<_, ShareRow>(
            "INSERT INTO document_shares (id, token, vessel_id, document_ids, recipients, \
             security_options, message, expires_at, created_by, created_by_name, team_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(ShareId::new())
        .bind(&data.token)
        .bind(data.vessel_id)
        .bind(&document_ids)
        .bind(Json(&data.recipients))
        .bind(Json(&data.security_options))
        .bind(&data.message)
        .bind(data.expires_at)
        .bind(data.created_by)
        .bind(&data.created_by_name)
        .bind(data.team_id)
        .fetch_one(&self.pool)
        .await
        .map(Share::from)
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::with_source(ErrorKind::Conflict, "Share token already issued", e)
            }
            e => AppError::with_source(ErrorKind::Database, "Failed to create share", e),
        })
    }

    async fn get_by_token(&self, token: &str) -> AppResult<Share> {
        sqlx::query_as::<_, ShareRow>("SELECT * FROM document_shares WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find share by token", e)
            })?
            .map(Share::from)
            .ok_or_else(|| AppError::not_found("Share not found"))
    }

    async fn get_by_id(&self, id: ShareId) -> AppResult<Share> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))
    }

    async fn revoke(&self, id: ShareId) -> AppResult<Share> {
        let updated = sqlx::query_as::<_, ShareRow>(
            "UPDATE document_shares SET is_revoked = TRUE, revoked_at = NOW(), version = version + 1 \
             WHERE id = $1 AND is_revoked = FALSE RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke share", e))?;

        match updated {
            Some(row) => Ok(row.into()),
            // Already revoked (returned unchanged) or unknown.
            None => self.get_by_id(id).await,
        }
    }

    async fn extend(&self, id: ShareId, new_expires_at: DateTime<Utc>) -> AppResult<Share> {
        let updated = sqlx::query_as::<_, ShareRow>(
            "UPDATE document_shares SET expires_at = $2, version = version + 1 \
             WHERE id = $1 AND is_revoked = FALSE AND expires_at < $2 RETURNING *",
        )
        .bind(id)
        .bind(new_expires_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to extend share", e))?;

        match updated {
            Some(row) => Ok(row.into()),
            None => {
                let current = self.get_by_id(id).await?;
                Err(extend_rejection(&current, new_expires_at))
            }
        }
    }

    async fn list_by_vessel(&self, vessel_id: VesselId) -> AppResult<Vec<Share>> {
        sqlx::query_as::<_, ShareRow>(
            "SELECT * FROM document_shares WHERE vessel_id = $1 ORDER BY created_at DESC",
        )
        .bind(vessel_id)
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(Share::from).collect())
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list shares", e))
    }
}
