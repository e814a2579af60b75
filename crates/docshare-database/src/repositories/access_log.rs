//! Access log repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_core::types::{AccessLogId, ShareId};
use docshare_entity::access_log::{AccessLogEntry, GENESIS_HASH, NewAccessLogEntry};

use crate::store::AccessLogStore;

/// PostgreSQL-backed [`AccessLogStore`].
///
/// Appends take a transaction-scoped advisory lock keyed on the share so
/// that concurrent writers (several server instances) extend the chain one
/// at a time. The table has no UPDATE or DELETE path.
#[derive(Debug, Clone)]
pub struct AccessLogRepository {
    pool: PgPool,
}

impl AccessLogRepository {
    /// Create a new access log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessLogStore for AccessLogRepository {
    async fn append(&self, entry: NewAccessLogEntry) -> AppResult<AccessLogEntry> {
        let db_err = |msg: &'static str| move |e| AppError::with_source(ErrorKind::Database, msg, e);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to open access log transaction"))?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(entry.share_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to lock access log chain"))?;

        let head: Option<(i64, String)> = sqlx::query_as(
            "SELECT sequence, entry_hash FROM share_access_logs \
             WHERE share_id = $1 ORDER BY sequence DESC LIMIT 1",
        )
        .bind(entry.share_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err("Failed to read access log head"))?;

        let (sequence, prev_hash) = match head {
            Some((seq, hash)) => (seq + 1, hash),
            None => (0, GENESIS_HASH.to_string()),
        };
        let sealed = entry.seal(AccessLogId::new(), sequence, &prev_hash);

        let stored = sqlx::query_as::<_, AccessLogEntry>(
            "INSERT INTO share_access_logs (id, share_id, sequence, document_id, action, actor_email, \
             occurred_at, client_ip, user_agent, prev_hash, entry_hash) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(sealed.id)
        .bind(sealed.share_id)
        .bind(sealed.sequence)
        .bind(sealed.document_id)
        .bind(sealed.action)
        .bind(&sealed.actor_email)
        .bind(sealed.timestamp)
        .bind(&sealed.client_ip)
        .bind(&sealed.user_agent)
        .bind(&sealed.prev_hash)
        .bind(&sealed.entry_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to append access log entry"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit access log entry"))?;

        Ok(stored)
    }

    async fn list_for_share(&self, share_id: ShareId) -> AppResult<Vec<AccessLogEntry>> {
        sqlx::query_as::<_, AccessLogEntry>(
            "SELECT * FROM share_access_logs WHERE share_id = $1 ORDER BY sequence ASC",
        )
        .bind(share_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list access logs", e))
    }
}
