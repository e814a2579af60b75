//! Vessel and document catalog lookups.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_core::types::{DocumentId, VesselId};
use docshare_entity::catalog::{DocumentSummary, VesselSummary};

use crate::store::DocumentCatalog;

/// Reads the `vessels` and `vessel_documents` tables owned by the wider
/// platform.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    /// Create a new catalog repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentCatalog for CatalogRepository {
    async fn find_vessel(&self, id: VesselId) -> AppResult<Option<VesselSummary>> {
        sqlx::query_as::<_, VesselSummary>(
            "SELECT id, name, imo_number, port FROM vessels WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find vessel", e))
    }

    async fn find_documents(
        &self,
        vessel_id: VesselId,
        ids: &[DocumentId],
    ) -> AppResult<Vec<DocumentSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();

        // Keep the caller's order.
        sqlx::query_as::<_, DocumentSummary>(
            "SELECT d.id, d.vessel_id, d.title, d.document_type, d.issuer, d.issued_on, \
             d.valid_until, d.file_url, d.updated_at \
             FROM UNNEST($2::uuid[]) WITH ORDINALITY AS wanted(id, ord) \
             JOIN vessel_documents d ON d.id = wanted.id \
             WHERE d.vessel_id = $1 \
             ORDER BY wanted.ord",
        )
        .bind(vessel_id)
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load documents", e))
    }
}
