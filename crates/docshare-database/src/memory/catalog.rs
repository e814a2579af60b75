//! In-memory vessel and document catalog.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use tracing::info;

use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_core::types::{DocumentId, VesselId};
use docshare_entity::catalog::{DocumentSummary, VesselSummary};

use crate::store::DocumentCatalog;

/// Catalog contents as read from a seed file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub vessels: Vec<VesselSummary>,
    #[serde(default)]
    pub documents: Vec<DocumentSummary>,
}

/// `DashMap`-backed [`DocumentCatalog`], seeded by the caller.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    vessels: Arc<DashMap<VesselId, VesselSummary>>,
    documents: Arc<DashMap<DocumentId, DocumentSummary>>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding everything in `seed`.
    pub fn from_seed(seed: CatalogSeed) -> Self {
        let catalog = Self::new();
        for vessel in seed.vessels {
            catalog.insert_vessel(vessel);
        }
        for document in seed.documents {
            catalog.insert_document(document);
        }
        catalog
    }

    /// Reads a JSON [`CatalogSeed`] from `path`.
    pub fn load_seed_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to read catalog seed {}", path.display()),
                e,
            )
        })?;
        let seed: CatalogSeed = serde_json::from_str(&raw).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid catalog seed {}", path.display()),
                e,
            )
        })?;

        let catalog = Self::from_seed(seed);
        info!(
            path = %path.display(),
            vessels = catalog.vessels.len(),
            documents = catalog.documents.len(),
            "Catalog seed loaded"
        );
        Ok(catalog)
    }

    /// Adds or replaces a vessel.
    pub fn insert_vessel(&self, vessel: VesselSummary) {
        self.vessels.insert(vessel.id, vessel);
    }

    /// Adds or replaces a document.
    pub fn insert_document(&self, document: DocumentSummary) {
        self.documents.insert(document.id, document);
    }
}

#[async_trait]
impl DocumentCatalog for MemoryCatalog {
    async fn find_vessel(&self, id: VesselId) -> AppResult<Option<VesselSummary>> {
        Ok(self.vessels.get(&id).map(|v| v.value().clone()))
    }

    async fn find_documents(
        &self,
        vessel_id: VesselId,
        ids: &[DocumentId],
    ) -> AppResult<Vec<DocumentSummary>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.documents.get(id))
            .filter(|doc| doc.vessel_id == vessel_id)
            .map(|doc| doc.value().clone())
            .collect())
    }
}
