//! Catalog summaries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docshare_core::types::{DocumentId, VesselId};

/// Display data for a vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VesselSummary {
    /// Vessel identifier.
    pub id: VesselId,
    /// Vessel name.
    pub name: String,
    /// IMO number, when registered.
    pub imo_number: Option<String>,
    /// Port of registry.
    pub port: Option<String>,
}

/// Metadata for one vessel document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    /// Document identifier.
    pub id: DocumentId,
    /// Owning vessel.
    pub vessel_id: VesselId,
    /// Title (e.g. "International Load Line Certificate").
    pub title: String,
    /// Category (e.g. "certificate", "survey").
    pub document_type: String,
    /// Issuing authority.
    pub issuer: Option<String>,
    /// Issue date.
    pub issued_on: Option<NaiveDate>,
    /// Certificate validity end.
    pub valid_until: Option<NaiveDate>,
    /// Storage location of the file; only handed out through a gated
    /// document action.
    #[serde(skip_serializing)]
    pub file_url: String,
    /// Last catalog update.
    pub updated_at: DateTime<Utc>,
}
