//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use docshare_api::AppState;
use docshare_auth::jwt::{JwtDecoder, JwtEncoder};
use docshare_auth::rbac::UserRole;
use docshare_core::config::{AppConfig, StoreBackend};
use docshare_core::types::{DocumentId, TeamId, UserId, VesselId};
use docshare_database::memory::{MemoryAccessLogStore, MemoryCatalog, MemoryShareStore};
use docshare_entity::catalog::{DocumentSummary, VesselSummary};
use docshare_service::notification::LogDispatcher;
use docshare_service::share::{AccessLogger, ShareLifecycleService};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Service behind the router, for flushing the access logger
    pub service: Arc<ShareLifecycleService>,
    /// Access log store, for tampering in chain tests
    pub access_logs: MemoryAccessLogStore,
    /// Token minting with the test secret
    pub encoder: JwtEncoder,
    /// Seeded vessel
    pub vessel_id: VesselId,
    /// Seeded documents of the vessel
    pub documents: Vec<DocumentId>,
    /// Seeded document of another vessel
    pub foreign_document: DocumentId,
}

/// A platform user with a signed bearer token.
#[derive(Debug, Clone)]
pub struct TestUser {
    /// User id (`sub`)
    pub id: UserId,
    /// Team claim
    pub team: Option<TeamId>,
    /// Bearer token
    pub token: String,
}

impl TestApp {
    /// Create a new test application over in-memory stores
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.backend = StoreBackend::Memory;
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.share.public_base_url = "https://docs.fleet.example".to_string();
        config.access_log.retry_backoff_ms = 1;

        let catalog = MemoryCatalog::new();
        let vessel_id = VesselId::new();
        catalog.insert_vessel(VesselSummary {
            id: vessel_id,
            name: "MV Baltic Trader".to_string(),
            imo_number: Some("9405710".to_string()),
            port: Some("Gdansk".to_string()),
        });
        let documents = ["Certificate of Registry", "IOPP Certificate", "Crew List"]
            .iter()
            .map(|title| seed_document(&catalog, vessel_id, title))
            .collect();

        let other_vessel = VesselId::new();
        catalog.insert_vessel(VesselSummary {
            id: other_vessel,
            name: "MV Other".to_string(),
            imo_number: None,
            port: None,
        });
        let foreign_document = seed_document(&catalog, other_vessel, "Foreign Certificate");

        let access_logs = MemoryAccessLogStore::new();
        let logger = AccessLogger::spawn(Arc::new(access_logs.clone()), &config.access_log);

        let service = Arc::new(ShareLifecycleService::new(
            Arc::new(MemoryShareStore::new()),
            Arc::new(catalog),
            logger,
            Arc::new(LogDispatcher::new()),
            config.share.clone(),
            &config.notification,
        ));

        let encoder = JwtEncoder::new(&config.auth);
        let state = AppState {
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            config: Arc::new(config),
            db_pool: None,
            share_service: Arc::clone(&service),
        };

        Self {
            router: docshare_api::build_app(state),
            service,
            access_logs,
            encoder,
            vessel_id,
            documents,
            foreign_document,
        }
    }

    /// Mint a bearer token for a fresh platform user
    pub fn user(&self, role: UserRole, team: Option<TeamId>) -> TestUser {
        let id = UserId::new();
        let token = self
            .encoder
            .issue(id, "Chief Officer", role, team, Duration::hours(1))
            .expect("Failed to issue token");
        TestUser { id, team, token }
    }

    /// Share body for the seeded vessel with one port-authority recipient
    pub fn share_body(&self, security: Value) -> Value {
        json!({
            "vesselId": self.vessel_id,
            "documentIds": [self.documents[0], self.documents[1]],
            "recipients": [
                { "email": "ops@port.gov", "name": "Port Ops", "type": "port_authority" }
            ],
            "securityOptions": security,
            "message": "Arrival documents",
            "durationPreset": "24-hours",
        })
    }

    /// Create a share and return the `ShareCreated` body
    pub async fn create_share(&self, user: &TestUser, body: Value) -> Value {
        let response = self
            .request("POST", "/api/document-shares", Some(body), Some(&user.token))
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Share creation failed: {:?}",
            response.body
        );
        response.body
    }

    /// Wait until queued access log entries are written
    pub async fn flush_logs(&self) {
        self.service.logger().flush().await;
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .header("User-Agent", "docshare-integration")
            .header("X-Forwarded-For", "203.0.113.10, 10.0.0.2");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

fn seed_document(catalog: &MemoryCatalog, vessel_id: VesselId, title: &str) -> DocumentId {
    let id = DocumentId::new();
    catalog.insert_document(DocumentSummary {
        id,
        vessel_id,
        title: title.to_string(),
        document_type: "certificate".to_string(),
        issuer: Some("Flag State".to_string()),
        issued_on: None,
        valid_until: None,
        file_url: format!("s3://vessel-docs/{id}.pdf"),
        updated_at: Utc::now(),
    });
    id
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
