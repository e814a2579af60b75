//! Integration tests for access logging and hash chain verification.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

use docshare_auth::rbac::UserRole;
use docshare_core::types::ShareId;

use helpers::{TestApp, TestUser};

async fn access_logs(app: &TestApp, owner: &TestUser, id: &str) -> Vec<Value> {
    app.flush_logs().await;
    let response = app
        .request(
            "GET",
            &format!("/api/document-shares/{id}/access-logs"),
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.body.as_array().cloned().unwrap_or_default()
}

#[tokio::test]
async fn test_recipient_reads_are_logged_in_order() {
    let app = TestApp::new();
    let owner = app.user(UserRole::Member, None);
    let created = app.create_share(&owner, app.share_body(json!({}))).await;
    let token = created["token"].as_str().unwrap();
    let id = created["id"].as_str().unwrap();
    let doc = app.documents[1];

    app.request(
        "GET",
        &format!("/api/document-shares/{token}?email=ops@port.gov"),
        None,
        None,
    )
    .await;
    for action in ["view_document", "download"] {
        let response = app
            .request(
                "POST",
                &format!("/api/document-shares/{token}/documents/{doc}"),
                Some(json!({ "action": action, "recipientEmail": "ops@port.gov" })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let entries = access_logs(&app, &owner, id).await;
    let actions: Vec<&str> = entries
        .iter()
        .filter_map(|e| e["action"].as_str())
        .collect();
    assert_eq!(actions, vec!["view_share", "view_document", "download"]);

    let sequences: Vec<i64> = entries.iter().filter_map(|e| e["sequence"].as_i64()).collect();
    assert_eq!(sequences, vec![0, 1, 2]);

    assert_eq!(entries[0]["documentId"], Value::Null);
    assert_eq!(entries[1]["documentId"], json!(doc));
    assert_eq!(entries[1]["actorEmail"], "ops@port.gov");
    assert_eq!(entries[1]["clientIp"], "203.0.113.10");
    assert_eq!(entries[1]["userAgent"], "docshare-integration");
    assert_eq!(entries[1]["prevHash"], entries[0]["entryHash"]);
}

#[tokio::test]
async fn test_denied_requests_are_not_logged() {
    let app = TestApp::new();
    let owner = app.user(UserRole::Member, None);
    let created = app
        .create_share(
            &owner,
            app.share_body(json!({ "emailVerification": true, "preventDownloads": true })),
        )
        .await;
    let token = created["token"].as_str().unwrap();
    let id = created["id"].as_str().unwrap();

    app.request("GET", &format!("/api/document-shares/{token}"), None, None)
        .await;
    app.request(
        "GET",
        &format!("/api/document-shares/{token}?email=intruder@example.com"),
        None,
        None,
    )
    .await;
    let blocked = app
        .request(
            "POST",
            &format!("/api/document-shares/{token}/documents/{}", app.documents[0]),
            Some(json!({ "action": "download", "recipientEmail": "ops@port.gov" })),
            None,
        )
        .await;
    assert_eq!(blocked.status, StatusCode::FORBIDDEN);

    assert!(access_logs(&app, &owner, id).await.is_empty());
}

#[tokio::test]
async fn test_client_reported_events() {
    let app = TestApp::new();
    let owner = app.user(UserRole::Member, None);
    let created = app.create_share(&owner, app.share_body(json!({}))).await;
    let id = created["id"].as_str().unwrap();

    let accepted = app
        .request(
            "POST",
            "/api/document-access-logs",
            Some(json!({
                "shareId": id,
                "documentId": app.documents[0],
                "action": "view_document",
                "recipientEmail": "ops@port.gov",
            })),
            None,
        )
        .await;
    assert_eq!(accepted.status, StatusCode::OK);
    assert_eq!(accepted.body, json!({ "success": true }));

    let unknown_share = app
        .request(
            "POST",
            "/api/document-access-logs",
            Some(json!({ "shareId": ShareId::new(), "action": "view_share" })),
            None,
        )
        .await;
    assert_eq!(unknown_share.body, json!({ "success": true }));

    let foreign_document = app
        .request(
            "POST",
            "/api/document-access-logs",
            Some(json!({
                "shareId": id,
                "documentId": app.foreign_document,
                "action": "download",
            })),
            None,
        )
        .await;
    assert_eq!(foreign_document.body, json!({ "success": true }));

    let malformed = app
        .request(
            "POST",
            "/api/document-access-logs",
            Some(json!({ "action": 42 })),
            None,
        )
        .await;
    assert_eq!(malformed.status, StatusCode::OK);
    assert_eq!(malformed.body, json!({ "success": true }));

    let entries = access_logs(&app, &owner, id).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "view_document");
}

#[tokio::test]
async fn test_chain_verification_detects_tampering() {
    let app = TestApp::new();
    let owner = app.user(UserRole::Member, None);
    let created = app.create_share(&owner, app.share_body(json!({}))).await;
    let token = created["token"].as_str().unwrap();
    let id = created["id"].as_str().unwrap();

    for _ in 0..3 {
        app.request("GET", &format!("/api/document-shares/{token}"), None, None)
            .await;
    }
    app.flush_logs().await;

    let verify_path = format!("/api/document-shares/{id}/access-logs/verify");
    let clean = app
        .request("GET", &verify_path, None, Some(&owner.token))
        .await;
    assert_eq!(clean.status, StatusCode::OK);
    assert_eq!(clean.body["valid"], true);
    assert_eq!(clean.body["entries"], 3);

    let share_id: ShareId = id.parse().expect("share id");
    app.access_logs.tamper(share_id, 1, |entry| {
        entry.actor_email = Some("someone-else@example.com".to_string());
    });

    let tampered = app
        .request("GET", &verify_path, None, Some(&owner.token))
        .await;
    assert_eq!(tampered.body["valid"], false);
    assert_eq!(tampered.body["brokenAtSequence"], 1);
}

#[tokio::test]
async fn test_access_logs_require_share_manager() {
    let app = TestApp::new();
    let owner = app.user(UserRole::Member, None);
    let stranger = app.user(UserRole::Member, None);
    let created = app.create_share(&owner, app.share_body(json!({}))).await;
    let id = created["id"].as_str().unwrap();

    for path in [
        format!("/api/document-shares/{id}/access-logs"),
        format!("/api/document-shares/{id}/access-logs/verify"),
    ] {
        let response = app.request("GET", &path, None, Some(&stranger.token)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
    }
}
