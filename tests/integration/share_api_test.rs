//! Integration tests for share creation, recipient resolution and owner
//! management.

mod helpers;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use docshare_auth::rbac::UserRole;
use docshare_core::types::{ShareId, TeamId};

use helpers::TestApp;

fn expiry(body: &serde_json::Value) -> DateTime<Utc> {
    body["expiresAt"]
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
        .expect("expiresAt")
}

#[tokio::test]
async fn test_email_gated_share_lifecycle() {
    let app = TestApp::new();
    let owner = app.user(UserRole::Member, Some(TeamId::new()));

    let created = app
        .create_share(&owner, app.share_body(json!({ "emailVerification": true })))
        .await;
    let token = created["token"].as_str().expect("token").to_string();
    let id = created["id"].as_str().expect("id").to_string();
    assert_eq!(
        created["shareUrl"],
        format!("https://docs.fleet.example/share/{token}")
    );
    let minutes = (expiry(&created) - Utc::now()).num_minutes();
    assert!((23 * 60..=24 * 60).contains(&minutes));

    let gated = app
        .request("GET", &format!("/api/document-shares/{token}"), None, None)
        .await;
    assert_eq!(gated.status, StatusCode::OK);
    assert_eq!(gated.body, json!({ "requiresEmailVerification": true }));

    let view = app
        .request(
            "GET",
            &format!("/api/document-shares/{token}?email=OPS@port.gov"),
            None,
            None,
        )
        .await;
    assert_eq!(view.status, StatusCode::OK);
    assert_eq!(view.body["vesselName"], "MV Baltic Trader");
    assert_eq!(view.body["documents"].as_array().map(Vec::len), Some(2));
    assert_eq!(view.body["documents"][0]["title"], "Certificate of Registry");
    assert!(view.body["documents"][0].get("fileUrl").is_none());
    assert_eq!(view.body["canDownload"], true);
    assert_eq!(view.body["senderName"], "Chief Officer");

    let rejected = app
        .request(
            "GET",
            &format!("/api/document-shares/{token}?email=someone@else.com"),
            None,
            None,
        )
        .await;
    assert_eq!(rejected.status, StatusCode::FORBIDDEN);
    assert_eq!(rejected.body["error"], "EMAIL_NOT_AUTHORIZED");
    assert_eq!(rejected.body["requiresEmailVerification"], true);
    assert!(!rejected.body.to_string().contains("someone@else.com"));

    let revoked = app
        .request(
            "POST",
            &format!("/api/document-shares/{id}/revoke"),
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(revoked.status, StatusCode::OK);
    assert_eq!(revoked.body["status"], "revoked");
    assert_eq!(revoked.body["isRevoked"], true);

    let dead = app
        .request(
            "GET",
            &format!("/api/document-shares/{token}?email=ops@port.gov"),
            None,
            None,
        )
        .await;
    assert_eq!(dead.status, StatusCode::GONE);
    assert_eq!(dead.body["expired"], true);
    assert_eq!(dead.body["revoked"], true);
    assert_eq!(dead.body["shareInfo"]["vesselName"], "MV Baltic Trader");
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let app = TestApp::new();
    let owner = app.user(UserRole::Member, None);
    let created = app.create_share(&owner, app.share_body(json!({}))).await;
    let path = format!("/api/document-shares/{}/revoke", created["id"].as_str().unwrap());

    let first = app.request("POST", &path, None, Some(&owner.token)).await;
    let second = app.request("POST", &path, None, Some(&owner.token)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(first.body["revokedAt"], second.body["revokedAt"]);
}

#[tokio::test]
async fn test_create_requires_bearer_token() {
    let app = TestApp::new();
    let body = app.share_body(json!({}));

    let missing = app
        .request("POST", "/api/document-shares", Some(body.clone()), None)
        .await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["error"], "AUTHENTICATION");

    let forged = app
        .request("POST", "/api/document-shares", Some(body), Some("not.a.jwt"))
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_share_specs_are_rejected() {
    let app = TestApp::new();
    let owner = app.user(UserRole::Member, None);

    let mut no_documents = app.share_body(json!({}));
    no_documents["documentIds"] = json!([]);

    let mut no_recipients = app.share_body(json!({}));
    no_recipients["recipients"] = json!([]);

    let mut two_expiries = app.share_body(json!({}));
    two_expiries["expiresAt"] = json!(Utc::now() + Duration::days(2));

    let mut foreign = app.share_body(json!({}));
    foreign["documentIds"] = json!([app.documents[0], app.foreign_document]);

    let mut bad_email = app.share_body(json!({}));
    bad_email["recipients"] = json!([{ "email": "harbour master" }]);

    for body in [no_documents, no_recipients, two_expiries, foreign, bad_email] {
        let response = app
            .request("POST", "/api/document-shares", Some(body), Some(&owner.token))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{:?}", response.body);
        assert_eq!(response.body["error"], "INVALID_SHARE_SPEC");
    }
}

#[tokio::test]
async fn test_unknown_token_is_not_found() {
    let app = TestApp::new();
    let response = app
        .request("GET", "/api/document-shares/no-such-token", None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({ "notFound": true }));
}

#[tokio::test]
async fn test_download_blocked_while_view_allowed() {
    let app = TestApp::new();
    let owner = app.user(UserRole::Member, None);
    let created = app
        .create_share(
            &owner,
            app.share_body(json!({ "preventDownloads": true, "watermark": true })),
        )
        .await;
    let token = created["token"].as_str().unwrap();
    let doc = app.documents[0];

    let view = app
        .request(
            "POST",
            &format!("/api/document-shares/{token}/documents/{doc}"),
            Some(json!({ "action": "view_document", "recipientEmail": "ops@port.gov" })),
            None,
        )
        .await;
    assert_eq!(view.status, StatusCode::OK);
    assert_eq!(view.body["fileUrl"], format!("s3://vessel-docs/{doc}.pdf"));
    assert_eq!(view.body["watermark"], true);

    let download = app
        .request(
            "POST",
            &format!("/api/document-shares/{token}/documents/{doc}"),
            Some(json!({ "action": "download" })),
            None,
        )
        .await;
    assert_eq!(download.status, StatusCode::FORBIDDEN);
    assert_eq!(download.body["error"], "DOWNLOADS_DISABLED");

    let outside = app
        .request(
            "POST",
            &format!(
                "/api/document-shares/{token}/documents/{}",
                app.documents[2]
            ),
            Some(json!({ "action": "view_document" })),
            None,
        )
        .await;
    assert_eq!(outside.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_extend_rules() {
    let app = TestApp::new();
    let owner = app.user(UserRole::Member, None);
    let created = app.create_share(&owner, app.share_body(json!({}))).await;
    let path = format!("/api/document-shares/{}/extend", created["id"].as_str().unwrap());
    let current = expiry(&created);

    let backwards = app
        .request(
            "POST",
            &path,
            Some(json!({ "expiresAt": current - Duration::hours(2) })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(backwards.status, StatusCode::BAD_REQUEST);
    assert_eq!(backwards.body["error"], "EXPIRY_MUST_INCREASE");

    let later = current + Duration::days(30);
    let extended = app
        .request(
            "POST",
            &path,
            Some(json!({ "expiresAt": later })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(extended.status, StatusCode::OK);
    assert_eq!(expiry(&extended.body), later);
    assert_eq!(extended.body["status"], "active");

    app.request(
        "POST",
        &format!("/api/document-shares/{}/revoke", created["id"].as_str().unwrap()),
        None,
        Some(&owner.token),
    )
    .await;
    let after_revoke = app
        .request(
            "POST",
            &path,
            Some(json!({ "expiresAt": later + Duration::days(1) })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(after_revoke.status, StatusCode::GONE);
    assert_eq!(after_revoke.body["error"], "SHARE_REVOKED");
}

#[tokio::test]
async fn test_management_authorization() {
    let app = TestApp::new();
    let team = TeamId::new();
    let owner = app.user(UserRole::Member, Some(team));
    let outsider = app.user(UserRole::Member, Some(TeamId::new()));
    let team_manager = app.user(UserRole::Manager, Some(team));
    let admin = app.user(UserRole::Admin, None);

    let created = app.create_share(&owner, app.share_body(json!({}))).await;
    let id = created["id"].as_str().unwrap();

    let denied = app
        .request(
            "GET",
            &format!("/api/document-shares/by-id/{id}"),
            None,
            Some(&outsider.token),
        )
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.body["error"], "AUTHORIZATION");

    let listing = format!("/api/vessels/{}/document-shares", app.vessel_id);
    let outsider_list = app.request("GET", &listing, None, Some(&outsider.token)).await;
    assert_eq!(outsider_list.body, json!([]));
    let manager_list = app
        .request("GET", &listing, None, Some(&team_manager.token))
        .await;
    assert_eq!(manager_list.body.as_array().map(Vec::len), Some(1));
    assert_eq!(manager_list.body[0]["status"], "active");

    let fetched = app
        .request(
            "GET",
            &format!("/api/document-shares/by-id/{id}"),
            None,
            Some(&admin.token),
        )
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["shareUrl"], created["shareUrl"]);
}

#[tokio::test]
async fn test_batch_revoke_reports_failures() {
    let app = TestApp::new();
    let owner = app.user(UserRole::Member, None);
    let first = app.create_share(&owner, app.share_body(json!({}))).await;
    let second = app.create_share(&owner, app.share_body(json!({}))).await;
    let missing = ShareId::new();

    let response = app
        .request(
            "POST",
            "/api/document-shares/batch-revoke",
            Some(json!({ "ids": [first["id"], missing, second["id"]] })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["revoked"], json!([first["id"], second["id"]]));
    assert_eq!(response.body["failed"], json!([missing]));

    let dead = app
        .request(
            "GET",
            &format!("/api/document-shares/{}", first["token"].as_str().unwrap()),
            None,
            None,
        )
        .await;
    assert_eq!(dead.status, StatusCode::GONE);
}

#[tokio::test]
async fn test_send_share_email() {
    let app = TestApp::new();
    let owner = app.user(UserRole::Member, None);
    let created = app.create_share(&owner, app.share_body(json!({}))).await;

    let response = app
        .request(
            "POST",
            "/api/send-document-share-email",
            Some(json!({ "shareId": created["id"] })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({ "totalSent": 1, "totalFailed": 0, "failures": [] })
    );
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"], "memory");
}
