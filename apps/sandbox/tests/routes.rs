//! Register API routes exercised through the full router.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use ctn::domain::config::SandboxConfig;
use ctn_sandbox::router;
use ctn_sandbox::state::SandboxState;
use serde_json::{Value, json};
use tower::ServiceExt;

const ADMIN: &str = "Bearer session-admin";
const READONLY: &str = "Bearer readonly-auditor";

fn app() -> Router {
    let state = SandboxState::new(SandboxConfig::default()).expect("fixtures load");
    router::init(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("router responds");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).expect("json body") };
    (status, json)
}

fn get(uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, auth)
        .header("x-portal-user", "admin@ctn.example")
        .body(Body::empty())
        .expect("request")
}

fn send_json(method: Method, uri: &str, auth: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, auth)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-portal-user", "admin@ctn.example")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn acme(app: &Router) -> Value {
    let (_, members) = send(app, get("/api/v1/members", ADMIN)).await;
    members
        .as_array()
        .and_then(|all| all.iter().find(|m| m["orgId"] == "org:acme-logistics"))
        .cloned()
        .expect("seeded member")
}

#[tokio::test]
async fn health_needs_no_token() {
    let app = app();
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let app = app();
    let request = Request::builder().uri("/api/v1/members").body(Body::empty()).expect("request");

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Sign in to continue");
}

#[tokio::test]
async fn readonly_tokens_cannot_write() {
    let app = app();
    let (status, members) = send(&app, get("/api/v1/members", READONLY)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(members.as_array().map(Vec::len), Some(3));

    let body = json!({
        "legalName": "Delta Freight B.V.",
        "orgId": "org:delta-freight",
        "domain": "delta-freight.nl",
        "countryCode": "NL"
    });
    let (status, body) = send(&app, send_json(Method::POST, "/api/v1/members", READONLY, &body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "This token is read-only");
}

#[tokio::test]
async fn duplicate_org_ids_conflict() {
    let app = app();
    let body = json!({
        "legalName": "Delta Freight B.V.",
        "orgId": "org:delta-freight",
        "domain": "delta-freight.nl",
        "countryCode": "nl"
    });

    let (status, created) = send(&app, send_json(Method::POST, "/api/v1/members", ADMIN, &body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["countryCode"], "NL");
    assert_eq!(created["status"], "PENDING");

    let (status, error) = send(&app, send_json(Method::POST, "/api/v1/members", ADMIN, &body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["error"], "Organization ID org:delta-freight already exists");
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let app = app();
    let body = json!({ "legalName": "Half a member" });

    let (status, error) = send(&app, send_json(Method::POST, "/api/v1/members", ADMIN, &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].is_string());
}

#[tokio::test]
async fn mutations_are_audited_newest_first() {
    let app = app();
    let member = acme(&app).await;
    let entity = member["legalEntityId"].as_str().expect("entity id");

    let contact = json!({
        "contactType": "TECHNICAL",
        "fullName": "Eva Jansen",
        "email": "eva@acme-logistics.nl"
    });
    let uri = format!("/api/v1/legal-entities/{entity}/contacts");
    let (status, _) = send(&app, send_json(Method::POST, &uri, ADMIN, &contact)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, page) =
        send(&app, get("/api/v1/audit-logs?resourceType=contact&page=1&pageSize=10", ADMIN)).await;
    assert_eq!(status, StatusCode::OK);
    let first = &page["data"][0];
    assert_eq!(first["action"], "CREATE");
    assert_eq!(first["actor"], "admin@ctn.example");

    let (status, _) = send(&app, get("/api/v1/audit-logs?page=0", ADMIN)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn issued_tokens_authenticate_until_revoked() {
    let app = app();
    let member = acme(&app).await;
    let entity = member["legalEntityId"].as_str().expect("entity id");

    let (_, endpoints) = send(&app, get(&format!("/api/v1/legal-entities/{entity}/endpoints"), ADMIN)).await;
    let endpoint = endpoints[0]["endpointId"].as_str().expect("seeded endpoint").to_owned();

    let uri = format!("/api/v1/endpoints/{endpoint}/tokens");
    let (status, issued) = send(&app, send_json(Method::POST, &uri, ADMIN, &json!({ "expiresInDays": 30 }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let secret = issued["secret"].as_str().expect("secret returned once").to_owned();
    let token_id = issued["token"]["tokenId"].as_str().expect("token id").to_owned();
    assert!(secret.starts_with(issued["token"]["prefix"].as_str().expect("prefix")));

    let (status, _) = send(&app, get("/api/v1/members", &format!("Bearer {secret}"))).await;
    assert_eq!(status, StatusCode::OK);

    let revoke = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/api/v1/tokens/{token_id}"))
        .header(header::AUTHORIZATION, ADMIN)
        .body(Body::empty())
        .expect("request");
    let (status, _) = send(&app, revoke).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get("/api/v1/members", &format!("Bearer {secret}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, send_json(Method::POST, &uri, ADMIN, &json!({ "expiresInDays": 400 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn upload(entity: &str, file_name: &str, content: &str) -> Request<Body> {
    const BOUNDARY: &str = "ctn-test-boundary";
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/pdf\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n"
    );
    Request::builder()
        .method(Method::POST)
        .uri(format!("/api/v1/legal-entities/{entity}/kvk-document"))
        .header(header::AUTHORIZATION, ADMIN)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .expect("request")
}

#[tokio::test]
async fn kvk_upload_is_polled_to_a_verdict() {
    let app = app();
    let member = acme(&app).await;
    let entity = member["legalEntityId"].as_str().expect("entity id");

    let (status, _) = send(&app, upload(entity, "extract.txt", "plain text")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let document = "%PDF-1.7\nKvK-nummer: 12345678\nHandelsnaam: Acme Logistics B.V.\n";
    let (status, started) = send(&app, upload(entity, "extract.pdf", document)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(started["status"], "PENDING");

    let uri = format!("/api/v1/legal-entities/{entity}/kvk-verification");
    let mut last = Value::Null;
    for _ in 0..4 {
        let (status, body) = send(&app, get(&uri, ADMIN)).await;
        assert_eq!(status, StatusCode::OK);
        last = body;
        if last["status"] != "PENDING" && last["status"] != "PROCESSING" {
            break;
        }
    }
    assert_eq!(last["status"], "VERIFIED");
    assert_eq!(last["extracted"]["kvkNumber"], "12345678");
}

#[tokio::test]
async fn openapi_docs_are_served() {
    let app = app();
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/api").body(Body::empty()).expect("request"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
}
