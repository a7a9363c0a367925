#![cfg(feature = "http")]

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use edutalent_auth::{HttpIdentityClient, IdentityClient, IdentityError, Role};
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let app = Router::new()
            .route("/api/auth/me", get(me))
            .route("/api/auth/logout", post(logout));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn me(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some("recruiter") => Json(json!({
            "id": "0190f5a4-7d3e-7c11-9a7e-2b5f1c3e4d01",
            "name": "Sara Khalil",
            "email": "sara@school.example",
            "role": "recruiter",
            "tenantId": "0190f5a4-7d3e-7c11-9a7e-2b5f1c3e4d02",
            "loginMethod": "uae_pass"
        }))
        .into_response(),
        Some("nobody") => Json(serde_json::Value::Null).into_response(),
        Some("garbled") => (StatusCode::OK, "{\"id\":").into_response(),
        Some("broken") => (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn logout(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some("recruiter") => StatusCode::NO_CONTENT.into_response(),
        Some("broken") => (StatusCode::BAD_GATEWAY, "upstream down").into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

#[tokio::test]
async fn fetches_current_user() {
    let server = TestServer::spawn().await;
    let client = HttpIdentityClient::with_token(&server.base_url, "recruiter");

    let user = client.current_user().await.unwrap().expect("user");
    assert_eq!(user.role, Role::Recruiter);
    assert_eq!(user.name, "Sara Khalil");
    assert_eq!(user.extra["loginMethod"], "uae_pass");
}

#[tokio::test]
async fn null_payload_means_nobody() {
    let server = TestServer::spawn().await;
    let client = HttpIdentityClient::with_token(&server.base_url, "nobody");

    assert_eq!(client.current_user().await, Ok(None));
}

#[tokio::test]
async fn classifies_failures() {
    let server = TestServer::spawn().await;

    let anonymous = HttpIdentityClient::new(&server.base_url);
    assert_eq!(anonymous.current_user().await, Err(IdentityError::Unauthorized));
    assert_eq!(anonymous.logout().await, Err(IdentityError::Unauthorized));

    let garbled = HttpIdentityClient::with_token(&server.base_url, "garbled");
    assert!(matches!(garbled.current_user().await, Err(IdentityError::Decode(_))));

    let broken = HttpIdentityClient::with_token(&server.base_url, "broken");
    assert_eq!(
        broken.current_user().await,
        Err(IdentityError::Server {
            status: 500,
            message: "database unavailable".to_string()
        })
    );
    assert_eq!(
        broken.logout().await,
        Err(IdentityError::Server {
            status: 502,
            message: "upstream down".to_string()
        })
    );
}

#[tokio::test]
async fn logout_succeeds_with_valid_session() {
    let server = TestServer::spawn().await;
    let client = HttpIdentityClient::with_token(&server.base_url, "recruiter");

    assert_eq!(client.logout().await, Ok(()));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpIdentityClient::new(format!("http://{}", addr));
    assert!(matches!(client.current_user().await, Err(IdentityError::Transport(_))));
}
