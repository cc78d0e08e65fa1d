use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use padron_api::auth::{generate_jwt, Claims};
use padron_api::database::MemoryStore;
use padron_api::policy::CapabilityPolicy;

/// Router under test: fresh in-memory store, capability policy
pub fn app() -> Router {
    padron_api::api::router(Arc::new(MemoryStore::new()), Arc::new(CapabilityPolicy))
}

/// Mint a token with the given capability set
pub fn token(subject: &str, caps: &[&str]) -> String {
    let claims = Claims::new(
        subject.to_string(),
        caps.iter().map(|s| s.to_string()).collect(),
    );
    generate_jwt(claims).expect("token generation")
}

/// Admin token covering every permission
pub fn admin_token() -> String {
    token("admin", &["*"])
}

/// Send one request and decode the JSON body (Null when empty)
pub async fn send(
    app: &Router,
    method: &str,
    path: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(bearer) = bearer {
        builder = builder.header("authorization", format!("Bearer {}", bearer));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let payload = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, payload)
}

/// Create a banner and return its id
pub async fn seed_banner(app: &Router, bearer: &str, title: &str, subtitle: Option<&str>) -> i64 {
    let body = serde_json::json!({ "title": title, "subtitle": subtitle });
    let (status, payload) = send(app, "POST", "/v1/banners", Some(bearer), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "seed failed: {}", payload);
    payload["data"]["id"].as_i64().expect("seeded id")
}
