//! Shared helpers for the integration tests.
//!
//! The tests drive the real router through `tower::ServiceExt::oneshot`
//! against the in-process backends, so no external service is contacted.
//! Handles to the concrete backends are kept so tests can seed documents,
//! count password checks and inject store failures.

// Each integration binary compiles this module and uses a subset of it.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, header};
use brotes_api::config::cors::CorsConfig;
use brotes_api::config::rate_limit::RateLimitConfig;
use brotes_api::config::sensor::SensorConfig;
use brotes_api::config::session::SessionConfig;
use brotes_api::router::init_router;
use brotes_api::services::identity::MemoryIdentityService;
use brotes_api::services::store::MemoryDocumentStore;
use brotes_api::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Shared secret expected for admin registration in the tests.
pub const ADMIN_SECRET: &str = "super-secret";

/// Default client IP; every request carries it so the registration limiter
/// has a key to work with.
pub const TEST_IP: &str = "203.0.113.7";

pub struct TestApp {
    pub router: axum::Router,
    pub identity: Arc<MemoryIdentityService>,
    pub store: Arc<MemoryDocumentStore>,
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with_rate_limit(RateLimitConfig::default())
}

pub fn setup_test_app_with_rate_limit(rate_limit_config: RateLimitConfig) -> TestApp {
    let identity = Arc::new(MemoryIdentityService::new("integration-secret"));
    let store = Arc::new(MemoryDocumentStore::new());

    let state = AppState {
        identity: identity.clone(),
        store: store.clone(),
        session_config: SessionConfig::default(),
        cors_config: CorsConfig::default(),
        rate_limit_config,
        sensor_config: SensorConfig::default(),
        admin_secret: Some(ADMIN_SECRET.to_string()),
    };

    TestApp {
        router: init_router(state),
        identity,
        store,
    }
}

pub async fn send(
    router: &axum::Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    send_from_ip(router, method, uri, cookie, body, TEST_IP).await
}

pub async fn send_from_ip(
    router: &axum::Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
    ip: &str,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", ip);

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `name=value` pair of the session cookie set by a login response.
pub fn session_cookie(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response carries no Set-Cookie header")
        .to_str()
        .unwrap();
    set_cookie
        .split(';')
        .next()
        .expect("empty Set-Cookie header")
        .to_string()
}

pub async fn register(
    app: &TestApp,
    email: &str,
    password: &str,
    role: Option<&str>,
    admin_secret: Option<&str>,
) -> Response<Body> {
    let mut body = json!({ "email": email, "password": password });
    if let Some(role) = role {
        body["role"] = json!(role);
    }
    if let Some(secret) = admin_secret {
        body["adminSecret"] = json!(secret);
    }

    send(&app.router, "POST", "/api/auth/register", None, Some(body)).await
}

pub async fn login(app: &TestApp, email: &str, password: &str) -> Response<Body> {
    send(
        &app.router,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

/// Register with the given role and return the session cookie of a fresh
/// login.
pub async fn register_and_login(
    app: &TestApp,
    email: &str,
    password: &str,
    role: &str,
    admin_secret: Option<&str>,
) -> String {
    let response = register(app, email, password, Some(role), admin_secret).await;
    assert_eq!(
        response.status(),
        axum::http::StatusCode::CREATED,
        "registration failed for {email}"
    );

    let response = login(app, email, password).await;
    assert_eq!(
        response.status(),
        axum::http::StatusCode::OK,
        "login failed for {email}"
    );
    session_cookie(&response)
}
