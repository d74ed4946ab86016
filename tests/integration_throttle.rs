mod common;

use axum::http::StatusCode;
use brotes_api::services::store::{DocumentStore as _, collections};
use chrono::{Duration, Utc};
use common::{body_json, login, register, setup_test_app};
use serde_json::json;

async fn counter_attempts(app: &common::TestApp, email: &str) -> i64 {
    app.store
        .get(collections::LOGIN_ATTEMPTS, email)
        .await
        .unwrap()
        .and_then(|fields| fields.get("attempts").and_then(|v| v.as_i64()))
        .unwrap_or(0)
}

/// Rewrite the counter's lastAttempt so the lockout window appears elapsed,
/// instead of sleeping through real time.
async fn age_last_attempt(app: &common::TestApp, email: &str, minutes: i64) {
    let aged = (Utc::now() - Duration::minutes(minutes)).to_rfc3339();
    app.store
        .merge(
            collections::LOGIN_ATTEMPTS,
            email,
            json!({ "lastAttempt": aged }).as_object().cloned().unwrap(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_sixth_attempt_rate_limited_without_credential_check() {
    let app = setup_test_app();
    register(&app, "bob@x.com", "Abcdef1!", None, None).await;

    for _ in 0..5 {
        let response = login(&app, "bob@x.com", "wrong-password").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
    assert_eq!(counter_attempts(&app, "bob@x.com").await, 5);
    assert_eq!(app.identity.password_checks(), 5);

    // Sixth attempt inside the window: rejected before the identity service
    // is contacted, even with the correct password.
    let response = login(&app, "bob@x.com", "Abcdef1!").await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = body_json(response).await;
    assert!(body.get("error").is_some());
    assert_eq!(app.identity.password_checks(), 5);
}

#[tokio::test]
async fn test_elapsed_window_resets_and_verifies() {
    let app = setup_test_app();
    register(&app, "bob@x.com", "Abcdef1!", None, None).await;

    for _ in 0..5 {
        login(&app, "bob@x.com", "wrong-password").await;
    }
    let locked = login(&app, "bob@x.com", "Abcdef1!").await;
    assert_eq!(locked.status(), StatusCode::TOO_MANY_REQUESTS);

    age_last_attempt(&app, "bob@x.com", 6).await;

    // Past the window the attempt reaches real verification and succeeds.
    let response = login(&app, "bob@x.com", "Abcdef1!").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(counter_attempts(&app, "bob@x.com").await, 0);
}

#[tokio::test]
async fn test_elapsed_window_failure_restarts_count_at_one() {
    let app = setup_test_app();
    register(&app, "bob@x.com", "Abcdef1!", None, None).await;

    for _ in 0..5 {
        login(&app, "bob@x.com", "wrong-password").await;
    }
    age_last_attempt(&app, "bob@x.com", 6).await;

    // A failure after the window starts a fresh run, not attempts=6.
    let response = login(&app, "bob@x.com", "wrong-password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(counter_attempts(&app, "bob@x.com").await, 1);
}

#[tokio::test]
async fn test_window_slides_from_last_failure() {
    let app = setup_test_app();
    register(&app, "bob@x.com", "Abcdef1!", None, None).await;

    for _ in 0..5 {
        login(&app, "bob@x.com", "wrong-password").await;
    }

    // Four minutes later the email is still locked...
    age_last_attempt(&app, "bob@x.com", 4).await;
    let response = login(&app, "bob@x.com", "Abcdef1!").await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // ...and the stored lastAttempt is untouched by the locked rejection:
    // only another *failure* re-arms the window.
    let doc = app
        .store
        .get(collections::LOGIN_ATTEMPTS, "bob@x.com")
        .await
        .unwrap()
        .unwrap();
    let last = doc.get("lastAttempt").and_then(|v| v.as_str()).unwrap().to_string();
    let aged = chrono::DateTime::parse_from_rfc3339(&last).unwrap();
    assert!(Utc::now() - aged.with_timezone(&Utc) > Duration::minutes(3));
}

#[tokio::test]
async fn test_successful_login_resets_counter() {
    let app = setup_test_app();
    register(&app, "bob@x.com", "Abcdef1!", None, None).await;

    for _ in 0..3 {
        login(&app, "bob@x.com", "wrong-password").await;
    }
    assert_eq!(counter_attempts(&app, "bob@x.com").await, 3);

    let response = login(&app, "bob@x.com", "Abcdef1!").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(counter_attempts(&app, "bob@x.com").await, 0);

    // The run restarts from one after the reset.
    login(&app, "bob@x.com", "wrong-password").await;
    assert_eq!(counter_attempts(&app, "bob@x.com").await, 1);
}

#[tokio::test]
async fn test_throttle_is_per_email() {
    let app = setup_test_app();
    register(&app, "bob@x.com", "Abcdef1!", None, None).await;
    register(&app, "eve@x.com", "Abcdef1!", None, None).await;

    for _ in 0..5 {
        login(&app, "bob@x.com", "wrong-password").await;
    }
    let locked = login(&app, "bob@x.com", "Abcdef1!").await;
    assert_eq!(locked.status(), StatusCode::TOO_MANY_REQUESTS);

    // The other email is unaffected.
    let response = login(&app, "eve@x.com", "Abcdef1!").await;
    assert_eq!(response.status(), StatusCode::OK);
}
