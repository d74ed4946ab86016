mod common;

use axum::http::StatusCode;
use brotes_api::services::store::DocumentStore as _;
use common::{body_json, register, register_and_login, send, setup_test_app};
use serde_json::json;

#[tokio::test]
async fn test_progreso_upsert_and_listing() {
    let app = setup_test_app();
    let response = register(&app, "kid@x.com", "Abcdef1!", Some("estudiante"), None).await;
    let uid = body_json(response).await["uid"].as_str().unwrap().to_string();
    let teacher = register_and_login(&app, "prof@x.com", "Abcdef1!", "maestro", None).await;

    let response = send(
        &app.router,
        "POST",
        "/api/maestro/progreso",
        Some(&teacher),
        Some(json!({ "uid": uid, "actividad": "Germinación", "porcentaje": "40%" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app.router,
        "GET",
        "/api/maestro/estudiantes",
        Some(&teacher),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let listado = body_json(response).await;
    let rows = listado.as_array().expect("array of students");

    // Only estudiante profiles are listed; the teacher is not a row.
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["uid"], json!(uid));
    assert_eq!(rows[0]["email"], "kid@x.com");
    assert_eq!(rows[0]["actividad"], "Germinación");
    assert_eq!(rows[0]["progreso"], "40%");
    assert!(rows[0]["updatedAt"].is_string());
}

#[tokio::test]
async fn test_listing_defaults_without_progress_record() {
    let app = setup_test_app();
    register(&app, "kid@x.com", "Abcdef1!", Some("estudiante"), None).await;
    let teacher = register_and_login(&app, "prof@x.com", "Abcdef1!", "maestro", None).await;

    let response = send(
        &app.router,
        "GET",
        "/api/maestro/estudiantes",
        Some(&teacher),
        None,
    )
    .await;
    let listado = body_json(response).await;
    let rows = listado.as_array().unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["actividad"], "—");
    assert_eq!(rows[0]["progreso"], "0%");
    assert!(rows[0]["updatedAt"].is_null());
}

#[tokio::test]
async fn test_progreso_defaults_porcentaje() {
    let app = setup_test_app();
    let response = register(&app, "kid@x.com", "Abcdef1!", Some("estudiante"), None).await;
    let uid = body_json(response).await["uid"].as_str().unwrap().to_string();
    let teacher = register_and_login(&app, "prof@x.com", "Abcdef1!", "maestro", None).await;

    let response = send(
        &app.router,
        "POST",
        "/api/maestro/progreso",
        Some(&teacher),
        Some(json!({ "uid": uid, "actividad": "Riego" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let record = app.store.get("progresos", &uid).await.unwrap().unwrap();
    assert_eq!(record.get("porcentaje"), Some(&json!("0%")));
}

#[tokio::test]
async fn test_progreso_requires_uid_and_actividad() {
    let app = setup_test_app();
    let teacher = register_and_login(&app, "prof@x.com", "Abcdef1!", "maestro", None).await;

    let response = send(
        &app.router,
        "POST",
        "/api/maestro/progreso",
        Some(&teacher),
        Some(json!({ "actividad": "Riego" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_progreso_overwrite_keeps_single_record() {
    let app = setup_test_app();
    let response = register(&app, "kid@x.com", "Abcdef1!", Some("estudiante"), None).await;
    let uid = body_json(response).await["uid"].as_str().unwrap().to_string();
    let teacher = register_and_login(&app, "prof@x.com", "Abcdef1!", "maestro", None).await;

    for (actividad, pct) in [("Germinación", "40%"), ("Trasplante", "70%")] {
        let response = send(
            &app.router,
            "POST",
            "/api/maestro/progreso",
            Some(&teacher),
            Some(json!({ "uid": uid, "actividad": actividad, "porcentaje": pct })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let record = app.store.get("progresos", &uid).await.unwrap().unwrap();
    assert_eq!(record.get("actividad"), Some(&json!("Trasplante")));
    assert_eq!(record.get("porcentaje"), Some(&json!("70%")));
}
