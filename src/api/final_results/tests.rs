use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::{DocumentStore, Filter};
use crate::test_support;

fn final_result_payload() -> serde_json::Value {
    json!({
        "registrationNumber": "EXF-2025-0001",
        "candidateId": "cand-1",
        "candidateName": "Priya Raman",
        "examName": "Physics 2025",
        "totalQuestions": 44,
        "correctAnswers": 30,
        "wrongAnswers": 8,
        "unattempted": 6,
        "score": 112.0,
        "percentage": 63.64
    })
}

#[tokio::test]
async fn final_result_is_published() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/final-results",
            Some(final_result_payload()),
        ))
        .await
        .expect("publish final result");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {created}");
    assert_eq!(created["success"], true);
    let id = created["id"].as_str().expect("id");

    let document = ctx
        .store
        .find_first("FinalResult", &Filter::new().eq("registrationNumber", "EXF-2025-0001"))
        .await
        .expect("query")
        .expect("document");
    assert_eq!(document.id, id);
    assert_eq!(document.fields["status"], "published");
    assert_eq!(document.fields["score"], 112.0);
    assert_eq!(document.fields["unattempted"], 6);
    assert_eq!(document.fields["generatedAt"]["__type"], "Date");
}

#[tokio::test]
async fn repeated_publication_creates_new_records() {
    let ctx = test_support::setup_test_context().await;

    let mut ids = Vec::new();
    for _ in 0..2 {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/final-results",
                Some(final_result_payload()),
            ))
            .await
            .expect("publish final result");
        let created = test_support::read_json(response).await;
        ids.push(created["id"].as_str().expect("id").to_string());
    }

    assert_ne!(ids[0], ids[1]);
    assert_eq!(ctx.store.count("FinalResult").await, 2);
}

#[tokio::test]
async fn missing_registration_number_is_rejected() {
    let ctx = test_support::setup_test_context().await;

    let mut payload = final_result_payload();
    payload.as_object_mut().expect("object").remove("registrationNumber");

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::POST, "/api/final-results", Some(payload)))
        .await
        .expect("publish final result");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.store.count("FinalResult").await, 0);
}

#[tokio::test]
async fn score_fields_are_optional() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/final-results",
            Some(json!({"registrationNumber": "EXF-2025-0002"})),
        ))
        .await
        .expect("publish final result");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {created}");

    let document = ctx
        .store
        .find_first("FinalResult", &Filter::new().eq("registrationNumber", "EXF-2025-0002"))
        .await
        .expect("query")
        .expect("document");
    assert_eq!(document.fields["status"], "published");
    assert!(document.fields.get("score").is_none());
    assert_eq!(document.fields["generatedAt"]["__type"], "Date");
}

#[tokio::test]
async fn lookup_is_not_routed() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/final-results", None))
        .await
        .expect("get final result");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
