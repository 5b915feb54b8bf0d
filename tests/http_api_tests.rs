//! REST API smoke tests driven through the router with `oneshot`.

mod support;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::util::ServiceExt;

use cts_rust::http::{create_router, AppState};

use support::{meeting_id_for, seeded_repository};

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_reports_connected_storage() {
    let (repo, _group) = seeded_repository().await;
    let app = create_router(AppState::new(Arc::new(repo)));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_group_creation_and_listing() {
    let (repo, _group) = seeded_repository().await;
    let app = create_router(AppState::new(Arc::new(repo)));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/groups",
            serde_json::json!({
                "department": "COE",
                "school_year": "2025-2026",
                "semester": "second",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["department"], "COE");

    let response = app
        .oneshot(Request::get("/v1/groups").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 2); // seeded group plus the new one
}

#[tokio::test]
async fn test_validate_unknown_meeting_returns_404() {
    let (repo, _group) = seeded_repository().await;
    let app = create_router(AppState::new(Arc::new(repo)));

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/meetings/9999/validate",
            serde_json::json!({
                "day": "Mon",
                "start": "08:00:00",
                "end": "10:00:00",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_conflicting_update_returns_409_with_details() {
    let (repo, group) = seeded_repository().await;
    let meeting = meeting_id_for(&repo, group.id, 1, 10).await;
    let app = create_router(AppState::new(Arc::new(repo)));

    // Tue 10:00-12:00 collides with CS103 on instructor and room.
    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/v1/meetings/{}", meeting.value()),
            serde_json::json!({
                "day": "Tue",
                "start": "10:00:00",
                "end": "12:00:00",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], "RESOURCE_CONFLICT");
    assert!(body["details"].is_array());
}

#[tokio::test]
async fn test_update_moves_meeting_over_http() {
    let (repo, group) = seeded_repository().await;
    let meeting = meeting_id_for(&repo, group.id, 1, 10).await;
    let app = create_router(AppState::new(Arc::new(repo)));

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/v1/meetings/{}", meeting.value()),
            serde_json::json!({
                "day": "Wed",
                "start": "08:00:00",
                "end": "10:00:00",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["day"], "Wed");
}

#[tokio::test]
async fn test_malformed_day_token_returns_400() {
    let (repo, group) = seeded_repository().await;
    let meeting = meeting_id_for(&repo, group.id, 1, 10).await;
    let app = create_router(AppState::new(Arc::new(repo)));

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/v1/meetings/{}", meeting.value()),
            serde_json::json!({
                "day": "Funday",
                "start": "08:00:00",
                "end": "10:00:00",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_alternatives_endpoint_returns_ranked_list() {
    let (repo, group) = seeded_repository().await;
    let meeting = meeting_id_for(&repo, group.id, 1, 10).await;
    let app = create_router(AppState::new(Arc::new(repo)));

    let response = app
        .oneshot(
            Request::get(format!(
                "/v1/meetings/{}/alternatives?day=Tue&start=10:00&end=12:00&limit=5",
                meeting.value()
            ))
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["total"].as_u64().unwrap() > 0);
    assert!(body["alternatives"].as_array().unwrap().len() <= 5);
}
