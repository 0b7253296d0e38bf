//! HTTP API integration tests
//!
//! Drives the router directly with `tower::ServiceExt::oneshot` against a
//! temporary database; no listener needed.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use paperqc_check::db;
use paperqc_check::models::PaperKind;
use paperqc_check::pipeline::CheckOrchestrator;
use paperqc_check::services::{JsonDocumentParser, SqliteReferenceStore};
use paperqc_check::similarity::SimilarityEngine;
use paperqc_check::AppState;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Test helper: router + pool backed by a temporary database file
async fn create_test_app() -> (axum::Router, SqlitePool, TempDir) {
    let temp_dir = TempDir::new().expect("create temp dir");
    let db_path = temp_dir.path().join("test_api.db");
    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let pool = SqlitePool::connect(&db_url).await.expect("connect");
    db::init_tables(&pool).await.expect("init tables");

    let orchestrator = Arc::new(CheckOrchestrator::new(
        pool.clone(),
        Arc::new(JsonDocumentParser),
        Arc::new(SqliteReferenceStore::new(pool.clone())),
        None,
        Arc::new(SimilarityEngine::default()),
    ));

    let state = AppState::new(pool.clone(), orchestrator);
    let app = paperqc_check::build_router(state);

    (app, pool, temp_dir)
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _pool, _dir) = create_test_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "paperqc-check");
}

#[tokio::test]
async fn submit_unknown_paper_returns_404_envelope() {
    let (app, _pool, _dir) = create_test_app().await;

    let response = app
        .oneshot(post_json(
            "/checks",
            json!({
                "paper_id": 123,
                "paper_kind": "graduation",
                "check_kind": "full",
                "requester_id": 1
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn submit_with_unknown_check_kind_is_rejected() {
    let (app, _pool, _dir) = create_test_app().await;

    let response = app
        .oneshot(post_json(
            "/checks",
            json!({
                "paper_id": 1,
                "paper_kind": "graduation",
                "check_kind": "everything",
                "requester_id": 1
            }),
        ))
        .await
        .unwrap();

    // Malformed submission never reaches the pipeline
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn progress_for_unknown_task_returns_404() {
    let (app, _pool, _dir) = create_test_app().await;

    let response = app
        .oneshot(get("/checks/00000000-0000-0000-0000-000000000000/progress"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn result_for_unknown_task_returns_404() {
    let (app, _pool, _dir) = create_test_app().await;

    let response = app
        .oneshot(get("/checks/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submit_poll_and_fetch_result_round_trip() {
    let (app, pool, dir) = create_test_app().await;

    // Store the paper and its parsed sidecar
    let sidecar = dir.path().join("paper.json");
    tokio::fs::write(
        &sidecar,
        json!({
            "title": "An API-Driven Round Trip",
            "full_text": "y".repeat(1200),
            "headings": [
                {"level": 1, "text": "Introduction"},
                {"level": 2, "text": "Design"},
                {"level": 1, "text": "Summary"}
            ],
            "page_setup": {"left_margin_emu": 900000}
        })
        .to_string(),
    )
    .await
    .unwrap();

    let paper_id = db::papers::insert_paper(
        &pool,
        PaperKind::Graduation,
        "An API-Driven Round Trip",
        sidecar.to_str().unwrap(),
        1,
    )
    .await
    .unwrap();

    // Submit
    let response = app
        .clone()
        .oneshot(post_json(
            "/checks",
            json!({
                "paper_id": paper_id,
                "paper_kind": "graduation",
                "check_kind": "full",
                "requester_id": 1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let task = json_body(response).await;
    assert_eq!(task["status"], "pending");
    assert_eq!(task["progress"], 0.0);
    let task_id = task["task_id"].as_str().unwrap().to_string();

    // Poll until the run reaches a terminal state
    let mut last_status = String::new();
    for _ in 0..500 {
        let response = app
            .clone()
            .oneshot(get(&format!("/checks/{}/progress", task_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let progress = json_body(response).await;
        last_status = progress["status"].as_str().unwrap().to_string();
        if last_status == "completed" || last_status == "failed" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(last_status, "completed");

    // Fetch the full result
    let response = app
        .clone()
        .oneshot(get(&format!("/checks/{}", task_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let result = json_body(response).await;
    assert_eq!(result["status"], "completed");
    assert_eq!(result["progress"], 100.0);
    assert!(result["issues"].as_array().is_some());
    assert!(result["statistics"].is_object());

    // And the listing shows the run
    let response = app
        .clone()
        .oneshot(get(&format!(
            "/checks?paper_id={}&paper_kind=graduation",
            paper_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = json_body(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}
