//! Check API handlers
//!
//! POST /checks, GET /checks/{task_id}/progress, GET /checks/{task_id},
//! GET /checks?paper_id=&paper_kind=

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db,
    error::{ApiError, ApiResult},
    models::{CheckKind, CheckStatus, CheckTask, Issue, PaperKind},
    pipeline::SubmitCheck,
    AppState,
};

/// POST /checks request
#[derive(Debug, Deserialize)]
pub struct SubmitCheckRequest {
    pub paper_id: i64,
    pub paper_kind: PaperKind,
    pub check_kind: CheckKind,
    #[serde(default)]
    pub template_id: Option<i64>,
    pub requester_id: i64,
}

/// GET /checks/{task_id}/progress response
#[derive(Debug, Serialize)]
pub struct CheckProgressResponse {
    pub task_id: Uuid,
    pub status: CheckStatus,
    pub progress: f64,
    pub message: String,
}

/// GET /checks/{task_id} response
#[derive(Debug, Serialize)]
pub struct CheckResultResponse {
    #[serde(flatten)]
    pub task: CheckTask,
    pub issues: Vec<Issue>,
}

/// GET /checks query parameters
#[derive(Debug, Deserialize)]
pub struct ListChecksQuery {
    pub paper_id: i64,
    pub paper_kind: PaperKind,
}

/// POST /checks
///
/// Submit a check. The task is created in `pending` and analyzed by a
/// detached unit of work; the response never waits for analysis.
pub async fn submit_check(
    State(state): State<AppState>,
    Json(request): Json<SubmitCheckRequest>,
) -> ApiResult<Json<CheckTask>> {
    let task = state
        .orchestrator
        .submit(SubmitCheck {
            paper_id: request.paper_id,
            paper_kind: request.paper_kind,
            check_kind: request.check_kind,
            template_id: request.template_id,
            requester_id: request.requester_id,
        })
        .await?;

    Ok(Json(task))
}

/// GET /checks/{task_id}/progress
///
/// Poll check progress. Progress holds at fixed checkpoints between stages.
pub async fn get_check_progress(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<CheckProgressResponse>> {
    let task = db::tasks::load_task(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Check task not found: {}", task_id)))?;

    Ok(Json(CheckProgressResponse {
        task_id: task.task_id,
        status: task.status,
        progress: task.progress,
        message: task.status_message(),
    }))
}

/// GET /checks/{task_id}
///
/// Fetch the full task with its ordered issue list.
pub async fn get_check_result(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<CheckResultResponse>> {
    let task = db::tasks::load_task(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Check task not found: {}", task_id)))?;

    let issues = db::tasks::load_issues(&state.db, task_id).await?;

    Ok(Json(CheckResultResponse { task, issues }))
}

/// GET /checks?paper_id=&paper_kind=
///
/// List a paper's check tasks, newest first.
pub async fn list_checks(
    State(state): State<AppState>,
    Query(query): Query<ListChecksQuery>,
) -> ApiResult<Json<Vec<CheckTask>>> {
    let tasks = db::tasks::list_tasks_for_paper(&state.db, query.paper_id, query.paper_kind).await?;
    Ok(Json(tasks))
}

/// Check API routes
pub fn check_routes() -> Router<AppState> {
    Router::new()
        .route("/checks", post(submit_check).get(list_checks))
        .route("/checks/:task_id", get(get_check_result))
        .route("/checks/:task_id/progress", get(get_check_progress))
}
