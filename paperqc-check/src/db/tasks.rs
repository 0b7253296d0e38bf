//! Check task and issue persistence
//!
//! The task row is the single source of truth for a check's status and
//! progress. Issues are written once, inside the same transaction as the
//! terminal completion update, so a reader never sees a half-written result.

use crate::models::{
    CheckStatus, CheckTask, Issue, IssueDraft, IssueStats,
};
use chrono::Utc;
use paperqc_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::papers::parse_timestamp;

/// Insert a freshly submitted task
pub async fn insert_task(pool: &SqlitePool, task: &CheckTask) -> Result<()> {
    let statistics = task
        .statistics
        .map(|stats| serde_json::to_string(&stats))
        .transpose()
        .map_err(|e| Error::Internal(format!("Failed to serialize statistics: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO check_tasks (
            task_id, paper_id, paper_kind, check_kind, template_id,
            status, progress, total_issues, statistics,
            created_by, created_at, completed_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(task.task_id.to_string())
    .bind(task.paper_id)
    .bind(task.paper_kind.as_str())
    .bind(task.check_kind.as_str())
    .bind(task.template_id)
    .bind(task.status.as_str())
    .bind(task.progress)
    .bind(task.total_issues)
    .bind(statistics)
    .bind(task.created_by)
    .bind(task.created_at.to_rfc3339())
    .bind(task.completed_at.map(|dt| dt.to_rfc3339()))
    .execute(pool)
    .await?;

    Ok(())
}

/// Persist a status/progress checkpoint for a running task
pub async fn update_progress(
    pool: &SqlitePool,
    task_id: Uuid,
    status: CheckStatus,
    progress: f64,
) -> Result<()> {
    sqlx::query("UPDATE check_tasks SET status = ?, progress = ? WHERE task_id = ?")
        .bind(status.as_str())
        .bind(progress)
        .bind(task_id.to_string())
        .execute(pool)
        .await?;

    Ok(())
}

/// Mark a task failed: terminal status, progress reset, no issues written
pub async fn fail_task(pool: &SqlitePool, task_id: Uuid) -> Result<()> {
    sqlx::query(
        "UPDATE check_tasks SET status = ?, progress = 0.0, completed_at = ? WHERE task_id = ?",
    )
    .bind(CheckStatus::Failed.as_str())
    .bind(Utc::now().to_rfc3339())
    .bind(task_id.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

/// Complete a task: final row update and all accumulated issues, atomically
pub async fn complete_task(
    pool: &SqlitePool,
    task: &CheckTask,
    issues: &[IssueDraft],
) -> Result<()> {
    let statistics = task
        .statistics
        .unwrap_or_default();
    let statistics_json = serde_json::to_string(&statistics)
        .map_err(|e| Error::Internal(format!("Failed to serialize statistics: {}", e)))?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE check_tasks
        SET status = ?, progress = ?, total_issues = ?, statistics = ?, completed_at = ?
        WHERE task_id = ?
        "#,
    )
    .bind(task.status.as_str())
    .bind(task.progress)
    .bind(task.total_issues)
    .bind(statistics_json)
    .bind(task.completed_at.map(|dt| dt.to_rfc3339()))
    .bind(task.task_id.to_string())
    .execute(&mut *tx)
    .await?;

    let created_at = Utc::now().to_rfc3339();
    for issue in issues {
        let extra = issue
            .extra
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| Error::Internal(format!("Failed to serialize issue extra: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO check_issues (
                task_id, category, severity, location, description,
                suggestion, confidence, extra, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(task.task_id.to_string())
        .bind(issue.category.as_str())
        .bind(issue.severity.as_str())
        .bind(&issue.location)
        .bind(&issue.description)
        .bind(&issue.suggestion)
        .bind(issue.confidence)
        .bind(extra)
        .bind(&created_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(())
}

/// Load one task by id
pub async fn load_task(pool: &SqlitePool, task_id: Uuid) -> Result<Option<CheckTask>> {
    let row = sqlx::query(
        r#"
        SELECT task_id, paper_id, paper_kind, check_kind, template_id,
               status, progress, total_issues, statistics,
               created_by, created_at, completed_at
        FROM check_tasks
        WHERE task_id = ?
        "#,
    )
    .bind(task_id.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(task_from_row).transpose()
}

/// Tasks for one paper, newest first
pub async fn list_tasks_for_paper(
    pool: &SqlitePool,
    paper_id: i64,
    paper_kind: crate::models::PaperKind,
) -> Result<Vec<CheckTask>> {
    let rows = sqlx::query(
        r#"
        SELECT task_id, paper_id, paper_kind, check_kind, template_id,
               status, progress, total_issues, statistics,
               created_by, created_at, completed_at
        FROM check_tasks
        WHERE paper_id = ? AND paper_kind = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(paper_id)
    .bind(paper_kind.as_str())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(task_from_row).collect()
}

/// Issues for one task, in discovery order
pub async fn load_issues(pool: &SqlitePool, task_id: Uuid) -> Result<Vec<Issue>> {
    let rows = sqlx::query(
        r#"
        SELECT id, task_id, category, severity, location, description,
               suggestion, confidence, extra, created_at
        FROM check_issues
        WHERE task_id = ?
        ORDER BY id
        "#,
    )
    .bind(task_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let task_id: String = row.get("task_id");
            let category: String = row.get("category");
            let severity: String = row.get("severity");
            let extra: Option<String> = row.get("extra");
            let created_at: String = row.get("created_at");

            Ok(Issue {
                id: row.get("id"),
                task_id: Uuid::parse_str(&task_id)
                    .map_err(|e| Error::Internal(format!("Bad task id {}: {}", task_id, e)))?,
                category: category.parse()?,
                severity: severity.parse()?,
                location: row.get("location"),
                description: row.get("description"),
                suggestion: row.get("suggestion"),
                confidence: row.get("confidence"),
                extra: extra
                    .map(|raw| serde_json::from_str(&raw))
                    .transpose()
                    .map_err(|e| Error::Internal(format!("Bad issue extra: {}", e)))?,
                created_at: parse_timestamp(&created_at)?,
            })
        })
        .collect()
}

fn task_from_row(row: sqlx::sqlite::SqliteRow) -> Result<CheckTask> {
    let task_id: String = row.get("task_id");
    let paper_kind: String = row.get("paper_kind");
    let check_kind: String = row.get("check_kind");
    let status: String = row.get("status");
    let statistics: Option<String> = row.get("statistics");
    let created_at: String = row.get("created_at");
    let completed_at: Option<String> = row.get("completed_at");

    Ok(CheckTask {
        task_id: Uuid::parse_str(&task_id)
            .map_err(|e| Error::Internal(format!("Bad task id {}: {}", task_id, e)))?,
        paper_id: row.get("paper_id"),
        paper_kind: paper_kind.parse()?,
        check_kind: check_kind.parse()?,
        template_id: row.get("template_id"),
        status: status.parse()?,
        progress: row.get("progress"),
        total_issues: row.get("total_issues"),
        statistics: statistics
            .map(|raw| serde_json::from_str::<IssueStats>(&raw))
            .transpose()
            .map_err(|e| Error::Internal(format!("Bad statistics: {}", e)))?,
        created_by: row.get("created_by"),
        created_at: parse_timestamp(&created_at)?,
        completed_at: completed_at.map(|raw| parse_timestamp(&raw)).transpose()?,
    })
}
