//! Check pipeline orchestrator
//!
//! Owns the check-task lifecycle: submission creates and persists a pending
//! task and spawns a detached execution unit, then returns immediately. The
//! detached run walks the selected stages in a fixed order (title → format →
//! content), persisting a progress checkpoint after each, and finishes by
//! writing the aggregated result (or a terminal `failed` state) back to the
//! task row. Callers observe the run only by polling that row.

use crate::checkers::{ContentChecker, FormatChecker, StageChecker, TitleChecker};
use crate::db;
use crate::models::{
    check_task::{
        PROGRESS_AFTER_CONTENT, PROGRESS_AFTER_FORMAT, PROGRESS_AFTER_TITLE, PROGRESS_DONE,
        PROGRESS_STARTED,
    },
    CheckKind, CheckStatus, CheckTask, IssueDraft, IssueStats, PaperKind,
};
use crate::services::{AiReviewer, DocumentParser, ReferenceSearch};
use crate::similarity::SimilarityEngine;
use chrono::Utc;
use paperqc_common::{Error, Result};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Submission parameters
#[derive(Debug, Clone)]
pub struct SubmitCheck {
    pub paper_id: i64,
    pub paper_kind: PaperKind,
    pub check_kind: CheckKind,
    pub template_id: Option<i64>,
    pub requester_id: i64,
}

/// Coordinates check tasks through their lifecycle
pub struct CheckOrchestrator {
    db: SqlitePool,
    parser: Arc<dyn DocumentParser>,
    title_checker: TitleChecker,
    format_checker: FormatChecker,
    content_checker: ContentChecker,
}

impl CheckOrchestrator {
    pub fn new(
        db: SqlitePool,
        parser: Arc<dyn DocumentParser>,
        search: Arc<dyn ReferenceSearch>,
        ai: Option<Arc<dyn AiReviewer>>,
        similarity: Arc<SimilarityEngine>,
    ) -> Self {
        Self {
            db,
            parser,
            title_checker: TitleChecker::new(similarity, search, ai.clone()),
            format_checker: FormatChecker,
            content_checker: ContentChecker::new(ai),
        }
    }

    /// Submit a check: validate the paper, persist a pending task, spawn the
    /// detached run, and return the snapshot without waiting for analysis.
    pub async fn submit(self: &Arc<Self>, request: SubmitCheck) -> Result<CheckTask> {
        let paper = db::papers::get_paper(&self.db, request.paper_id, request.paper_kind)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "Paper not found: {} ({})",
                    request.paper_id,
                    request.paper_kind.as_str()
                ))
            })?;

        let task = CheckTask::new(
            request.paper_id,
            request.paper_kind,
            request.check_kind,
            request.requester_id,
            request.template_id,
        );
        db::tasks::insert_task(&self.db, &task).await?;

        tracing::info!(
            task_id = %task.task_id,
            paper_id = task.paper_id,
            check_kind = %task.check_kind.as_str(),
            "Check task submitted"
        );

        let orchestrator = Arc::clone(self);
        let spawned_task = task.clone();
        let file_path = PathBuf::from(paper.file_path);
        tokio::spawn(async move {
            orchestrator.run_detached(spawned_task, file_path).await;
        });

        Ok(task)
    }

    /// Detached execution unit; owns the task record exclusively for the run
    async fn run_detached(&self, mut task: CheckTask, file_path: PathBuf) {
        let task_id = task.task_id;

        match self.run_stages(&mut task, &file_path).await {
            Ok(issue_count) => {
                tracing::info!(task_id = %task_id, issues = issue_count, "Check task completed");
            }
            Err(e) => {
                tracing::error!(task_id = %task_id, error = %e, "Check task failed");
                if let Err(e) = db::tasks::fail_task(&self.db, task_id).await {
                    tracing::error!(
                        task_id = %task_id,
                        error = %e,
                        "Failed to persist failed task state"
                    );
                }
            }
        }
    }

    /// Run the selected stages in order, persisting a checkpoint after each
    async fn run_stages(&self, task: &mut CheckTask, file_path: &Path) -> Result<usize> {
        task.status = CheckStatus::Processing;
        task.progress = PROGRESS_STARTED;
        db::tasks::update_progress(&self.db, task.task_id, task.status, task.progress).await?;

        let doc = self
            .parser
            .parse(file_path)
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        let mut issues: Vec<IssueDraft> = Vec::new();

        if task.check_kind.includes_title() {
            self.run_stage(task, &self.title_checker, &doc, &mut issues, PROGRESS_AFTER_TITLE)
                .await?;
        }

        if task.check_kind.includes_format() {
            self.run_stage(task, &self.format_checker, &doc, &mut issues, PROGRESS_AFTER_FORMAT)
                .await?;
        }

        if task.check_kind.includes_content() {
            self.run_stage(task, &self.content_checker, &doc, &mut issues, PROGRESS_AFTER_CONTENT)
                .await?;
        }

        let stats = IssueStats::tally(&issues);
        task.statistics = Some(stats);
        task.total_issues = stats.total() as i64;
        task.status = CheckStatus::Completed;
        task.progress = PROGRESS_DONE;
        task.completed_at = Some(Utc::now());

        db::tasks::complete_task(&self.db, task, &issues).await?;

        Ok(issues.len())
    }

    async fn run_stage(
        &self,
        task: &mut CheckTask,
        checker: &dyn StageChecker,
        doc: &crate::models::ParsedDocument,
        issues: &mut Vec<IssueDraft>,
        checkpoint: f64,
    ) -> Result<()> {
        tracing::debug!(task_id = %task.task_id, stage = checker.stage(), "Running stage");

        let found = checker.check(doc).await?;
        tracing::debug!(
            task_id = %task.task_id,
            stage = checker.stage(),
            found = found.len(),
            "Stage finished"
        );

        issues.extend(found);
        task.progress = checkpoint;
        db::tasks::update_progress(&self.db, task.task_id, task.status, task.progress).await?;

        Ok(())
    }
}
