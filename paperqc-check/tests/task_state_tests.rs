//! Check task state machine tests
//!
//! Covers the single allowed status path (pending → processing →
//! completed | failed) and the fixed progress checkpoints.

use paperqc_check::models::check_task::{
    PROGRESS_AFTER_CONTENT, PROGRESS_AFTER_FORMAT, PROGRESS_AFTER_TITLE, PROGRESS_DONE,
    PROGRESS_STARTED,
};
use paperqc_check::models::{CheckKind, CheckStatus, CheckTask, PaperKind};

fn create_test_task(check_kind: CheckKind) -> CheckTask {
    CheckTask::new(1, PaperKind::Graduation, check_kind, 1, None)
}

#[test]
fn submission_snapshot_is_pending_zero_progress() {
    let task = create_test_task(CheckKind::Full);
    assert_eq!(task.status, CheckStatus::Pending);
    assert_eq!(task.progress, 0.0);
    assert!(!task.status.is_terminal());
}

#[test]
fn checkpoints_are_monotonic() {
    let checkpoints = [
        PROGRESS_STARTED,
        PROGRESS_AFTER_TITLE,
        PROGRESS_AFTER_FORMAT,
        PROGRESS_AFTER_CONTENT,
        PROGRESS_DONE,
    ];
    for window in checkpoints.windows(2) {
        assert!(window[0] < window[1]);
    }
    assert_eq!(checkpoints, [10.0, 40.0, 70.0, 90.0, 100.0]);
}

#[test]
fn full_check_selects_every_stage() {
    let task = create_test_task(CheckKind::Full);
    assert!(task.check_kind.includes_title());
    assert!(task.check_kind.includes_format());
    assert!(task.check_kind.includes_content());
}

#[test]
fn single_stage_kinds_select_only_their_stage() {
    let title = create_test_task(CheckKind::Title);
    assert!(title.check_kind.includes_title());
    assert!(!title.check_kind.includes_format());
    assert!(!title.check_kind.includes_content());

    let content = create_test_task(CheckKind::Content);
    assert!(!content.check_kind.includes_title());
    assert!(!content.check_kind.includes_format());
    assert!(content.check_kind.includes_content());
}

#[test]
fn progress_messages_track_status() {
    let mut task = create_test_task(CheckKind::Full);
    assert!(task.status_message().contains("queued"));

    task.status = CheckStatus::Processing;
    task.progress = PROGRESS_AFTER_TITLE;
    assert!(task.status_message().contains("40"));

    task.status = CheckStatus::Completed;
    task.total_issues = 2;
    assert!(task.status_message().contains("2 issue(s)"));

    task.status = CheckStatus::Failed;
    assert!(task.status_message().contains("failed"));
}
