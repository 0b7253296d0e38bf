//! Check task state machine
//!
//! A check task progresses through exactly one path:
//! PENDING → PROCESSING → COMPLETED | FAILED
//!
//! Progress is reported at fixed checkpoints tied to stage completion, so
//! pollers see plateau-then-jump behavior rather than a continuous estimate.

use chrono::{DateTime, Utc};
use paperqc_common::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Progress checkpoint after the task enters PROCESSING
pub const PROGRESS_STARTED: f64 = 10.0;
/// Progress checkpoint after the title stage
pub const PROGRESS_AFTER_TITLE: f64 = 40.0;
/// Progress checkpoint after the format stage
pub const PROGRESS_AFTER_FORMAT: f64 = 70.0;
/// Progress checkpoint after the content stage
pub const PROGRESS_AFTER_CONTENT: f64 = 90.0;
/// Progress on successful completion
pub const PROGRESS_DONE: f64 = 100.0;

/// Which paper registry the subject document belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperKind {
    Graduation,
    Course,
}

impl PaperKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperKind::Graduation => "graduation",
            PaperKind::Course => "course",
        }
    }
}

impl FromStr for PaperKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "graduation" => Ok(PaperKind::Graduation),
            "course" => Ok(PaperKind::Course),
            other => Err(Error::InvalidInput(format!("Unknown paper kind: {}", other))),
        }
    }
}

/// Requested analysis scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    Title,
    Format,
    Content,
    Full,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Title => "title",
            CheckKind::Format => "format",
            CheckKind::Content => "content",
            CheckKind::Full => "full",
        }
    }

    pub fn includes_title(&self) -> bool {
        matches!(self, CheckKind::Title | CheckKind::Full)
    }

    pub fn includes_format(&self) -> bool {
        matches!(self, CheckKind::Format | CheckKind::Full)
    }

    pub fn includes_content(&self) -> bool {
        matches!(self, CheckKind::Content | CheckKind::Full)
    }
}

impl FromStr for CheckKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(CheckKind::Title),
            "format" => Ok(CheckKind::Format),
            "content" => Ok(CheckKind::Content),
            "full" => Ok(CheckKind::Full),
            other => Err(Error::InvalidInput(format!("Unknown check kind: {}", other))),
        }
    }
}

/// Check task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Pending => "pending",
            CheckStatus::Processing => "processing",
            CheckStatus::Completed => "completed",
            CheckStatus::Failed => "failed",
        }
    }

    /// Terminal states are immutable
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckStatus::Completed | CheckStatus::Failed)
    }
}

impl FromStr for CheckStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CheckStatus::Pending),
            "processing" => Ok(CheckStatus::Processing),
            "completed" => Ok(CheckStatus::Completed),
            "failed" => Ok(CheckStatus::Failed),
            other => Err(Error::Internal(format!("Unknown check status: {}", other))),
        }
    }
}

/// Per-severity issue counts stored with a completed task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStats {
    pub critical: u32,
    pub error: u32,
    pub warning: u32,
    pub info: u32,
}

impl IssueStats {
    /// Count issues per severity
    pub fn tally(issues: &[crate::models::IssueDraft]) -> Self {
        let mut stats = Self::default();
        for issue in issues {
            match issue.severity {
                crate::models::Severity::Critical => stats.critical += 1,
                crate::models::Severity::Error => stats.error += 1,
                crate::models::Severity::Warning => stats.warning += 1,
                crate::models::Severity::Info => stats.info += 1,
            }
        }
        stats
    }

    pub fn total(&self) -> u32 {
        self.critical + self.error + self.warning + self.info
    }
}

/// One requested analysis run over one stored paper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckTask {
    /// Unique task identifier
    pub task_id: Uuid,

    /// Subject paper
    pub paper_id: i64,
    pub paper_kind: PaperKind,

    /// Requested analysis scope
    pub check_kind: CheckKind,

    /// Formatting template to check against (optional)
    pub template_id: Option<i64>,

    /// Current status
    pub status: CheckStatus,

    /// Progress percentage (0.0 - 100.0), monotonic within one run
    pub progress: f64,

    /// Total issues found (set on completion)
    pub total_issues: i64,

    /// Per-severity counts (set on completion)
    pub statistics: Option<IssueStats>,

    /// Submitting principal
    pub created_by: i64,

    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl CheckTask {
    /// Create a new pending task
    pub fn new(
        paper_id: i64,
        paper_kind: PaperKind,
        check_kind: CheckKind,
        created_by: i64,
        template_id: Option<i64>,
    ) -> Self {
        Self {
            task_id: Uuid::new_v4(),
            paper_id,
            paper_kind,
            check_kind,
            template_id,
            status: CheckStatus::Pending,
            progress: 0.0,
            total_issues: 0,
            statistics: None,
            created_by,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Human-readable progress message for the polling endpoint
    pub fn status_message(&self) -> String {
        match self.status {
            CheckStatus::Pending => "Check queued, waiting to start".to_string(),
            CheckStatus::Processing => format!("Analyzing document ({:.0}%)", self.progress),
            CheckStatus::Completed => format!("Check completed, {} issue(s) found", self.total_issues),
            CheckStatus::Failed => "Check failed, see service logs".to_string(),
        }
    }
}
