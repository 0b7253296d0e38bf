//! Graded findings produced by the stage checkers
//!
//! Issues are write-once: created during a task's single execution run and
//! never mutated afterwards.

use chrono::{DateTime, Utc};
use paperqc_common::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Fixed issue taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    TitleDuplicate,
    TitleFormat,
    FormatPage,
    FormatFont,
    FormatParagraph,
    FormatHeading,
    FormatReference,
    FormatTable,
    FormatFigure,
    ContentDuplicate,
    ContentLogic,
    ContentGrammar,
    ContentSpelling,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::TitleDuplicate => "title_duplicate",
            IssueCategory::TitleFormat => "title_format",
            IssueCategory::FormatPage => "format_page",
            IssueCategory::FormatFont => "format_font",
            IssueCategory::FormatParagraph => "format_paragraph",
            IssueCategory::FormatHeading => "format_heading",
            IssueCategory::FormatReference => "format_reference",
            IssueCategory::FormatTable => "format_table",
            IssueCategory::FormatFigure => "format_figure",
            IssueCategory::ContentDuplicate => "content_duplicate",
            IssueCategory::ContentLogic => "content_logic",
            IssueCategory::ContentGrammar => "content_grammar",
            IssueCategory::ContentSpelling => "content_spelling",
        }
    }
}

impl FromStr for IssueCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title_duplicate" => Ok(IssueCategory::TitleDuplicate),
            "title_format" => Ok(IssueCategory::TitleFormat),
            "format_page" => Ok(IssueCategory::FormatPage),
            "format_font" => Ok(IssueCategory::FormatFont),
            "format_paragraph" => Ok(IssueCategory::FormatParagraph),
            "format_heading" => Ok(IssueCategory::FormatHeading),
            "format_reference" => Ok(IssueCategory::FormatReference),
            "format_table" => Ok(IssueCategory::FormatTable),
            "format_figure" => Ok(IssueCategory::FormatFigure),
            "content_duplicate" => Ok(IssueCategory::ContentDuplicate),
            "content_logic" => Ok(IssueCategory::ContentLogic),
            "content_grammar" => Ok(IssueCategory::ContentGrammar),
            "content_spelling" => Ok(IssueCategory::ContentSpelling),
            other => Err(Error::Internal(format!("Unknown issue category: {}", other))),
        }
    }
}

/// Issue severity, critical > error > warning > info
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Severity::Critical),
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(Error::Internal(format!("Unknown severity: {}", other))),
        }
    }
}

/// An issue as produced by a stage checker, before persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueDraft {
    pub category: IssueCategory,
    pub severity: Severity,

    /// Free-text location pointer, e.g. "title" or "paragraph 3"
    pub location: String,

    pub description: String,
    pub suggestion: Option<String>,

    /// Confidence score in [0, 1] when derived from a similarity or AI score
    pub confidence: Option<f64>,

    /// Free-form extra data
    pub extra: Option<serde_json::Value>,
}

impl IssueDraft {
    pub fn new(
        category: IssueCategory,
        severity: Severity,
        location: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category,
            severity,
            location: location.into(),
            description: description.into(),
            suggestion: None,
            confidence: None,
            extra: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Confidence is clamped to [0, 1]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    pub fn with_extra(mut self, extra: serde_json::Value) -> Self {
        self.extra = Some(extra);
        self
    }
}

/// A persisted issue belonging to exactly one check task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: i64,
    pub task_id: Uuid,
    pub category: IssueCategory,
    pub severity: Severity,
    pub location: String,
    pub description: String,
    pub suggestion: Option<String>,
    pub confidence: Option<f64>,
    pub extra: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
