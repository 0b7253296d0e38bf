//! Content stage: length, AI logic review, duplication estimate

use crate::checkers::StageChecker;
use crate::models::{IssueCategory, IssueDraft, ParsedDocument, Severity};
use crate::services::AiReviewer;
use async_trait::async_trait;
use paperqc_common::Result;
use std::sync::Arc;

/// Bodies shorter than this (in chars) are flagged as too short
pub const MIN_CONTENT_CHARS: usize = 1000;
/// Only a bounded sample is sent for AI review
pub const AI_SAMPLE_CHARS: usize = 2000;
/// Duplication rate above this is critical
pub const DUPLICATE_RATE_CRITICAL: f64 = 15.0;
/// Duplication rate above this is a warning
pub const DUPLICATE_RATE_WARNING: f64 = 10.0;

/// Content stage checker
pub struct ContentChecker {
    ai: Option<Arc<dyn AiReviewer>>,
}

impl ContentChecker {
    pub fn new(ai: Option<Arc<dyn AiReviewer>>) -> Self {
        Self { ai }
    }

    /// Best-effort AI logic review of a bounded sample
    async fn logic_review(&self, sample: &str) -> Vec<IssueDraft> {
        let Some(ai) = &self.ai else {
            return Vec::new();
        };

        match ai.review_content(sample).await {
            Ok(review) => review
                .issues
                .into_iter()
                .map(|issue| {
                    IssueDraft::new(
                        IssueCategory::ContentLogic,
                        Severity::Warning,
                        issue.location.unwrap_or_else(|| "unknown".to_string()),
                        issue.description,
                    )
                    .with_suggestion("Review and revise this passage")
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "AI content review failed, skipping");
                Vec::new()
            }
        }
    }

    /// Best-effort duplication estimate over a bounded sample
    async fn duplication_check(&self, sample: &str) -> Option<IssueDraft> {
        let ai = self.ai.as_ref()?;

        let rate = match ai.duplication_rate(sample).await {
            Ok(report) => report.duplicate_rate,
            Err(e) => {
                tracing::warn!(error = %e, "Duplication check failed, skipping");
                return None;
            }
        };

        if rate > DUPLICATE_RATE_CRITICAL {
            Some(
                IssueDraft::new(
                    IssueCategory::ContentDuplicate,
                    Severity::Critical,
                    "full text",
                    format!("Duplication rate is far too high: {:.1}%", rate),
                )
                .with_suggestion("Rework the duplicated passages; the text must be original")
                .with_confidence(rate / 100.0),
            )
        } else if rate > DUPLICATE_RATE_WARNING {
            Some(
                IssueDraft::new(
                    IssueCategory::ContentDuplicate,
                    Severity::Warning,
                    "full text",
                    format!("Duplication rate is high: {:.1}%", rate),
                )
                .with_suggestion("Rephrase the most duplicated passages")
                .with_confidence(rate / 100.0),
            )
        } else {
            None
        }
    }
}

#[async_trait]
impl StageChecker for ContentChecker {
    fn stage(&self) -> &'static str {
        "content"
    }

    async fn check(&self, doc: &ParsedDocument) -> Result<Vec<IssueDraft>> {
        let mut issues = Vec::new();

        let content = doc.full_text.as_str();
        let char_count = content.chars().count();

        if char_count < MIN_CONTENT_CHARS {
            issues.push(
                IssueDraft::new(
                    IssueCategory::ContentLogic,
                    Severity::Error,
                    "full text",
                    format!("Paper body is too short ({} characters)", char_count),
                )
                .with_suggestion("The body should cover the topic in full"),
            );
        }

        let sample: String = content.chars().take(AI_SAMPLE_CHARS).collect();

        issues.extend(self.logic_review(&sample).await);
        issues.extend(self.duplication_check(&sample).await);

        Ok(issues)
    }
}
