//! Title stage: extractability, length bounds, corpus duplication, AI review

use crate::checkers::StageChecker;
use crate::models::{IssueCategory, IssueDraft, ParsedDocument, Severity};
use crate::services::{AiReviewer, ReferenceSearch};
use crate::similarity::{SimilarityCandidate, SimilarityEngine, SimilarityMatch};
use async_trait::async_trait;
use paperqc_common::Result;
use std::sync::Arc;

/// Titles shorter than this (in chars) are flagged as too short
pub const TITLE_MIN_CHARS: usize = 5;
/// Titles longer than this (in chars) are flagged as too long
pub const TITLE_MAX_CHARS: usize = 100;
/// Combined-similarity cutoff for reporting a corpus title as a duplicate
pub const TITLE_SIMILARITY_THRESHOLD: f64 = 0.7;
/// Above this similarity a duplicate is an error rather than a warning
pub const TITLE_DUPLICATE_ERROR_THRESHOLD: f64 = 0.9;
/// Corpus scan cap
pub const MAX_REFERENCE_TITLES: u32 = 100;
/// Only the top matches are reported
pub const MAX_REPORTED_DUPLICATES: usize = 3;
/// Similar titles passed to the AI reviewer as context
pub const AI_CONTEXT_TITLES: usize = 5;

/// Title stage checker
pub struct TitleChecker {
    similarity: Arc<SimilarityEngine>,
    search: Arc<dyn ReferenceSearch>,
    ai: Option<Arc<dyn AiReviewer>>,
}

impl TitleChecker {
    pub fn new(
        similarity: Arc<SimilarityEngine>,
        search: Arc<dyn ReferenceSearch>,
        ai: Option<Arc<dyn AiReviewer>>,
    ) -> Self {
        Self {
            similarity,
            search,
            ai,
        }
    }

    /// Scan the reference corpus for near-duplicate titles.
    ///
    /// A search failure is transient-external: logged and recovered as an
    /// empty match list.
    async fn find_duplicates(&self, title: &str) -> Vec<SimilarityMatch> {
        let references = match self.search.similar_titles(title, MAX_REFERENCE_TITLES).await {
            Ok(references) => references,
            Err(e) => {
                tracing::warn!(error = %e, "Reference title search failed, skipping duplicate scan");
                return Vec::new();
            }
        };

        if references.is_empty() {
            return Vec::new();
        }

        let candidates: Vec<SimilarityCandidate> = references
            .into_iter()
            .map(|reference| SimilarityCandidate {
                id: reference.id,
                text: reference.title,
            })
            .collect();

        self.similarity
            .rank_similar(title, &candidates, TITLE_SIMILARITY_THRESHOLD)
    }

    /// Best-effort AI review; any failure contributes zero issues
    async fn ai_review(&self, title: &str, similar: &[SimilarityMatch]) -> Vec<IssueDraft> {
        let Some(ai) = &self.ai else {
            return Vec::new();
        };

        let context: Vec<String> = similar
            .iter()
            .take(AI_CONTEXT_TITLES)
            .map(|m| m.text.clone())
            .collect();

        match ai.review_title(title, &context).await {
            Ok(review) => review
                .issues
                .into_iter()
                .map(|issue| {
                    IssueDraft::new(IssueCategory::TitleFormat, Severity::Warning, "title", issue)
                        .with_suggestion("Consider revising per the review notes")
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "AI title review failed, skipping");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl StageChecker for TitleChecker {
    fn stage(&self) -> &'static str {
        "title"
    }

    async fn check(&self, doc: &ParsedDocument) -> Result<Vec<IssueDraft>> {
        let mut issues = Vec::new();

        let title = doc
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let Some(title) = title else {
            issues.push(
                IssueDraft::new(
                    IssueCategory::TitleFormat,
                    Severity::Critical,
                    "document start",
                    "No title found in the document",
                )
                .with_suggestion("Make sure the paper opens with a clear title"),
            );
            // Nothing else to analyze without a title
            return Ok(issues);
        };

        let char_count = title.chars().count();
        if char_count < TITLE_MIN_CHARS {
            issues.push(
                IssueDraft::new(
                    IssueCategory::TitleFormat,
                    Severity::Warning,
                    "title",
                    format!("Title is too short ({} characters)", char_count),
                )
                .with_suggestion("A title should state the paper's subject clearly"),
            );
        } else if char_count > TITLE_MAX_CHARS {
            issues.push(
                IssueDraft::new(
                    IssueCategory::TitleFormat,
                    Severity::Warning,
                    "title",
                    format!("Title is too long ({} characters)", char_count),
                )
                .with_suggestion("Keep the title concise"),
            );
        }

        let duplicates = self.find_duplicates(title).await;
        for duplicate in duplicates.iter().take(MAX_REPORTED_DUPLICATES) {
            let severity = if duplicate.similarity > TITLE_DUPLICATE_ERROR_THRESHOLD {
                Severity::Error
            } else {
                Severity::Warning
            };
            issues.push(
                IssueDraft::new(
                    IssueCategory::TitleDuplicate,
                    severity,
                    "title",
                    format!(
                        "Title closely matches a prior paper ({:.1}% similar)",
                        duplicate.similarity * 100.0
                    ),
                )
                .with_suggestion(format!(
                    "Similar paper: {}. Adjust the title to set this work apart",
                    duplicate.text
                ))
                .with_confidence(duplicate.similarity),
            );
        }

        issues.extend(self.ai_review(title, &duplicates).await);

        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{
        AiContentReview, AiDuplicationReport, AiError, AiTitleReview, ReferenceTitle,
    };

    struct FakeSearch {
        titles: Vec<ReferenceTitle>,
    }

    #[async_trait]
    impl ReferenceSearch for FakeSearch {
        async fn similar_titles(&self, _text: &str, limit: u32) -> paperqc_common::Result<Vec<ReferenceTitle>> {
            Ok(self.titles.iter().take(limit as usize).cloned().collect())
        }
    }

    struct FailingSearch;

    #[async_trait]
    impl ReferenceSearch for FailingSearch {
        async fn similar_titles(&self, _text: &str, _limit: u32) -> paperqc_common::Result<Vec<ReferenceTitle>> {
            Err(paperqc_common::Error::Internal("search index offline".to_string()))
        }
    }

    struct UnreachableAi;

    #[async_trait]
    impl AiReviewer for UnreachableAi {
        async fn review_title(
            &self,
            _: &str,
            _: &[String],
        ) -> std::result::Result<AiTitleReview, AiError> {
            Err(AiError::Timeout)
        }
        async fn review_content(&self, _: &str) -> std::result::Result<AiContentReview, AiError> {
            Err(AiError::Timeout)
        }
        async fn duplication_rate(
            &self,
            _: &str,
        ) -> std::result::Result<AiDuplicationReport, AiError> {
            Err(AiError::Timeout)
        }
    }

    fn checker(search: Arc<dyn ReferenceSearch>, ai: Option<Arc<dyn AiReviewer>>) -> TitleChecker {
        TitleChecker::new(Arc::new(SimilarityEngine::default()), search, ai)
    }

    fn doc_with_title(title: &str) -> ParsedDocument {
        ParsedDocument {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn missing_title_is_single_critical_issue() {
        let checker = checker(Arc::new(FakeSearch { titles: vec![] }), None);
        let issues = checker.check(&ParsedDocument::default()).await.unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[0].category, IssueCategory::TitleFormat);
    }

    #[tokio::test]
    async fn blank_title_counts_as_missing() {
        let checker = checker(Arc::new(FakeSearch { titles: vec![] }), None);
        let issues = checker.check(&doc_with_title("   ")).await.unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[tokio::test]
    async fn short_title_warns_without_duplicate_issues_on_empty_corpus() {
        let checker = checker(Arc::new(FakeSearch { titles: vec![] }), None);
        let issues = checker.check(&doc_with_title("AI")).await.unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].description.contains("too short"));
        assert!(issues
            .iter()
            .all(|i| i.category != IssueCategory::TitleDuplicate));
    }

    #[tokio::test]
    async fn overlong_title_warns() {
        let long_title = "A ".repeat(60);
        let checker = checker(Arc::new(FakeSearch { titles: vec![] }), None);
        let issues = checker.check(&doc_with_title(&long_title)).await.unwrap();

        assert_eq!(issues.len(), 1);
        assert!(issues[0].description.contains("too long"));
    }

    #[tokio::test]
    async fn identical_corpus_title_is_error_with_full_confidence() {
        let title = "Design and Implementation of a Campus Card System";
        let checker = checker(
            Arc::new(FakeSearch {
                titles: vec![ReferenceTitle {
                    id: 1,
                    title: title.to_string(),
                }],
            }),
            None,
        );

        let issues = checker.check(&doc_with_title(title)).await.unwrap();
        let duplicate = issues
            .iter()
            .find(|i| i.category == IssueCategory::TitleDuplicate)
            .expect("duplicate issue");

        assert_eq!(duplicate.severity, Severity::Error);
        let confidence = duplicate.confidence.unwrap();
        assert!((confidence - 1.0).abs() < 1e-9, "confidence {}", confidence);
    }

    #[tokio::test]
    async fn at_most_three_duplicates_reported() {
        let title = "Evaluation of Stream Processing Engines";
        let titles: Vec<ReferenceTitle> = (0..6)
            .map(|i| ReferenceTitle {
                id: i,
                title: title.to_string(),
            })
            .collect();
        let checker = checker(Arc::new(FakeSearch { titles }), None);

        let issues = checker.check(&doc_with_title(title)).await.unwrap();
        let duplicates = issues
            .iter()
            .filter(|i| i.category == IssueCategory::TitleDuplicate)
            .count();
        assert_eq!(duplicates, MAX_REPORTED_DUPLICATES);
    }

    #[tokio::test]
    async fn search_failure_is_swallowed() {
        let checker = checker(Arc::new(FailingSearch), None);
        let issues = checker
            .check(&doc_with_title("A Perfectly Reasonable Title"))
            .await
            .unwrap();
        assert!(issues.is_empty());
    }

    #[tokio::test]
    async fn unreachable_ai_contributes_nothing() {
        let checker = checker(
            Arc::new(FakeSearch { titles: vec![] }),
            Some(Arc::new(UnreachableAi)),
        );
        let issues = checker
            .check(&doc_with_title("A Perfectly Reasonable Title"))
            .await
            .unwrap();
        assert!(issues.is_empty());
    }
}
