//! Format stage: page margins, fonts, heading structure
//!
//! Pure function of the parsed metadata; no external calls.

use crate::checkers::StageChecker;
use crate::models::{IssueCategory, IssueDraft, ParsedDocument, Severity};
use async_trait::async_trait;
use paperqc_common::Result;
use std::collections::HashSet;

/// Minimum left margin: 2 cm (360,000 EMU per cm)
pub const MIN_LEFT_MARGIN_EMU: i64 = 720_000;
/// Fonts accepted without comment
pub const STANDARD_FONTS: [&str; 4] = ["SimSun", "Times New Roman", "SimHei", "Arial"];
/// Documents with fewer headings than this read as weakly structured
pub const MIN_HEADINGS: usize = 3;

/// Format stage checker
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatChecker;

#[async_trait]
impl StageChecker for FormatChecker {
    fn stage(&self) -> &'static str {
        "format"
    }

    async fn check(&self, doc: &ParsedDocument) -> Result<Vec<IssueDraft>> {
        let mut issues = Vec::new();

        let left_margin = doc.page_setup.left_margin_emu.unwrap_or(0);
        if left_margin < MIN_LEFT_MARGIN_EMU {
            issues.push(
                IssueDraft::new(
                    IssueCategory::FormatPage,
                    Severity::Warning,
                    "page setup",
                    "Left margin is below 2 cm",
                )
                .with_suggestion("Set the left margin to at least 2 cm"),
            );
        }

        let mut reported_fonts = HashSet::new();
        for font in &doc.fonts {
            let Some(name) = font.name.as_deref() else {
                continue;
            };
            if STANDARD_FONTS.contains(&name) || !reported_fonts.insert(name.to_string()) {
                continue;
            }
            issues.push(
                IssueDraft::new(
                    IssueCategory::FormatFont,
                    Severity::Info,
                    "body",
                    format!("Non-standard font in use: {}", name),
                )
                .with_suggestion(format!(
                    "Prefer a standard font: {}",
                    STANDARD_FONTS.join(", ")
                )),
            );
        }

        if doc.headings.len() < MIN_HEADINGS {
            issues.push(
                IssueDraft::new(
                    IssueCategory::FormatHeading,
                    Severity::Warning,
                    "document structure",
                    "Few heading levels; the document structure may be unclear",
                )
                .with_suggestion("Organize the document with multi-level headings"),
            );
        }

        Ok(issues)
    }
}
