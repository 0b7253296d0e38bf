//! Stage checkers
//!
//! One analyzer per stage (title, format, content), all behind a single
//! trait. Each checker is a function of the parsed document plus its
//! injected collaborators, and returns findings in discovery order. Checkers
//! never reach into the task record; the orchestrator owns persistence.

pub mod content;
pub mod format;
pub mod title;

pub use content::ContentChecker;
pub use format::FormatChecker;
pub use title::TitleChecker;

use crate::models::{IssueDraft, ParsedDocument};
use async_trait::async_trait;
use paperqc_common::Result;

/// One analysis stage
#[async_trait]
pub trait StageChecker: Send + Sync {
    /// Stage name for logging
    fn stage(&self) -> &'static str;

    /// Analyze the document, returning findings in discovery order.
    ///
    /// Best-effort sub-steps (AI review, corpus search) are handled inside
    /// the checker; an error from this method is fatal to the owning task.
    async fn check(&self, doc: &ParsedDocument) -> Result<Vec<IssueDraft>>;
}
