//! Document parser collaborator
//!
//! Turning the stored binary document into structured content is external to
//! this service. The default implementation reads the structured JSON
//! sidecar the upload pipeline stores alongside the binary; a parser failure
//! is fatal to the owning check task.

use crate::models::ParsedDocument;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Document parser errors
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed document: {0}")]
    Malformed(String),
}

/// Produces structured content from a stored document
#[async_trait]
pub trait DocumentParser: Send + Sync {
    async fn parse(&self, path: &Path) -> Result<ParsedDocument, ParseError>;
}

/// Loads the pre-extracted JSON form of a document
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentParser;

#[async_trait]
impl DocumentParser for JsonDocumentParser {
    async fn parse(&self, path: &Path) -> Result<ParsedDocument, ParseError> {
        let bytes = tokio::fs::read(path).await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ParseError::Malformed(format!("{}: {}", path.display(), e))
        })
    }
}
