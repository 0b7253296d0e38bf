//! Reference corpus search collaborator
//!
//! A black-box lexical oracle over the prior-paper corpus: given free text,
//! return candidate titles for the similarity engine to rank. The corpus is
//! read-only from the pipeline's perspective.

use async_trait::async_trait;
use paperqc_common::Result;
use sqlx::{Row, SqlitePool};

/// One candidate title from the reference corpus
#[derive(Debug, Clone)]
pub struct ReferenceTitle {
    pub id: i64,
    pub title: String,
}

/// Ranked candidate lookup over the reference corpus
#[async_trait]
pub trait ReferenceSearch: Send + Sync {
    /// Candidate titles for the given text, at most `limit`
    async fn similar_titles(&self, text: &str, limit: u32) -> Result<Vec<ReferenceTitle>>;
}

/// Reference corpus backed by the service's reference_papers table
#[derive(Clone)]
pub struct SqliteReferenceStore {
    db: SqlitePool,
}

impl SqliteReferenceStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReferenceSearch for SqliteReferenceStore {
    async fn similar_titles(&self, _text: &str, limit: u32) -> Result<Vec<ReferenceTitle>> {
        // Recall source only: the similarity engine does the actual ranking,
        // so candidate retrieval is a bounded scan in corpus order.
        let rows = sqlx::query("SELECT id, title FROM reference_papers ORDER BY id LIMIT ?")
            .bind(limit as i64)
            .fetch_all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| ReferenceTitle {
                id: row.get("id"),
                title: row.get("title"),
            })
            .collect())
    }
}
