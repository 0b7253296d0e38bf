//! Paper registry and reference corpus operations
//!
//! The full upload/CRUD surface lives elsewhere; the check service needs the
//! lookup the submit path validates against, plus corpus seeding for
//! operators.

use crate::models::PaperKind;
use chrono::{DateTime, Utc};
use paperqc_common::{Error, Result};
use sqlx::{Row, SqlitePool};

/// One stored paper
#[derive(Debug, Clone)]
pub struct Paper {
    pub id: i64,
    pub kind: PaperKind,
    pub title: String,
    pub file_path: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

/// Look up a paper by id and kind
pub async fn get_paper(pool: &SqlitePool, id: i64, kind: PaperKind) -> Result<Option<Paper>> {
    let row = sqlx::query(
        "SELECT id, kind, title, file_path, created_by, created_at FROM papers WHERE id = ? AND kind = ?",
    )
    .bind(id)
    .bind(kind.as_str())
    .fetch_optional(pool)
    .await?;

    row.map(|row| {
        let kind: String = row.get("kind");
        let created_at: String = row.get("created_at");
        Ok(Paper {
            id: row.get("id"),
            kind: kind.parse()?,
            title: row.get("title"),
            file_path: row.get("file_path"),
            created_by: row.get("created_by"),
            created_at: parse_timestamp(&created_at)?,
        })
    })
    .transpose()
}

/// Register a stored paper, returning its id
pub async fn insert_paper(
    pool: &SqlitePool,
    kind: PaperKind,
    title: &str,
    file_path: &str,
    created_by: i64,
) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO papers (kind, title, file_path, created_by, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(kind.as_str())
    .bind(title)
    .bind(file_path)
    .bind(created_by)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Add one paper to the reference corpus, returning its id
pub async fn insert_reference_paper(
    pool: &SqlitePool,
    title: &str,
    content: &str,
    author: Option<&str>,
    year: Option<i64>,
) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO reference_papers (title, content, author, year) VALUES (?, ?, ?, ?)",
    )
    .bind(title)
    .bind(content)
    .bind(author)
    .bind(year)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse timestamp {}: {}", raw, e)))
}
