use async_trait::async_trait;
use rusqlite::params;
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::{ContentRecord, NewContent};

use super::schema::SCHEMA;
use super::DocumentStore;

/// SQLite-backed document store. Each row keeps the full document as JSON.
pub struct ContentRepository {
    conn: Connection,
}

impl ContentRepository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;
        Self::init(conn).await
    }

    pub async fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    pub async fn count(&self) -> Result<u64> {
        let count = self
            .conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM content_documents", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;
        Ok(count.max(0) as u64)
    }
}

#[async_trait]
impl DocumentStore for ContentRepository {
    async fn insert_content(&self, content: NewContent) -> Result<i64> {
        let body = serde_json::to_string(&content)?;
        let url = content.url;
        let created_at = content.created_at.to_rfc3339();

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO content_documents (url, body, created_at) VALUES (?1, ?2, ?3)",
                    params![url, body, created_at],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        Ok(id)
    }

    async fn delete_content_by_url(&self, url: &str) -> Result<u64> {
        let url = url.to_string();
        let deleted = self
            .conn
            .call(move |conn| {
                let deleted = conn.execute(
                    r#"DELETE FROM content_documents
                       WHERE id = (SELECT id FROM content_documents WHERE url = ?1 ORDER BY id LIMIT 1)"#,
                    params![url],
                )?;
                Ok(deleted)
            })
            .await?;
        Ok(deleted as u64)
    }

    async fn find_content_by_url(&self, url: &str) -> Result<Vec<ContentRecord>> {
        let url = url.to_string();
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, body FROM content_documents WHERE url = ?1 ORDER BY id",
                )?;
                let rows = stmt
                    .query_map(params![url], |row| {
                        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        rows.into_iter()
            .map(|(id, body)| {
                let doc: NewContent = serde_json::from_str(&body)?;
                Ok(ContentRecord {
                    id,
                    url: doc.url,
                    content: doc.content,
                    created_at: doc.created_at,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_keeps_duplicates_for_same_url() {
        let repo = ContentRepository::in_memory().await.unwrap();
        let first = repo
            .insert_content(NewContent::new("https://a.dev/post", "One."))
            .await
            .unwrap();
        let second = repo
            .insert_content(NewContent::new("https://a.dev/post", "Two."))
            .await
            .unwrap();

        assert_ne!(first, second);
        let docs = repo.find_content_by_url("https://a.dev/post").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content, "One.");
        assert_eq!(docs[1].content, "Two.");
    }

    #[tokio::test]
    async fn delete_by_url_removes_one_document() {
        let repo = ContentRepository::in_memory().await.unwrap();
        repo.insert_content(NewContent::new("https://a.dev/x", "a")).await.unwrap();
        repo.insert_content(NewContent::new("https://a.dev/x", "b")).await.unwrap();
        repo.insert_content(NewContent::new("https://a.dev/y", "c")).await.unwrap();

        assert_eq!(repo.delete_content_by_url("https://a.dev/x").await.unwrap(), 1);
        assert_eq!(repo.count().await.unwrap(), 2);

        let left = repo.find_content_by_url("https://a.dev/x").await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].content, "b");
    }

    #[tokio::test]
    async fn delete_by_url_is_exact_match() {
        let repo = ContentRepository::in_memory().await.unwrap();
        repo.insert_content(NewContent::new("https://a.dev/x", "a")).await.unwrap();

        assert_eq!(repo.delete_content_by_url("https://a.dev/X").await.unwrap(), 0);
        assert_eq!(repo.delete_content_by_url("https://a.dev").await.unwrap(), 0);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn documents_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.db");
        let path = path.to_string_lossy().to_string();

        {
            let repo = ContentRepository::new(&path).await.unwrap();
            repo.insert_content(NewContent::new("https://a.dev/keep", "Kept."))
                .await
                .unwrap();
        }

        let repo = ContentRepository::new(&path).await.unwrap();
        let docs = repo.find_content_by_url("https://a.dev/keep").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "Kept.");
    }
}
