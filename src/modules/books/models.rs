use catalog_kernel::Db;
use serde::{Deserialize, Serialize};
use sqlx::SqliteExecutor;

const BOOK_COLUMNS: &str = "id, title, author, genre, description, publication_date, \
                            availability_status, edition, summary, created_at, updated_at";

/// Row model for the `books` table. `created_at` is stamped by SQLite at
/// insert; `updated_at` is refreshed by every update.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub publication_date: String,
    pub availability_status: String,
    pub edition: String,
    pub summary: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Validated content fields of a book, as accepted by POST and PUT.
#[derive(Debug, Clone, Deserialize)]
pub struct BookPayload {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub publication_date: String,
    pub availability_status: String,
    pub edition: String,
    pub summary: String,
}

impl Book {
    pub async fn list_all(db: &Db) -> sqlx::Result<Vec<Book>> {
        sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"))
            .fetch_all(db)
            .await
    }

    pub async fn find_by_id(
        executor: impl SqliteExecutor<'_>,
        id: i64,
    ) -> sqlx::Result<Option<Book>> {
        sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn insert(
        executor: impl SqliteExecutor<'_>,
        payload: &BookPayload,
    ) -> sqlx::Result<Book> {
        sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (title, author, genre, description, publication_date, \
             availability_status, edition, summary) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&payload.title)
        .bind(&payload.author)
        .bind(&payload.genre)
        .bind(&payload.description)
        .bind(&payload.publication_date)
        .bind(&payload.availability_status)
        .bind(&payload.edition)
        .bind(&payload.summary)
        .fetch_one(executor)
        .await
    }

    /// Overwrite every content field of the row in place and refresh
    /// `updated_at`.
    pub async fn update(
        executor: impl SqliteExecutor<'_>,
        id: i64,
        payload: &BookPayload,
    ) -> sqlx::Result<Book> {
        sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET title = ?, author = ?, genre = ?, description = ?, \
             publication_date = ?, availability_status = ?, edition = ?, summary = ?, \
             updated_at = (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')) \
             WHERE id = ? \
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&payload.title)
        .bind(&payload.author)
        .bind(&payload.genre)
        .bind(&payload.description)
        .bind(&payload.publication_date)
        .bind(&payload.availability_status)
        .bind(&payload.edition)
        .bind(&payload.summary)
        .bind(id)
        .fetch_one(executor)
        .await
    }

    pub async fn delete(executor: impl SqliteExecutor<'_>, id: i64) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
