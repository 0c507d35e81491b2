use catalog_kernel::Db;
use serde::{Deserialize, Serialize};
use sqlx::SqliteExecutor;

/// Row model for the `products` table. Names are stored lower-cased;
/// every lookup folds its argument the same way, which is what makes the
/// unique-name invariant case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
}

impl Product {
    pub async fn list_all(db: &Db) -> sqlx::Result<Vec<Product>> {
        sqlx::query_as::<_, Product>("SELECT id, name FROM products ORDER BY id")
            .fetch_all(db)
            .await
    }

    pub async fn find_by_name(
        executor: impl SqliteExecutor<'_>,
        name: &str,
    ) -> sqlx::Result<Option<Product>> {
        sqlx::query_as::<_, Product>("SELECT id, name FROM products WHERE name = ?")
            .bind(name.to_lowercase())
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl SqliteExecutor<'_>,
        id: i64,
    ) -> sqlx::Result<Option<Product>> {
        sqlx::query_as::<_, Product>("SELECT id, name FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn insert(executor: impl SqliteExecutor<'_>, name: &str) -> sqlx::Result<Product> {
        sqlx::query_as::<_, Product>("INSERT INTO products (name) VALUES (?) RETURNING id, name")
            .bind(name.to_lowercase())
            .fetch_one(executor)
            .await
    }

    pub async fn rename(
        executor: impl SqliteExecutor<'_>,
        id: i64,
        new_name: &str,
    ) -> sqlx::Result<Product> {
        sqlx::query_as::<_, Product>(
            "UPDATE products SET name = ? WHERE id = ? RETURNING id, name",
        )
        .bind(new_name.to_lowercase())
        .bind(id)
        .fetch_one(executor)
        .await
    }

    pub async fn delete(executor: impl SqliteExecutor<'_>, id: i64) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
