use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{dto::BookInput, repo_types::Book};
use crate::error::StoreError;

#[async_trait]
pub trait BookRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<Book>, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<Book>, StoreError>;
    async fn create(&self, input: BookInput) -> Result<Book, StoreError>;
    /// `None` when no book has this id.
    async fn update(&self, id: Uuid, input: BookInput) -> Result<Option<Book>, StoreError>;
    /// `false` when no book has this id.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgBookRepo {
    db: PgPool,
}

impl PgBookRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepo for PgBookRepo {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, genre, publication_date
            FROM books
            ORDER BY title
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Book>, StoreError> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, genre, publication_date
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create(&self, input: BookInput) -> Result<Book, StoreError> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, genre, publication_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, author, genre, publication_date
            "#,
        )
        .bind(&input.title)
        .bind(&input.author)
        .bind(&input.genre)
        .bind(input.publication_date)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, input: BookInput) -> Result<Option<Book>, StoreError> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
               SET title = $2, author = $3, genre = $4, publication_date = $5
             WHERE id = $1
            RETURNING id, title, author, genre, publication_date
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.author)
        .bind(&input.genre)
        .bind(input.publication_date)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
