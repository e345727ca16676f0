use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{dto::QuoteInput, repo_types::Quote};
use crate::error::StoreError;

#[async_trait]
pub trait QuoteRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<Quote>, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<Quote>, StoreError>;
    async fn create(&self, input: QuoteInput) -> Result<Quote, StoreError>;
    async fn update(&self, id: Uuid, input: QuoteInput) -> Result<Option<Quote>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgQuoteRepo {
    db: PgPool,
}

impl PgQuoteRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QuoteRepo for PgQuoteRepo {
    async fn list(&self) -> Result<Vec<Quote>, StoreError> {
        let rows = sqlx::query_as::<_, Quote>(
            r#"SELECT id, quote_text, author FROM quotes ORDER BY author, quote_text"#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Quote>, StoreError> {
        let row = sqlx::query_as::<_, Quote>(
            r#"SELECT id, quote_text, author FROM quotes WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create(&self, input: QuoteInput) -> Result<Quote, StoreError> {
        let row = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes (quote_text, author)
            VALUES ($1, $2)
            RETURNING id, quote_text, author
            "#,
        )
        .bind(&input.quote_text)
        .bind(&input.author)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, input: QuoteInput) -> Result<Option<Quote>, StoreError> {
        let row = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes
               SET quote_text = $2, author = $3
             WHERE id = $1
            RETURNING id, quote_text, author
            "#,
        )
        .bind(id)
        .bind(&input.quote_text)
        .bind(&input.author)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM quotes WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
