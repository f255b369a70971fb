// costaff-core/src/repositories/postgres/message.rs

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use costaff_common::models::{Message, MessageRole};

use crate::Error;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Appends one message; the store assigns the monotonic `seq` key.
    async fn insert(
        &self,
        conversation_id: Uuid,
        role: MessageRole,
        content: &str,
        metadata: Value,
    ) -> Result<Message, Error>;
    /// The last `limit` messages of a conversation, in ascending seq order.
    async fn list_recent(
        &self,
        conversation_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Message>, Error>;
}

#[derive(Clone)]
pub struct PostgresMessageRepository {
    pool: Pool<Postgres>,
}

impl PostgresMessageRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn insert(
        &self,
        conversation_id: Uuid,
        role: MessageRole,
        content: &str,
        metadata: Value,
    ) -> Result<Message, Error> {
        let row = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (conversation_id, role, content, metadata)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(conversation_id)
        .bind(role)
        .bind(content)
        .bind(metadata)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_recent(
        &self,
        conversation_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Message>, Error> {
        let rows = sqlx::query_as::<_, Message>(
            r#"
            SELECT * FROM (
                SELECT * FROM messages
                 WHERE conversation_id = $1
                 ORDER BY seq DESC
                 LIMIT $2
            ) recent
            ORDER BY seq ASC
            "#,
        )
        .bind(conversation_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
