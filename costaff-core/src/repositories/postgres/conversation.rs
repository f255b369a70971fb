// costaff-core/src/repositories/postgres/conversation.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use costaff_common::models::{Conversation, ConversationStatus, ConversationType};

use crate::Error;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn create(
        &self,
        workspace_id: Uuid,
        member_id: Uuid,
        title: Option<String>,
        conversation_type: ConversationType,
    ) -> Result<Conversation, Error>;
    async fn get(&self, conversation_id: Uuid) -> Result<Option<Conversation>, Error>;
    /// Tenant-scoped read: the row only comes back if it belongs to the
    /// member making the request.
    async fn get_for_member(
        &self,
        conversation_id: Uuid,
        member_id: Uuid,
    ) -> Result<Option<Conversation>, Error>;
    async fn list_for_member(&self, member_id: Uuid) -> Result<Vec<Conversation>, Error>;
    async fn set_status(
        &self,
        conversation_id: Uuid,
        status: ConversationStatus,
    ) -> Result<(), Error>;
    /// Refreshes `updated_at` after a completed turn.
    async fn touch(&self, conversation_id: Uuid) -> Result<(), Error>;
}

#[derive(Clone)]
pub struct PostgresConversationRepository {
    pool: Pool<Postgres>,
}

impl PostgresConversationRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PostgresConversationRepository {
    async fn create(
        &self,
        workspace_id: Uuid,
        member_id: Uuid,
        title: Option<String>,
        conversation_type: ConversationType,
    ) -> Result<Conversation, Error> {
        let row = sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (workspace_id, member_id, title, conversation_type)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(workspace_id)
        .bind(member_id)
        .bind(title)
        .bind(conversation_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get(&self, conversation_id: Uuid) -> Result<Option<Conversation>, Error> {
        let row = sqlx::query_as::<_, Conversation>(
            "SELECT * FROM conversations WHERE conversation_id = $1",
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_for_member(
        &self,
        conversation_id: Uuid,
        member_id: Uuid,
    ) -> Result<Option<Conversation>, Error> {
        let row = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT * FROM conversations
             WHERE conversation_id = $1
               AND member_id = $2
            "#,
        )
        .bind(conversation_id)
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_for_member(&self, member_id: Uuid) -> Result<Vec<Conversation>, Error> {
        let rows = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT * FROM conversations
             WHERE member_id = $1
             ORDER BY updated_at DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn set_status(
        &self,
        conversation_id: Uuid,
        status: ConversationStatus,
    ) -> Result<(), Error> {
        let result = sqlx::query(
            "UPDATE conversations SET status = $2 WHERE conversation_id = $1",
        )
        .bind(conversation_id)
        .bind(status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("conversation {conversation_id}")));
        }
        Ok(())
    }

    async fn touch(&self, conversation_id: Uuid) -> Result<(), Error> {
        sqlx::query("UPDATE conversations SET updated_at = now() WHERE conversation_id = $1")
            .bind(conversation_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
