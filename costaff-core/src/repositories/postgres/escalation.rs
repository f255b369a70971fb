// costaff-core/src/repositories/postgres/escalation.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use costaff_common::models::{Escalation, EscalationStatus};

use crate::Error;

#[derive(Debug, Clone)]
pub struct NewEscalation {
    pub conversation_id: Uuid,
    pub member_id: Uuid,
    pub workspace_id: Uuid,
    pub summary: String,
    pub context: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EscalationRepository: Send + Sync {
    async fn insert(&self, escalation: &NewEscalation) -> Result<Escalation, Error>;
    async fn get(&self, escalation_id: Uuid) -> Result<Option<Escalation>, Error>;
    /// pending -> resolved, terminal. Stores the founder's literal response
    /// (or the dismissal sentinel) and stamps `resolved_at`.
    async fn resolve(
        &self,
        escalation_id: Uuid,
        founder_response: &str,
    ) -> Result<Escalation, Error>;
    async fn list_for_workspace(
        &self,
        workspace_id: Uuid,
        status: Option<EscalationStatus>,
    ) -> Result<Vec<Escalation>, Error>;
}

#[derive(Clone)]
pub struct PostgresEscalationRepository {
    pool: Pool<Postgres>,
}

impl PostgresEscalationRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EscalationRepository for PostgresEscalationRepository {
    async fn insert(&self, escalation: &NewEscalation) -> Result<Escalation, Error> {
        let row = sqlx::query_as::<_, Escalation>(
            r#"
            INSERT INTO escalations (
                conversation_id, member_id, workspace_id, summary, context, status
            )
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING *
            "#,
        )
        .bind(escalation.conversation_id)
        .bind(escalation.member_id)
        .bind(escalation.workspace_id)
        .bind(&escalation.summary)
        .bind(&escalation.context)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get(&self, escalation_id: Uuid) -> Result<Option<Escalation>, Error> {
        let row = sqlx::query_as::<_, Escalation>(
            "SELECT * FROM escalations WHERE escalation_id = $1",
        )
        .bind(escalation_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn resolve(
        &self,
        escalation_id: Uuid,
        founder_response: &str,
    ) -> Result<Escalation, Error> {
        let row = sqlx::query_as::<_, Escalation>(
            r#"
            UPDATE escalations
               SET status = 'resolved',
                   founder_response = $2,
                   resolved_at = now()
             WHERE escalation_id = $1
               AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(escalation_id)
        .bind(founder_response)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| {
            Error::Conflict(format!("escalation {escalation_id} is not pending"))
        })
    }

    async fn list_for_workspace(
        &self,
        workspace_id: Uuid,
        status: Option<EscalationStatus>,
    ) -> Result<Vec<Escalation>, Error> {
        let rows = sqlx::query_as::<_, Escalation>(
            r#"
            SELECT * FROM escalations
             WHERE workspace_id = $1
               AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC
            "#,
        )
        .bind(workspace_id)
        .bind(status.map(|s| s.to_string()))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
