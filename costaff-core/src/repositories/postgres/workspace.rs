// costaff-core/src/repositories/postgres/workspace.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use costaff_common::models::{CoachingStyle, Workspace};

use super::is_unique_violation;
use crate::Error;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    async fn create(&self, name: &str, founder_user_id: Uuid) -> Result<Workspace, Error>;
    async fn get(&self, workspace_id: Uuid) -> Result<Option<Workspace>, Error>;
    async fn get_by_founder(&self, founder_user_id: Uuid) -> Result<Option<Workspace>, Error>;
    async fn update_settings(
        &self,
        workspace_id: Uuid,
        name: &str,
        coaching_style: CoachingStyle,
        custom_instructions: Option<String>,
        api_key_encrypted: Option<String>,
    ) -> Result<Workspace, Error>;
}

#[derive(Clone)]
pub struct PostgresWorkspaceRepository {
    pool: Pool<Postgres>,
}

impl PostgresWorkspaceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkspaceRepository for PostgresWorkspaceRepository {
    async fn create(&self, name: &str, founder_user_id: Uuid) -> Result<Workspace, Error> {
        let row = sqlx::query_as::<_, Workspace>(
            r#"
            INSERT INTO workspaces (name, founder_user_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(founder_user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Conflict("This account already has a workspace".to_string())
            } else {
                Error::Database(e)
            }
        })?;

        Ok(row)
    }

    async fn get(&self, workspace_id: Uuid) -> Result<Option<Workspace>, Error> {
        let row = sqlx::query_as::<_, Workspace>(
            "SELECT * FROM workspaces WHERE workspace_id = $1",
        )
        .bind(workspace_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_by_founder(&self, founder_user_id: Uuid) -> Result<Option<Workspace>, Error> {
        let row = sqlx::query_as::<_, Workspace>(
            "SELECT * FROM workspaces WHERE founder_user_id = $1",
        )
        .bind(founder_user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_settings(
        &self,
        workspace_id: Uuid,
        name: &str,
        coaching_style: CoachingStyle,
        custom_instructions: Option<String>,
        api_key_encrypted: Option<String>,
    ) -> Result<Workspace, Error> {
        // The credential only changes when a new one was supplied.
        let row = sqlx::query_as::<_, Workspace>(
            r#"
            UPDATE workspaces
               SET name = $2,
                   coaching_style = $3,
                   custom_instructions = $4,
                   api_key_encrypted = COALESCE($5, api_key_encrypted)
             WHERE workspace_id = $1
            RETURNING *
            "#,
        )
        .bind(workspace_id)
        .bind(name)
        .bind(coaching_style)
        .bind(custom_instructions)
        .bind(api_key_encrypted)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| Error::NotFound(format!("workspace {workspace_id}")))
    }
}
