// costaff-core/src/repositories/postgres/role_config.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use costaff_common::models::RoleConfig;

use crate::Error;

/// Writable role-config fields, shared by create and update.
#[derive(Debug, Clone)]
pub struct RoleConfigFields {
    pub title: String,
    pub success_metrics: Option<String>,
    pub decision_boundaries: Option<String>,
    pub frameworks: Option<String>,
    pub context_prompt: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleConfigRepository: Send + Sync {
    async fn insert(
        &self,
        workspace_id: Uuid,
        fields: &RoleConfigFields,
    ) -> Result<RoleConfig, Error>;
    async fn get(&self, role_config_id: Uuid) -> Result<Option<RoleConfig>, Error>;
    async fn update(
        &self,
        role_config_id: Uuid,
        fields: &RoleConfigFields,
    ) -> Result<RoleConfig, Error>;
    async fn delete(&self, role_config_id: Uuid) -> Result<(), Error>;
    async fn list_for_workspace(&self, workspace_id: Uuid) -> Result<Vec<RoleConfig>, Error>;
}

#[derive(Clone)]
pub struct PostgresRoleConfigRepository {
    pool: Pool<Postgres>,
}

impl PostgresRoleConfigRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleConfigRepository for PostgresRoleConfigRepository {
    async fn insert(
        &self,
        workspace_id: Uuid,
        fields: &RoleConfigFields,
    ) -> Result<RoleConfig, Error> {
        let row = sqlx::query_as::<_, RoleConfig>(
            r#"
            INSERT INTO role_configs (
                workspace_id, title, success_metrics, decision_boundaries,
                frameworks, context_prompt
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(workspace_id)
        .bind(&fields.title)
        .bind(&fields.success_metrics)
        .bind(&fields.decision_boundaries)
        .bind(&fields.frameworks)
        .bind(&fields.context_prompt)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get(&self, role_config_id: Uuid) -> Result<Option<RoleConfig>, Error> {
        let row = sqlx::query_as::<_, RoleConfig>(
            "SELECT * FROM role_configs WHERE role_config_id = $1",
        )
        .bind(role_config_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        role_config_id: Uuid,
        fields: &RoleConfigFields,
    ) -> Result<RoleConfig, Error> {
        let row = sqlx::query_as::<_, RoleConfig>(
            r#"
            UPDATE role_configs
               SET title = $2,
                   success_metrics = $3,
                   decision_boundaries = $4,
                   frameworks = $5,
                   context_prompt = $6
             WHERE role_config_id = $1
            RETURNING *
            "#,
        )
        .bind(role_config_id)
        .bind(&fields.title)
        .bind(&fields.success_metrics)
        .bind(&fields.decision_boundaries)
        .bind(&fields.frameworks)
        .bind(&fields.context_prompt)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| Error::NotFound(format!("role config {role_config_id}")))
    }

    async fn delete(&self, role_config_id: Uuid) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM role_configs WHERE role_config_id = $1")
            .bind(role_config_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("role config {role_config_id}")));
        }
        Ok(())
    }

    async fn list_for_workspace(&self, workspace_id: Uuid) -> Result<Vec<RoleConfig>, Error> {
        let rows = sqlx::query_as::<_, RoleConfig>(
            r#"
            SELECT * FROM role_configs
             WHERE workspace_id = $1
             ORDER BY created_at
            "#,
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
