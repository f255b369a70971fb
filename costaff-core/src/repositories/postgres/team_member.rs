// costaff-core/src/repositories/postgres/team_member.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use costaff_common::models::{MemberStatus, TeamMember};

use super::is_unique_violation;
use crate::Error;

/// Fields for a new invitation.
#[derive(Debug, Clone)]
pub struct NewTeamMember {
    pub workspace_id: Uuid,
    pub name: String,
    pub email: String,
    pub role_title: String,
    pub role_config_id: Option<Uuid>,
    pub invite_token: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamMemberRepository: Send + Sync {
    async fn insert(&self, member: &NewTeamMember) -> Result<TeamMember, Error>;
    async fn get(&self, member_id: Uuid) -> Result<Option<TeamMember>, Error>;
    /// The coached principal behind a request: the member row linked to this
    /// account with status `active`, if any.
    async fn get_active_by_user(&self, user_id: Uuid) -> Result<Option<TeamMember>, Error>;
    async fn get_by_invite_token(&self, token: &str) -> Result<Option<TeamMember>, Error>;
    /// Links the account, activates the membership, and burns the token.
    async fn redeem_invite(&self, member_id: Uuid, user_id: Uuid) -> Result<TeamMember, Error>;
    async fn deactivate(&self, member_id: Uuid) -> Result<(), Error>;
    async fn list_for_workspace(&self, workspace_id: Uuid) -> Result<Vec<TeamMember>, Error>;
}

#[derive(Clone)]
pub struct PostgresTeamMemberRepository {
    pool: Pool<Postgres>,
}

impl PostgresTeamMemberRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamMemberRepository for PostgresTeamMemberRepository {
    async fn insert(&self, member: &NewTeamMember) -> Result<TeamMember, Error> {
        let row = sqlx::query_as::<_, TeamMember>(
            r#"
            INSERT INTO team_members (
                workspace_id, name, email, role_title, role_config_id,
                invite_token, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(member.workspace_id)
        .bind(&member.name)
        .bind(&member.email)
        .bind(&member.role_title)
        .bind(member.role_config_id)
        .bind(&member.invite_token)
        .bind(MemberStatus::Invited)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get(&self, member_id: Uuid) -> Result<Option<TeamMember>, Error> {
        let row = sqlx::query_as::<_, TeamMember>(
            "SELECT * FROM team_members WHERE member_id = $1",
        )
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_active_by_user(&self, user_id: Uuid) -> Result<Option<TeamMember>, Error> {
        let row = sqlx::query_as::<_, TeamMember>(
            r#"
            SELECT * FROM team_members
             WHERE user_id = $1
               AND status = 'active'
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_by_invite_token(&self, token: &str) -> Result<Option<TeamMember>, Error> {
        let row = sqlx::query_as::<_, TeamMember>(
            "SELECT * FROM team_members WHERE invite_token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn redeem_invite(&self, member_id: Uuid, user_id: Uuid) -> Result<TeamMember, Error> {
        let row = sqlx::query_as::<_, TeamMember>(
            r#"
            UPDATE team_members
               SET user_id = $2,
                   status = 'active',
                   invite_token = NULL
             WHERE member_id = $1
               AND status = 'invited'
            RETURNING *
            "#,
        )
        .bind(member_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                // Partial unique index: one active membership per account.
                Error::Conflict("This account is already an active team member".to_string())
            } else {
                Error::Database(e)
            }
        })?;

        row.ok_or_else(|| Error::NotFound("Invite already redeemed or revoked".to_string()))
    }

    async fn deactivate(&self, member_id: Uuid) -> Result<(), Error> {
        let result = sqlx::query(
            "UPDATE team_members SET status = 'deactivated' WHERE member_id = $1",
        )
        .bind(member_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("team member {member_id}")));
        }
        Ok(())
    }

    async fn list_for_workspace(&self, workspace_id: Uuid) -> Result<Vec<TeamMember>, Error> {
        let rows = sqlx::query_as::<_, TeamMember>(
            r#"
            SELECT * FROM team_members
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
