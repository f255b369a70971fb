// costaff-core/src/repositories/postgres/checkin.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use costaff_common::models::DailyCheckin;

use super::is_unique_violation;
use crate::Error;

#[derive(Debug, Clone)]
pub struct NewCheckin {
    pub workspace_id: Uuid,
    pub member_id: Uuid,
    pub working_on: String,
    pub blockers: Option<String>,
    pub ai_guidance: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckinRepository: Send + Sync {
    /// Inserts today's check-in. A second submission for the same member and
    /// date hits the store's uniqueness constraint and comes back as
    /// [`Error::Conflict`]; the first row is left untouched.
    async fn insert(&self, checkin: &NewCheckin) -> Result<DailyCheckin, Error>;
    async fn get(&self, checkin_id: Uuid) -> Result<Option<DailyCheckin>, Error>;
    /// Overwrites the founder note (free text, unversioned).
    async fn set_founder_note(&self, checkin_id: Uuid, note: &str) -> Result<(), Error>;
    async fn list_for_workspace(
        &self,
        workspace_id: Uuid,
        limit: i64,
    ) -> Result<Vec<DailyCheckin>, Error>;
}

#[derive(Clone)]
pub struct PostgresCheckinRepository {
    pool: Pool<Postgres>,
}

impl PostgresCheckinRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckinRepository for PostgresCheckinRepository {
    async fn insert(&self, checkin: &NewCheckin) -> Result<DailyCheckin, Error> {
        let row = sqlx::query_as::<_, DailyCheckin>(
            r#"
            INSERT INTO daily_checkins (
                workspace_id, member_id, working_on, blockers, ai_guidance
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(checkin.workspace_id)
        .bind(checkin.member_id)
        .bind(&checkin.working_on)
        .bind(&checkin.blockers)
        .bind(&checkin.ai_guidance)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Conflict("You've already submitted a check-in for today".to_string())
            } else {
                Error::Database(e)
            }
        })?;

        Ok(row)
    }

    async fn get(&self, checkin_id: Uuid) -> Result<Option<DailyCheckin>, Error> {
        let row = sqlx::query_as::<_, DailyCheckin>(
            "SELECT * FROM daily_checkins WHERE checkin_id = $1",
        )
        .bind(checkin_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_founder_note(&self, checkin_id: Uuid, note: &str) -> Result<(), Error> {
        let result = sqlx::query(
            "UPDATE daily_checkins SET founder_notes = $2 WHERE checkin_id = $1",
        )
        .bind(checkin_id)
        .bind(note)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("check-in {checkin_id}")));
        }
        Ok(())
    }

    async fn list_for_workspace(
        &self,
        workspace_id: Uuid,
        limit: i64,
    ) -> Result<Vec<DailyCheckin>, Error> {
        let rows = sqlx::query_as::<_, DailyCheckin>(
            r#"
            SELECT * FROM daily_checkins
             WHERE workspace_id = $1
             ORDER BY checkin_date DESC, created_at DESC
             LIMIT $2
            "#,
        )
        .bind(workspace_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
