// File: costaff-common/src/models/checkin.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One record per (member, calendar date); uniqueness enforced by the store.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct DailyCheckin {
    pub checkin_id: Uuid,
    pub workspace_id: Uuid,
    pub member_id: Uuid,
    pub checkin_date: NaiveDate,
    pub working_on: Option<String>,
    pub blockers: Option<String>,
    pub ai_guidance: Option<String>,
    /// Founder note; overwritable, not versioned.
    pub founder_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
