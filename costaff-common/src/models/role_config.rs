// File: costaff-common/src/models/role_config.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reusable coaching profile attachable to any number of team members.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct RoleConfig {
    pub role_config_id: Uuid,
    pub workspace_id: Uuid,
    pub title: String,
    pub success_metrics: Option<String>,
    pub decision_boundaries: Option<String>,
    pub frameworks: Option<String>,
    pub context_prompt: Option<String>,
    pub created_at: DateTime<Utc>,
}
