// File: costaff-common/src/models/escalation.rs

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel stored as `founder_response` when a founder dismisses an
/// escalation instead of replying.
pub const DISMISSED_RESPONSE: &str = "[dismissed]";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
#[sqlx(rename_all = "lowercase")]
pub enum EscalationStatus {
    Pending,
    Resolved,
    Dismissed,
}

impl fmt::Display for EscalationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscalationStatus::Pending => write!(f, "pending"),
            EscalationStatus::Resolved => write!(f, "resolved"),
            EscalationStatus::Dismissed => write!(f, "dismissed"),
        }
    }
}

impl FromStr for EscalationStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(EscalationStatus::Pending),
            "resolved" => Ok(EscalationStatus::Resolved),
            "dismissed" => Ok(EscalationStatus::Dismissed),
            _ => Err(format!("Unknown escalation status: {}", s)),
        }
    }
}

/// A founder-facing brief generated from a conversation, plus the state of
/// the founder's response to it.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Escalation {
    pub escalation_id: Uuid,
    pub conversation_id: Uuid,
    pub member_id: Uuid,
    pub workspace_id: Uuid,
    pub summary: Option<String>,
    /// Transcript snapshot taken at escalation time.
    pub context: Option<String>,
    pub status: EscalationStatus,
    pub founder_response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}
