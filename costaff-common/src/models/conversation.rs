// File: costaff-common/src/models/conversation.rs

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
#[sqlx(rename_all = "lowercase")]
pub enum ConversationStatus {
    Active,
    Escalated,
    Resolved,
}

impl fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationStatus::Active => write!(f, "active"),
            ConversationStatus::Escalated => write!(f, "escalated"),
            ConversationStatus::Resolved => write!(f, "resolved"),
        }
    }
}

impl FromStr for ConversationStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ConversationStatus::Active),
            "escalated" => Ok(ConversationStatus::Escalated),
            "resolved" => Ok(ConversationStatus::Resolved),
            _ => Err(format!("Unknown conversation status: {}", s)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
#[sqlx(rename_all = "snake_case")]
pub enum ConversationType {
    Chat,
    DailyCheckin,
    Decision,
}

impl fmt::Display for ConversationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationType::Chat => write!(f, "chat"),
            ConversationType::DailyCheckin => write!(f, "daily_checkin"),
            ConversationType::Decision => write!(f, "decision"),
        }
    }
}

impl FromStr for ConversationType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chat" => Ok(ConversationType::Chat),
            "daily_checkin" => Ok(ConversationType::DailyCheckin),
            "decision" => Ok(ConversationType::Decision),
            _ => Err(format!("Unknown conversation type: {}", s)),
        }
    }
}

/// A thread belonging to one team member.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Conversation {
    pub conversation_id: Uuid,
    pub workspace_id: Uuid,
    pub member_id: Uuid,
    pub title: Option<String>,
    pub conversation_type: ConversationType,
    pub status: ConversationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
