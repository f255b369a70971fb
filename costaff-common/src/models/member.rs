// File: costaff-common/src/models/member.rs

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
#[sqlx(rename_all = "lowercase")]
pub enum MemberStatus {
    Invited,
    Active,
    Deactivated,
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberStatus::Invited => write!(f, "invited"),
            MemberStatus::Active => write!(f, "active"),
            MemberStatus::Deactivated => write!(f, "deactivated"),
        }
    }
}

impl FromStr for MemberStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "invited" => Ok(MemberStatus::Invited),
            "active" => Ok(MemberStatus::Active),
            "deactivated" => Ok(MemberStatus::Deactivated),
            _ => Err(format!("Unknown member status: {}", s)),
        }
    }
}

/// A workspace's coached user.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct TeamMember {
    pub member_id: Uuid,
    pub workspace_id: Uuid,
    /// Linked account in the identity provider; set when the invite is
    /// redeemed.
    pub user_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub role_title: String,
    pub role_config_id: Option<Uuid>,
    /// Single-use; nulled after redemption.
    pub invite_token: Option<String>,
    pub status: MemberStatus,
    pub created_at: DateTime<Utc>,
}
