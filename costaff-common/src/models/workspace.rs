// File: costaff-common/src/models/workspace.rs

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the assistant coaches a workspace's members.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
#[sqlx(rename_all = "lowercase")]
pub enum CoachingStyle {
    Socratic,
    Direct,
    Balanced,
}

impl fmt::Display for CoachingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoachingStyle::Socratic => write!(f, "socratic"),
            CoachingStyle::Direct => write!(f, "direct"),
            CoachingStyle::Balanced => write!(f, "balanced"),
        }
    }
}

impl FromStr for CoachingStyle {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "socratic" => Ok(CoachingStyle::Socratic),
            "direct" => Ok(CoachingStyle::Direct),
            "balanced" => Ok(CoachingStyle::Balanced),
            _ => Err(format!("Unknown coaching style: {}", s)),
        }
    }
}

impl From<String> for CoachingStyle {
    // The stored value is operator-supplied free text; anything unexpected
    // coaches with the balanced block.
    fn from(s: String) -> Self {
        s.parse().unwrap_or(CoachingStyle::Balanced)
    }
}

/// Tenant root. One workspace per founder account.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Workspace {
    pub workspace_id: Uuid,
    pub name: String,
    pub founder_user_id: Uuid,
    /// Vault-encrypted provider credential; never leaves the server.
    pub api_key_encrypted: Option<String>,
    pub coaching_style: CoachingStyle,
    pub custom_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
}
