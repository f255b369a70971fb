// File: costaff-common/src/models/document.rs

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
#[sqlx(rename_all = "snake_case")]
pub enum DocType {
    PitchDeck,
    BrandGuide,
    ProductSpec,
    Sop,
    Other,
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocType::PitchDeck => write!(f, "pitch_deck"),
            DocType::BrandGuide => write!(f, "brand_guide"),
            DocType::ProductSpec => write!(f, "product_spec"),
            DocType::Sop => write!(f, "sop"),
            DocType::Other => write!(f, "other"),
        }
    }
}

impl FromStr for DocType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pitch_deck" => Ok(DocType::PitchDeck),
            "brand_guide" => Ok(DocType::BrandGuide),
            "product_spec" => Ok(DocType::ProductSpec),
            "sop" => Ok(DocType::Sop),
            "other" => Ok(DocType::Other),
            _ => Err(format!("Unknown doc type: {}", s)),
        }
    }
}

impl From<String> for DocType {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(DocType::Other)
    }
}

/// Uploaded text content scoped to a workspace. `content_text` holds the
/// extracted plain text, capped at 50,000 characters at upload time.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Document {
    pub document_id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub file_path: Option<String>,
    pub content_text: Option<String>,
    pub doc_type: DocType,
    pub created_at: DateTime<Utc>,
}
