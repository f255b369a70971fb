// costaff-server/src/handlers/checkins.rs

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use costaff_common::models::DailyCheckin;

use crate::auth::AuthUser;
use crate::context::ServerContext;
use crate::error::ApiError;

const DEFAULT_LIST_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCheckinRequest {
    pub working_on: String,
    pub blockers: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct FounderNoteRequest {
    pub note: String,
}

/// Submit response body: the guidance only, under the documented
/// `aiGuidance` key.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinResponse {
    pub ai_guidance: String,
}

impl From<DailyCheckin> for CheckinResponse {
    fn from(c: DailyCheckin) -> Self {
        Self {
            ai_guidance: c.ai_guidance.unwrap_or_default(),
        }
    }
}

pub async fn submit(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    Json(req): Json<SubmitCheckinRequest>,
) -> Result<Json<CheckinResponse>, ApiError> {
    let checkin = ctx
        .checkins
        .submit(user.0, &req.working_on, req.blockers.as_deref())
        .await?;
    Ok(Json(checkin.into()))
}

pub async fn list(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<DailyCheckin>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    Ok(Json(ctx.checkins.list_for_founder(user.0, limit).await?))
}

pub async fn add_note(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    Path(checkin_id): Path<Uuid>,
    Json(req): Json<FounderNoteRequest>,
) -> Result<StatusCode, ApiError> {
    ctx.checkins.add_founder_note(user.0, checkin_id, &req.note).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn checkin(guidance: Option<&str>) -> DailyCheckin {
        DailyCheckin {
            checkin_id: Uuid::new_v4(),
            workspace_id: Uuid::new_v4(),
            member_id: Uuid::new_v4(),
            checkin_date: Utc::now().date_naive(),
            working_on: Some("launch prep".to_string()),
            blockers: None,
            ai_guidance: guidance.map(String::from),
            founder_notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn submit_body_carries_camel_case_guidance_only() {
        let body =
            serde_json::to_value(CheckinResponse::from(checkin(Some("Focus on the launch."))))
                .unwrap();
        assert_eq!(body["aiGuidance"], "Focus on the launch.");
        assert!(body.get("ai_guidance").is_none());
        assert!(body.get("working_on").is_none());
    }

    #[test]
    fn missing_guidance_serializes_as_empty_string() {
        let body = serde_json::to_value(CheckinResponse::from(checkin(None))).unwrap();
        assert_eq!(body["aiGuidance"], "");
    }
}
