// costaff-server/src/handlers/escalations.rs

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use costaff_common::models::{Escalation, EscalationStatus};
use costaff_common::Error;

use crate::auth::AuthUser;
use crate::context::ServerContext;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalateRequest {
    pub conversation_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub response: Option<String>,
    #[serde(default)]
    pub dismiss: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// Member hands the conversation to their founder.
pub async fn escalate(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    Json(req): Json<EscalateRequest>,
) -> Result<(StatusCode, Json<Escalation>), ApiError> {
    let escalation = ctx.escalations.escalate(user.0, req.conversation_id).await?;
    Ok((StatusCode::CREATED, Json(escalation)))
}

pub async fn respond(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    Path(escalation_id): Path<Uuid>,
    Json(req): Json<RespondRequest>,
) -> Result<Json<Escalation>, ApiError> {
    let response = if req.dismiss {
        None
    } else {
        let text = req
            .response
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| ApiError(Error::Parse("Response text is required".to_string())))?;
        Some(text)
    };
    Ok(Json(
        ctx.escalations.respond(user.0, escalation_id, response).await?,
    ))
}

pub async fn list(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Escalation>>, ApiError> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(
            raw.parse::<EscalationStatus>()
                .map_err(|e| ApiError(Error::Parse(e)))?,
        ),
        None => None,
    };
    Ok(Json(ctx.escalations.list_for_founder(user.0, status).await?))
}
