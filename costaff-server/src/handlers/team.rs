// costaff-server/src/handlers/team.rs

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use costaff_common::models::TeamMember;

use crate::auth::AuthUser;
use crate::context::ServerContext;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub name: String,
    pub email: String,
    pub role_title: String,
    pub role_config_id: Option<Uuid>,
}

pub async fn add(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    Json(req): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<TeamMember>), ApiError> {
    let member = ctx
        .team
        .add_member(user.0, &req.name, &req.email, &req.role_title, req.role_config_id)
        .await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn list(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
) -> Result<Json<Vec<TeamMember>>, ApiError> {
    Ok(Json(ctx.team.list(user.0).await?))
}

pub async fn deactivate(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    Path(member_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    ctx.team.deactivate(user.0, member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Burns a single-use invite token and binds the membership to the calling
/// account.
pub async fn join(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    Path(token): Path<String>,
) -> Result<Json<TeamMember>, ApiError> {
    Ok(Json(ctx.team.redeem_invite(user.0, &token).await?))
}
