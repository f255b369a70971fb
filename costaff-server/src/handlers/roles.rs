// costaff-server/src/handlers/roles.rs

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use costaff_common::models::RoleConfig;
use costaff_core::repositories::RoleConfigFields;

use crate::auth::AuthUser;
use crate::context::ServerContext;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleConfigRequest {
    pub title: String,
    pub success_metrics: Option<String>,
    pub decision_boundaries: Option<String>,
    pub frameworks: Option<String>,
    pub context_prompt: Option<String>,
}

impl From<RoleConfigRequest> for RoleConfigFields {
    fn from(r: RoleConfigRequest) -> Self {
        Self {
            title: r.title,
            success_metrics: r.success_metrics,
            decision_boundaries: r.decision_boundaries,
            frameworks: r.frameworks,
            context_prompt: r.context_prompt,
        }
    }
}

pub async fn create(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    Json(req): Json<RoleConfigRequest>,
) -> Result<(StatusCode, Json<RoleConfig>), ApiError> {
    let role = ctx.roles.create(user.0, req.into()).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

pub async fn list(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
) -> Result<Json<Vec<RoleConfig>>, ApiError> {
    Ok(Json(ctx.roles.list(user.0).await?))
}

pub async fn update(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    Path(role_config_id): Path<Uuid>,
    Json(req): Json<RoleConfigRequest>,
) -> Result<Json<RoleConfig>, ApiError> {
    Ok(Json(ctx.roles.update(user.0, role_config_id, req.into()).await?))
}

pub async fn delete(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    Path(role_config_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    ctx.roles.delete(user.0, role_config_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
