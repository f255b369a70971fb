// costaff-server/src/handlers/workspace.rs

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use costaff_common::models::{CoachingStyle, Workspace};

use crate::auth::AuthUser;
use crate::context::ServerContext;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateWorkspaceRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub name: String,
    pub coaching_style: String,
    pub custom_instructions: Option<String>,
    /// Plaintext credential; encrypted before storage, never echoed back.
    pub api_key: Option<String>,
}

/// Client-facing workspace shape. The encrypted credential never leaves the
/// server; clients only learn whether one is set.
#[derive(Debug, Serialize)]
pub struct WorkspaceView {
    pub workspace_id: Uuid,
    pub name: String,
    pub coaching_style: CoachingStyle,
    pub custom_instructions: Option<String>,
    pub has_api_key: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Workspace> for WorkspaceView {
    fn from(w: Workspace) -> Self {
        Self {
            workspace_id: w.workspace_id,
            name: w.name,
            coaching_style: w.coaching_style,
            custom_instructions: w.custom_instructions,
            has_api_key: w.api_key_encrypted.is_some(),
            created_at: w.created_at,
        }
    }
}

pub async fn create(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    Json(req): Json<CreateWorkspaceRequest>,
) -> Result<(StatusCode, Json<WorkspaceView>), ApiError> {
    let workspace = ctx.workspaces.create(user.0, &req.name).await?;
    Ok((StatusCode::CREATED, Json(workspace.into())))
}

pub async fn get(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
) -> Result<Json<WorkspaceView>, ApiError> {
    let workspace = ctx.workspaces.get_for_founder(user.0).await?;
    Ok(Json(workspace.into()))
}

pub async fn update_settings(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<WorkspaceView>, ApiError> {
    let workspace = ctx
        .workspaces
        .update_settings(
            user.0,
            &req.name,
            CoachingStyle::from(req.coaching_style),
            req.custom_instructions,
            req.api_key,
        )
        .await?;
    Ok(Json(workspace.into()))
}
