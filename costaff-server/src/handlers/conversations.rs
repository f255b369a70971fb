// costaff-server/src/handlers/conversations.rs

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use costaff_common::models::{Conversation, Message};

use crate::auth::AuthUser;
use crate::context::ServerContext;
use crate::error::ApiError;

const DEFAULT_MESSAGE_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub limit: Option<i64>,
}

pub async fn list(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
) -> Result<Json<Vec<Conversation>>, ApiError> {
    Ok(Json(ctx.chat.list_conversations(user.0).await?))
}

/// Messages in ascending order; the tail of the thread when `limit` cuts it
/// off.
pub async fn messages(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    Path(conversation_id): Path<Uuid>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_MESSAGE_LIMIT);
    Ok(Json(
        ctx.chat.list_messages(user.0, conversation_id, limit).await?,
    ))
}
