// costaff-server/src/handlers/documents.rs

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use costaff_common::models::{DocType, Document};
use costaff_common::Error;

use crate::auth::AuthUser;
use crate::context::ServerContext;
use crate::error::ApiError;

/// Multipart upload with a `file` part and an optional `doc_type` text
/// part. Unknown document types fall back to `other`.
pub async fn upload(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut doc_type = DocType::Other;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError(Error::Parse(e.to_string())))?
    {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError(Error::Parse(e.to_string())))?;
                file = Some((name, data.to_vec()));
            }
            Some("doc_type") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError(Error::Parse(e.to_string())))?;
                doc_type = DocType::from(text);
            }
            _ => {}
        }
    }

    let (name, bytes) =
        file.ok_or_else(|| ApiError(Error::Parse("Missing file field".to_string())))?;

    let document = ctx.documents.upload(user.0, &name, doc_type, &bytes).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn list(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(ctx.documents.list(user.0).await?))
}

pub async fn delete(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthUser,
    Path(document_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    ctx.documents.delete(user.0, document_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
