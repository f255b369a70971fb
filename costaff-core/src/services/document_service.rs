// costaff-core/src/services/document_service.rs

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use costaff_common::models::{DocType, Document};

use crate::repositories::{DocumentRepository, NewDocument, WorkspaceRepository};
use crate::Error;

/// Extracted text is capped before it ever reaches the store.
pub const MAX_CONTENT_CHARS: usize = 50_000;

const TEXT_EXTENSIONS: [&str; 3] = [".txt", ".md", ".text"];

pub struct DocumentService {
    workspaces: Arc<dyn WorkspaceRepository>,
    documents: Arc<dyn DocumentRepository>,
}

impl DocumentService {
    pub fn new(
        workspaces: Arc<dyn WorkspaceRepository>,
        documents: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self { workspaces, documents }
    }

    /// Stores an uploaded file's extracted text. Only recognized text-like
    /// extensions are extracted; anything else gets a placeholder noting
    /// extraction was unavailable.
    pub async fn upload(
        &self,
        founder_user_id: Uuid,
        file_name: &str,
        doc_type: DocType,
        bytes: &[u8],
    ) -> Result<Document, Error> {
        let workspace = self
            .workspaces
            .get_by_founder(founder_user_id)
            .await?
            .ok_or_else(|| Error::Forbidden("Not a workspace founder".to_string()))?;

        let content_text = truncate_chars(&extract_text(file_name, bytes), MAX_CONTENT_CHARS);
        let file_path = format!(
            "{}/{}-{}",
            workspace.workspace_id,
            Utc::now().timestamp_millis(),
            file_name
        );

        let document = self
            .documents
            .insert(&NewDocument {
                workspace_id: workspace.workspace_id,
                name: file_name.to_string(),
                file_path: Some(file_path),
                content_text: Some(content_text),
                doc_type,
            })
            .await?;

        info!(document = %document.document_id, "document uploaded");
        Ok(document)
    }

    pub async fn delete(&self, founder_user_id: Uuid, document_id: Uuid) -> Result<(), Error> {
        let workspace = self
            .workspaces
            .get_by_founder(founder_user_id)
            .await?
            .ok_or_else(|| Error::Forbidden("Not a workspace founder".to_string()))?;

        let document = self
            .documents
            .get(document_id)
            .await?
            .filter(|d| d.workspace_id == workspace.workspace_id)
            .ok_or_else(|| Error::NotFound(format!("document {document_id}")))?;

        self.documents.delete(document.document_id).await
    }

    pub async fn list(&self, founder_user_id: Uuid) -> Result<Vec<Document>, Error> {
        let workspace = self
            .workspaces
            .get_by_founder(founder_user_id)
            .await?
            .ok_or_else(|| Error::Forbidden("Not a workspace founder".to_string()))?;
        self.documents.list_for_workspace(workspace.workspace_id).await
    }
}

fn extract_text(file_name: &str, bytes: &[u8]) -> String {
    let lower = file_name.to_lowercase();
    if TEXT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        format!("[File: {file_name} - text extraction not available for this format]")
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
