// costaff-core/src/repositories/postgres/document.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use costaff_common::models::{DocType, Document};

use crate::Error;

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub workspace_id: Uuid,
    pub name: String,
    pub file_path: Option<String>,
    pub content_text: Option<String>,
    pub doc_type: DocType,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn insert(&self, document: &NewDocument) -> Result<Document, Error>;
    async fn get(&self, document_id: Uuid) -> Result<Option<Document>, Error>;
    async fn delete(&self, document_id: Uuid) -> Result<(), Error>;
    async fn list_for_workspace(&self, workspace_id: Uuid) -> Result<Vec<Document>, Error>;
}

#[derive(Clone)]
pub struct PostgresDocumentRepository {
    pool: Pool<Postgres>,
}

impl PostgresDocumentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn insert(&self, document: &NewDocument) -> Result<Document, Error> {
        let row = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (workspace_id, name, file_path, content_text, doc_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(document.workspace_id)
        .bind(&document.name)
        .bind(&document.file_path)
        .bind(&document.content_text)
        .bind(document.doc_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get(&self, document_id: Uuid) -> Result<Option<Document>, Error> {
        let row = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE document_id = $1",
        )
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, document_id: Uuid) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM documents WHERE document_id = $1")
            .bind(document_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("document {document_id}")));
        }
        Ok(())
    }

    async fn list_for_workspace(&self, workspace_id: Uuid) -> Result<Vec<Document>, Error> {
        let rows = sqlx::query_as::<_, Document>(
            r#"
            SELECT * FROM documents
             WHERE workspace_id = $1
             ORDER BY created_at
            "#,
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
