// costaff-core/src/services/workspace_service.rs

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use costaff_common::models::{CoachingStyle, Workspace};

use crate::crypto::Encryptor;
use crate::repositories::WorkspaceRepository;
use crate::Error;

pub struct WorkspaceService {
    workspaces: Arc<dyn WorkspaceRepository>,
    encryptor: Encryptor,
}

impl WorkspaceService {
    pub fn new(workspaces: Arc<dyn WorkspaceRepository>, encryptor: Encryptor) -> Self {
        Self { workspaces, encryptor }
    }

    /// One workspace per founder account. A second create attempt surfaces
    /// the store's uniqueness violation as [`Error::Conflict`].
    pub async fn create(&self, founder_user_id: Uuid, name: &str) -> Result<Workspace, Error> {
        let workspace = self.workspaces.create(name, founder_user_id).await?;
        info!(workspace = %workspace.workspace_id, "workspace created");
        Ok(workspace)
    }

    pub async fn get_for_founder(&self, founder_user_id: Uuid) -> Result<Workspace, Error> {
        self.workspaces
            .get_by_founder(founder_user_id)
            .await?
            .ok_or_else(|| Error::NotFound("No workspace for this account".to_string()))
    }

    /// Updates workspace settings. A blank or absent API key leaves the
    /// stored credential untouched; a non-blank one is encrypted before it
    /// reaches the store. The plaintext is never persisted or logged.
    pub async fn update_settings(
        &self,
        founder_user_id: Uuid,
        name: &str,
        coaching_style: CoachingStyle,
        custom_instructions: Option<String>,
        api_key: Option<String>,
    ) -> Result<Workspace, Error> {
        let workspace = self
            .workspaces
            .get_by_founder(founder_user_id)
            .await?
            .ok_or_else(|| Error::Forbidden("Not a workspace founder".to_string()))?;

        let api_key_encrypted = match api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Some(self.encryptor.encrypt(key)?),
            _ => None,
        };

        self.workspaces
            .update_settings(
                workspace.workspace_id,
                name,
                coaching_style,
                custom_instructions,
                api_key_encrypted,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::postgres::workspace::MockWorkspaceRepository;
    use crate::services::test_support::*;

    #[tokio::test]
    async fn blank_api_key_leaves_credential_alone() {
        let enc = test_encryptor();
        let ws = workspace(&enc, true);
        let founder = ws.founder_user_id;

        let mut workspaces = MockWorkspaceRepository::new();
        let w = ws.clone();
        workspaces
            .expect_get_by_founder()
            .returning(move |_| Ok(Some(w.clone())));
        workspaces
            .expect_update_settings()
            .times(1)
            .returning(move |_, name, style, instructions, key| {
                assert!(key.is_none());
                let mut updated = ws.clone();
                updated.name = name.to_string();
                updated.coaching_style = style;
                updated.custom_instructions = instructions;
                Ok(updated)
            });

        let svc = WorkspaceService::new(arc(workspaces), enc);
        let updated = svc
            .update_settings(
                founder,
                "Acme v2",
                CoachingStyle::Direct,
                None,
                Some("   ".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Acme v2");
    }

    #[tokio::test]
    async fn supplied_api_key_is_encrypted_before_storage() {
        let enc = test_encryptor();
        let ws = workspace(&enc, false);
        let founder = ws.founder_user_id;
        let check = enc.clone();

        let mut workspaces = MockWorkspaceRepository::new();
        let w = ws.clone();
        workspaces
            .expect_get_by_founder()
            .returning(move |_| Ok(Some(w.clone())));
        workspaces
            .expect_update_settings()
            .times(1)
            .returning(move |_, _, _, _, key| {
                let stored = key.expect("credential should be written");
                assert_ne!(stored, "sk-new-key");
                assert_eq!(check.decrypt(&stored).unwrap(), "sk-new-key");
                let mut updated = ws.clone();
                updated.api_key_encrypted = Some(stored);
                Ok(updated)
            });

        let svc = WorkspaceService::new(arc(workspaces), enc);
        svc.update_settings(
            founder,
            "Acme",
            CoachingStyle::Balanced,
            None,
            Some("sk-new-key".to_string()),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn duplicate_workspace_create_conflicts() {
        let mut workspaces = MockWorkspaceRepository::new();
        workspaces
            .expect_create()
            .returning(|_, _| Err(Error::Conflict("This account already has a workspace".to_string())));

        let svc = WorkspaceService::new(arc(workspaces), test_encryptor());
        let err = svc.create(Uuid::new_v4(), "Acme").await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }
}
