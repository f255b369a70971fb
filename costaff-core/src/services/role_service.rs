// costaff-core/src/services/role_service.rs

use std::sync::Arc;

use uuid::Uuid;

use costaff_common::models::RoleConfig;

use crate::repositories::{RoleConfigFields, RoleConfigRepository, WorkspaceRepository};
use crate::Error;

pub struct RoleService {
    workspaces: Arc<dyn WorkspaceRepository>,
    roles: Arc<dyn RoleConfigRepository>,
}

impl RoleService {
    pub fn new(
        workspaces: Arc<dyn WorkspaceRepository>,
        roles: Arc<dyn RoleConfigRepository>,
    ) -> Self {
        Self { workspaces, roles }
    }

    pub async fn create(
        &self,
        founder_user_id: Uuid,
        fields: RoleConfigFields,
    ) -> Result<RoleConfig, Error> {
        let workspace = self
            .workspaces
            .get_by_founder(founder_user_id)
            .await?
            .ok_or_else(|| Error::Forbidden("Not a workspace founder".to_string()))?;
        self.roles.insert(workspace.workspace_id, &fields).await
    }

    pub async fn update(
        &self,
        founder_user_id: Uuid,
        role_config_id: Uuid,
        fields: RoleConfigFields,
    ) -> Result<RoleConfig, Error> {
        self.owned(founder_user_id, role_config_id).await?;
        self.roles.update(role_config_id, &fields).await
    }

    pub async fn delete(&self, founder_user_id: Uuid, role_config_id: Uuid) -> Result<(), Error> {
        self.owned(founder_user_id, role_config_id).await?;
        self.roles.delete(role_config_id).await
    }

    pub async fn list(&self, founder_user_id: Uuid) -> Result<Vec<RoleConfig>, Error> {
        let workspace = self
            .workspaces
            .get_by_founder(founder_user_id)
            .await?
            .ok_or_else(|| Error::Forbidden("Not a workspace founder".to_string()))?;
        self.roles.list_for_workspace(workspace.workspace_id).await
    }

    /// Role configs from other workspaces look nonexistent to this founder.
    async fn owned(&self, founder_user_id: Uuid, role_config_id: Uuid) -> Result<(), Error> {
        let workspace = self
            .workspaces
            .get_by_founder(founder_user_id)
            .await?
            .ok_or_else(|| Error::Forbidden("Not a workspace founder".to_string()))?;

        self.roles
            .get(role_config_id)
            .await?
            .filter(|r| r.workspace_id == workspace.workspace_id)
            .ok_or_else(|| Error::NotFound(format!("role config {role_config_id}")))?;
        Ok(())
    }
}
