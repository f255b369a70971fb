// costaff-server/src/context.rs

use std::sync::Arc;

use costaff_core::crypto::Encryptor;
use costaff_core::repositories::{
    PostgresCheckinRepository, PostgresConversationRepository, PostgresDocumentRepository,
    PostgresEscalationRepository, PostgresMessageRepository, PostgresRoleConfigRepository,
    PostgresTeamMemberRepository, PostgresWorkspaceRepository,
};
use costaff_core::services::{
    AnthropicFactory, ChatService, CheckinService, DocumentService, EscalationService,
    ProviderFactory, RoleService, TeamService, WorkspaceService,
};
use costaff_core::Database;

/// Shared application state: every service wired to the Postgres
/// repositories and the vault encryptor.
pub struct ServerContext {
    pub workspaces: WorkspaceService,
    pub team: TeamService,
    pub roles: RoleService,
    pub documents: DocumentService,
    pub chat: ChatService,
    pub checkins: CheckinService,
    pub escalations: EscalationService,
    pub providers: Arc<dyn ProviderFactory>,
}

impl ServerContext {
    pub fn new(db: Database, encryptor: Encryptor) -> Self {
        let pool = db.pool().clone();
        let workspaces = Arc::new(PostgresWorkspaceRepository::new(pool.clone()));
        let members = Arc::new(PostgresTeamMemberRepository::new(pool.clone()));
        let role_configs = Arc::new(PostgresRoleConfigRepository::new(pool.clone()));
        let documents = Arc::new(PostgresDocumentRepository::new(pool.clone()));
        let conversations = Arc::new(PostgresConversationRepository::new(pool.clone()));
        let messages = Arc::new(PostgresMessageRepository::new(pool.clone()));
        let checkins = Arc::new(PostgresCheckinRepository::new(pool.clone()));
        let escalations = Arc::new(PostgresEscalationRepository::new(pool));

        let providers: Arc<dyn ProviderFactory> = Arc::new(AnthropicFactory);

        Self {
            workspaces: WorkspaceService::new(workspaces.clone(), encryptor.clone()),
            team: TeamService::new(workspaces.clone(), members.clone()),
            roles: RoleService::new(workspaces.clone(), role_configs.clone()),
            documents: DocumentService::new(workspaces.clone(), documents.clone()),
            chat: ChatService::new(
                members.clone(),
                workspaces.clone(),
                conversations.clone(),
                messages.clone(),
                documents,
                role_configs,
                encryptor.clone(),
            ),
            checkins: CheckinService::new(
                members.clone(),
                workspaces.clone(),
                checkins,
                encryptor.clone(),
                providers.clone(),
            ),
            escalations: EscalationService::new(
                members,
                workspaces,
                conversations,
                messages,
                escalations,
                encryptor,
                providers.clone(),
            ),
            providers,
        }
    }
}
