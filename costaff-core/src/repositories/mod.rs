// costaff-core/src/repositories/mod.rs

pub mod postgres;

pub use postgres::{
    CheckinRepository, ConversationRepository, DocumentRepository, EscalationRepository,
    MessageRepository, NewCheckin, NewDocument, NewEscalation, NewTeamMember,
    PostgresCheckinRepository, PostgresConversationRepository, PostgresDocumentRepository,
    PostgresEscalationRepository, PostgresMessageRepository, PostgresRoleConfigRepository,
    PostgresTeamMemberRepository, PostgresWorkspaceRepository, RoleConfigFields,
    RoleConfigRepository, TeamMemberRepository, WorkspaceRepository,
};
