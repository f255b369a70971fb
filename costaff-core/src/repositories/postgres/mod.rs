// costaff-core/src/repositories/postgres/mod.rs

pub mod checkin;
pub mod conversation;
pub mod document;
pub mod escalation;
pub mod message;
pub mod role_config;
pub mod team_member;
pub mod workspace;

pub use checkin::{CheckinRepository, NewCheckin, PostgresCheckinRepository};
pub use conversation::{ConversationRepository, PostgresConversationRepository};
pub use document::{DocumentRepository, NewDocument, PostgresDocumentRepository};
pub use escalation::{EscalationRepository, NewEscalation, PostgresEscalationRepository};
pub use message::{MessageRepository, PostgresMessageRepository};
pub use role_config::{PostgresRoleConfigRepository, RoleConfigFields, RoleConfigRepository};
pub use team_member::{NewTeamMember, PostgresTeamMemberRepository, TeamMemberRepository};
pub use workspace::{PostgresWorkspaceRepository, WorkspaceRepository};

/// Postgres class-23 unique violation; expected on the constraints the data
/// model leans on (one check-in per day, one active account per principal).
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
