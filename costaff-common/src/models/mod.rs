// File: costaff-common/src/models/mod.rs
pub mod checkin;
pub mod conversation;
pub mod document;
pub mod escalation;
pub mod member;
pub mod message;
pub mod role_config;
pub mod workspace;

pub use checkin::DailyCheckin;
pub use conversation::{Conversation, ConversationStatus, ConversationType};
pub use document::{DocType, Document};
pub use escalation::{Escalation, EscalationStatus, DISMISSED_RESPONSE};
pub use member::{MemberStatus, TeamMember};
pub use message::{Message, MessageRole};
pub use role_config::RoleConfig;
pub use workspace::{CoachingStyle, Workspace};
