// costaff-core/src/services/chat_service.rs

use std::sync::Arc;

use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use costaff_ai::{ChatMessage, ProviderConfig};
use costaff_common::models::{ConversationType, MessageRole};

use crate::crypto::Encryptor;
use crate::prompt::{build_system_prompt, relevant_document_context, SystemPromptParams};
use crate::repositories::{
    ConversationRepository, DocumentRepository, MessageRepository, RoleConfigRepository,
    TeamMemberRepository, WorkspaceRepository,
};
use crate::Error;

/// Messages of history sent to the model per turn.
pub const HISTORY_LIMIT: i64 = 20;
/// Character budget for the document-context block.
pub const MAX_CONTEXT_CHARS: usize = 8000;
/// Token budget for one streamed assistant reply.
pub const MAX_RESPONSE_TOKENS: u32 = 2048;

const TITLE_CHARS: usize = 50;

/// Everything a prepared turn needs before the provider stream opens. The
/// user message is already durable by the time one of these exists.
#[derive(Debug)]
pub struct ChatTurn {
    pub conversation_id: Uuid,
    pub provider_config: ProviderConfig,
    pub system_prompt: String,
    pub history: Vec<ChatMessage>,
}

pub struct ChatService {
    members: Arc<dyn TeamMemberRepository>,
    workspaces: Arc<dyn WorkspaceRepository>,
    conversations: Arc<dyn ConversationRepository>,
    messages: Arc<dyn MessageRepository>,
    documents: Arc<dyn DocumentRepository>,
    role_configs: Arc<dyn RoleConfigRepository>,
    encryptor: Encryptor,
}

impl ChatService {
    pub fn new(
        members: Arc<dyn TeamMemberRepository>,
        workspaces: Arc<dyn WorkspaceRepository>,
        conversations: Arc<dyn ConversationRepository>,
        messages: Arc<dyn MessageRepository>,
        documents: Arc<dyn DocumentRepository>,
        role_configs: Arc<dyn RoleConfigRepository>,
        encryptor: Encryptor,
    ) -> Self {
        Self {
            members,
            workspaces,
            conversations,
            messages,
            documents,
            role_configs,
            encryptor,
        }
    }

    /// Runs everything that must happen before the outbound model call:
    /// principal resolution, credential decryption, conversation
    /// get-or-create, durable persistence of the user message, history
    /// loading, document context, and prompt assembly. Any failure here is a
    /// structured error; no stream has been opened yet.
    pub async fn begin_turn(
        &self,
        user_id: Uuid,
        conversation_id: Option<Uuid>,
        message: &str,
    ) -> Result<ChatTurn, Error> {
        let member = self
            .members
            .get_active_by_user(user_id)
            .await?
            .ok_or_else(|| Error::Forbidden("Not a team member".to_string()))?;

        let workspace = self
            .workspaces
            .get(member.workspace_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("workspace {}", member.workspace_id)))?;

        let encrypted = workspace.api_key_encrypted.as_deref().ok_or_else(|| {
            Error::NotConfigured("API key not configured. Ask your founder to set it up.".to_string())
        })?;
        let api_key = self.encryptor.decrypt(encrypted)?;

        let conversation = match conversation_id {
            Some(id) => self
                .conversations
                .get_for_member(id, member.member_id)
                .await?
                .ok_or_else(|| Error::NotFound(format!("conversation {id}")))?,
            None => {
                self.conversations
                    .create(
                        workspace.workspace_id,
                        member.member_id,
                        Some(title_from(message)),
                        ConversationType::Chat,
                    )
                    .await?
            }
        };
        let conv_id = conversation.conversation_id;

        // Persist the user message before any outbound call so history is
        // durable even if the provider fails.
        self.messages
            .insert(conv_id, MessageRole::User, message, json!({}))
            .await?;

        let recent = self.messages.list_recent(conv_id, HISTORY_LIMIT).await?;
        // System-role entries (founder notes injected into the thread) stay
        // visible to humans but are not sent to the model.
        let history: Vec<ChatMessage> = recent
            .iter()
            .filter(|m| matches!(m.role, MessageRole::User | MessageRole::Assistant))
            .map(|m| ChatMessage::new(m.role.to_string(), m.content.clone()))
            .collect();

        let docs = self.documents.list_for_workspace(workspace.workspace_id).await?;
        let document_context = relevant_document_context(&docs, message, MAX_CONTEXT_CHARS);

        let role_config = match member.role_config_id {
            Some(id) => self.role_configs.get(id).await?,
            None => None,
        };

        let system_prompt = build_system_prompt(&SystemPromptParams {
            workspace_name: &workspace.name,
            coaching_style: workspace.coaching_style,
            custom_instructions: workspace.custom_instructions.as_deref(),
            member_role_title: &member.role_title,
            role_config: role_config.as_ref(),
            document_context: &document_context,
        });

        debug!(
            conversation = %conv_id,
            history_len = history.len(),
            "chat turn prepared"
        );

        Ok(ChatTurn {
            conversation_id: conv_id,
            provider_config: ProviderConfig::new(api_key),
            system_prompt,
            history,
        })
    }

    /// Persists the fully assembled assistant reply and refreshes the
    /// conversation's last-activity timestamp. Only called after the
    /// provider signalled clean completion; partial text never reaches
    /// here.
    pub async fn finish_turn(&self, conversation_id: Uuid, content: &str) -> Result<(), Error> {
        self.messages
            .insert(conversation_id, MessageRole::Assistant, content, json!({}))
            .await?;
        self.conversations.touch(conversation_id).await?;
        Ok(())
    }

    /// Member-scoped conversation listing.
    pub async fn list_conversations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<costaff_common::models::Conversation>, Error> {
        let member = self
            .members
            .get_active_by_user(user_id)
            .await?
            .ok_or_else(|| Error::Forbidden("Not a team member".to_string()))?;
        self.conversations.list_for_member(member.member_id).await
    }

    /// Member-scoped message listing, ascending seq order.
    pub async fn list_messages(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        limit: i64,
    ) -> Result<Vec<costaff_common::models::Message>, Error> {
        let member = self
            .members
            .get_active_by_user(user_id)
            .await?
            .ok_or_else(|| Error::Forbidden("Not a team member".to_string()))?;
        self.conversations
            .get_for_member(conversation_id, member.member_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("conversation {conversation_id}")))?;
        self.messages.list_recent(conversation_id, limit).await
    }
}

/// Default conversation title: the first ~50 characters of the opening
/// message.
fn title_from(message: &str) -> String {
    message.chars().take(TITLE_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::postgres::conversation::MockConversationRepository;
    use crate::repositories::postgres::document::MockDocumentRepository;
    use crate::repositories::postgres::message::MockMessageRepository;
    use crate::repositories::postgres::role_config::MockRoleConfigRepository;
    use crate::repositories::postgres::team_member::MockTeamMemberRepository;
    use crate::repositories::postgres::workspace::MockWorkspaceRepository;
    use crate::services::test_support::*;

    use mockall::predicate::eq;

    fn service(
        members: MockTeamMemberRepository,
        workspaces: MockWorkspaceRepository,
        conversations: MockConversationRepository,
        messages: MockMessageRepository,
        documents: MockDocumentRepository,
        role_configs: MockRoleConfigRepository,
    ) -> ChatService {
        ChatService::new(
            arc(members),
            arc(workspaces),
            arc(conversations),
            arc(messages),
            arc(documents),
            arc(role_configs),
            test_encryptor(),
        )
    }

    #[tokio::test]
    async fn rejects_non_members() {
        let mut members = MockTeamMemberRepository::new();
        members.expect_get_active_by_user().returning(|_| Ok(None));

        let svc = service(
            members,
            MockWorkspaceRepository::new(),
            MockConversationRepository::new(),
            MockMessageRepository::new(),
            MockDocumentRepository::new(),
            MockRoleConfigRepository::new(),
        );

        let err = svc
            .begin_turn(uuid::Uuid::new_v4(), None, "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn missing_credential_is_not_configured_not_forbidden() {
        let enc = test_encryptor();
        let ws = workspace(&enc, false);
        let user_id = uuid::Uuid::new_v4();
        let member = active_member(ws.workspace_id, user_id);

        let mut members = MockTeamMemberRepository::new();
        let m = member.clone();
        members
            .expect_get_active_by_user()
            .with(eq(user_id))
            .returning(move |_| Ok(Some(m.clone())));

        let mut workspaces = MockWorkspaceRepository::new();
        let w = ws.clone();
        workspaces
            .expect_get()
            .with(eq(ws.workspace_id))
            .returning(move |_| Ok(Some(w.clone())));

        let svc = service(
            members,
            workspaces,
            MockConversationRepository::new(),
            MockMessageRepository::new(),
            MockDocumentRepository::new(),
            MockRoleConfigRepository::new(),
        );

        let err = svc.begin_turn(user_id, None, "hello").await.unwrap_err();
        assert!(matches!(err, Error::NotConfigured(_)));
    }

    #[tokio::test]
    async fn new_turn_creates_conversation_and_persists_user_message() {
        let enc = test_encryptor();
        let ws = workspace(&enc, true);
        let user_id = uuid::Uuid::new_v4();
        let member = active_member(ws.workspace_id, user_id);
        let conv = conversation(ws.workspace_id, member.member_id);
        let conv_id = conv.conversation_id;

        let long_message = "Should I approve a $50 vendor invoice? I think we need it for the offsite and the vendor is pushing.";
        let expected_title: String = long_message.chars().take(50).collect();

        let mut members = MockTeamMemberRepository::new();
        let m = member.clone();
        members
            .expect_get_active_by_user()
            .returning(move |_| Ok(Some(m.clone())));

        let mut workspaces = MockWorkspaceRepository::new();
        let w = ws.clone();
        workspaces.expect_get().returning(move |_| Ok(Some(w.clone())));

        let mut conversations = MockConversationRepository::new();
        let c = conv.clone();
        conversations
            .expect_create()
            .withf(move |_, _, title, ctype| {
                title.as_deref() == Some(expected_title.as_str())
                    && *ctype == ConversationType::Chat
            })
            .returning(move |_, _, _, _| Ok(c.clone()));

        let mut messages = MockMessageRepository::new();
        messages
            .expect_insert()
            .withf(move |cid, role, content, _| {
                *cid == conv_id && *role == MessageRole::User && content.starts_with("Should I")
            })
            .returning(move |cid, _, content, _| Ok(message(cid, 1, MessageRole::User, content)));
        messages.expect_list_recent().returning(move |cid, _| {
            Ok(vec![
                message(cid, 1, MessageRole::System, "[Founder Response]: go ahead"),
                message(cid, 2, MessageRole::User, "question"),
            ])
        });

        let mut documents = MockDocumentRepository::new();
        documents.expect_list_for_workspace().returning(|_| Ok(vec![]));

        let svc = service(
            members,
            workspaces,
            conversations,
            messages,
            documents,
            MockRoleConfigRepository::new(),
        );

        let turn = svc.begin_turn(user_id, None, long_message).await.unwrap();
        assert_eq!(turn.conversation_id, conv_id);
        assert_eq!(turn.provider_config.api_key, "sk-test");
        // System entries are filtered from what the model sees.
        assert_eq!(turn.history.len(), 1);
        assert_eq!(turn.history[0].role, "user");
        assert!(turn.system_prompt.contains("Acme"));
        assert!(turn.system_prompt.contains("No company documents uploaded yet."));
    }

    #[tokio::test]
    async fn finish_turn_appends_assistant_message_and_touches() {
        let conv_id = uuid::Uuid::new_v4();

        let mut messages = MockMessageRepository::new();
        messages
            .expect_insert()
            .withf(move |cid, role, content, _| {
                *cid == conv_id && *role == MessageRole::Assistant && content == "full reply"
            })
            .returning(move |cid, _, content, _| {
                Ok(message(cid, 3, MessageRole::Assistant, content))
            });

        let mut conversations = MockConversationRepository::new();
        conversations
            .expect_touch()
            .with(eq(conv_id))
            .returning(|_| Ok(()));

        let svc = service(
            MockTeamMemberRepository::new(),
            MockWorkspaceRepository::new(),
            conversations,
            messages,
            MockDocumentRepository::new(),
            MockRoleConfigRepository::new(),
        );

        svc.finish_turn(conv_id, "full reply").await.unwrap();
    }
}
