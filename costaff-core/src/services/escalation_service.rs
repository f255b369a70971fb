// costaff-core/src/services/escalation_service.rs

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use costaff_ai::{ChatMessage, ProviderConfig};
use costaff_common::models::{
    ConversationStatus, Escalation, EscalationStatus, Message, MessageRole, DISMISSED_RESPONSE,
};

use crate::crypto::Encryptor;
use crate::repositories::{
    ConversationRepository, EscalationRepository, MessageRepository, NewEscalation,
    TeamMemberRepository, WorkspaceRepository,
};
use crate::services::ProviderFactory;
use crate::Error;

/// Used whenever the summarization call cannot run or fails; escalation
/// creation is never blocked by the summarizer.
pub const FALLBACK_SUMMARY: &str = "Escalation requires founder review.";

const SUMMARY_SYSTEM: &str = "Summarize this conversation between a team member and their AI \
    coach. Focus on: 1) What decision or issue needs the founder's input. 2) Key context. \
    3) What the team member has already considered. Keep it under 150 words.";
const SUMMARY_MAX_TOKENS: u32 = 300;
const TRANSCRIPT_MESSAGES: usize = 5;
const HISTORY_LIMIT: i64 = 20;

pub struct EscalationService {
    members: Arc<dyn TeamMemberRepository>,
    workspaces: Arc<dyn WorkspaceRepository>,
    conversations: Arc<dyn ConversationRepository>,
    messages: Arc<dyn MessageRepository>,
    escalations: Arc<dyn EscalationRepository>,
    encryptor: Encryptor,
    providers: Arc<dyn ProviderFactory>,
}

impl EscalationService {
    pub fn new(
        members: Arc<dyn TeamMemberRepository>,
        workspaces: Arc<dyn WorkspaceRepository>,
        conversations: Arc<dyn ConversationRepository>,
        messages: Arc<dyn MessageRepository>,
        escalations: Arc<dyn EscalationRepository>,
        encryptor: Encryptor,
        providers: Arc<dyn ProviderFactory>,
    ) -> Self {
        Self {
            members,
            workspaces,
            conversations,
            messages,
            escalations,
            encryptor,
            providers,
        }
    }

    /// Escalates one of the member's conversations: generates a founder
    /// brief (or the fixed fallback), writes a pending escalation, and flips
    /// the conversation to `escalated`. One-way from the member's
    /// perspective.
    pub async fn escalate(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<Escalation, Error> {
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

        let conversation = self
            .conversations
            .get_for_member(conversation_id, member.member_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("conversation {conversation_id}")))?;

        let recent = self.messages.list_recent(conversation_id, HISTORY_LIMIT).await?;

        let mut summary = FALLBACK_SUMMARY.to_string();
        let mut context = String::new();

        if !recent.is_empty() {
            context = transcript(&recent, TRANSCRIPT_MESSAGES);
            match self
                .summarize(workspace.api_key_encrypted.as_deref(), &context)
                .await
            {
                Ok(s) => summary = s,
                Err(e) => warn!("escalation summary failed, using fallback: {}", e),
            }
        }

        let escalation = self
            .escalations
            .insert(&NewEscalation {
                conversation_id: conversation.conversation_id,
                member_id: member.member_id,
                workspace_id: workspace.workspace_id,
                summary,
                context,
            })
            .await?;

        self.conversations
            .set_status(conversation.conversation_id, ConversationStatus::Escalated)
            .await?;

        info!(escalation = %escalation.escalation_id, conversation = %conversation_id, "conversation escalated");
        Ok(escalation)
    }

    async fn summarize(
        &self,
        encrypted_key: Option<&str>,
        transcript: &str,
    ) -> Result<String, Error> {
        let encrypted = encrypted_key
            .ok_or_else(|| Error::NotConfigured("no provider credential".to_string()))?;
        let api_key = self.encryptor.decrypt(encrypted)?;
        let provider = self.providers.create(ProviderConfig::new(api_key));

        let summary = provider
            .chat(
                SUMMARY_SYSTEM,
                vec![ChatMessage::new("user", transcript)],
                SUMMARY_MAX_TOKENS,
            )
            .await?;
        Ok(summary)
    }

    /// Founder response path: pending -> resolved (terminal). A real reply
    /// is appended to the original conversation as a system message and the
    /// thread is re-opened for the member; a dismissal records the sentinel
    /// and re-opens the thread without injecting anything.
    pub async fn respond(
        &self,
        founder_user_id: Uuid,
        escalation_id: Uuid,
        response: Option<&str>,
    ) -> Result<Escalation, Error> {
        let workspace = self
            .workspaces
            .get_by_founder(founder_user_id)
            .await?
            .ok_or_else(|| Error::Forbidden("Not a workspace founder".to_string()))?;

        let escalation = self
            .escalations
            .get(escalation_id)
            .await?
            .filter(|e| e.workspace_id == workspace.workspace_id)
            .ok_or_else(|| Error::NotFound(format!("escalation {escalation_id}")))?;

        if escalation.status != EscalationStatus::Pending {
            return Err(Error::Conflict(format!(
                "escalation {escalation_id} is not pending"
            )));
        }

        let resolved = match response {
            Some(text) => {
                let resolved = self.escalations.resolve(escalation_id, text).await?;
                self.messages
                    .insert(
                        escalation.conversation_id,
                        MessageRole::System,
                        &format!("[Founder Response]: {text}"),
                        json!({ "type": "founder_response", "escalation_id": escalation_id }),
                    )
                    .await?;
                resolved
            }
            None => self.escalations.resolve(escalation_id, DISMISSED_RESPONSE).await?,
        };

        self.conversations
            .set_status(escalation.conversation_id, ConversationStatus::Active)
            .await?;

        Ok(resolved)
    }

    pub async fn list_for_founder(
        &self,
        founder_user_id: Uuid,
        status: Option<EscalationStatus>,
    ) -> Result<Vec<Escalation>, Error> {
        let workspace = self
            .workspaces
            .get_by_founder(founder_user_id)
            .await?
            .ok_or_else(|| Error::Forbidden("Not a workspace founder".to_string()))?;
        self.escalations
            .list_for_workspace(workspace.workspace_id, status)
            .await
    }
}

/// Human-readable `role: content` transcript of the last `take` messages.
fn transcript(messages: &[Message], take: usize) -> String {
    let start = messages.len().saturating_sub(take);
    messages[start..]
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::postgres::conversation::MockConversationRepository;
    use crate::repositories::postgres::escalation::MockEscalationRepository;
    use crate::repositories::postgres::message::MockMessageRepository;
    use crate::repositories::postgres::team_member::MockTeamMemberRepository;
    use crate::repositories::postgres::workspace::MockWorkspaceRepository;
    use crate::services::test_support::*;
    use crate::services::MockProviderFactory;

    use chrono::Utc;
    use mockall::predicate::eq;

    fn stored(new: &NewEscalation) -> Escalation {
        Escalation {
            escalation_id: Uuid::new_v4(),
            conversation_id: new.conversation_id,
            member_id: new.member_id,
            workspace_id: new.workspace_id,
            summary: Some(new.summary.clone()),
            context: Some(new.context.clone()),
            status: EscalationStatus::Pending,
            founder_response: None,
            created_at: Utc::now(),
            resolved_at: None,
        }
    }

    #[test]
    fn transcript_takes_last_five_in_order() {
        let conv = Uuid::new_v4();
        let msgs: Vec<Message> = (1..=7)
            .map(|i| message(conv, i, MessageRole::User, &format!("m{i}")))
            .collect();
        let t = transcript(&msgs, 5);
        assert!(!t.contains("m1") && !t.contains("m2"));
        assert!(t.starts_with("user: m3"));
        assert!(t.ends_with("user: m7"));
    }

    #[tokio::test]
    async fn escalate_writes_pending_row_and_flips_status() {
        let enc = test_encryptor();
        let ws = workspace(&enc, false); // no credential -> fallback summary
        let user_id = Uuid::new_v4();
        let member = active_member(ws.workspace_id, user_id);
        let conv = conversation(ws.workspace_id, member.member_id);
        let conv_id = conv.conversation_id;

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
            .expect_get_for_member()
            .returning(move |_, _| Ok(Some(c.clone())));
        conversations
            .expect_set_status()
            .with(eq(conv_id), eq(ConversationStatus::Escalated))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut messages = MockMessageRepository::new();
        messages.expect_list_recent().returning(move |cid, _| {
            Ok(vec![message(cid, 1, MessageRole::User, "Should I sign this?")])
        });

        let mut escalations = MockEscalationRepository::new();
        escalations
            .expect_insert()
            .withf(|new| {
                new.summary == FALLBACK_SUMMARY && new.context.contains("Should I sign this?")
            })
            .times(1)
            .returning(|new| Ok(stored(new)));

        let svc = EscalationService::new(
            arc(members),
            arc(workspaces),
            arc(conversations),
            arc(messages),
            arc(escalations),
            enc,
            arc(MockProviderFactory::new()),
        );

        let esc = svc.escalate(user_id, conv_id).await.unwrap();
        assert_eq!(esc.status, EscalationStatus::Pending);
    }

    #[tokio::test]
    async fn respond_appends_system_message_and_reopens() {
        let enc = test_encryptor();
        let ws = workspace(&enc, false);
        let founder = ws.founder_user_id;
        let conv_id = Uuid::new_v4();
        let esc_id = Uuid::new_v4();

        let pending = Escalation {
            escalation_id: esc_id,
            conversation_id: conv_id,
            member_id: Uuid::new_v4(),
            workspace_id: ws.workspace_id,
            summary: Some(FALLBACK_SUMMARY.to_string()),
            context: None,
            status: EscalationStatus::Pending,
            founder_response: None,
            created_at: Utc::now(),
            resolved_at: None,
        };

        let mut workspaces = MockWorkspaceRepository::new();
        let w = ws.clone();
        workspaces
            .expect_get_by_founder()
            .with(eq(founder))
            .returning(move |_| Ok(Some(w.clone())));

        let mut escalations = MockEscalationRepository::new();
        let p = pending.clone();
        escalations
            .expect_get()
            .returning(move |_| Ok(Some(p.clone())));
        escalations
            .expect_resolve()
            .with(eq(esc_id), eq("Approved, go ahead"))
            .times(1)
            .returning(move |_, resp| {
                let mut e = pending.clone();
                e.status = EscalationStatus::Resolved;
                e.founder_response = Some(resp.to_string());
                e.resolved_at = Some(Utc::now());
                Ok(e)
            });

        let mut messages = MockMessageRepository::new();
        messages
            .expect_insert()
            .withf(move |cid, role, content, _| {
                *cid == conv_id
                    && *role == MessageRole::System
                    && content == "[Founder Response]: Approved, go ahead"
            })
            .times(1)
            .returning(move |cid, _, content, _| {
                Ok(message(cid, 9, MessageRole::System, content))
            });

        let mut conversations = MockConversationRepository::new();
        conversations
            .expect_set_status()
            .with(eq(conv_id), eq(ConversationStatus::Active))
            .times(1)
            .returning(|_, _| Ok(()));

        let svc = EscalationService::new(
            arc(MockTeamMemberRepository::new()),
            arc(workspaces),
            arc(conversations),
            arc(messages),
            arc(escalations),
            enc,
            arc(MockProviderFactory::new()),
        );

        let resolved = svc
            .respond(founder, esc_id, Some("Approved, go ahead"))
            .await
            .unwrap();
        assert_eq!(resolved.status, EscalationStatus::Resolved);
        assert_eq!(resolved.founder_response.as_deref(), Some("Approved, go ahead"));
    }

    #[tokio::test]
    async fn dismissal_records_sentinel_without_injecting_a_message() {
        let enc = test_encryptor();
        let ws = workspace(&enc, false);
        let founder = ws.founder_user_id;
        let conv_id = Uuid::new_v4();
        let esc_id = Uuid::new_v4();

        let pending = Escalation {
            escalation_id: esc_id,
            conversation_id: conv_id,
            member_id: Uuid::new_v4(),
            workspace_id: ws.workspace_id,
            summary: None,
            context: None,
            status: EscalationStatus::Pending,
            founder_response: None,
            created_at: Utc::now(),
            resolved_at: None,
        };

        let mut workspaces = MockWorkspaceRepository::new();
        let w = ws.clone();
        workspaces
            .expect_get_by_founder()
            .returning(move |_| Ok(Some(w.clone())));

        let mut escalations = MockEscalationRepository::new();
        let p = pending.clone();
        escalations
            .expect_get()
            .returning(move |_| Ok(Some(p.clone())));
        escalations
            .expect_resolve()
            .with(eq(esc_id), eq(DISMISSED_RESPONSE))
            .times(1)
            .returning(move |_, resp| {
                let mut e = pending.clone();
                e.status = EscalationStatus::Resolved;
                e.founder_response = Some(resp.to_string());
                Ok(e)
            });

        // No expect_insert: injecting a message would fail the test.
        let messages = MockMessageRepository::new();

        let mut conversations = MockConversationRepository::new();
        conversations
            .expect_set_status()
            .with(eq(conv_id), eq(ConversationStatus::Active))
            .times(1)
            .returning(|_, _| Ok(()));

        let svc = EscalationService::new(
            arc(MockTeamMemberRepository::new()),
            arc(workspaces),
            arc(conversations),
            arc(messages),
            arc(escalations),
            enc,
            arc(MockProviderFactory::new()),
        );

        let resolved = svc.respond(founder, esc_id, None).await.unwrap();
        assert_eq!(resolved.founder_response.as_deref(), Some(DISMISSED_RESPONSE));
    }

    #[tokio::test]
    async fn responding_twice_conflicts() {
        let enc = test_encryptor();
        let ws = workspace(&enc, false);
        let founder = ws.founder_user_id;

        let resolved = Escalation {
            escalation_id: Uuid::new_v4(),
            conversation_id: Uuid::new_v4(),
            member_id: Uuid::new_v4(),
            workspace_id: ws.workspace_id,
            summary: None,
            context: None,
            status: EscalationStatus::Resolved,
            founder_response: Some("done".to_string()),
            created_at: Utc::now(),
            resolved_at: Some(Utc::now()),
        };

        let mut workspaces = MockWorkspaceRepository::new();
        let w = ws.clone();
        workspaces
            .expect_get_by_founder()
            .returning(move |_| Ok(Some(w.clone())));

        let mut escalations = MockEscalationRepository::new();
        let r = resolved.clone();
        escalations
            .expect_get()
            .returning(move |_| Ok(Some(r.clone())));

        let svc = EscalationService::new(
            arc(MockTeamMemberRepository::new()),
            arc(workspaces),
            arc(MockConversationRepository::new()),
            arc(MockMessageRepository::new()),
            arc(escalations),
            enc,
            arc(MockProviderFactory::new()),
        );

        let err = svc
            .respond(founder, resolved.escalation_id, Some("again"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }
}
