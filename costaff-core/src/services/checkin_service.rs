// costaff-core/src/services/checkin_service.rs

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use costaff_ai::{ChatMessage, ProviderConfig};
use costaff_common::models::DailyCheckin;

use crate::crypto::Encryptor;
use crate::repositories::{
    CheckinRepository, NewCheckin, TeamMemberRepository, WorkspaceRepository,
};
use crate::services::ProviderFactory;
use crate::Error;

const GUIDANCE_MAX_TOKENS: u32 = 500;
const GUIDANCE_FALLBACK: &str = "Unable to generate guidance at this time.";

pub struct CheckinService {
    members: Arc<dyn TeamMemberRepository>,
    workspaces: Arc<dyn WorkspaceRepository>,
    checkins: Arc<dyn CheckinRepository>,
    encryptor: Encryptor,
    providers: Arc<dyn ProviderFactory>,
}

impl CheckinService {
    pub fn new(
        members: Arc<dyn TeamMemberRepository>,
        workspaces: Arc<dyn WorkspaceRepository>,
        checkins: Arc<dyn CheckinRepository>,
        encryptor: Encryptor,
        providers: Arc<dyn ProviderFactory>,
    ) -> Self {
        Self {
            members,
            workspaces,
            checkins,
            encryptor,
            providers,
        }
    }

    /// Submits today's check-in for the member behind `user_id` and returns
    /// the stored row (including the generated guidance). A second
    /// submission on the same calendar date surfaces the store's uniqueness
    /// violation as [`Error::Conflict`].
    pub async fn submit(
        &self,
        user_id: Uuid,
        working_on: &str,
        blockers: Option<&str>,
    ) -> Result<DailyCheckin, Error> {
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
            Error::NotConfigured("API key not configured".to_string())
        })?;

        // Guidance generation must never block the check-in itself.
        let ai_guidance = match self
            .generate_guidance(
                encrypted,
                &workspace.name,
                &member.role_title,
                working_on,
                blockers,
            )
            .await
        {
            Ok(g) => g,
            Err(e) => {
                warn!("check-in guidance failed: {}", e);
                GUIDANCE_FALLBACK.to_string()
            }
        };

        self.checkins
            .insert(&NewCheckin {
                workspace_id: member.workspace_id,
                member_id: member.member_id,
                working_on: working_on.to_string(),
                blockers: blockers.map(String::from),
                ai_guidance,
            })
            .await
    }

    async fn generate_guidance(
        &self,
        encrypted_key: &str,
        workspace_name: &str,
        role_title: &str,
        working_on: &str,
        blockers: Option<&str>,
    ) -> Result<String, Error> {
        let api_key = self.encryptor.decrypt(encrypted_key)?;
        let provider = self.providers.create(ProviderConfig::new(api_key));

        let system = format!(
            "You are an AI Chief of Staff for {workspace_name}. A team member ({role_title}) is \
             checking in for the day. Give brief, actionable guidance based on what they're \
             working on and any blockers. Be encouraging but push for high-agency behavior. \
             Keep response under 200 words."
        );
        let content = match blockers {
            Some(b) => format!("Working on: {working_on}\nBlockers: {b}"),
            None => format!("Working on: {working_on}\nNo blockers reported."),
        };

        let guidance = provider
            .chat(&system, vec![ChatMessage::new("user", content)], GUIDANCE_MAX_TOKENS)
            .await?;
        Ok(guidance)
    }

    /// Founder view of recent check-ins.
    pub async fn list_for_founder(
        &self,
        founder_user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<DailyCheckin>, Error> {
        let workspace = self
            .workspaces
            .get_by_founder(founder_user_id)
            .await?
            .ok_or_else(|| Error::Forbidden("Not a workspace founder".to_string()))?;
        self.checkins
            .list_for_workspace(workspace.workspace_id, limit)
            .await
    }

    /// Overwrites the founder note on one check-in in the founder's
    /// workspace.
    pub async fn add_founder_note(
        &self,
        founder_user_id: Uuid,
        checkin_id: Uuid,
        note: &str,
    ) -> Result<(), Error> {
        let workspace = self
            .workspaces
            .get_by_founder(founder_user_id)
            .await?
            .ok_or_else(|| Error::Forbidden("Not a workspace founder".to_string()))?;

        let checkin = self
            .checkins
            .get(checkin_id)
            .await?
            .filter(|c| c.workspace_id == workspace.workspace_id)
            .ok_or_else(|| Error::NotFound(format!("check-in {checkin_id}")))?;

        self.checkins.set_founder_note(checkin.checkin_id, note).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::postgres::checkin::MockCheckinRepository;
    use crate::repositories::postgres::team_member::MockTeamMemberRepository;
    use crate::repositories::postgres::workspace::MockWorkspaceRepository;
    use crate::services::test_support::*;
    use crate::services::MockProviderFactory;

    use chrono::Utc;

    fn stored(new: &NewCheckin) -> DailyCheckin {
        DailyCheckin {
            checkin_id: Uuid::new_v4(),
            workspace_id: new.workspace_id,
            member_id: new.member_id,
            checkin_date: Utc::now().date_naive(),
            working_on: Some(new.working_on.clone()),
            blockers: new.blockers.clone(),
            ai_guidance: Some(new.ai_guidance.clone()),
            founder_notes: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn guidance_comes_from_the_model_when_it_answers() {
        let enc = test_encryptor();
        let ws = workspace(&enc, true);
        let user_id = Uuid::new_v4();
        let member = active_member(ws.workspace_id, user_id);

        let mut members = MockTeamMemberRepository::new();
        let m = member.clone();
        members
            .expect_get_active_by_user()
            .returning(move |_| Ok(Some(m.clone())));

        let mut workspaces = MockWorkspaceRepository::new();
        let w = ws.clone();
        workspaces.expect_get().returning(move |_| Ok(Some(w.clone())));

        let mut checkins = MockCheckinRepository::new();
        checkins.expect_insert().returning(|new| Ok(stored(new)));

        let mut providers = MockProviderFactory::new();
        providers.expect_create().returning(|_| {
            arc(FakeProvider {
                reply: Some("Focus on the launch first.".to_string()),
            }) as _
        });

        let svc = CheckinService::new(
            arc(members),
            arc(workspaces),
            arc(checkins),
            enc,
            arc(providers),
        );

        let row = svc.submit(user_id, "launch prep", None).await.unwrap();
        assert_eq!(row.ai_guidance.as_deref(), Some("Focus on the launch first."));
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_fallback_guidance() {
        let enc = test_encryptor();
        let ws = workspace(&enc, true);
        let user_id = Uuid::new_v4();
        let member = active_member(ws.workspace_id, user_id);

        let mut members = MockTeamMemberRepository::new();
        let m = member.clone();
        members
            .expect_get_active_by_user()
            .returning(move |_| Ok(Some(m.clone())));

        let mut workspaces = MockWorkspaceRepository::new();
        let w = ws.clone();
        workspaces.expect_get().returning(move |_| Ok(Some(w.clone())));

        let mut checkins = MockCheckinRepository::new();
        checkins.expect_insert().returning(|new| Ok(stored(new)));

        let mut providers = MockProviderFactory::new();
        providers
            .expect_create()
            .returning(|_| arc(FakeProvider { reply: None }) as _);

        let svc = CheckinService::new(
            arc(members),
            arc(workspaces),
            arc(checkins),
            enc,
            arc(providers),
        );

        let row = svc.submit(user_id, "launch prep", Some("waiting on legal")).await.unwrap();
        assert_eq!(row.ai_guidance.as_deref(), Some(GUIDANCE_FALLBACK));
    }

    #[tokio::test]
    async fn conflict_from_store_propagates() {
        let enc = test_encryptor();
        let ws = workspace(&enc, true);
        let user_id = Uuid::new_v4();
        let member = active_member(ws.workspace_id, user_id);

        let mut members = MockTeamMemberRepository::new();
        let m = member.clone();
        members
            .expect_get_active_by_user()
            .returning(move |_| Ok(Some(m.clone())));

        let mut workspaces = MockWorkspaceRepository::new();
        let w = ws.clone();
        workspaces.expect_get().returning(move |_| Ok(Some(w.clone())));

        let mut checkins = MockCheckinRepository::new();
        checkins
            .expect_insert()
            .returning(|_| Err(Error::Conflict("You've already submitted a check-in for today".to_string())));

        let mut providers = MockProviderFactory::new();
        providers.expect_create().returning(|_| {
            arc(FakeProvider {
                reply: Some("ok".to_string()),
            }) as _
        });

        let svc = CheckinService::new(
            arc(members),
            arc(workspaces),
            arc(checkins),
            enc,
            arc(providers),
        );

        let err = svc.submit(user_id, "same day again", None).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }
}
