// costaff-core/src/services/team_service.rs

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use costaff_common::models::{MemberStatus, TeamMember};

use crate::repositories::{NewTeamMember, TeamMemberRepository, WorkspaceRepository};
use crate::Error;

pub struct TeamService {
    workspaces: Arc<dyn WorkspaceRepository>,
    members: Arc<dyn TeamMemberRepository>,
}

impl TeamService {
    pub fn new(
        workspaces: Arc<dyn WorkspaceRepository>,
        members: Arc<dyn TeamMemberRepository>,
    ) -> Self {
        Self { workspaces, members }
    }

    /// Invites a member: creates the row with a fresh single-use token and
    /// returns it so the caller can hand out the join link.
    pub async fn add_member(
        &self,
        founder_user_id: Uuid,
        name: &str,
        email: &str,
        role_title: &str,
        role_config_id: Option<Uuid>,
    ) -> Result<TeamMember, Error> {
        let workspace = self
            .workspaces
            .get_by_founder(founder_user_id)
            .await?
            .ok_or_else(|| Error::Forbidden("Not a workspace founder".to_string()))?;

        let member = self
            .members
            .insert(&NewTeamMember {
                workspace_id: workspace.workspace_id,
                name: name.to_string(),
                email: email.to_string(),
                role_title: role_title.to_string(),
                role_config_id,
                invite_token: Uuid::new_v4().to_string(),
            })
            .await?;

        info!(member = %member.member_id, "team member invited");
        Ok(member)
    }

    /// Redeems a single-use invite for the authenticated account. The token
    /// is burned and the membership becomes active.
    pub async fn redeem_invite(&self, user_id: Uuid, token: &str) -> Result<TeamMember, Error> {
        let member = self
            .members
            .get_by_invite_token(token)
            .await?
            .ok_or_else(|| Error::NotFound("Invalid or expired invite".to_string()))?;

        if member.status != MemberStatus::Invited {
            return Err(Error::Conflict("Invite is no longer redeemable".to_string()));
        }

        self.members.redeem_invite(member.member_id, user_id).await
    }

    pub async fn deactivate(&self, founder_user_id: Uuid, member_id: Uuid) -> Result<(), Error> {
        let workspace = self
            .workspaces
            .get_by_founder(founder_user_id)
            .await?
            .ok_or_else(|| Error::Forbidden("Not a workspace founder".to_string()))?;

        let member = self
            .members
            .get(member_id)
            .await?
            .filter(|m| m.workspace_id == workspace.workspace_id)
            .ok_or_else(|| Error::NotFound(format!("team member {member_id}")))?;

        self.members.deactivate(member.member_id).await
    }

    pub async fn list(&self, founder_user_id: Uuid) -> Result<Vec<TeamMember>, Error> {
        let workspace = self
            .workspaces
            .get_by_founder(founder_user_id)
            .await?
            .ok_or_else(|| Error::Forbidden("Not a workspace founder".to_string()))?;
        self.members.list_for_workspace(workspace.workspace_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::postgres::team_member::MockTeamMemberRepository;
    use crate::repositories::postgres::workspace::MockWorkspaceRepository;
    use crate::services::test_support::*;

    use chrono::Utc;

    #[tokio::test]
    async fn redeemed_invite_activates_and_burns_token() {
        let workspace_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let invited = TeamMember {
            member_id: Uuid::new_v4(),
            workspace_id,
            user_id: None,
            name: "Sam".to_string(),
            email: "sam@acme.test".to_string(),
            role_title: "Designer".to_string(),
            role_config_id: None,
            invite_token: Some("tok-123".to_string()),
            status: MemberStatus::Invited,
            created_at: Utc::now(),
        };

        let mut members = MockTeamMemberRepository::new();
        let i = invited.clone();
        members
            .expect_get_by_invite_token()
            .returning(move |_| Ok(Some(i.clone())));
        members
            .expect_redeem_invite()
            .times(1)
            .returning(move |member_id, uid| {
                let mut m = invited.clone();
                assert_eq!(member_id, m.member_id);
                m.user_id = Some(uid);
                m.status = MemberStatus::Active;
                m.invite_token = None;
                Ok(m)
            });

        let svc = TeamService::new(arc(MockWorkspaceRepository::new()), arc(members));
        let active = svc.redeem_invite(user_id, "tok-123").await.unwrap();
        assert_eq!(active.status, MemberStatus::Active);
        assert_eq!(active.user_id, Some(user_id));
        assert!(active.invite_token.is_none());
    }

    #[tokio::test]
    async fn deactivated_member_invite_is_not_redeemable() {
        let deactivated = TeamMember {
            member_id: Uuid::new_v4(),
            workspace_id: Uuid::new_v4(),
            user_id: None,
            name: "Sam".to_string(),
            email: "sam@acme.test".to_string(),
            role_title: "Designer".to_string(),
            role_config_id: None,
            invite_token: Some("tok-123".to_string()),
            status: MemberStatus::Deactivated,
            created_at: Utc::now(),
        };

        let mut members = MockTeamMemberRepository::new();
        members
            .expect_get_by_invite_token()
            .returning(move |_| Ok(Some(deactivated.clone())));

        let svc = TeamService::new(arc(MockWorkspaceRepository::new()), arc(members));
        let err = svc
            .redeem_invite(Uuid::new_v4(), "tok-123")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let mut members = MockTeamMemberRepository::new();
        members.expect_get_by_invite_token().returning(|_| Ok(None));

        let svc = TeamService::new(arc(MockWorkspaceRepository::new()), arc(members));
        let err = svc
            .redeem_invite(Uuid::new_v4(), "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
