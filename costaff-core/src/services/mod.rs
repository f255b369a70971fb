// costaff-core/src/services/mod.rs

pub mod chat_service;
pub mod checkin_service;
pub mod document_service;
pub mod escalation_service;
pub mod role_service;
pub mod team_service;
pub mod workspace_service;

pub use chat_service::{ChatService, ChatTurn};
pub use checkin_service::CheckinService;
pub use document_service::DocumentService;
pub use escalation_service::EscalationService;
pub use role_service::RoleService;
pub use team_service::TeamService;
pub use workspace_service::WorkspaceService;

use std::sync::Arc;

use costaff_ai::{AnthropicProvider, ModelProvider, ProviderConfig};

/// Builds a provider around a just-decrypted workspace credential. Behind a
/// trait so service tests can substitute a canned model.
#[cfg_attr(test, mockall::automock)]
pub trait ProviderFactory: Send + Sync {
    fn create(&self, config: ProviderConfig) -> Arc<dyn ModelProvider>;
}

pub struct AnthropicFactory;

impl ProviderFactory for AnthropicFactory {
    fn create(&self, config: ProviderConfig) -> Arc<dyn ModelProvider> {
        Arc::new(AnthropicProvider::new(config))
    }
}
