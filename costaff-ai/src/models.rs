// File: costaff-ai/src/models.rs

use serde::{Deserialize, Serialize};

/// Default model used for every call unless the deployment overrides it.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Configuration for a model provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL for API requests
    pub api_base: Option<String>,

    /// API key for authentication (the workspace's decrypted credential;
    /// held only for the duration of the calls it backs)
    pub api_key: String,

    /// Model identifier to use with this provider
    pub model: String,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: None,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}
