// File: costaff-ai/src/lib.rs

pub mod anthropic;
pub mod models;
pub mod traits;

// Re-export public APIs
pub use anthropic::AnthropicProvider;
pub use models::ProviderConfig;
pub use traits::{ChatMessage, ModelProvider, StreamEvent};
