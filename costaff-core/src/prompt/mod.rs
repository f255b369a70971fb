// costaff-core/src/prompt/mod.rs

pub mod context;
pub mod system;

pub use context::{relevant_document_context, NO_DOCUMENTS_SENTINEL, NO_RELEVANT_SENTINEL};
pub use system::{build_system_prompt, SystemPromptParams};
