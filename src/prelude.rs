//! Convenience re-exports for common use.

pub use crate::config::{ProviderKind, SocratesConfig};
pub use crate::conversation::ConversationStore;
pub use crate::dialogue::{Dialogue, TurnOutcome, TurnState};
pub use crate::error::{Result, SocratesError};
pub use crate::gateway::CompletionGateway;
pub use crate::session::SessionManager;
pub use crate::types::{Completion, CompletionRequest, CompletionSettings, Message, Role, Usage};
