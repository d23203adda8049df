//! Conversation state: the persona and the ordered message history.

pub mod persona;
pub mod store;

pub use persona::SOCRATES_PERSONA;
pub use store::ConversationStore;
