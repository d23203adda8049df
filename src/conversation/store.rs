//! Conversation message history owned by one session.

use std::borrow::Cow;

use crate::error::{Result, SocratesError};
use crate::types::{Message, Role};

use super::persona::SOCRATES_PERSONA;

/// Ordered message history that always starts with the system message.
///
/// The generation counter is bumped on every [`reset`](Self::reset) so that
/// callers holding work issued against an older history can tell it is stale.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    persona: Cow<'static, str>,
    messages: Vec<Message>,
    generation: u64,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    /// Create a store seeded with the Socrates persona.
    pub fn new() -> Self {
        Self::with_persona(SOCRATES_PERSONA)
    }

    /// Create a store seeded with a different fixed persona.
    pub fn with_persona(persona: impl Into<Cow<'static, str>>) -> Self {
        let persona = persona.into();
        Self {
            messages: vec![Message::system(persona.clone())],
            persona,
            generation: 0,
        }
    }

    /// Discard every turn and return to the single system message.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages.push(Message::system(self.persona.clone()));
        self.generation += 1;
    }

    /// Append a user or assistant message.
    ///
    /// A `system` role is rejected and leaves the history untouched.
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> Result<&Message> {
        if role == Role::System {
            return Err(SocratesError::InvalidRole(role));
        }
        self.messages.push(Message::new(role, content));
        Ok(self.last())
    }

    /// Append a message produced elsewhere (e.g. by a gateway).
    pub fn push(&mut self, message: Message) -> Result<&Message> {
        if message.role == Role::System {
            return Err(SocratesError::InvalidRole(message.role));
        }
        self.messages.push(message);
        Ok(self.last())
    }

    /// The full ordered history, system message first.
    pub fn history(&self) -> &[Message] {
        &self.messages
    }

    /// The system message at index 0.
    pub fn system_message(&self) -> &Message {
        &self.messages[0]
    }

    /// The most recent message (the system message on a fresh store).
    pub fn last(&self) -> &Message {
        // Never empty: construction and reset both seed the system message.
        &self.messages[self.messages.len() - 1]
    }

    /// Turns after the system message, for display.
    pub fn turns(&self) -> &[Message] {
        &self.messages[1..]
    }

    /// Number of reset cycles this store has gone through.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Number of messages, including the system message.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false; kept for parity with `len`.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
