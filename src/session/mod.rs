//! Session management: one independent dialogue per interactive session.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;
use uuid::Uuid;

use crate::config::SocratesConfig;
use crate::dialogue::Dialogue;
use crate::gateway::CompletionGateway;

/// Identifier of an interactive session.
pub type SessionId = Uuid;

/// Creates and tracks dialogues that share a gateway but never a conversation.
pub struct SessionManager {
    gateway: Arc<dyn CompletionGateway>,
    config: SocratesConfig,
    sessions: RwLock<HashMap<SessionId, Arc<Dialogue>>>,
}

impl SessionManager {
    pub fn new(gateway: Arc<dyn CompletionGateway>, config: SocratesConfig) -> Self {
        Self {
            gateway,
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a fresh session seeded with the persona.
    pub fn start(&self) -> (SessionId, Arc<Dialogue>) {
        let id = Uuid::new_v4();
        let dialogue = Arc::new(Dialogue::from_config(self.gateway.clone(), &self.config));
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id, dialogue.clone());
        debug!(session = %id, "session started");
        (id, dialogue)
    }

    /// Get an existing session.
    pub fn get(&self, id: &SessionId) -> Option<Arc<Dialogue>> {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(id)
            .cloned()
    }

    /// End a session. Its conversation is dropped once the last handle goes.
    pub fn end(&self, id: &SessionId) -> Option<Arc<Dialogue>> {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(id);
        if removed.is_some() {
            debug!(session = %id, "session ended");
        }
        removed
    }

    /// List session IDs.
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .keys()
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
