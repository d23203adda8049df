//! Turn orchestration: one user submission, one gateway call, one reply.
//!
//! A [`Dialogue`] owns the [`ConversationStore`] of a single session and
//! drives the two-state turn machine:
//!
//! - `Idle` → [`Dialogue::submit`] appends the user message and moves to
//!   `AwaitingCompletion` while the gateway call is outstanding.
//! - `AwaitingCompletion` → on success the assistant reply is appended; on
//!   failure nothing is appended. Either way the dialogue is `Idle` again.
//! - [`Dialogue::reset`] is legal in both states. A completion that was issued
//!   before the reset is dropped when it arrives.
//!
//! All methods take `&self`; the internal lock is never held across the
//! gateway await, so `history()` and `state()` stay responsive while a turn
//! is in flight.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::SocratesConfig;
use crate::conversation::ConversationStore;
use crate::error::{Result, SocratesError};
use crate::gateway::CompletionGateway;
use crate::types::{Completion, CompletionRequest, CompletionSettings, Message, Role, Usage};
use crate::util::timeout::with_timeout;

/// Turn state of a dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// No completion outstanding; ready for a submission.
    Idle,
    /// A gateway call is outstanding for the current conversation.
    AwaitingCompletion,
}

/// How a turn settled when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The reply was appended to the conversation.
    Replied(Completion),
    /// The conversation was reset while the call was outstanding; the result
    /// (success or failure) was dropped.
    Discarded,
    /// The query was empty or whitespace; nothing was appended and no call
    /// was made.
    Ignored,
}

impl TurnOutcome {
    /// The appended reply, if any.
    pub fn reply(&self) -> Option<&Message> {
        match self {
            TurnOutcome::Replied(completion) => Some(&completion.message),
            _ => None,
        }
    }
}

struct DialogueInner {
    store: ConversationStore,
    state: TurnState,
    usage: Usage,
}

/// A gateway call issued against a specific conversation generation.
struct PendingTurn {
    generation: u64,
    request: CompletionRequest,
}

/// Returns the dialogue to `Idle` if a turn future is dropped before it settles.
///
/// Never touches the history: the unanswered user message stays so the turn
/// can be retried.
struct InFlight<'a> {
    dialogue: &'a Dialogue,
    generation: u64,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.dialogue.lock();
        // A reset since issue already forced Idle and may have started a new turn.
        if inner.store.generation() == self.generation
            && inner.state == TurnState::AwaitingCompletion
        {
            self.dialogue.set_state(&mut inner, TurnState::Idle);
            warn!(generation = self.generation, "turn abandoned before completion");
        }
    }
}

/// Conversation plus the turn machine that feeds it to a gateway.
pub struct Dialogue {
    gateway: Arc<dyn CompletionGateway>,
    settings: CompletionSettings,
    timeout: Duration,
    inner: Mutex<DialogueInner>,
    state_tx: watch::Sender<TurnState>,
}

impl Dialogue {
    /// Create a dialogue seeded with the Socrates persona.
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        settings: CompletionSettings,
        timeout: Duration,
    ) -> Self {
        let (state_tx, _) = watch::channel(TurnState::Idle);
        Self {
            gateway,
            settings,
            timeout,
            inner: Mutex::new(DialogueInner {
                store: ConversationStore::new(),
                state: TurnState::Idle,
                usage: Usage::default(),
            }),
            state_tx,
        }
    }

    /// Create a dialogue using the model, token cap and timeout from `config`.
    pub fn from_config(gateway: Arc<dyn CompletionGateway>, config: &SocratesConfig) -> Self {
        Self::new(gateway, config.completion_settings(), config.timeout)
    }

    /// Replace the conversation store (e.g. to use a different persona).
    pub fn with_store(self, store: ConversationStore) -> Self {
        self.lock().store = store;
        self
    }

    fn lock(&self) -> MutexGuard<'_, DialogueInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_state(&self, inner: &mut DialogueInner, state: TurnState) {
        inner.state = state;
        self.state_tx.send_replace(state);
    }

    /// Full ordered history, system message first.
    pub fn history(&self) -> Vec<Message> {
        self.lock().store.history().to_vec()
    }

    /// History without the system message, for display.
    pub fn turns(&self) -> Vec<Message> {
        self.lock().store.turns().to_vec()
    }

    pub fn state(&self) -> TurnState {
        self.lock().state
    }

    /// Subscribe to turn-state transitions.
    ///
    /// Callers can `.changed().await` on the receiver to learn when an
    /// outstanding completion settles.
    pub fn watch_state(&self) -> watch::Receiver<TurnState> {
        self.state_tx.subscribe()
    }

    /// Number of resets this dialogue has been through.
    pub fn generation(&self) -> u64 {
        self.lock().store.generation()
    }

    /// Token usage accumulated since the last reset.
    pub fn usage(&self) -> Usage {
        self.lock().usage
    }

    /// Assistant replies since the last reset.
    pub fn exchange_count(&self) -> usize {
        self.lock()
            .store
            .history()
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .count()
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    pub fn gateway(&self) -> &Arc<dyn CompletionGateway> {
        &self.gateway
    }

    /// Discard every turn and return to `Idle`.
    ///
    /// An outstanding completion is not aborted; its result is dropped when
    /// it arrives.
    pub fn reset(&self) {
        let mut inner = self.lock();
        let was_awaiting = inner.state == TurnState::AwaitingCompletion;
        inner.store.reset();
        inner.usage = Usage::default();
        self.set_state(&mut inner, TurnState::Idle);
        info!(
            generation = inner.store.generation(),
            in_flight = was_awaiting,
            "conversation reset"
        );
    }

    /// Submit a user query and wait for the reply.
    ///
    /// The user message is appended before the gateway is called and stays in
    /// the history if the call fails, so [`retry`](Self::retry) can pick it up.
    /// The same holds if the returned future is dropped before it resolves;
    /// the dialogue then goes back to `Idle`.
    ///
    /// A query that is empty or only whitespace returns
    /// [`TurnOutcome::Ignored`] without touching the history or the gateway.
    ///
    /// # Errors
    ///
    /// - [`SocratesError::Busy`] if a completion is already outstanding; the
    ///   history is left untouched.
    /// - Any gateway error, unmodified. No assistant message is appended.
    pub async fn submit(&self, query: impl Into<String>) -> Result<TurnOutcome> {
        let query = query.into();
        if query.trim().is_empty() {
            debug!("ignoring empty query");
            return Ok(TurnOutcome::Ignored);
        }
        let pending = self.begin_turn(Some(query))?;
        self.run(pending).await
    }

    /// Re-run the gateway on the current history after a failed turn.
    ///
    /// # Errors
    ///
    /// - [`SocratesError::Busy`] if a completion is already outstanding.
    /// - [`SocratesError::InvalidArgument`] if the last message is not an
    ///   unanswered user message.
    /// - Any gateway error, unmodified.
    pub async fn retry(&self) -> Result<TurnOutcome> {
        let pending = self.begin_turn(None)?;
        self.run(pending).await
    }

    fn begin_turn(&self, query: Option<String>) -> Result<PendingTurn> {
        let mut inner = self.lock();
        if inner.state == TurnState::AwaitingCompletion {
            return Err(SocratesError::Busy);
        }

        match query {
            Some(text) => {
                inner.store.append(Role::User, text)?;
            }
            None => {
                let last = inner.store.last().role;
                if last != Role::User {
                    return Err(SocratesError::InvalidArgument(format!(
                        "nothing to retry: last message is {last}"
                    )));
                }
            }
        }

        self.set_state(&mut inner, TurnState::AwaitingCompletion);
        Ok(PendingTurn {
            generation: inner.store.generation(),
            request: CompletionRequest::new(
                inner.store.history().to_vec(),
                self.settings.clone(),
            ),
        })
    }

    async fn run(&self, pending: PendingTurn) -> Result<TurnOutcome> {
        debug!(
            provider = self.gateway.provider_name(),
            model = pending.request.model_id(),
            messages = pending.request.messages.len(),
            "awaiting completion"
        );
        let guard = InFlight {
            dialogue: self,
            generation: pending.generation,
            armed: true,
        };
        let result = with_timeout(self.timeout, self.gateway.complete(&pending.request)).await;
        guard.disarm();
        self.settle(pending.generation, result)
    }

    fn settle(&self, generation: u64, result: Result<Completion>) -> Result<TurnOutcome> {
        let mut inner = self.lock();
        if inner.store.generation() != generation {
            warn!(
                issued = generation,
                current = inner.store.generation(),
                failed = result.is_err(),
                "dropping completion issued before reset"
            );
            return Ok(TurnOutcome::Discarded);
        }

        self.set_state(&mut inner, TurnState::Idle);
        let completion = match result {
            Ok(completion) if completion.message.role != Role::Assistant => {
                let err = SocratesError::malformed(format!(
                    "gateway returned a {} message",
                    completion.message.role
                ));
                warn!(error = %err, "completion rejected");
                return Err(err);
            }
            Ok(completion) => completion,
            Err(err) => {
                warn!(error = %err, category = ?err.category(), "completion failed");
                return Err(err);
            }
        };

        inner.store.push(completion.message.clone())?;
        inner.usage.merge(&completion.usage);
        info!(
            messages = inner.store.len(),
            output_tokens = completion.usage.output_tokens,
            "turn complete"
        );
        Ok(TurnOutcome::Replied(completion))
    }
}
