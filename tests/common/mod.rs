//! Shared test helpers and mock gateways.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Notify};

use socrates::error::SocratesError;
use socrates::gateway::CompletionGateway;
use socrates::types::*;

pub fn test_settings() -> CompletionSettings {
    CompletionSettings::builder()
        .model_id("test-model")
        .max_tokens(64)
        .build()
}

pub fn completion(text: &str, output_tokens: u32) -> Completion {
    Completion {
        message: Message::assistant(text),
        usage: Usage {
            input_tokens: 10,
            output_tokens,
            total_tokens: 10 + output_tokens,
        },
        finish_reason: Some(FinishReason::Stop),
    }
}

pub fn roles(history: &[Message]) -> Vec<Role> {
    history.iter().map(|m| m.role).collect()
}

/// A gateway that returns scripted results in order and records requests.
#[derive(Default)]
pub struct MockGateway {
    responses: std::sync::Mutex<VecDeque<Result<Completion, SocratesError>>>,
    requests: std::sync::Mutex<Vec<CompletionRequest>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a text reply.
    pub fn queue_reply(&self, text: &str) {
        self.queue(Ok(completion(text, 20)));
    }

    /// Queue a failure.
    pub fn queue_error(&self, err: SocratesError) {
        self.queue(Err(err));
    }

    pub fn queue(&self, result: Result<Completion, SocratesError>) {
        self.responses.lock().unwrap().push_back(result);
    }

    /// Every request seen so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionGateway for MockGateway {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, SocratesError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(completion("Mock response", 0)))
    }
}

/// A gateway that holds every call open until the test releases it.
pub struct GatedGateway {
    started: Notify,
    release_tx: mpsc::UnboundedSender<Result<Completion, SocratesError>>,
    release_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<Result<Completion, SocratesError>>>,
    calls: std::sync::atomic::AtomicUsize,
}

impl GatedGateway {
    pub fn new() -> Self {
        let (release_tx, release_rx) = mpsc::unbounded_channel();
        Self {
            started: Notify::new(),
            release_tx,
            release_rx: tokio::sync::Mutex::new(release_rx),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Wait until a call has reached the gateway.
    pub async fn wait_started(&self) {
        tokio::time::timeout(Duration::from_secs(5), self.started.notified())
            .await
            .expect("gateway call never started");
    }

    /// Let the oldest outstanding call finish with `result`.
    pub fn release(&self, result: Result<Completion, SocratesError>) {
        self.release_tx.send(result).expect("gateway dropped");
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionGateway for GatedGateway {
    fn provider_name(&self) -> &str {
        "gated"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<Completion, SocratesError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.started.notify_one();
        self.release_rx
            .lock()
            .await
            .recv()
            .await
            .unwrap_or_else(|| Err(SocratesError::malformed("gate closed")))
    }
}

/// A gateway that never answers.
pub struct SilentGateway;

#[async_trait]
impl CompletionGateway for SilentGateway {
    fn provider_name(&self) -> &str {
        "silent"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<Completion, SocratesError> {
        std::future::pending().await
    }
}
