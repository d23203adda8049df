//! Plain-text rendering of dialogue turns.

use std::fmt::Write;

use crate::error::SocratesError;
use crate::types::{Message, Role};

/// Render one message, or `None` for the hidden system message.
pub fn render_message(message: &Message) -> Option<String> {
    let label = match message.role {
        Role::System => return None,
        Role::User => "You",
        Role::Assistant => "Socrates",
    };
    Some(format!("{label}: {}", message.content.trim()))
}

/// Render a full transcript, one blank line between turns.
pub fn render_transcript(history: &[Message]) -> String {
    let mut out = String::new();
    for line in history.iter().filter_map(render_message) {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "{line}");
    }
    out
}

/// One-line description of a failed turn, with a hint when there is one.
pub fn render_error(err: &SocratesError) -> String {
    let hint = match err {
        SocratesError::Authentication(_) => Some("check your API key"),
        SocratesError::RateLimited { .. } => Some("wait a moment, then /retry"),
        SocratesError::Timeout(_) | SocratesError::Transport(_) => Some("try /retry"),
        SocratesError::Provider { .. } if err.is_retryable() => Some("try /retry"),
        _ => None,
    };
    match hint {
        Some(hint) => format!("{err} ({hint})"),
        None => err.to_string(),
    }
}
