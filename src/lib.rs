//! Socrates: a Socratic dialogue over a hosted chat-completion API.
//!
//! The crate keeps one conversation per session, feeds the whole history to a
//! [`CompletionGateway`](gateway::CompletionGateway) each turn, and appends the
//! reply. Resets are safe while a reply is still in flight.
//!
//! # Quick Start
//!
//! ```no_run
//! use socrates::prelude::*;
//!
//! # async fn example() -> socrates::error::Result<()> {
//! let config = SocratesConfig::load(None)?;
//! let gateway = socrates::gateway::create_gateway(&config)?;
//! let dialogue = Dialogue::from_config(gateway, &config);
//!
//! if let TurnOutcome::Replied(reply) = dialogue.submit("What is justice?").await? {
//!     println!("{}", reply.text());
//! }
//! dialogue.reset();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod conversation;
pub mod dialogue;
pub mod error;
pub mod gateway;
pub mod prelude;
pub mod session;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
