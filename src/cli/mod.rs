//! Terminal front-end for Socrates.

pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ProviderKind;

/// Ask Socrates
#[derive(Parser, Debug)]
#[command(name = "socrates", version, about = "A Socratic dialogue in your terminal")]
pub struct Cli {
    /// Path to a config.toml (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Provider override (groq, openai, openai-compatible)
    #[arg(short, long, global = true)]
    pub provider: Option<ProviderKind>,

    /// Model override
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Max tokens per reply
    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,

    /// Per-turn timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Endpoint override (required for openai-compatible without a config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive dialogue (the default)
    Chat,
    /// Ask a single question and print the reply
    Ask(AskArgs),
}

/// Arguments for `socrates ask`.
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The question to put to Socrates
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,
}

impl AskArgs {
    pub fn text(&self) -> String {
        self.question.join(" ")
    }
}

/// A line typed at the dialogue prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Query(String),
    Clear,
    Retry,
    History,
    Help,
    Quit,
    Unknown(String),
}

impl ReplInput {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line {
            "/clear" | "/reset" => ReplInput::Clear,
            "/retry" => ReplInput::Retry,
            "/history" => ReplInput::History,
            "/help" | "/?" => ReplInput::Help,
            "/quit" | "/exit" => ReplInput::Quit,
            cmd if cmd.starts_with('/') => ReplInput::Unknown(cmd.to_string()),
            query => ReplInput::Query(query.to_string()),
        }
    }
}

pub const REPL_HELP: &str = "\
Type a question and press enter.
  /clear    start the dialogue over
  /retry    ask again after a failed reply
  /history  show the dialogue so far
  /quit     leave";
