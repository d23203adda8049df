//! Socrates CLI binary entry point.

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use socrates::cli::render::{render_error, render_message, render_transcript};
use socrates::cli::{AskArgs, Cli, Commands, ReplInput, REPL_HELP};
use socrates::config::SocratesConfig;
use socrates::dialogue::{Dialogue, TurnOutcome};
use socrates::error::SocratesError;
use socrates::gateway::create_gateway;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match build_dialogue(&cli) {
        Ok(dialogue) => match cli.command {
            Some(Commands::Ask(ref args)) => handle_ask(&dialogue, args).await,
            Some(Commands::Chat) | None => handle_chat(&dialogue).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", render_error(&e));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "socrates=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SOCRATES_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_dialogue(cli: &Cli) -> Result<Dialogue, SocratesError> {
    let mut config = SocratesConfig::load_for(cli.config.as_deref(), cli.provider)?;
    if let Some(ref model) = cli.model {
        config.model = model.clone();
    }
    if let Some(max_tokens) = cli.max_tokens {
        config.max_tokens = max_tokens;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(ref url) = cli.base_url {
        config.base_url = Some(url.clone());
    }
    config.validate()?;
    tracing::debug!(?config, "configuration resolved");

    let gateway = create_gateway(&config)?;
    Ok(Dialogue::from_config(gateway, &config))
}

async fn handle_ask(dialogue: &Dialogue, args: &AskArgs) -> Result<(), SocratesError> {
    pondering();
    if let Some(reply) = dialogue.submit(args.text()).await?.reply() {
        if let Some(line) = render_message(reply) {
            println!("{line}");
        }
    }
    Ok(())
}

async fn handle_chat(dialogue: &Dialogue) -> Result<(), SocratesError> {
    println!("Ask Socrates. Type /help for commands.\n");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let outcome = match ReplInput::parse(&line) {
            ReplInput::Query(query) => {
                if query.is_empty() {
                    continue;
                }
                pondering();
                dialogue.submit(query).await
            }
            ReplInput::Retry => {
                pondering();
                dialogue.retry().await
            }
            ReplInput::Clear => {
                dialogue.reset();
                println!("(the dialogue begins anew)\n");
                continue;
            }
            ReplInput::History => {
                print!("{}", render_transcript(&dialogue.history()));
                println!();
                continue;
            }
            ReplInput::Help => {
                println!("{REPL_HELP}\n");
                continue;
            }
            ReplInput::Quit => break,
            ReplInput::Unknown(cmd) => {
                eprintln!("Unknown command {cmd}; type /help");
                continue;
            }
        };

        match outcome {
            Ok(TurnOutcome::Replied(completion)) => {
                if let Some(line) = render_message(&completion.message) {
                    println!("{line}\n");
                }
            }
            Ok(TurnOutcome::Discarded | TurnOutcome::Ignored) => {}
            // Turn-scoped: report and keep the dialogue going.
            Err(e) => eprintln!("{}\n", render_error(&e)),
        }
    }

    Ok(())
}

fn pondering() {
    eprintln!("Socrates is pondering...");
}
