// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Meetly - an AI meeting-scheduling assistant.
//!
//! This is the binary entry point for the Meetly CLI.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod doctor;
mod shell;

use clap::{Parser, Subcommand};
use meetly_config::MeetlyConfig;

/// Meetly - an AI meeting-scheduling assistant.
#[derive(Parser, Debug)]
#[command(name = "meetly", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch the interactive scheduling chat.
    Shell,
    /// Run diagnostic checks against the Meetly environment.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Print the effective merged configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match meetly_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            meetly_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Some(Commands::Doctor { plain }) => doctor::run_doctor(&config, plain).await,
        Some(Commands::Config) => {
            print_config(&config);
            Ok(())
        }
        Some(Commands::Shell) | None => shell::run_shell(config).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber from `RUST_LOG` or the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Prints the effective configuration as TOML with secrets redacted.
fn print_config(config: &MeetlyConfig) {
    let redacted = redact(config);
    match toml::to_string_pretty(&redacted) {
        Ok(rendered) => print!("{rendered}"),
        Err(e) => eprintln!("error: could not render config: {e}"),
    }
}

fn redact(config: &MeetlyConfig) -> MeetlyConfig {
    let mut copy = config.clone();
    if copy.anthropic.api_key.is_some() {
        copy.anthropic.api_key = Some("<redacted>".to_string());
    }
    if copy.google.access_token.is_some() {
        copy.google.access_token = Some("<redacted>".to_string());
    }
    copy
}
