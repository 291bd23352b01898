// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `meetly shell` command implementation.
//!
//! Launches an interactive chat with colored prompt and readline history.
//! Each line is one dialogue turn against the live adapters (Anthropic for
//! intent extraction, Google for calendar and contacts).

use std::sync::Arc;

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::info;

use meetly_agent::{MeetingBooker, SchedulerSession};
use meetly_anthropic::AnthropicProvider;
use meetly_config::MeetlyConfig;
use meetly_core::error::MeetlyError;
use meetly_core::{CalendarAdapter, DirectoryAdapter, ProviderAdapter};
use meetly_google::{GoogleCalendar, GoogleDirectory};
use meetly_intent::CompositeParser;

/// Runs the `meetly shell` interactive chat.
pub async fn run_shell(config: MeetlyConfig) -> Result<(), MeetlyError> {
    let provider: Arc<dyn ProviderAdapter> =
        Arc::new(AnthropicProvider::new(&config).inspect_err(|_| {
            eprintln!(
                "error: Anthropic API key required. Set anthropic.api_key in meetly.toml or the ANTHROPIC_API_KEY environment variable."
            );
        })?);

    let calendar: Arc<dyn CalendarAdapter> =
        Arc::new(GoogleCalendar::new(&config).inspect_err(|_| {
            eprintln!(
                "error: Google access token required. Set google.access_token in meetly.toml or the GOOGLE_ACCESS_TOKEN environment variable."
            );
        })?);

    let directory: Arc<dyn DirectoryAdapter> = Arc::new(GoogleDirectory::new(&config)?);

    let parser = CompositeParser::from_config(provider, &config);
    let booker = MeetingBooker::new(calendar, directory.clone(), &config);
    let mut session = SchedulerSession::new(Box::new(parser), booker, directory, &config);

    let timezone = config.scheduler.timezone();
    let assistant = config.agent.name.clone();

    // Set up readline editor.
    let mut rl = DefaultEditor::new()
        .map_err(|e| MeetlyError::Internal(format!("failed to initialize readline: {e}")))?;

    // Print welcome message (the greeting is also the first transcript entry).
    println!("{}", assistant.bold().green());
    println!("{}", config.agent.greeting);
    println!("Type {} to exit.\n", "/quit".yellow());

    info!(timezone = %timezone, "shell session started");

    // Chat loop.
    let prompt = format!("{}> ", "you".cyan());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                let now = chrono::Utc::now().with_timezone(&timezone);
                let reply = session.handle_turn(trimmed, now).await;
                println!("{} {reply}\n", format!("{assistant}:").green());
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    // Session summary on exit.
    let booked = session.scheduled().len();
    if booked > 0 {
        let plural = if booked == 1 { "meeting" } else { "meetings" };
        println!(
            "{}",
            format!("{booked} {plural} booked this session").dimmed()
        );
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}
