// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `meetly doctor` command implementation.
//!
//! Runs diagnostic checks against the Meetly environment to identify
//! configuration issues, missing credentials, and connectivity problems.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use meetly_config::MeetlyConfig;
use meetly_core::error::MeetlyError;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully.
    Pass,
    /// Check passed with a warning.
    Warn,
    /// Check failed.
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// Check status.
    pub status: CheckStatus,
    /// Human-readable message.
    pub message: String,
    /// Duration the check took.
    pub duration: Duration,
}

/// Runs the `meetly doctor` command.
///
/// With `--plain`, disables colored output.
pub async fn run_doctor(config: &MeetlyConfig, plain: bool) -> Result<(), MeetlyError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        check_config().await,
        check_timezone(config),
        check_anthropic_credentials(config),
        check_google_credentials(config),
        check_anthropic_reachable().await,
        check_calendar_reachable().await,
    ];

    println!();
    println!("  meetly doctor");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;

    for result in &results {
        let duration_ms = result.duration.as_millis();
        let line = match result.status {
            CheckStatus::Pass => {
                if use_color {
                    use colored::Colorize;
                    let symbol = "\u{2713}".green();
                    format!(
                        "    {symbol} {:<20} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                } else {
                    format!(
                        "    [OK]   {:<20} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
            CheckStatus::Warn => {
                warn_count += 1;
                if use_color {
                    use colored::Colorize;
                    let symbol = "!".yellow();
                    format!(
                        "    {symbol} {:<20} {} ({duration_ms}ms)",
                        result.name,
                        result.message.yellow()
                    )
                } else {
                    format!(
                        "    [WARN] {:<20} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
            CheckStatus::Fail => {
                fail_count += 1;
                if use_color {
                    use colored::Colorize;
                    let symbol = "\u{2717}".red();
                    format!(
                        "    {symbol} {:<20} {} ({duration_ms}ms)",
                        result.name,
                        result.message.red()
                    )
                } else {
                    format!(
                        "    [FAIL] {:<20} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
        };

        println!("{line}");
    }

    println!();

    if fail_count > 0 || warn_count > 0 {
        let issues = fail_count + warn_count;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }

    println!();

    Ok(())
}

/// Check configuration loads without errors.
async fn check_config() -> CheckResult {
    let start = Instant::now();
    match meetly_config::load_and_validate() {
        Ok(_) => CheckResult {
            name: "Configuration".to_string(),
            status: CheckStatus::Pass,
            message: "valid".to_string(),
            duration: start.elapsed(),
        },
        Err(errors) => CheckResult {
            name: "Configuration".to_string(),
            status: CheckStatus::Fail,
            message: format!("{} error(s)", errors.len()),
            duration: start.elapsed(),
        },
    }
}

/// Check the configured timezone parses.
fn check_timezone(config: &MeetlyConfig) -> CheckResult {
    let start = Instant::now();
    match config.scheduler.timezone.parse::<chrono_tz::Tz>() {
        Ok(tz) => CheckResult {
            name: "Timezone".to_string(),
            status: CheckStatus::Pass,
            message: tz.name().to_string(),
            duration: start.elapsed(),
        },
        Err(_) => CheckResult {
            name: "Timezone".to_string(),
            status: CheckStatus::Fail,
            message: format!("`{}` is not a valid IANA name", config.scheduler.timezone),
            duration: start.elapsed(),
        },
    }
}

/// Check an Anthropic API key is configured.
fn check_anthropic_credentials(config: &MeetlyConfig) -> CheckResult {
    let start = Instant::now();
    let present = config
        .anthropic
        .api_key
        .as_deref()
        .is_some_and(|k| !k.is_empty())
        || std::env::var("ANTHROPIC_API_KEY").is_ok();

    CheckResult {
        name: "Anthropic key".to_string(),
        status: if present {
            CheckStatus::Pass
        } else {
            CheckStatus::Warn
        },
        message: if present {
            "configured".to_string()
        } else {
            "not configured (intent extraction will rely on pattern rules)".to_string()
        },
        duration: start.elapsed(),
    }
}

/// Check a Google access token is configured.
fn check_google_credentials(config: &MeetlyConfig) -> CheckResult {
    let start = Instant::now();
    let present = config
        .google
        .access_token
        .as_deref()
        .is_some_and(|t| !t.is_empty())
        || std::env::var("GOOGLE_ACCESS_TOKEN").is_ok();

    CheckResult {
        name: "Google token".to_string(),
        status: if present {
            CheckStatus::Pass
        } else {
            CheckStatus::Warn
        },
        message: if present {
            "configured".to_string()
        } else {
            "not configured (calendar and contacts calls will fail)".to_string()
        },
        duration: start.elapsed(),
    }
}

/// Check LLM API connectivity via HEAD request.
async fn check_anthropic_reachable() -> CheckResult {
    head_check("LLM API", "https://api.anthropic.com/v1/messages").await
}

/// Check calendar API connectivity via HEAD request.
async fn check_calendar_reachable() -> CheckResult {
    head_check(
        "Calendar API",
        "https://www.googleapis.com/calendar/v3/colors",
    )
    .await
}

async fn head_check(name: &str, url: &str) -> CheckResult {
    let start = Instant::now();

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            return CheckResult {
                name: name.to_string(),
                status: CheckStatus::Fail,
                message: format!("HTTP client error: {e}"),
                duration: start.elapsed(),
            };
        }
    };

    match client.head(url).send().await {
        // Any response means the endpoint is reachable; auth errors are
        // expected without credentials.
        Ok(_resp) => CheckResult {
            name: name.to_string(),
            status: CheckStatus::Pass,
            message: "reachable".to_string(),
            duration: start.elapsed(),
        },
        Err(e) => {
            let msg = if e.is_timeout() {
                "timeout (5s)".to_string()
            } else if e.is_connect() {
                "connection refused".to_string()
            } else {
                format!("error: {e}")
            };
            CheckResult {
                name: name.to_string(),
                status: CheckStatus::Fail,
                message: msg,
                duration: start.elapsed(),
            }
        }
    }
}
