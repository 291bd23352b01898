// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Meetly scheduling assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Meetly configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MeetlyConfig {
    /// Assistant identity and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Anthropic API settings.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Google Calendar and People API settings.
    #[serde(default)]
    pub google: GoogleConfig,

    /// Scheduling policy settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// Assistant identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Opening message shown when a chat session starts.
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            greeting: default_greeting(),
        }
    }
}

fn default_agent_name() -> String {
    "meetly".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_greeting() -> String {
    "Hi there! I'm your AI meeting scheduler. How can I help you schedule a meeting today?"
        .to_string()
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` requires the `ANTHROPIC_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model to use for intent-extraction requests.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
        }
    }
}

fn default_model() -> String {
    "claude-haiku-4-5-20250901".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

/// Google Calendar and People API configuration.
///
/// Token acquisition (OAuth consent, refresh) is outside the workflow
/// boundary; the assistant consumes an access token as configuration input.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GoogleConfig {
    /// OAuth access token. `None` requires the `GOOGLE_ACCESS_TOKEN` environment variable.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Calendar to read and book against.
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,

    /// `sendUpdates` mode for event insertion (all, externalOnly, none).
    #[serde(default = "default_send_updates")]
    pub send_updates: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            calendar_id: default_calendar_id(),
            send_updates: default_send_updates(),
        }
    }
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

fn default_send_updates() -> String {
    "all".to_string()
}

/// Scheduling policy configuration.
///
/// Governs slot suggestion and meeting defaults. Hours are local to
/// `timezone`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// IANA timezone name all scheduling arithmetic happens in.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Meeting length when the request does not mention one.
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: u32,

    /// Earliest hour considered when suggesting alternative slots.
    #[serde(default = "default_work_day_start_hour")]
    pub work_day_start_hour: u32,

    /// Latest hour a suggested slot may end at.
    #[serde(default = "default_work_day_end_hour")]
    pub work_day_end_hour: u32,

    /// Step between candidate slots.
    #[serde(default = "default_slot_increment_minutes")]
    pub slot_increment_minutes: u32,

    /// Maximum number of alternative slots offered on conflict.
    #[serde(default = "default_max_suggested_slots")]
    pub max_suggested_slots: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            default_duration_minutes: default_duration_minutes(),
            work_day_start_hour: default_work_day_start_hour(),
            work_day_end_hour: default_work_day_end_hour(),
            slot_increment_minutes: default_slot_increment_minutes(),
            max_suggested_slots: default_max_suggested_slots(),
        }
    }
}

impl SchedulerConfig {
    /// The configured timezone, falling back to UTC if the name does not
    /// parse. Validation rejects unparseable names at startup, so the
    /// fallback only matters for hand-built configs in tests.
    pub fn timezone(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or(chrono_tz::UTC)
    }
}

fn default_timezone() -> String {
    "America/New_York".to_string()
}

fn default_duration_minutes() -> u32 {
    30
}

fn default_work_day_start_hour() -> u32 {
    9
}

fn default_work_day_end_hour() -> u32 {
    18
}

fn default_slot_increment_minutes() -> u32 {
    30
}

fn default_max_suggested_slots() -> usize {
    3
}
