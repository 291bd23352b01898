// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as parseable timezone names and a coherent work-day
//! window.

use crate::diagnostic::ConfigError;
use crate::model::MeetlyConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const SEND_UPDATES_MODES: &[&str] = &["all", "externalOnly", "none"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MeetlyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.agent.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "agent.name must not be empty".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.agent.log_level
            ),
        });
    }

    if config.anthropic.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "anthropic.max_tokens must be at least 1".to_string(),
        });
    }

    if config.google.calendar_id.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "google.calendar_id must not be empty".to_string(),
        });
    }

    if !SEND_UPDATES_MODES.contains(&config.google.send_updates.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "google.send_updates must be one of {}, got `{}`",
                SEND_UPDATES_MODES.join(", "),
                config.google.send_updates
            ),
        });
    }

    if config.scheduler.timezone.parse::<chrono_tz::Tz>().is_err() {
        errors.push(ConfigError::Validation {
            message: format!(
                "scheduler.timezone `{}` is not a valid IANA timezone name",
                config.scheduler.timezone
            ),
        });
    }

    if config.scheduler.work_day_start_hour >= config.scheduler.work_day_end_hour {
        errors.push(ConfigError::Validation {
            message: format!(
                "scheduler.work_day_start_hour ({}) must be before work_day_end_hour ({})",
                config.scheduler.work_day_start_hour, config.scheduler.work_day_end_hour
            ),
        });
    }

    if config.scheduler.work_day_end_hour > 24 {
        errors.push(ConfigError::Validation {
            message: format!(
                "scheduler.work_day_end_hour must be at most 24, got {}",
                config.scheduler.work_day_end_hour
            ),
        });
    }

    if config.scheduler.slot_increment_minutes == 0 {
        errors.push(ConfigError::Validation {
            message: "scheduler.slot_increment_minutes must be at least 1".to_string(),
        });
    }

    if config.scheduler.default_duration_minutes == 0 {
        errors.push(ConfigError::Validation {
            message: "scheduler.default_duration_minutes must be at least 1".to_string(),
        });
    }

    if config.scheduler.max_suggested_slots == 0 {
        errors.push(ConfigError::Validation {
            message: "scheduler.max_suggested_slots must be at least 1".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
