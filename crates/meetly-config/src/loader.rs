// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./meetly.toml` > `~/.config/meetly/meetly.toml` > `/etc/meetly/meetly.toml`
//! with environment variable overrides via `MEETLY_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::MeetlyConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/meetly/meetly.toml` (system-wide)
/// 3. `~/.config/meetly/meetly.toml` (user XDG config)
/// 4. `./meetly.toml` (local directory)
/// 5. `MEETLY_*` environment variables
pub fn load_config() -> Result<MeetlyConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<MeetlyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MeetlyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MeetlyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MeetlyConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MeetlyConfig::default()))
        .merge(Toml::file("/etc/meetly/meetly.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("meetly/meetly.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("meetly.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `MEETLY_GOOGLE_ACCESS_TOKEN`
/// must map to `google.access_token`, not `google.access.token`.
fn env_provider() -> Env {
    Env::prefixed("MEETLY_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: MEETLY_GOOGLE_ACCESS_TOKEN -> "google_access_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("anthropic_", "anthropic.", 1)
            .replacen("google_", "google.", 1)
            .replacen("scheduler_", "scheduler.", 1);
        mapped.into()
    })
}
