// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google service adapters for the Meetly scheduling assistant.
//!
//! Implements [`CalendarAdapter`](meetly_core::CalendarAdapter) against the
//! Calendar API v3 and [`DirectoryAdapter`](meetly_core::DirectoryAdapter)
//! against the People API v1. OAuth token acquisition is outside the
//! workflow boundary; both clients consume a ready access token from
//! configuration or the `GOOGLE_ACCESS_TOKEN` environment variable.

pub mod calendar;
pub mod contacts;

use meetly_core::MeetlyError;

pub use calendar::GoogleCalendar;
pub use contacts::GoogleDirectory;

/// Resolves the access token from config or environment.
fn resolve_access_token(config_token: &Option<String>) -> Result<String, MeetlyError> {
    if let Some(token) = config_token
        && !token.is_empty()
    {
        return Ok(token.clone());
    }

    std::env::var("GOOGLE_ACCESS_TOKEN").map_err(|_| {
        MeetlyError::Config(
            "Google access token not found. Set google.access_token in config or GOOGLE_ACCESS_TOKEN environment variable.".into(),
        )
    })
}

/// Builds a reqwest client with a bearer authorization default header.
fn authorized_client(access_token: &str) -> Result<reqwest::Client, MeetlyError> {
    use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

    let mut headers = HeaderMap::new();
    let mut auth = HeaderValue::from_str(&format!("Bearer {access_token}"))
        .map_err(|e| MeetlyError::Config(format!("invalid access token header value: {e}")))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(|e| MeetlyError::Internal(format!("failed to build HTTP client: {e}")))
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
