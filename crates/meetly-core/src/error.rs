// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Meetly scheduling assistant.

use thiserror::Error;

/// Classification of a failed calendar operation.
///
/// Insert failures carry a kind so the booking flow can tell whether a
/// failure is attributable to an unresolved attendee (re-prompt for an
/// email) or must surface to the user as a calendar problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarFailure {
    /// Credentials rejected or expired.
    Auth,
    /// Rate limit or quota exhausted.
    Quota,
    /// The request was rejected because of an attendee entry.
    InvalidAttendee,
    /// Transport-level failure (DNS, connect, TLS).
    Network,
    /// Any other API-level rejection.
    Api,
}

impl std::fmt::Display for CalendarFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalendarFailure::Auth => write!(f, "auth"),
            CalendarFailure::Quota => write!(f, "quota"),
            CalendarFailure::InvalidAttendee => write!(f, "invalid attendee"),
            CalendarFailure::Network => write!(f, "network"),
            CalendarFailure::Api => write!(f, "api"),
        }
    }
}

/// The primary error type used across all Meetly adapter traits and core operations.
#[derive(Debug, Error)]
pub enum MeetlyError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// LLM provider errors (API failure, malformed response, token limits).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Calendar service errors, classified by failure kind.
    #[error("calendar error ({kind}): {message}")]
    Calendar {
        kind: CalendarFailure,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Contacts directory errors (search failure, create failure).
    #[error("directory error: {message}")]
    Directory {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MeetlyError {
    /// Returns the calendar failure kind, if this is a calendar error.
    pub fn calendar_kind(&self) -> Option<CalendarFailure> {
        match self {
            MeetlyError::Calendar { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
