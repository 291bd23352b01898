// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Meetly workflow.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifies the type of adapter behind a boundary trait.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Calendar,
    Directory,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

// --- Chat transcript types ---

/// Who authored a chat message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single message in the session transcript.
///
/// Messages are immutable once appended; the transcript is an append-only
/// ordered sequence for the life of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    /// Creates a user-authored message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    /// Creates an assistant-authored message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}

// --- Meeting types ---

/// An in-progress meeting request.
///
/// Created by the intent parser from a single utterance, then mutated in
/// place across clarification turns (missing email supplied, conflict
/// overridden, time rescheduled) until booking succeeds or the user
/// abandons the flow.
///
/// `emails` parallels `participants`; entries stay `None` until resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingDraft {
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub participants: Vec<String>,
    pub emails: Vec<Option<String>>,
    /// Index of the participant whose email the session is waiting on.
    pub missing_email_index: Option<usize>,
    /// Set when the user explicitly asked to book despite a conflict or
    /// past start time.
    pub conflict_override: bool,
}

impl MeetingDraft {
    /// Creates a draft with no emails resolved yet.
    pub fn new(
        title: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        duration_minutes: u32,
        participants: Vec<String>,
    ) -> Self {
        let emails = vec![None; participants.len()];
        Self {
            title: title.into(),
            date,
            time,
            duration_minutes,
            participants,
            emails,
            missing_email_index: None,
            conflict_override: false,
        }
    }

    /// Index of the first participant without a resolved email.
    pub fn first_missing_email(&self) -> Option<usize> {
        self.emails.iter().position(|e| e.is_none())
    }

    /// True when every participant has a resolved email.
    pub fn fully_resolved(&self) -> bool {
        self.emails.iter().all(|e| e.is_some())
    }

    /// The resolved emails, in participant order. Skips unresolved entries;
    /// callers gate on [`fully_resolved`](Self::fully_resolved) first.
    pub fn resolved_emails(&self) -> Vec<String> {
        self.emails.iter().flatten().cloned().collect()
    }
}

/// A successfully booked meeting.
///
/// Created only after the calendar insert succeeds; appended to the
/// session's ordered list and never mutated except to flip
/// `document_request_sent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledMeeting {
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub participants: Vec<String>,
    pub emails: Vec<String>,
    pub meeting_link: String,
    pub document_request_sent: bool,
}

// --- Directory types ---

/// An entry from the contacts directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub emails: Vec<String>,
}

impl Contact {
    /// The contact's first email address, if any.
    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(String::as_str)
    }
}

// --- Calendar types ---

/// A normalized calendar event with concrete UTC instants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Payload for creating a calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRequest {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// IANA timezone name sent alongside the instants so the provider
    /// renders the event in the organizer's zone.
    pub timezone: String,
    pub attendees: Vec<String>,
    /// Request a conferencing link be attached to the event.
    pub conferencing: bool,
}

/// The provider's record of a created event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEvent {
    pub id: String,
    pub html_link: Option<String>,
    pub hangout_link: Option<String>,
}

// --- Provider types ---

/// A request to an LLM provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    pub messages: Vec<ProviderMessage>,
    pub max_tokens: u32,
}

/// A single message in provider conversation format.
#[derive(Debug, Clone)]
pub struct ProviderMessage {
    pub role: String,
    pub content: String,
}

impl ProviderMessage {
    /// Creates a user-role provider message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A response from an LLM provider.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub stop_reason: Option<String>,
    pub usage: TokenUsage,
}

/// Token usage statistics reported by the provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}
