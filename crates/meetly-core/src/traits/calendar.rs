// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calendar adapter trait for external calendar services.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::MeetlyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CalendarEvent, CreatedEvent, EventRequest};

/// Adapter for calendar service integrations.
#[async_trait]
pub trait CalendarAdapter: PluginAdapter {
    /// Fetches all events on the given calendar day, in the adapter's
    /// configured timezone, normalized to UTC instants.
    async fn list_events(&self, day: NaiveDate) -> Result<Vec<CalendarEvent>, MeetlyError>;

    /// Creates a calendar event, sending invitations to all attendees.
    async fn insert_event(&self, request: &EventRequest)
    -> Result<CreatedEvent, MeetlyError>;
}
