// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock calendar adapter with preset events and recorded insertions.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use meetly_core::error::{CalendarFailure, MeetlyError};
use meetly_core::traits::{CalendarAdapter, PluginAdapter};
use meetly_core::types::{
    AdapterType, CalendarEvent, CreatedEvent, EventRequest, HealthStatus,
};

/// A mock calendar: serves a fixed event list, records every insertion,
/// and can be told to reject inserts with a chosen failure kind.
pub struct MockCalendar {
    events: Vec<CalendarEvent>,
    inserted: Arc<Mutex<Vec<EventRequest>>>,
    fail_kind: Option<CalendarFailure>,
    conferencing_link: Option<String>,
}

impl MockCalendar {
    /// Creates an empty calendar that accepts every insert.
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            inserted: Arc::new(Mutex::new(Vec::new())),
            fail_kind: None,
            conferencing_link: None,
        }
    }

    /// Pre-populates the day's event list.
    pub fn with_events(mut self, events: Vec<CalendarEvent>) -> Self {
        self.events = events;
        self
    }

    /// Makes every insert fail with the given kind.
    pub fn failing_with(mut self, kind: CalendarFailure) -> Self {
        self.fail_kind = Some(kind);
        self
    }

    /// Sets the conferencing link returned for created events. Without it,
    /// created events carry no link at all.
    pub fn with_conferencing_link(mut self, link: &str) -> Self {
        self.conferencing_link = Some(link.to_string());
        self
    }

    /// Shared handle to the recorded insertions; clone it before moving the
    /// calendar into an `Arc`.
    pub fn inserted(&self) -> Arc<Mutex<Vec<EventRequest>>> {
        self.inserted.clone()
    }
}

impl Default for MockCalendar {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockCalendar {
    fn name(&self) -> &str {
        "mock-calendar"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Calendar
    }

    async fn health_check(&self) -> Result<HealthStatus, MeetlyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MeetlyError> {
        Ok(())
    }
}

#[async_trait]
impl CalendarAdapter for MockCalendar {
    async fn list_events(&self, _day: NaiveDate) -> Result<Vec<CalendarEvent>, MeetlyError> {
        Ok(self.events.clone())
    }

    async fn insert_event(&self, request: &EventRequest) -> Result<CreatedEvent, MeetlyError> {
        if let Some(kind) = self.fail_kind {
            return Err(MeetlyError::Calendar {
                kind,
                message: format!("mock calendar rejection ({kind})"),
                source: None,
            });
        }

        let mut inserted = self.inserted.lock().unwrap();
        inserted.push(request.clone());
        Ok(CreatedEvent {
            id: format!("mock-event-{}", inserted.len()),
            html_link: None,
            hangout_link: self.conferencing_link.clone(),
        })
    }
}
