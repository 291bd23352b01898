// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end test harness: a full scheduler session over mock adapters.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone};
use chrono_tz::America::New_York;
use chrono_tz::Tz;

use meetly_agent::{MeetingBooker, SchedulerSession};
use meetly_config::MeetlyConfig;
use meetly_core::error::CalendarFailure;
use meetly_core::types::{CalendarEvent, EventRequest};
use meetly_intent::CompositeParser;

use crate::{MockCalendar, MockDirectory, MockProvider};

/// A fully wired scheduler session over mock adapters with a pinned clock.
///
/// The default clock is Tuesday, March 10, 2026, 9:00 AM Eastern. Without
/// queued LLM replies the mock provider returns non-JSON text, so parsing
/// exercises the heuristic fallback deterministically.
pub struct TestHarness {
    pub session: SchedulerSession,
    /// Every event request the mock calendar accepted.
    pub inserted: Arc<Mutex<Vec<EventRequest>>>,
    /// Every (name, email) pair persisted to the mock directory.
    pub created_contacts: Arc<Mutex<Vec<(String, String)>>>,
    now: DateTime<Tz>,
}

impl TestHarness {
    /// Starts building a harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::default()
    }

    /// Runs one dialogue turn at the pinned clock.
    pub async fn turn(&mut self, input: &str) -> String {
        self.session.handle_turn(input, self.now).await
    }

    /// The pinned clock.
    pub fn now(&self) -> DateTime<Tz> {
        self.now
    }

    /// Moves the pinned clock (for multi-turn scenarios spanning time).
    pub fn set_now(&mut self, now: DateTime<Tz>) {
        self.now = now;
    }

    /// Number of calendar insertions so far.
    pub fn insert_count(&self) -> usize {
        self.inserted.lock().unwrap().len()
    }
}

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    llm_replies: Vec<String>,
    llm_fails: bool,
    contacts: Vec<(String, String)>,
    events: Vec<CalendarEvent>,
    calendar_failure: Option<CalendarFailure>,
    conferencing_link: Option<String>,
    now: DateTime<Tz>,
}

impl Default for TestHarnessBuilder {
    fn default() -> Self {
        Self {
            llm_replies: Vec::new(),
            llm_fails: false,
            contacts: Vec::new(),
            events: Vec::new(),
            calendar_failure: None,
            conferencing_link: None,
            now: New_York.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap(),
        }
    }
}

impl TestHarnessBuilder {
    /// Queues LLM extraction replies (JSON strings take the primary path).
    pub fn with_llm_replies(mut self, replies: Vec<String>) -> Self {
        self.llm_replies = replies;
        self
    }

    /// Makes every LLM call fail, forcing the heuristic fallback.
    pub fn with_failing_llm(mut self) -> Self {
        self.llm_fails = true;
        self
    }

    /// Seeds the contacts directory.
    pub fn with_contacts(mut self, entries: Vec<(&str, &str)>) -> Self {
        self.contacts = entries
            .into_iter()
            .map(|(n, e)| (n.to_string(), e.to_string()))
            .collect();
        self
    }

    /// Seeds the day's calendar events.
    pub fn with_events(mut self, events: Vec<CalendarEvent>) -> Self {
        self.events = events;
        self
    }

    /// Makes calendar insertion fail with the given kind.
    pub fn with_calendar_failure(mut self, kind: CalendarFailure) -> Self {
        self.calendar_failure = Some(kind);
        self
    }

    /// Sets the conferencing link returned for created events.
    pub fn with_conferencing_link(mut self, link: &str) -> Self {
        self.conferencing_link = Some(link.to_string());
        self
    }

    /// Pins the clock.
    pub fn with_now(mut self, now: DateTime<Tz>) -> Self {
        self.now = now;
        self
    }

    /// Wires the session.
    pub fn build(self) -> TestHarness {
        let mut config = MeetlyConfig::default();
        config.scheduler.timezone = "America/New_York".to_string();

        let provider = if self.llm_fails {
            MockProvider::failing()
        } else {
            MockProvider::with_replies(self.llm_replies)
        };

        let mut calendar = MockCalendar::new().with_events(self.events);
        if let Some(kind) = self.calendar_failure {
            calendar = calendar.failing_with(kind);
        }
        if let Some(ref link) = self.conferencing_link {
            calendar = calendar.with_conferencing_link(link);
        }
        let inserted = calendar.inserted();

        let contact_refs: Vec<(&str, &str)> = self
            .contacts
            .iter()
            .map(|(n, e)| (n.as_str(), e.as_str()))
            .collect();
        let directory = MockDirectory::with_contacts(contact_refs);
        let created_contacts = directory.created();
        let directory = Arc::new(directory);

        let parser = CompositeParser::from_config(Arc::new(provider), &config);
        let booker = MeetingBooker::new(Arc::new(calendar), directory.clone(), &config);
        let session = SchedulerSession::new(Box::new(parser), booker, directory, &config);

        TestHarness {
            session,
            inserted,
            created_contacts,
            now: self.now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_defaults_to_heuristic_parsing() {
        let mut harness = TestHarness::builder()
            .with_contacts(vec![("Ana Souza", "ana@example.com")])
            .build();

        let reply = harness
            .turn("Schedule a meeting with Ana tomorrow at 2pm")
            .await;
        assert!(reply.contains("scheduled"), "got: {reply}");
        assert_eq!(harness.insert_count(), 1);
    }

    #[tokio::test]
    async fn transcript_opens_with_greeting() {
        let harness = TestHarness::builder().build();
        let transcript = harness.session.transcript();
        assert_eq!(transcript.len(), 1);
        assert!(transcript[0].text.contains("meeting scheduler"));
    }
}
