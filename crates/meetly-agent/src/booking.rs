// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The meeting-creation state machine.
//!
//! Takes a draft through the fixed precedence: past-time check, conflict
//! check, email resolution, calendar insertion. Each halt point returns a
//! [`BookingOutcome`] for the session to translate into a clarification
//! question; external failures are caught here and never abort the dialogue.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

use meetly_config::MeetlyConfig;
use meetly_core::error::CalendarFailure;
use meetly_core::types::{EventRequest, MeetingDraft, ScheduledMeeting};
use meetly_core::{CalendarAdapter, DirectoryAdapter};

use crate::availability::{self, SlotPolicy};
use crate::resolver;

/// Where a booking attempt ended up.
#[derive(Debug)]
pub enum BookingOutcome {
    /// The event was created and invitations sent.
    Booked(ScheduledMeeting),
    /// The proposed start is already in the past.
    TimePassed { start: DateTime<Tz> },
    /// The proposed interval overlaps an existing event.
    Conflict { suggestions: Vec<DateTime<Tz>> },
    /// A participant has no resolvable email address.
    MissingEmail { index: usize },
    /// The calendar rejected the booking for a reason the user cannot fix
    /// by supplying an email.
    Failed { message: String },
}

/// Books meetings against a calendar, resolving participants on the way.
pub struct MeetingBooker {
    calendar: Arc<dyn CalendarAdapter>,
    directory: Arc<dyn DirectoryAdapter>,
    timezone: Tz,
    policy: SlotPolicy,
    organizer_note: String,
}

impl MeetingBooker {
    /// Creates a booker with the configured timezone and slot policy.
    pub fn new(
        calendar: Arc<dyn CalendarAdapter>,
        directory: Arc<dyn DirectoryAdapter>,
        config: &MeetlyConfig,
    ) -> Self {
        Self {
            calendar,
            directory,
            timezone: config.scheduler.timezone(),
            policy: SlotPolicy::from_config(&config.scheduler),
            organizer_note: format!("Scheduled by {}.", config.agent.name),
        }
    }

    /// The timezone all booking arithmetic happens in.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Attempts to book the draft. Mutates it in place: resolved emails are
    /// filled in and `missing_email_index` records where the flow halted.
    ///
    /// The calendar insert only happens once every participant has an email
    /// and the time is either conflict-free or explicitly overridden.
    pub async fn book(&self, draft: &mut MeetingDraft, now: DateTime<Tz>) -> BookingOutcome {
        // 1. Concrete start/end in the scheduler timezone.
        let Some(start) = draft
            .date
            .and_time(draft.time)
            .and_local_timezone(self.timezone)
            .single()
        else {
            return BookingOutcome::Failed {
                message: format!(
                    "I couldn't place {} {} on the calendar -- that local time doesn't exist. Could you pick another time?",
                    draft.date, draft.time
                ),
            };
        };
        let end = start + chrono::Duration::minutes(i64::from(draft.duration_minutes));

        // 2. Past start times are rejected outright unless overridden. This
        // is a validity rule, independent of any conflict.
        if start < now && !draft.conflict_override {
            return BookingOutcome::TimePassed { start };
        }

        // 3. Conflict check, skipped entirely on override.
        if !draft.conflict_override {
            match self.calendar.list_events(draft.date).await {
                Ok(events) => {
                    let start_utc = start.with_timezone(&Utc);
                    let end_utc = end.with_timezone(&Utc);
                    if availability::find_conflict(&events, start_utc, end_utc).is_some() {
                        let suggestions = availability::suggest_slots(
                            &events,
                            now,
                            draft.date,
                            draft.duration_minutes,
                            &self.policy,
                        );
                        return BookingOutcome::Conflict { suggestions };
                    }
                }
                Err(e) => {
                    warn!(error = %e, "availability check failed");
                    return BookingOutcome::Failed {
                        message:
                            "I couldn't check your calendar just now. Please try again in a moment."
                                .to_string(),
                    };
                }
            }
        }

        // 4. Resolve any still-missing participant emails.
        let unresolved: Vec<(usize, String)> = draft
            .emails
            .iter()
            .enumerate()
            .filter(|(_, email)| email.is_none())
            .map(|(i, _)| (i, draft.participants[i].clone()))
            .collect();

        if !unresolved.is_empty() {
            let names: Vec<String> = unresolved.iter().map(|(_, name)| name.clone()).collect();
            let resolved = resolver::resolve_emails(self.directory.as_ref(), &names).await;
            for ((index, _), email) in unresolved.iter().zip(resolved) {
                draft.emails[*index] = email;
            }
        }

        if let Some(index) = draft.first_missing_email() {
            draft.missing_email_index = Some(index);
            return BookingOutcome::MissingEmail { index };
        }

        // 5. Submit with conferencing and invitations for every attendee.
        let request = EventRequest {
            summary: draft.title.clone(),
            description: self.organizer_note.clone(),
            start: start.with_timezone(&Utc),
            end: end.with_timezone(&Utc),
            timezone: self.timezone.name().to_string(),
            attendees: draft.resolved_emails(),
            conferencing: true,
        };

        match self.calendar.insert_event(&request).await {
            Ok(created) => {
                let meeting_link = created
                    .hangout_link
                    .or(created.html_link)
                    .unwrap_or_else(placeholder_link);
                info!(event_id = %created.id, "meeting booked");
                BookingOutcome::Booked(ScheduledMeeting {
                    title: draft.title.clone(),
                    date: draft.date,
                    time: draft.time,
                    participants: draft.participants.clone(),
                    emails: draft.resolved_emails(),
                    meeting_link,
                    document_request_sent: false,
                })
            }
            Err(e) => {
                // Only an attendee-related rejection re-enters the
                // missing-email flow; other failure kinds surface as-is
                // instead of masquerading as an address problem.
                if e.calendar_kind() == Some(CalendarFailure::InvalidAttendee)
                    && !draft.participants.is_empty()
                {
                    warn!(error = %e, "calendar rejected an attendee, re-prompting");
                    draft.emails[0] = None;
                    draft.missing_email_index = Some(0);
                    return BookingOutcome::MissingEmail { index: 0 };
                }

                warn!(error = %e, "calendar insert failed");
                BookingOutcome::Failed {
                    message: failure_message(e.calendar_kind()),
                }
            }
        }
    }
}

/// Locally generated conferencing link used when the provider returns none.
fn placeholder_link() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("https://meet.example.com/{}", &id[..8])
}

/// User-facing wording per calendar failure kind.
fn failure_message(kind: Option<CalendarFailure>) -> String {
    match kind {
        Some(CalendarFailure::Auth) => {
            "I couldn't book that -- my calendar access looks expired. Please reconnect your calendar and try again.".to_string()
        }
        Some(CalendarFailure::Quota) => {
            "The calendar service is rate-limiting me right now. Please try again in a minute.".to_string()
        }
        Some(CalendarFailure::Network) => {
            "I couldn't reach the calendar service. Please check the connection and try again.".to_string()
        }
        _ => "Something went wrong while creating the event. Please try again.".to_string(),
    }
}
