// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversation controller: a strictly turn-based dialogue loop.
//!
//! All mutable session state lives on [`SchedulerSession`] and is only
//! touched while handling a turn, so every dispatch rule is testable in
//! isolation with a pinned `now`. At most one clarification is pending at
//! any time.

use std::sync::Arc;

use chrono::{DateTime, NaiveTime};
use chrono_tz::Tz;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use meetly_config::MeetlyConfig;
use meetly_core::DirectoryAdapter;
use meetly_core::types::{ChatMessage, MeetingDraft, ScheduledMeeting};
use meetly_intent::datetime::{build_time, format_clock_time, format_long_date};
use meetly_intent::{IntentParser, ParseError};

use crate::booking::{BookingOutcome, MeetingBooker};

/// Email format check: something, an at sign, something, a dot, something.
static RE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").unwrap());

/// Explicit time mention used while rescheduling a conflicted draft.
static RE_RESCHEDULE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bat\s+(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b").unwrap()
});

/// "add contact <name>" opens the new-contact flow.
static RE_ADD_CONTACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^add\s+(?:a\s+)?(?:new\s+)?contact\s+(.+)$").unwrap()
});

static RE_WORD_WITH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bwith\b").unwrap());
static RE_WORD_AT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bat\b").unwrap());

/// Words that confirm booking despite a conflict or past time.
const OVERRIDE_WORDS: &[&str] = &["proceed", "original", "anyway", "yes"];

/// Words that confirm the post-booking document request.
const DOCUMENT_WORDS: &[&str] = &["yes", "document", "send"];

/// Words that decline the post-booking document request.
const DECLINE_WORDS: &[&str] = &["no", "nope", "not now", "no thanks"];

/// Keywords that mark an utterance as a scheduling request.
const SCHEDULING_KEYWORDS: &[&str] = &["meeting", "schedule", "appointment"];

const GREETING_WORDS: &[&str] = &["hi", "hello", "hey", "good morning", "good afternoon"];
const THANKS_WORDS: &[&str] = &["thanks", "thank you", "thx"];
const FAREWELL_WORDS: &[&str] = &["bye", "goodbye", "see you", "later"];
const CAPABILITY_WORDS: &[&str] = &["what can you do", "help", "how do you work"];

/// A clarification the session is waiting on.
#[derive(Debug)]
enum Pending {
    /// Waiting for the email of the participant at
    /// `draft.missing_email_index`.
    AwaitingEmail { draft: MeetingDraft },
    /// Waiting for the user to override, reschedule, or abandon after a
    /// conflict or past-time rejection.
    AwaitingConflictDecision {
        draft: MeetingDraft,
        suggestions: Vec<DateTime<Tz>>,
    },
    /// Waiting for a brand-new contact's email address.
    AwaitingNewContact { name: String },
}

/// Single-session dialogue state machine over the scheduling workflow.
pub struct SchedulerSession {
    parser: Box<dyn IntentParser>,
    booker: MeetingBooker,
    directory: Arc<dyn DirectoryAdapter>,
    transcript: Vec<ChatMessage>,
    pending: Option<Pending>,
    scheduled: Vec<ScheduledMeeting>,
    /// Most recently booked meeting still eligible for the
    /// document-request follow-up.
    current: Option<usize>,
}

impl SchedulerSession {
    /// Creates a session; the configured greeting opens the transcript.
    pub fn new(
        parser: Box<dyn IntentParser>,
        booker: MeetingBooker,
        directory: Arc<dyn DirectoryAdapter>,
        config: &MeetlyConfig,
    ) -> Self {
        Self {
            parser,
            booker,
            directory,
            transcript: vec![ChatMessage::assistant(config.agent.greeting.clone())],
            pending: None,
            scheduled: Vec::new(),
            current: None,
        }
    }

    /// The append-only message transcript, greeting included.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Meetings booked this session, in booking order.
    pub fn scheduled(&self) -> &[ScheduledMeeting] {
        &self.scheduled
    }

    /// True while a clarification (email, conflict, new contact) is open.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Handles one user turn and returns the assistant reply.
    ///
    /// Both messages are appended to the transcript. `now` anchors every
    /// relative date, default time, and past-time check in this turn.
    pub async fn handle_turn(&mut self, input: &str, now: DateTime<Tz>) -> String {
        self.transcript.push(ChatMessage::user(input.trim()));
        let reply = self.dispatch(input.trim(), now).await;
        self.transcript.push(ChatMessage::assistant(reply.clone()));
        reply
    }

    /// First matching rule wins; precedence follows the workflow contract.
    async fn dispatch(&mut self, input: &str, now: DateTime<Tz>) -> String {
        match self.pending.take() {
            // Rules 1 and 2: a conflicted (or past-time) draft is waiting.
            Some(Pending::AwaitingConflictDecision { draft, suggestions }) => {
                self.handle_conflict_decision(draft, suggestions, input, now)
                    .await
            }
            // Rule 3: a brand-new contact's email.
            Some(Pending::AwaitingNewContact { name }) => {
                self.handle_new_contact_email(name, input).await
            }
            // Rule 4: a missing participant email.
            Some(Pending::AwaitingEmail { draft }) => {
                self.handle_missing_email(draft, input, now).await
            }
            None => self.dispatch_unpending(input, now).await,
        }
    }

    async fn handle_conflict_decision(
        &mut self,
        mut draft: MeetingDraft,
        suggestions: Vec<DateTime<Tz>>,
        input: &str,
        now: DateTime<Tz>,
    ) -> String {
        // Rule 1: affirmation books the original time regardless of the
        // conflict.
        if contains_any(input, OVERRIDE_WORDS) {
            draft.conflict_override = true;
            debug!("conflict overridden by user");
            return self.run_booking(draft, now).await;
        }

        // Rule 2: an explicit new time retries the booking.
        if let Some(new_time) = extract_reschedule_time(input) {
            draft.time = new_time;
            let lower = input.to_lowercase();
            if lower.contains("tomorrow") {
                draft.date = now.date_naive() + chrono::Duration::days(1);
            } else if lower.contains("today") {
                draft.date = now.date_naive();
            }
            return self.run_booking(draft, now).await;
        }

        // Neither: keep waiting on the same draft.
        let prompt = if suggestions.is_empty() {
            "Tell me a new time (for example \"at 3pm\"), or say \"proceed\" to book the original time anyway.".to_string()
        } else {
            format!(
                "You can pick one of the open slots ({}), give me another time, or say \"proceed\" to book the original time anyway.",
                format_slot_list(&suggestions)
            )
        };
        self.pending = Some(Pending::AwaitingConflictDecision { draft, suggestions });
        prompt
    }

    async fn handle_new_contact_email(&mut self, name: String, input: &str) -> String {
        if !is_valid_email(input) {
            let reply = format!(
                "That doesn't look like a valid email address. What is {name}'s email?"
            );
            self.pending = Some(Pending::AwaitingNewContact { name });
            return reply;
        }

        match self.directory.create_contact(&name, input).await {
            Ok(contact) => {
                info!(name = %contact.name, "contact created");
                format!("Done -- I've added {name} ({input}) to your contacts.")
            }
            Err(e) => {
                warn!(error = %e, "contact creation failed");
                format!(
                    "I couldn't save {name} to your contacts just now, but I'll still use {input} when you schedule with them."
                )
            }
        }
    }

    async fn handle_missing_email(
        &mut self,
        mut draft: MeetingDraft,
        input: &str,
        now: DateTime<Tz>,
    ) -> String {
        let index = draft.missing_email_index.unwrap_or(0);
        let name = draft
            .participants
            .get(index)
            .cloned()
            .unwrap_or_else(|| "that participant".to_string());

        // Rule 4: a bad address re-prompts for the same person without
        // touching the draft.
        if !is_valid_email(input) {
            let reply = format!(
                "That doesn't look like a valid email address. What is {name}'s email?"
            );
            self.pending = Some(Pending::AwaitingEmail { draft });
            return reply;
        }

        draft.emails[index] = Some(input.to_string());
        draft.missing_email_index = None;

        // Persist the contact best-effort; the booking retry doesn't depend
        // on it.
        if let Err(e) = self.directory.create_contact(&name, input).await {
            warn!(error = %e, name = %name, "could not persist new contact");
        }

        self.run_booking(draft, now).await
    }

    async fn dispatch_unpending(&mut self, input: &str, now: DateTime<Tz>) -> String {
        // Rule 5: document-request follow-up for the meeting just booked.
        if let Some(index) = self.current {
            if contains_any(input, DOCUMENT_WORDS) {
                self.scheduled[index].document_request_sent = true;
                self.current = None;
                // The outbound notification is a stub; only the flag is real.
                info!(meeting = %self.scheduled[index].title, "document request sent");
                return "Done! I've asked all participants to share any relevant documents before the meeting.".to_string();
            }
            if is_decline(input) {
                self.current = None;
                return "No problem. Is there anything else I can schedule for you?".to_string();
            }
        }

        // Recovered from the original add-new-contact flow: an explicit
        // command opens the awaiting-new-contact state.
        if let Some(name) = parse_add_contact(input) {
            let reply = format!("Sure -- what is {name}'s email address?");
            self.pending = Some(Pending::AwaitingNewContact { name });
            return reply;
        }

        // Rule 6: scheduling requests run the parser -> booking pipeline.
        if looks_like_scheduling_request(input) {
            return match self.parser.parse(input, now).await {
                Ok(draft) => self.run_booking(draft, now).await,
                Err(ParseError::Insufficient) => {
                    "I'd be happy to schedule that meeting for you. Could you provide more details about when you'd like to meet and who should attend?".to_string()
                }
                Err(e) => {
                    warn!(error = %e, "intent parsing failed");
                    "Sorry, I couldn't work out the meeting details. Could you rephrase -- for example, \"Schedule a meeting with Ana tomorrow at 2pm\"?".to_string()
                }
            };
        }

        // Rule 7: canned conversational replies.
        canned_reply(input)
    }

    /// Runs the booking machine and translates its outcome into a reply and
    /// the next pending state.
    async fn run_booking(&mut self, mut draft: MeetingDraft, now: DateTime<Tz>) -> String {
        match self.booker.book(&mut draft, now).await {
            BookingOutcome::Booked(meeting) => {
                let reply = format!(
                    "\u{2713} I've scheduled \"{}\" for {} at {}. Calendar invites have been sent to all participants, and here's the meeting link: {}\nWould you like me to ask the participants for any documents before the meeting?",
                    meeting.title,
                    format_long_date(meeting.date),
                    format_clock_time(meeting.time),
                    meeting.meeting_link,
                );
                self.scheduled.push(meeting);
                self.current = Some(self.scheduled.len() - 1);
                reply
            }
            BookingOutcome::TimePassed { start } => {
                let reply = format!(
                    "It looks like {} at {} has already passed. What time should I book instead?",
                    format_long_date(start.date_naive()),
                    format_clock_time(start.time()),
                );
                self.pending = Some(Pending::AwaitingConflictDecision {
                    draft,
                    suggestions: Vec::new(),
                });
                reply
            }
            BookingOutcome::Conflict { suggestions } => {
                let reply = if suggestions.is_empty() {
                    format!(
                        "You already have an event at that time on {}, and I couldn't find another open slot that day. Give me a different time or day, or say \"proceed\" to book it anyway.",
                        format_long_date(draft.date),
                    )
                } else {
                    format!(
                        "You already have an event at that time. Here are some open slots on {}: {}. Reply with a new time, or say \"proceed\" to book the original time anyway.",
                        format_long_date(draft.date),
                        format_slot_list(&suggestions),
                    )
                };
                self.pending = Some(Pending::AwaitingConflictDecision { draft, suggestions });
                reply
            }
            BookingOutcome::MissingEmail { index } => {
                let name = draft
                    .participants
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| "that participant".to_string());
                let reply = format!(
                    "I couldn't find an email address for {name}. What is {name}'s email?"
                );
                self.pending = Some(Pending::AwaitingEmail { draft });
                reply
            }
            BookingOutcome::Failed { message } => message,
        }
    }
}

/// The literal at-sign dot pattern from the workflow contract.
fn is_valid_email(input: &str) -> bool {
    RE_EMAIL.is_match(input.trim())
}

fn contains_any(input: &str, words: &[&str]) -> bool {
    let lower = input.to_lowercase();
    words.iter().any(|w| lower.contains(w))
}

/// Declines are matched exactly so names like "Nolan" never read as a "no".
fn is_decline(input: &str) -> bool {
    let lower = input.trim().trim_end_matches(['.', '!']).to_lowercase();
    DECLINE_WORDS.contains(&lower.as_str())
}

fn looks_like_scheduling_request(input: &str) -> bool {
    let lower = input.to_lowercase();
    if SCHEDULING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return true;
    }
    RE_WORD_WITH.is_match(input) && RE_WORD_AT.is_match(input)
}

fn parse_add_contact(input: &str) -> Option<String> {
    RE_ADD_CONTACT.captures(input.trim()).map(|caps| {
        caps[1]
            .trim()
            .trim_end_matches(['.', '!', '?'])
            .to_string()
    })
}

fn extract_reschedule_time(input: &str) -> Option<NaiveTime> {
    let caps = RE_RESCHEDULE_TIME.captures(input)?;
    let hour = caps[1].parse::<u32>().ok()?;
    let minute = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
    let meridiem = caps.get(3).map(|m| m.as_str().eq_ignore_ascii_case("pm"));
    build_time(hour, minute, meridiem)
}

fn format_slot_list(slots: &[DateTime<Tz>]) -> String {
    slots
        .iter()
        .map(|slot| format_clock_time(slot.time()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn canned_reply(input: &str) -> String {
    let lower = input.to_lowercase();
    let trimmed = lower.trim();

    if CAPABILITY_WORDS.iter().any(|w| trimmed.contains(w)) {
        return "I can schedule meetings for you: tell me who to invite and when, I'll check your calendar for conflicts, resolve everyone's email address, and send out invites with a meeting link.".to_string();
    }
    if GREETING_WORDS
        .iter()
        .any(|w| trimmed == *w || trimmed.starts_with(&format!("{w} ")) || trimmed.starts_with(&format!("{w},")))
    {
        return "Hello! Ready to schedule a meeting whenever you are.".to_string();
    }
    if THANKS_WORDS.iter().any(|w| trimmed.contains(w)) {
        return "You're welcome! Anything else I can schedule for you?".to_string();
    }
    if FAREWELL_WORDS.iter().any(|w| trimmed.contains(w)) {
        return "Goodbye! Come back whenever you need another meeting on the books.".to_string();
    }

    "I'm here to help you schedule meetings. Please let me know when and with whom you'd like to meet, and I'll take care of the rest.".to_string()
}
