// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end dialogue tests for the complete scheduling pipeline.
//!
//! Each test wires an isolated TestHarness (mock provider, calendar, and
//! directory) with a clock pinned to Tuesday, March 10, 2026, 9:00 AM
//! Eastern. Tests are independent and order-insensitive.

use chrono::TimeZone;
use chrono_tz::America::New_York;
use meetly_core::error::CalendarFailure;
use meetly_core::types::{CalendarEvent, ChatRole};
use meetly_test_utils::TestHarness;

fn busy_event(start_h: u32, end_h: u32) -> CalendarEvent {
    CalendarEvent {
        id: format!("busy-{start_h}"),
        summary: "Existing event".into(),
        start: New_York
            .with_ymd_and_hms(2026, 3, 10, start_h, 0, 0)
            .unwrap()
            .with_timezone(&chrono::Utc),
        end: New_York
            .with_ymd_and_hms(2026, 3, 10, end_h, 0, 0)
            .unwrap()
            .with_timezone(&chrono::Utc),
    }
}

// ---- Happy path ----

#[tokio::test]
async fn booking_round_trips_draft_fields() {
    let mut harness = TestHarness::builder()
        .with_contacts(vec![
            ("Ana Souza", "ana@example.com"),
            ("Ben King", "ben@example.com"),
        ])
        .with_conferencing_link("https://meet.google.com/abc-defg-hij")
        .build();

    let reply = harness
        .turn("Schedule a meeting with Ana and Ben tomorrow at 2pm")
        .await;

    assert!(reply.contains("I've scheduled"), "got: {reply}");
    // Tomorrow from the pinned clock, rendered long-form.
    assert!(reply.contains("Wednesday, March 11, 2026"), "got: {reply}");
    assert!(reply.contains("2:00 PM"), "got: {reply}");
    assert!(reply.contains("https://meet.google.com/abc-defg-hij"));

    let scheduled = harness.session.scheduled();
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].participants, vec!["Ana", "Ben"]);
    assert_eq!(
        scheduled[0].emails,
        vec!["ana@example.com".to_string(), "ben@example.com".to_string()]
    );
    assert!(!scheduled[0].document_request_sent);

    assert_eq!(harness.insert_count(), 1);
    let inserted = harness.inserted.lock().unwrap();
    assert_eq!(
        inserted[0].attendees,
        vec!["ana@example.com", "ben@example.com"]
    );
    assert!(inserted[0].conferencing);
}

#[tokio::test]
async fn llm_extraction_takes_the_primary_path() {
    let mut harness = TestHarness::builder()
        .with_llm_replies(vec![
            r#"{"title": "Quarterly planning", "date": "2026-03-12", "time": "15:30",
                "duration_minutes": 60, "participants": ["Ana"]}"#
                .to_string(),
        ])
        .with_contacts(vec![("Ana Souza", "ana@example.com")])
        .build();

    let reply = harness.turn("schedule quarterly planning with Ana").await;

    assert!(reply.contains("Quarterly planning"), "got: {reply}");
    assert!(reply.contains("Thursday, March 12, 2026"), "got: {reply}");
    assert!(reply.contains("3:30 PM"), "got: {reply}");
}

#[tokio::test]
async fn failed_llm_falls_back_to_pattern_rules() {
    let mut harness = TestHarness::builder()
        .with_failing_llm()
        .with_contacts(vec![("Ana Souza", "ana@example.com")])
        .build();

    let reply = harness
        .turn("Schedule a meeting with Ana tomorrow at 2pm")
        .await;
    assert!(reply.contains("I've scheduled"), "got: {reply}");
    assert_eq!(harness.insert_count(), 1);
}

// ---- Missing email flow ----

#[tokio::test]
async fn unresolvable_participant_prompts_for_email_without_insert() {
    let mut harness = TestHarness::builder().build(); // empty directory

    let reply = harness
        .turn("Schedule a meeting with Dana tomorrow at 2pm")
        .await;

    assert!(reply.contains("Dana"), "got: {reply}");
    assert!(reply.to_lowercase().contains("email"), "got: {reply}");
    assert_eq!(harness.insert_count(), 0);

    // Exactly one assistant message beyond the greeting.
    let assistant_turns = harness
        .session
        .transcript()
        .iter()
        .filter(|m| m.role == ChatRole::Assistant)
        .count();
    assert_eq!(assistant_turns, 2); // greeting + the email prompt
}

#[tokio::test]
async fn invalid_email_reprompts_then_valid_email_books() {
    let mut harness = TestHarness::builder().build();

    harness
        .turn("Schedule a meeting with Dana tomorrow at 2pm")
        .await;

    let reply = harness.turn("not-an-email").await;
    assert!(reply.contains("valid email"), "got: {reply}");
    assert!(reply.contains("Dana"), "got: {reply}");
    assert!(harness.session.has_pending());
    assert_eq!(harness.insert_count(), 0);

    let reply = harness.turn("dana@example.co").await;
    assert!(reply.contains("I've scheduled"), "got: {reply}");
    assert_eq!(harness.insert_count(), 1);
    assert_eq!(
        harness.inserted.lock().unwrap()[0].attendees,
        vec!["dana@example.co"]
    );

    // The supplied address was persisted as a contact, best-effort.
    assert_eq!(
        harness.created_contacts.lock().unwrap().as_slice(),
        &[("Dana".to_string(), "dana@example.co".to_string())]
    );
}

#[tokio::test]
async fn second_of_three_missing_is_prompted_by_name() {
    let mut harness = TestHarness::builder()
        .with_contacts(vec![
            ("Ana Souza", "ana@example.com"),
            ("Carol Diaz", "carol@example.com"),
        ])
        .build();

    let reply = harness
        .turn("Schedule a meeting with Ana, Mystery and Carol tomorrow at 2pm")
        .await;

    assert!(reply.contains("Mystery"), "got: {reply}");
    assert_eq!(harness.insert_count(), 0);
}

// ---- Conflict flow ----

#[tokio::test]
async fn conflict_offers_slots_and_proceed_books_anyway() {
    let mut harness = TestHarness::builder()
        .with_contacts(vec![("Ana Souza", "ana@example.com")])
        .with_events(vec![busy_event(14, 15)])
        .build();

    let reply = harness
        .turn("Schedule a meeting with Ana today at 2pm")
        .await;

    assert!(reply.contains("already have an event"), "got: {reply}");
    assert!(reply.contains("open slots"), "got: {reply}");
    assert_eq!(harness.insert_count(), 0);
    assert!(harness.session.has_pending());

    let reply = harness.turn("book the original time anyway").await;
    assert!(reply.contains("I've scheduled"), "got: {reply}");
    assert_eq!(harness.insert_count(), 1);
}

#[tokio::test]
async fn conflict_reschedules_to_an_explicit_time() {
    let mut harness = TestHarness::builder()
        .with_contacts(vec![("Ana Souza", "ana@example.com")])
        .with_events(vec![busy_event(14, 15)])
        .build();

    harness
        .turn("Schedule a meeting with Ana today at 2pm")
        .await;
    let reply = harness.turn("let's do it at 4pm instead").await;

    assert!(reply.contains("I've scheduled"), "got: {reply}");
    assert!(reply.contains("4:00 PM"), "got: {reply}");

    let inserted = harness.inserted.lock().unwrap();
    let local_start = inserted[0].start.with_timezone(&New_York);
    assert_eq!(
        local_start,
        New_York.with_ymd_and_hms(2026, 3, 10, 16, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn unrelated_reply_keeps_the_conflict_pending() {
    let mut harness = TestHarness::builder()
        .with_contacts(vec![("Ana Souza", "ana@example.com")])
        .with_events(vec![busy_event(14, 15)])
        .build();

    harness
        .turn("Schedule a meeting with Ana today at 2pm")
        .await;
    let reply = harness.turn("hmm let me think").await;

    assert!(reply.contains("proceed"), "got: {reply}");
    assert!(harness.session.has_pending());
    assert_eq!(harness.insert_count(), 0);
}

// ---- Past-time flow ----

#[tokio::test]
async fn past_start_time_asks_to_reschedule() {
    let mut harness = TestHarness::builder()
        .with_contacts(vec![("Ana Souza", "ana@example.com")])
        .build();

    // The pinned clock is 9:00 AM.
    let reply = harness
        .turn("Schedule a meeting with Ana today at 8am")
        .await;

    assert!(reply.contains("already passed"), "got: {reply}");
    assert!(reply.contains("8:00 AM"), "got: {reply}");
    assert_eq!(harness.insert_count(), 0);

    let reply = harness.turn("ok, at 10am then").await;
    assert!(reply.contains("I've scheduled"), "got: {reply}");
    assert_eq!(harness.insert_count(), 1);
}

// ---- Document-request follow-up ----

#[tokio::test]
async fn document_request_follow_up_flips_the_flag_once() {
    let mut harness = TestHarness::builder()
        .with_contacts(vec![("Ana Souza", "ana@example.com")])
        .build();

    harness
        .turn("Schedule a meeting with Ana tomorrow at 2pm")
        .await;
    let reply = harness.turn("yes please").await;

    assert!(reply.to_lowercase().contains("documents"), "got: {reply}");
    assert!(harness.session.scheduled()[0].document_request_sent);

    // A later "yes" no longer refers to the booked meeting.
    let reply = harness.turn("yes").await;
    assert!(!reply.to_lowercase().contains("documents"), "got: {reply}");
}

#[tokio::test]
async fn declining_documents_clears_the_follow_up() {
    let mut harness = TestHarness::builder()
        .with_contacts(vec![("Ana Souza", "ana@example.com")])
        .build();

    harness
        .turn("Schedule a meeting with Ana tomorrow at 2pm")
        .await;
    let reply = harness.turn("no thanks").await;

    assert!(reply.contains("No problem"), "got: {reply}");
    assert!(!harness.session.scheduled()[0].document_request_sent);
}

// ---- Calendar failure kinds ----

#[tokio::test]
async fn auth_failure_apologizes_instead_of_asking_for_email() {
    let mut harness = TestHarness::builder()
        .with_contacts(vec![("Ana Souza", "ana@example.com")])
        .with_calendar_failure(CalendarFailure::Auth)
        .build();

    let reply = harness
        .turn("Schedule a meeting with Ana tomorrow at 2pm")
        .await;

    assert!(reply.contains("calendar access"), "got: {reply}");
    assert!(!reply.to_lowercase().contains("what is"), "got: {reply}");
    assert!(!harness.session.has_pending());
}

#[tokio::test]
async fn invalid_attendee_rejection_reprompts_first_participant() {
    let mut harness = TestHarness::builder()
        .with_contacts(vec![("Ana Souza", "ana@example.com")])
        .with_calendar_failure(CalendarFailure::InvalidAttendee)
        .build();

    let reply = harness
        .turn("Schedule a meeting with Ana tomorrow at 2pm")
        .await;

    assert!(reply.contains("Ana"), "got: {reply}");
    assert!(reply.to_lowercase().contains("email"), "got: {reply}");
    assert!(harness.session.has_pending());
}

// ---- New-contact flow ----

#[tokio::test]
async fn add_contact_command_collects_and_persists_an_email() {
    let mut harness = TestHarness::builder().build();

    let reply = harness.turn("add contact Dana Lee").await;
    assert!(reply.contains("Dana Lee"), "got: {reply}");

    let reply = harness.turn("bad-address").await;
    assert!(reply.contains("valid email"), "got: {reply}");

    let reply = harness.turn("dana@example.com").await;
    assert!(reply.contains("added Dana Lee"), "got: {reply}");
    assert_eq!(
        harness.created_contacts.lock().unwrap().as_slice(),
        &[("Dana Lee".to_string(), "dana@example.com".to_string())]
    );
}

// ---- Conversational fallbacks ----

#[tokio::test]
async fn insufficient_requests_ask_for_details() {
    let mut harness = TestHarness::builder().build();

    let reply = harness.turn("schedule a meeting tomorrow").await;
    assert!(reply.contains("more details"), "got: {reply}");
    assert_eq!(harness.insert_count(), 0);
}

#[tokio::test]
async fn canned_replies_for_small_talk() {
    let mut harness = TestHarness::builder().build();

    let reply = harness.turn("hello").await;
    assert!(reply.contains("Ready to schedule"), "got: {reply}");

    let reply = harness.turn("thanks!").await;
    assert!(reply.contains("welcome"), "got: {reply}");

    let reply = harness.turn("tell me a joke").await;
    assert!(reply.contains("when and with whom"), "got: {reply}");
}

#[tokio::test]
async fn transcript_preserves_order_and_roles() {
    let mut harness = TestHarness::builder()
        .with_contacts(vec![("Ana Souza", "ana@example.com")])
        .build();

    harness.turn("hello").await;
    harness
        .turn("Schedule a meeting with Ana tomorrow at 2pm")
        .await;

    let transcript = harness.session.transcript();
    // greeting, user hello, reply, user request, reply
    assert_eq!(transcript.len(), 5);
    assert_eq!(transcript[0].role, ChatRole::Assistant);
    assert_eq!(transcript[1].role, ChatRole::User);
    assert_eq!(transcript[1].text, "hello");
    assert_eq!(transcript[3].role, ChatRole::User);
    assert_eq!(transcript[4].role, ChatRole::Assistant);
}
