// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Calendar API v3 client: day listing and event insertion.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use meetly_config::MeetlyConfig;
use meetly_core::error::{CalendarFailure, MeetlyError};
use meetly_core::traits::{CalendarAdapter, PluginAdapter};
use meetly_core::types::{
    AdapterType, CalendarEvent, CreatedEvent, EventRequest, HealthStatus,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Base URL for the Google Calendar API.
const API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

// ============================================================================
// API wire types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsListResponse {
    #[serde(default)]
    items: Vec<GoogleEventRaw>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEventRaw {
    #[serde(default)]
    id: String,
    #[serde(default)]
    summary: Option<String>,
    start: Option<EventDateTime>,
    end: Option<EventDateTime>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventDateTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertEventBody {
    summary: String,
    description: String,
    start: EventDateTime,
    end: EventDateTime,
    attendees: Vec<AttendeeEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conference_data: Option<ConferenceData>,
}

#[derive(Debug, Serialize)]
struct AttendeeEntry {
    email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConferenceData {
    create_request: ConferenceCreateRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConferenceCreateRequest {
    request_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertEventResponse {
    #[serde(default)]
    id: String,
    html_link: Option<String>,
    hangout_link: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

/// Google Calendar client implementing [`CalendarAdapter`].
pub struct GoogleCalendar {
    client: reqwest::Client,
    base_url: String,
    calendar_id: String,
    timezone: Tz,
    send_updates: String,
    max_retries: u32,
}

impl GoogleCalendar {
    /// Creates a calendar client from configuration.
    ///
    /// Access token resolution: `google.access_token` -> `GOOGLE_ACCESS_TOKEN`
    /// env var -> error.
    pub fn new(config: &MeetlyConfig) -> Result<Self, MeetlyError> {
        let token = super::resolve_access_token(&config.google.access_token)?;
        Ok(Self {
            client: super::authorized_client(&token)?,
            base_url: API_BASE_URL.to_string(),
            calendar_id: config.google.calendar_id.clone(),
            timezone: config.scheduler.timezone(),
            send_updates: config.google.send_updates.clone(),
            max_retries: 1,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.base_url, self.calendar_id)
    }

    async fn send_with_retry(
        &self,
        build: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, MeetlyError> {
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                warn!(attempt, "retrying calendar request after transient error");
                tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            }

            let response = build().send().await.map_err(|e| MeetlyError::Calendar {
                kind: CalendarFailure::Network,
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

            let status = response.status();
            debug!(status = %status, attempt, "calendar response received");

            if !status.is_success() && super::is_transient_error(status) && attempt < self.max_retries
            {
                attempt += 1;
                continue;
            }

            return Ok(response);
        }
    }
}

/// Classifies a non-success calendar response into a [`CalendarFailure`].
///
/// 401 is an auth failure outright; 403 is quota when the body says so
/// (Google reports quota exhaustion as 403 with a rate/quota reason),
/// otherwise auth; a 4xx whose body names an attendee problem maps to
/// `InvalidAttendee` so the booking flow can re-prompt for an email.
fn classify_error(status: reqwest::StatusCode, body: &str) -> CalendarFailure {
    let lower = body.to_lowercase();
    match status.as_u16() {
        401 => CalendarFailure::Auth,
        403 if lower.contains("quota") || lower.contains("ratelimit") || lower.contains("rate limit") =>
        {
            CalendarFailure::Quota
        }
        403 => CalendarFailure::Auth,
        429 => CalendarFailure::Quota,
        400..=499 if lower.contains("attendee") => CalendarFailure::InvalidAttendee,
        _ => CalendarFailure::Api,
    }
}

async fn error_from_response(response: reqwest::Response) -> MeetlyError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    MeetlyError::Calendar {
        kind: classify_error(status, &body),
        message: format!("calendar API returned {status}: {body}"),
        source: None,
    }
}

#[async_trait]
impl PluginAdapter for GoogleCalendar {
    fn name(&self) -> &str {
        "google-calendar"
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
        debug!("Google calendar adapter shutting down");
        Ok(())
    }
}

#[async_trait]
impl CalendarAdapter for GoogleCalendar {
    /// Fetches all timed events on `day` in the configured timezone.
    ///
    /// Uses local-midnight bounds rather than UTC midnight: at 8pm EST,
    /// UTC midnight is already the next day. Handles pagination, skips
    /// cancelled events and all-day entries (which carry `date` instead of
    /// `dateTime` and do not block time slots).
    async fn list_events(&self, day: NaiveDate) -> Result<Vec<CalendarEvent>, MeetlyError> {
        let start_local = day
            .and_hms_opt(0, 0, 0)
            .and_then(|dt| dt.and_local_timezone(self.timezone).single())
            .ok_or_else(|| MeetlyError::Internal(format!("unrepresentable day bound: {day}")))?;
        let end_local = start_local + chrono::Duration::days(1);

        let time_min = start_local.to_rfc3339();
        let time_max = end_local.to_rfc3339();

        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = self.events_url();
            let response = self
                .send_with_retry(|| {
                    let mut request = self.client.get(&url).query(&[
                        ("timeMin", time_min.as_str()),
                        ("timeMax", time_max.as_str()),
                        ("singleEvents", "true"),
                        ("orderBy", "startTime"),
                        ("maxResults", "250"),
                    ]);
                    if let Some(ref token) = page_token {
                        request = request.query(&[("pageToken", token.as_str())]);
                    }
                    request
                })
                .await?;

            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }

            let body: EventsListResponse =
                response.json().await.map_err(|e| MeetlyError::Calendar {
                    kind: CalendarFailure::Api,
                    message: format!("failed to parse events list: {e}"),
                    source: Some(Box::new(e)),
                })?;

            for item in body.items {
                if item.status.as_deref() == Some("cancelled") {
                    continue;
                }

                let (Some(start), Some(end)) = (
                    item.start.as_ref().and_then(parse_event_instant),
                    item.end.as_ref().and_then(parse_event_instant),
                ) else {
                    // All-day or malformed entries have no concrete instant.
                    continue;
                };

                events.push(CalendarEvent {
                    id: item.id,
                    summary: item.summary.unwrap_or_else(|| "(No title)".to_string()),
                    start,
                    end,
                });
            }

            page_token = body.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        debug!(day = %day, count = events.len(), "fetched calendar events");
        Ok(events)
    }

    /// Creates the event, requesting a conferencing link when asked and
    /// sending invitations per the configured `sendUpdates` mode.
    async fn insert_event(&self, request: &EventRequest) -> Result<CreatedEvent, MeetlyError> {
        let body = InsertEventBody {
            summary: request.summary.clone(),
            description: request.description.clone(),
            start: EventDateTime {
                date_time: Some(request.start.to_rfc3339()),
                date: None,
                time_zone: Some(request.timezone.clone()),
            },
            end: EventDateTime {
                date_time: Some(request.end.to_rfc3339()),
                date: None,
                time_zone: Some(request.timezone.clone()),
            },
            attendees: request
                .attendees
                .iter()
                .map(|email| AttendeeEntry {
                    email: email.clone(),
                })
                .collect(),
            conference_data: request.conferencing.then(|| ConferenceData {
                create_request: ConferenceCreateRequest {
                    request_id: uuid::Uuid::new_v4().to_string(),
                },
            }),
        };

        let url = self.events_url();
        let response = self
            .send_with_retry(|| {
                self.client
                    .post(&url)
                    .query(&[
                        ("conferenceDataVersion", "1"),
                        ("sendUpdates", self.send_updates.as_str()),
                    ])
                    .json(&body)
            })
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let created: InsertEventResponse =
            response.json().await.map_err(|e| MeetlyError::Calendar {
                kind: CalendarFailure::Api,
                message: format!("failed to parse created event: {e}"),
                source: Some(Box::new(e)),
            })?;

        debug!(event_id = %created.id, "calendar event created");
        Ok(CreatedEvent {
            id: created.id,
            html_link: created.html_link,
            hangout_link: created.hangout_link,
        })
    }
}

/// Parses an event boundary into a concrete UTC instant.
///
/// Returns `None` for all-day entries (`date` without `dateTime`).
fn parse_event_instant(edt: &EventDateTime) -> Option<DateTime<Utc>> {
    edt.date_time
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetly_config::MeetlyConfig;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_calendar(base_url: &str) -> GoogleCalendar {
        let mut config = MeetlyConfig::default();
        config.google.access_token = Some("test-token".into());
        config.scheduler.timezone = "America/New_York".into();
        GoogleCalendar::new(&config)
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    fn test_event_request() -> EventRequest {
        let start = DateTime::parse_from_rfc3339("2026-03-10T19:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        EventRequest {
            summary: "Meeting with Ana".into(),
            description: "Scheduled by Meetly".into(),
            start,
            end: start + chrono::Duration::minutes(30),
            timezone: "America/New_York".into(),
            attendees: vec!["ana@example.com".into()],
            conferencing: true,
        }
    }

    #[test]
    fn parse_event_instant_rfc3339() {
        let edt = EventDateTime {
            date_time: Some("2026-03-10T09:00:00-05:00".into()),
            date: None,
            time_zone: None,
        };
        let dt = parse_event_instant(&edt).unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-03-10T14:00:00+00:00");
    }

    #[test]
    fn parse_event_instant_all_day_is_none() {
        let edt = EventDateTime {
            date_time: None,
            date: Some("2026-03-10".into()),
            time_zone: None,
        };
        assert!(parse_event_instant(&edt).is_none());
    }

    #[test]
    fn classify_auth_and_quota_errors() {
        use reqwest::StatusCode;

        assert_eq!(
            classify_error(StatusCode::UNAUTHORIZED, ""),
            CalendarFailure::Auth
        );
        assert_eq!(
            classify_error(StatusCode::FORBIDDEN, r#"{"error": {"errors": [{"reason": "rateLimitExceeded"}]}}"#),
            CalendarFailure::Quota
        );
        assert_eq!(
            classify_error(StatusCode::FORBIDDEN, r#"{"error": {"message": "forbidden"}}"#),
            CalendarFailure::Auth
        );
        assert_eq!(
            classify_error(StatusCode::BAD_REQUEST, r#"{"error": {"message": "Invalid attendee email."}}"#),
            CalendarFailure::InvalidAttendee
        );
        assert_eq!(
            classify_error(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            CalendarFailure::Api
        );
    }

    #[tokio::test]
    async fn list_events_normalizes_and_filters() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "items": [
                {
                    "id": "ev1",
                    "summary": "Standup",
                    "start": {"dateTime": "2026-03-10T10:00:00-05:00"},
                    "end": {"dateTime": "2026-03-10T10:30:00-05:00"},
                    "status": "confirmed"
                },
                {
                    "id": "ev2",
                    "summary": "Cancelled sync",
                    "start": {"dateTime": "2026-03-10T11:00:00-05:00"},
                    "end": {"dateTime": "2026-03-10T12:00:00-05:00"},
                    "status": "cancelled"
                },
                {
                    "id": "ev3",
                    "summary": "Company holiday",
                    "start": {"date": "2026-03-10"},
                    "end": {"date": "2026-03-11"},
                    "status": "confirmed"
                }
            ]
        });

        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(query_param("singleEvents", "true"))
            .and(query_param("orderBy", "startTime"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let calendar = test_calendar(&server.uri());
        let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let events = calendar.list_events(day).await.unwrap();

        // Cancelled and all-day entries are dropped.
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "ev1");
        assert_eq!(events[0].summary, "Standup");
        assert_eq!(events[0].start.to_rfc3339(), "2026-03-10T15:00:00+00:00");
    }

    #[tokio::test]
    async fn list_events_follows_pagination() {
        let server = MockServer::start().await;

        let page1 = serde_json::json!({
            "items": [{
                "id": "p1",
                "summary": "First",
                "start": {"dateTime": "2026-03-10T09:00:00-05:00"},
                "end": {"dateTime": "2026-03-10T09:30:00-05:00"}
            }],
            "nextPageToken": "token-2"
        });
        let page2 = serde_json::json!({
            "items": [{
                "id": "p2",
                "summary": "Second",
                "start": {"dateTime": "2026-03-10T13:00:00-05:00"},
                "end": {"dateTime": "2026-03-10T14:00:00-05:00"}
            }]
        });

        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(query_param("pageToken", "token-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&page2))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&page1))
            .mount(&server)
            .await;

        let calendar = test_calendar(&server.uri());
        let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let events = calendar.list_events(day).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, "p1");
        assert_eq!(events[1].id, "p2");
    }

    #[tokio::test]
    async fn insert_event_returns_conferencing_link() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "id": "created-1",
            "htmlLink": "https://calendar.google.com/event?eid=abc",
            "hangoutLink": "https://meet.google.com/abc-defg-hij"
        });

        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .and(query_param("conferenceDataVersion", "1"))
            .and(query_param("sendUpdates", "all"))
            .and(body_partial_json(serde_json::json!({
                "summary": "Meeting with Ana",
                "attendees": [{"email": "ana@example.com"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let calendar = test_calendar(&server.uri());
        let created = calendar.insert_event(&test_event_request()).await.unwrap();

        assert_eq!(created.id, "created-1");
        assert_eq!(
            created.hangout_link.as_deref(),
            Some("https://meet.google.com/abc-defg-hij")
        );
    }

    #[tokio::test]
    async fn insert_event_maps_auth_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"error": {"message": "Invalid Credentials"}})),
            )
            .mount(&server)
            .await;

        let calendar = test_calendar(&server.uri());
        let err = calendar
            .insert_event(&test_event_request())
            .await
            .unwrap_err();
        assert_eq!(err.calendar_kind(), Some(CalendarFailure::Auth));
    }

    #[tokio::test]
    async fn insert_event_maps_invalid_attendee() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                serde_json::json!({"error": {"message": "Invalid attendee email."}}),
            ))
            .mount(&server)
            .await;

        let calendar = test_calendar(&server.uri());
        let err = calendar
            .insert_event(&test_event_request())
            .await
            .unwrap_err();
        assert_eq!(err.calendar_kind(), Some(CalendarFailure::InvalidAttendee));
    }

    #[tokio::test]
    async fn list_events_retries_transient_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
            .mount(&server)
            .await;

        let calendar = test_calendar(&server.uri());
        let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let events = calendar.list_events(day).await.unwrap();
        assert!(events.is_empty());
    }
}
