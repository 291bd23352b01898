// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pattern-rule intent parser.
//!
//! Zero-cost fallback for when the LLM extraction fails or returns an
//! unusable shape. No network, no latency; a fixed set of regex rules over
//! the raw utterance.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use regex::Regex;
use std::sync::LazyLock;

use meetly_core::types::MeetingDraft;

use crate::datetime;
use crate::{IntentParser, ParseError};

static RE_AT_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bat\s+(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b").unwrap()
});

static RE_BARE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})\s*(am|pm)\b").unwrap());

static RE_ON_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bon\s+([A-Za-z]+)\s+(\d{1,2})(?:st|nd|rd|th)?\b").unwrap()
});

static RE_HOURS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})\s*hours?\b").unwrap());

static RE_MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bfor\s+(\d{1,3})\s*min(?:ute)?s?\b").unwrap());

static RE_WITH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bwith\s+(.+?)(?:\s+(?:at|on|for|about)\b|\s+tomorrow\b|\s+today\b|\s+to\s+discuss\b|[.!?]|$)",
    )
    .unwrap()
});

static RE_ABOUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:about|to\s+discuss)\s+(.+?)(?:\s+(?:with|at|on|for)\b|\s+tomorrow\b|\s+today\b|[.!?]|$)",
    )
    .unwrap()
});

static RE_AND_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+and\s+").unwrap());

/// Regex-rule parser covering the common phrasings of a scheduling request.
pub struct HeuristicParser {
    default_duration_minutes: u32,
}

impl HeuristicParser {
    /// Creates a parser with the configured default meeting length.
    pub fn new(default_duration_minutes: u32) -> Self {
        Self {
            default_duration_minutes,
        }
    }

    fn parse_date(utterance: &str, reference: NaiveDate) -> NaiveDate {
        let lower = utterance.to_lowercase();
        if lower.contains("tomorrow") {
            return reference + chrono::Duration::days(1);
        }
        if lower.contains("today") {
            return reference;
        }
        if let Some(caps) = RE_ON_DATE.captures(utterance)
            && let Some(month) = datetime::month_number(&caps[1])
            && let Ok(day) = caps[2].parse::<u32>()
            && let Some(date) = datetime::resolve_month_day(month, day, reference)
        {
            return date;
        }
        reference
    }

    fn parse_time(utterance: &str, reference: DateTime<Tz>) -> NaiveTime {
        if let Some(caps) = RE_AT_TIME.captures(utterance) {
            let hour = caps[1].parse::<u32>().ok();
            let minute = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
            let meridiem = caps.get(3).map(|m| m.as_str().eq_ignore_ascii_case("pm"));
            if let Some(hour) = hour
                && let Some(time) = datetime::build_time(hour, minute, meridiem)
            {
                return time;
            }
        }

        // A bare "5pm" / "5 pm" mention without "at".
        if let Some(caps) = RE_BARE_TIME.captures(utterance) {
            let hour = caps[1].parse::<u32>().ok();
            let pm = caps[2].eq_ignore_ascii_case("pm");
            if let Some(hour) = hour
                && let Some(time) = datetime::build_time(hour, None, Some(pm))
            {
                return time;
            }
        }

        datetime::next_top_of_hour(reference)
    }

    fn parse_duration(&self, utterance: &str) -> u32 {
        if let Some(caps) = RE_HOURS.captures(utterance)
            && let Ok(hours) = caps[1].parse::<u32>()
        {
            return hours * 60;
        }
        if let Some(caps) = RE_MINUTES.captures(utterance)
            && let Ok(minutes) = caps[1].parse::<u32>()
        {
            return minutes;
        }
        self.default_duration_minutes
    }

    fn parse_participants(utterance: &str) -> Vec<String> {
        let Some(caps) = RE_WITH.captures(utterance) else {
            return Vec::new();
        };

        caps[1]
            .split(',')
            .flat_map(|segment| RE_AND_SPLIT.split(segment))
            .map(|name| name.trim().trim_matches(|c: char| c.is_ascii_punctuation()))
            .filter(|name| !name.is_empty())
            .map(|name| name.to_string())
            .collect()
    }

    fn build_title(utterance: &str, participants: &[String]) -> String {
        if let Some(caps) = RE_ABOUT.captures(utterance) {
            let topic = caps[1].trim().trim_end_matches(['.', '!', '?']);
            if !topic.is_empty() {
                return format!("Meeting about {topic}");
            }
        }
        if !participants.is_empty() {
            return format!("Meeting with {}", participants.join(", "));
        }
        "Meeting".to_string()
    }
}

#[async_trait]
impl IntentParser for HeuristicParser {
    async fn parse(
        &self,
        utterance: &str,
        reference: DateTime<Tz>,
    ) -> Result<MeetingDraft, ParseError> {
        let participants = Self::parse_participants(utterance);

        // Without participants there is no "with"-derived title either, so
        // there is not enough to act on.
        if participants.is_empty() {
            return Err(ParseError::Insufficient);
        }

        let date = Self::parse_date(utterance, reference.date_naive());
        let time = Self::parse_time(utterance, reference);
        let duration = self.parse_duration(utterance);
        let title = Self::build_title(utterance, &participants);

        Ok(MeetingDraft::new(title, date, time, duration, participants))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::New_York;

    fn reference() -> DateTime<Tz> {
        // Tuesday, March 10, 2026, 10:17 AM Eastern.
        New_York.with_ymd_and_hms(2026, 3, 10, 10, 17, 0).unwrap()
    }

    async fn parse(utterance: &str) -> MeetingDraft {
        let parser = HeuristicParser::new(30);
        parser.parse(utterance, reference()).await.unwrap()
    }

    #[tokio::test]
    async fn tomorrow_is_reference_plus_one() {
        let draft = parse("Schedule a meeting with Ana tomorrow at 2pm").await;
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
    }

    #[tokio::test]
    async fn today_is_reference_date() {
        let draft = parse("meeting with Ana today at 4pm").await;
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
    }

    #[tokio::test]
    async fn month_day_parses_literally() {
        let draft = parse("set up a meeting with Ana on March 20 at 1pm").await;
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2026, 3, 20).unwrap());
    }

    #[tokio::test]
    async fn at_time_parses_literally_case_insensitive() {
        assert_eq!(
            parse("meeting with Ana at 2:30PM").await.time,
            NaiveTime::from_hms_opt(14, 30, 0).unwrap()
        );
        assert_eq!(
            parse("meeting with Ana at 9am").await.time,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(
            parse("meeting with Ana at 14:00").await.time,
            NaiveTime::from_hms_opt(14, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn noon_and_midnight_follow_twelve_hour_convention() {
        assert_eq!(
            parse("meeting with Ana at 12am").await.time,
            NaiveTime::from_hms_opt(0, 0, 0).unwrap()
        );
        assert_eq!(
            parse("meeting with Ana at 12pm").await.time,
            NaiveTime::from_hms_opt(12, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn bare_five_pm_mention_is_recognized() {
        assert_eq!(
            parse("book 5pm with Ana tomorrow").await.time,
            NaiveTime::from_hms_opt(17, 0, 0).unwrap()
        );
        assert_eq!(
            parse("book 5 pm with Ana tomorrow").await.time,
            NaiveTime::from_hms_opt(17, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn missing_time_defaults_to_next_top_of_hour() {
        // Reference is 10:17, so the default is 11:00.
        let draft = parse("schedule a meeting with Ana tomorrow").await;
        assert_eq!(draft.time, NaiveTime::from_hms_opt(11, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn hours_duration_converts_to_minutes() {
        assert_eq!(
            parse("2 hour meeting with Ana at 3pm").await.duration_minutes,
            120
        );
        assert_eq!(
            parse("meeting with Ana for 1 hour at 3pm")
                .await
                .duration_minutes,
            60
        );
    }

    #[tokio::test]
    async fn for_minutes_duration_is_literal() {
        assert_eq!(
            parse("meeting with Ana for 45 minutes at 3pm")
                .await
                .duration_minutes,
            45
        );
    }

    #[tokio::test]
    async fn missing_duration_defaults() {
        assert_eq!(parse("meeting with Ana at 3pm").await.duration_minutes, 30);
    }

    #[tokio::test]
    async fn participants_split_on_commas_and_and() {
        let draft = parse("schedule a meeting with Ana, Ben and Carol tomorrow at 2pm").await;
        assert_eq!(draft.participants, vec!["Ana", "Ben", "Carol"]);
        assert_eq!(draft.emails, vec![None, None, None]);
    }

    #[tokio::test]
    async fn single_participant() {
        let draft = parse("meeting with Dana at 10am").await;
        assert_eq!(draft.participants, vec!["Dana"]);
    }

    #[tokio::test]
    async fn about_title_wins() {
        let draft = parse("meeting with Ana about the Q3 budget tomorrow at 2pm").await;
        assert_eq!(draft.title, "Meeting about the Q3 budget");
    }

    #[tokio::test]
    async fn to_discuss_forms_about_title() {
        let draft = parse("meeting with Ana to discuss hiring at 2pm").await;
        assert_eq!(draft.title, "Meeting about hiring");
    }

    #[tokio::test]
    async fn with_title_falls_back_to_participants() {
        let draft = parse("schedule a meeting with Ana, Ben tomorrow at 2pm").await;
        assert_eq!(draft.title, "Meeting with Ana, Ben");
    }

    #[tokio::test]
    async fn no_participants_is_insufficient() {
        let parser = HeuristicParser::new(30);
        let result = parser.parse("hello there", reference()).await;
        assert!(matches!(result, Err(ParseError::Insufficient)));

        let result = parser
            .parse("schedule a meeting about budget tomorrow", reference())
            .await;
        assert!(matches!(result, Err(ParseError::Insufficient)));
    }

    #[tokio::test]
    async fn draft_starts_unresolved_and_unforced() {
        let draft = parse("meeting with Ana at 3pm").await;
        assert!(draft.missing_email_index.is_none());
        assert!(!draft.conflict_override);
    }
}
