// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM-backed intent parser.
//!
//! Sends the utterance with a fixed extraction instruction and defensively
//! parses the reply as JSON. The reply has no guaranteed schema: code fences
//! are stripped, the outermost object is extracted, and every field is
//! optional. A reply without a participants array is treated as malformed so
//! the composite parser falls back to the pattern rules.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::debug;

use meetly_core::ProviderAdapter;
use meetly_core::types::{MeetingDraft, ProviderMessage, ProviderRequest};

use crate::datetime;
use crate::{IntentParser, ParseError};

const EXTRACTION_INSTRUCTION: &str = "You extract meeting details from a scheduling request. \
Respond with only a JSON object, no commentary, with these fields: \
\"title\" (string), \"date\" (YYYY-MM-DD), \"time\" (HH:MM, 24-hour), \
\"duration_minutes\" (number), \"participants\" (array of names, always present, may be empty). \
Use null for any other field the request does not mention.";

/// The reply shape the extraction instruction asks for. Every field is
/// optional because the model is not guaranteed to honor the instruction.
#[derive(Debug, Deserialize)]
struct ExtractedIntent {
    title: Option<String>,
    date: Option<String>,
    time: Option<String>,
    duration_minutes: Option<u32>,
    participants: Option<Vec<String>>,
}

/// Intent parser that delegates natural-language understanding to an LLM.
pub struct LlmParser {
    provider: Arc<dyn ProviderAdapter>,
    model: String,
    max_tokens: u32,
    default_duration_minutes: u32,
}

impl LlmParser {
    /// Creates a parser issuing completions through the given provider.
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        model: impl Into<String>,
        max_tokens: u32,
        default_duration_minutes: u32,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens,
            default_duration_minutes,
        }
    }

    fn build_request(&self, utterance: &str, reference: DateTime<Tz>) -> ProviderRequest {
        let system = format!(
            "{EXTRACTION_INSTRUCTION} Today is {}, and the current time is {} ({}).",
            reference.format("%A, %Y-%m-%d"),
            reference.format("%H:%M"),
            reference.timezone().name(),
        );
        ProviderRequest {
            model: self.model.clone(),
            system_prompt: Some(system),
            messages: vec![ProviderMessage::user(utterance)],
            max_tokens: self.max_tokens,
        }
    }

    fn draft_from_extracted(
        &self,
        extracted: ExtractedIntent,
        reference: DateTime<Tz>,
    ) -> Result<MeetingDraft, ParseError> {
        // The fallback trigger from the workflow contract: a reply without a
        // participants array is unusable.
        let participants = extracted
            .participants
            .ok_or_else(|| ParseError::Malformed("reply omitted participants array".into()))?;
        let participants: Vec<String> = participants
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        let date = extracted
            .date
            .as_deref()
            .and_then(|s| parse_reply_date(s, reference.date_naive()))
            .unwrap_or_else(|| reference.date_naive());

        let time = extracted
            .time
            .as_deref()
            .and_then(parse_reply_time)
            .unwrap_or_else(|| datetime::next_top_of_hour(reference));

        let duration = extracted
            .duration_minutes
            .filter(|&minutes| minutes > 0)
            .unwrap_or(self.default_duration_minutes);

        let title = extracted
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| {
                if participants.is_empty() {
                    "Meeting".to_string()
                } else {
                    format!("Meeting with {}", participants.join(", "))
                }
            });

        Ok(MeetingDraft::new(title, date, time, duration, participants))
    }
}

#[async_trait]
impl IntentParser for LlmParser {
    async fn parse(
        &self,
        utterance: &str,
        reference: DateTime<Tz>,
    ) -> Result<MeetingDraft, ParseError> {
        let request = self.build_request(utterance, reference);
        let response = self
            .provider
            .complete(request)
            .await
            .map_err(ParseError::Provider)?;

        debug!(reply = %response.content, "intent extraction reply received");

        let json = extract_json_object(&response.content)
            .ok_or_else(|| ParseError::Malformed("no JSON object in reply".into()))?;
        let extracted: ExtractedIntent = serde_json::from_str(json)
            .map_err(|e| ParseError::Malformed(format!("bad JSON in reply: {e}")))?;

        self.draft_from_extracted(extracted, reference)
    }
}

/// Extracts the outermost `{...}` from a reply, tolerating code fences and
/// surrounding prose.
fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

/// Parses a reply date: ISO form first, then the relative words a model
/// sometimes echoes back despite the instruction.
fn parse_reply_date(s: &str, reference: NaiveDate) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        return Some(date);
    }
    match s.trim().to_lowercase().as_str() {
        "today" => Some(reference),
        "tomorrow" => Some(reference + chrono::Duration::days(1)),
        _ => None,
    }
}

/// Parses a reply time: 24-hour form first, then 12-hour with meridiem.
fn parse_reply_time(s: &str) -> Option<NaiveTime> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(&trimmed.to_uppercase(), "%I:%M %p"))
        .or_else(|_| NaiveTime::parse_from_str(&trimmed.to_uppercase(), "%I %p"))
        .ok()
}
