// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent parsing for the Meetly scheduling assistant.
//!
//! A scheduling utterance becomes a [`MeetingDraft`] through the
//! [`IntentParser`] capability interface, which has two interchangeable
//! implementations: [`LlmParser`] (external text-completion service) and
//! [`HeuristicParser`] (pattern rules). [`CompositeParser`] composes them:
//! try the LLM, fall back to the rules when the call fails or the reply is
//! unusable.

pub mod datetime;
pub mod heuristic;
pub mod llm;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use thiserror::Error;
use tracing::warn;

use meetly_core::ProviderAdapter;
use meetly_core::error::MeetlyError;
use meetly_core::types::MeetingDraft;
use meetly_config::MeetlyConfig;

pub use heuristic::HeuristicParser;
pub use llm::LlmParser;

/// Why an utterance could not be turned into a meeting draft.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Not enough information to build a draft (no participants found).
    #[error("not enough information to build a meeting request")]
    Insufficient,

    /// The provider call itself failed.
    #[error("provider call failed: {0}")]
    Provider(MeetlyError),

    /// The provider replied, but not with a usable shape.
    #[error("malformed provider reply: {0}")]
    Malformed(String),
}

/// Turns a free-text utterance into a meeting draft.
///
/// `reference` is the wall-clock "now" every relative date or default
/// resolves against; passing it in keeps parsing deterministic under test.
#[async_trait]
pub trait IntentParser: Send + Sync {
    async fn parse(
        &self,
        utterance: &str,
        reference: DateTime<Tz>,
    ) -> Result<MeetingDraft, ParseError>;
}

/// Try-then-fallback composition of two parsers.
///
/// Any primary failure (provider error, malformed reply) falls through to
/// the fallback; only the fallback's own verdict is final.
pub struct CompositeParser {
    primary: Box<dyn IntentParser>,
    fallback: Box<dyn IntentParser>,
}

impl CompositeParser {
    /// Composes an explicit primary/fallback pair.
    pub fn new(primary: Box<dyn IntentParser>, fallback: Box<dyn IntentParser>) -> Self {
        Self { primary, fallback }
    }

    /// The standard wiring: LLM extraction backed by the pattern rules.
    pub fn from_config(provider: Arc<dyn ProviderAdapter>, config: &MeetlyConfig) -> Self {
        let default_duration = config.scheduler.default_duration_minutes;
        Self::new(
            Box::new(LlmParser::new(
                provider,
                config.anthropic.default_model.clone(),
                config.anthropic.max_tokens,
                default_duration,
            )),
            Box::new(HeuristicParser::new(default_duration)),
        )
    }
}

#[async_trait]
impl IntentParser for CompositeParser {
    async fn parse(
        &self,
        utterance: &str,
        reference: DateTime<Tz>,
    ) -> Result<MeetingDraft, ParseError> {
        match self.primary.parse(utterance, reference).await {
            Ok(draft) => Ok(draft),
            Err(e) => {
                warn!(error = %e, "primary intent parser failed, using fallback");
                self.fallback.parse(utterance, reference).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use chrono_tz::America::New_York;

    struct FixedParser(Result<MeetingDraft, &'static str>);

    #[async_trait]
    impl IntentParser for FixedParser {
        async fn parse(
            &self,
            _utterance: &str,
            _reference: DateTime<Tz>,
        ) -> Result<MeetingDraft, ParseError> {
            match &self.0 {
                Ok(draft) => Ok(draft.clone()),
                Err(msg) => Err(ParseError::Malformed((*msg).to_string())),
            }
        }
    }

    struct InsufficientParser;

    #[async_trait]
    impl IntentParser for InsufficientParser {
        async fn parse(
            &self,
            _utterance: &str,
            _reference: DateTime<Tz>,
        ) -> Result<MeetingDraft, ParseError> {
            Err(ParseError::Insufficient)
        }
    }

    fn draft(title: &str) -> MeetingDraft {
        MeetingDraft::new(
            title,
            NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(),
            chrono::NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            30,
            vec!["Ana".into()],
        )
    }

    fn reference() -> DateTime<Tz> {
        New_York.with_ymd_and_hms(2026, 3, 10, 10, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let composite = CompositeParser::new(
            Box::new(FixedParser(Ok(draft("From primary")))),
            Box::new(FixedParser(Ok(draft("From fallback")))),
        );
        let result = composite.parse("anything", reference()).await.unwrap();
        assert_eq!(result.title, "From primary");
    }

    #[tokio::test]
    async fn primary_failure_uses_fallback() {
        let composite = CompositeParser::new(
            Box::new(FixedParser(Err("broken reply"))),
            Box::new(FixedParser(Ok(draft("From fallback")))),
        );
        let result = composite.parse("anything", reference()).await.unwrap();
        assert_eq!(result.title, "From fallback");
    }

    #[tokio::test]
    async fn fallback_insufficient_propagates() {
        let composite = CompositeParser::new(
            Box::new(FixedParser(Err("broken reply"))),
            Box::new(InsufficientParser),
        );
        let result = composite.parse("hello", reference()).await;
        assert!(matches!(result, Err(ParseError::Insufficient)));
    }
}
