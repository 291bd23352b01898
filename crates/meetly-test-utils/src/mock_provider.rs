// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured replies,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use meetly_core::error::MeetlyError;
use meetly_core::traits::{PluginAdapter, ProviderAdapter};
use meetly_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};

/// A mock LLM provider that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty, a default
/// "mock response" text is returned -- deliberately not JSON, so a
/// composite parser falls through to its heuristic fallback.
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<String>>>,
    fail: bool,
}

impl MockProvider {
    /// Creates a mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            fail: false,
        }
    }

    /// Creates a mock provider pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            fail: false,
        }
    }

    /// Creates a mock provider whose every call fails.
    pub fn failing() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            fail: true,
        }
    }

    /// Adds a reply to the end of the queue.
    pub async fn add_reply(&self, text: String) {
        self.replies.lock().await.push_back(text);
    }

    async fn next_reply(&self) -> String {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, MeetlyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MeetlyError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, MeetlyError> {
        if self.fail {
            return Err(MeetlyError::Provider {
                message: "mock provider failure".into(),
                source: None,
            });
        }

        let text = self.next_reply().await;
        Ok(ProviderResponse {
            id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
            content: text,
            model: request.model,
            stop_reason: Some("end_turn".to_string()),
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 20,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: "test-model".to_string(),
            system_prompt: None,
            messages: vec![],
            max_tokens: 100,
        }
    }

    #[tokio::test]
    async fn default_reply_when_queue_empty() {
        let provider = MockProvider::new();
        let resp = provider.complete(request()).await.unwrap();
        assert_eq!(resp.content, "mock response");
    }

    #[tokio::test]
    async fn queued_replies_returned_in_order() {
        let provider = MockProvider::with_replies(vec![
            "first".to_string(),
            "second".to_string(),
        ]);

        assert_eq!(provider.complete(request()).await.unwrap().content, "first");
        assert_eq!(provider.complete(request()).await.unwrap().content, "second");
        // Queue exhausted, falls back to default.
        assert_eq!(
            provider.complete(request()).await.unwrap().content,
            "mock response"
        );
    }

    #[tokio::test]
    async fn failing_provider_errors() {
        let provider = MockProvider::failing();
        assert!(provider.complete(request()).await.is_err());
    }

    #[tokio::test]
    async fn add_reply_after_construction() {
        let provider = MockProvider::new();
        provider.add_reply("dynamic reply".to_string()).await;
        assert_eq!(
            provider.complete(request()).await.unwrap().content,
            "dynamic reply"
        );
    }
}
