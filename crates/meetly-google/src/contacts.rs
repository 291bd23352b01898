// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google People API v1 client: contact search and creation.
//!
//! The People API's documented warmup request (an empty-query search issued
//! before the real one, followed by a multi-second wait) is intentionally
//! not replicated; the real search is issued directly.

use async_trait::async_trait;
use meetly_config::MeetlyConfig;
use meetly_core::error::MeetlyError;
use meetly_core::traits::{DirectoryAdapter, PluginAdapter};
use meetly_core::types::{AdapterType, Contact, HealthStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Base URL for the Google People API.
const API_BASE_URL: &str = "https://people.googleapis.com/v1";

/// Fields requested for every person payload.
const READ_MASK: &str = "names,emailAddresses";

// ============================================================================
// API wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    person: Option<PersonRaw>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonRaw {
    #[serde(default)]
    resource_name: String,
    #[serde(default)]
    names: Vec<PersonName>,
    #[serde(default)]
    email_addresses: Vec<PersonEmail>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonName {
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unstructured_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersonEmail {
    #[serde(default)]
    value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateContactBody {
    names: Vec<PersonName>,
    email_addresses: Vec<PersonEmail>,
}

// ============================================================================
// Client
// ============================================================================

/// Google People API client implementing [`DirectoryAdapter`].
pub struct GoogleDirectory {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl GoogleDirectory {
    /// Creates a directory client from configuration.
    pub fn new(config: &MeetlyConfig) -> Result<Self, MeetlyError> {
        let token = super::resolve_access_token(&config.google.access_token)?;
        Ok(Self {
            client: super::authorized_client(&token)?,
            base_url: API_BASE_URL.to_string(),
            max_retries: 1,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    async fn send_with_retry(
        &self,
        build: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, MeetlyError> {
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                warn!(attempt, "retrying directory request after transient error");
                tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            }

            let response = build().send().await.map_err(|e| MeetlyError::Directory {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

            let status = response.status();
            debug!(status = %status, attempt, "directory response received");

            if !status.is_success() && super::is_transient_error(status) && attempt < self.max_retries
            {
                attempt += 1;
                continue;
            }

            return Ok(response);
        }
    }
}

fn person_to_contact(person: PersonRaw) -> Contact {
    let name = person
        .names
        .first()
        .and_then(|n| n.display_name.clone().or_else(|| n.unstructured_name.clone()))
        .unwrap_or_else(|| "Unknown".to_string());
    let emails = person
        .email_addresses
        .into_iter()
        .map(|e| e.value)
        .filter(|v| !v.is_empty())
        .collect();
    Contact {
        id: person.resource_name,
        name,
        emails,
    }
}

async fn error_from_response(response: reqwest::Response) -> MeetlyError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    MeetlyError::Directory {
        message: format!("people API returned {status}: {body}"),
        source: None,
    }
}

#[async_trait]
impl PluginAdapter for GoogleDirectory {
    fn name(&self) -> &str {
        "google-contacts"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Directory
    }

    async fn health_check(&self) -> Result<HealthStatus, MeetlyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MeetlyError> {
        debug!("Google directory adapter shutting down");
        Ok(())
    }
}

#[async_trait]
impl DirectoryAdapter for GoogleDirectory {
    /// Searches contacts by free-text name match.
    async fn search_contacts(&self, query: &str) -> Result<Vec<Contact>, MeetlyError> {
        let url = format!("{}/people:searchContacts", self.base_url);
        let response = self
            .send_with_retry(|| {
                self.client
                    .get(&url)
                    .query(&[("query", query), ("readMask", READ_MASK)])
            })
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body: SearchResponse = response.json().await.map_err(|e| MeetlyError::Directory {
            message: format!("failed to parse contact search results: {e}"),
            source: Some(Box::new(e)),
        })?;

        let contacts: Vec<Contact> = body
            .results
            .into_iter()
            .filter_map(|r| r.person)
            .map(person_to_contact)
            .collect();

        debug!(query, count = contacts.len(), "contact search complete");
        Ok(contacts)
    }

    /// Creates a contact with an unstructured name and a single email.
    async fn create_contact(&self, name: &str, email: &str) -> Result<Contact, MeetlyError> {
        let body = CreateContactBody {
            names: vec![PersonName {
                display_name: None,
                unstructured_name: Some(name.to_string()),
            }],
            email_addresses: vec![PersonEmail {
                value: email.to_string(),
            }],
        };

        let url = format!("{}/people:createContact", self.base_url);
        let response = self
            .send_with_retry(|| self.client.post(&url).json(&body))
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let person: PersonRaw = response.json().await.map_err(|e| MeetlyError::Directory {
            message: format!("failed to parse created contact: {e}"),
            source: Some(Box::new(e)),
        })?;

        debug!(name, "contact created");
        Ok(person_to_contact(person))
    }
}
