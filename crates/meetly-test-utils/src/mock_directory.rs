// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock contacts directory with substring search and recorded creations.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use meetly_core::error::MeetlyError;
use meetly_core::traits::{DirectoryAdapter, PluginAdapter};
use meetly_core::types::{AdapterType, Contact, HealthStatus};

/// A mock directory: case-insensitive substring search over a fixed
/// contact list, mirroring how the live directory matches free text.
pub struct MockDirectory {
    contacts: Vec<Contact>,
    created: Arc<Mutex<Vec<(String, String)>>>,
    fail: bool,
}

impl MockDirectory {
    /// Creates a directory holding the given (name, email) pairs.
    pub fn with_contacts(entries: Vec<(&str, &str)>) -> Self {
        let contacts = entries
            .into_iter()
            .enumerate()
            .map(|(i, (name, email))| Contact {
                id: format!("people/mock-{i}"),
                name: name.to_string(),
                emails: vec![email.to_string()],
            })
            .collect();
        Self {
            contacts,
            created: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Creates a directory whose every call fails.
    pub fn failing() -> Self {
        Self {
            contacts: Vec::new(),
            created: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// Shared handle to the recorded (name, email) creations.
    pub fn created(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        self.created.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockDirectory {
    fn name(&self) -> &str {
        "mock-directory"
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
        Ok(())
    }
}

#[async_trait]
impl DirectoryAdapter for MockDirectory {
    async fn search_contacts(&self, query: &str) -> Result<Vec<Contact>, MeetlyError> {
        if self.fail {
            return Err(MeetlyError::Directory {
                message: "mock directory failure".into(),
                source: None,
            });
        }

        let needle = query.to_lowercase();
        Ok(self
            .contacts
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle)
                    || c.emails.iter().any(|e| e.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn create_contact(&self, name: &str, email: &str) -> Result<Contact, MeetlyError> {
        if self.fail {
            return Err(MeetlyError::Directory {
                message: "mock directory failure".into(),
                source: None,
            });
        }

        let mut created = self.created.lock().unwrap();
        created.push((name.to_string(), email.to_string()));
        Ok(Contact {
            id: format!("people/mock-created-{}", created.len()),
            name: name.to_string(),
            emails: vec![email.to_string()],
        })
    }
}
