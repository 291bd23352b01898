// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directory adapter trait for external contacts services.

use async_trait::async_trait;

use crate::error::MeetlyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::Contact;

/// Adapter for contacts directory integrations.
///
/// Lookup failures are expected and non-fatal: callers treat an error or an
/// empty result as "not found" rather than aborting the dialogue.
#[async_trait]
pub trait DirectoryAdapter: PluginAdapter {
    /// Searches the directory by free-text name match.
    async fn search_contacts(&self, query: &str) -> Result<Vec<Contact>, MeetlyError>;

    /// Persists a new contact with a single email address.
    async fn create_contact(&self, name: &str, email: &str)
    -> Result<Contact, MeetlyError>;
}
