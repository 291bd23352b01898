// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Participant email resolution against the contacts directory.

use futures::future::join_all;
use tracing::{debug, warn};

use meetly_core::DirectoryAdapter;

/// Resolves each name to the first email of its first directory match.
///
/// The lookups fan out concurrently but the output order always matches the
/// input order. Failures (network error, no match, contact without email)
/// are non-fatal and resolve to `None`.
pub async fn resolve_emails(
    directory: &dyn DirectoryAdapter,
    names: &[String],
) -> Vec<Option<String>> {
    let lookups = names.iter().map(|name| async move {
        match directory.search_contacts(name).await {
            Ok(contacts) => {
                let email = contacts
                    .first()
                    .and_then(|c| c.primary_email())
                    .map(str::to_string);
                if email.is_none() {
                    debug!(name, "no directory match with an email address");
                }
                email
            }
            Err(e) => {
                warn!(name, error = %e, "contact lookup failed, treating as not found");
                None
            }
        }
    });

    join_all(lookups).await
}
