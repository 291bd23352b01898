// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Meetly scheduling assistant.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Meetly workspace. Adapters for external
//! services (LLM provider, calendar, contacts directory) implement traits
//! defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{CalendarFailure, MeetlyError};
pub use types::{AdapterType, ChatMessage, ChatRole, HealthStatus};

// Re-export all adapter traits at crate root.
pub use traits::{CalendarAdapter, DirectoryAdapter, PluginAdapter, ProviderAdapter};
