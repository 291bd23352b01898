// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Meetly integration tests.
//!
//! Mock adapters for the three external boundaries (LLM provider, calendar,
//! contacts directory) plus a [`TestHarness`] that wires a full
//! [`SchedulerSession`](meetly_agent::SchedulerSession) with a pinned clock.

pub mod harness;
pub mod mock_calendar;
pub mod mock_directory;
pub mod mock_provider;

pub use harness::TestHarness;
pub use mock_calendar::MockCalendar;
pub use mock_directory::MockDirectory;
pub use mock_provider::MockProvider;
