// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Meetly scheduling workflow.
//!
//! Wires intent parsing, contact resolution, availability checking, and
//! calendar booking into a single turn-based conversation session. The
//! session is single-threaded and cooperative: one turn runs to completion
//! before the next begins, and the only concurrency anywhere is the ordered
//! fan-out of participant email lookups.

pub mod availability;
pub mod booking;
pub mod resolver;
pub mod session;

pub use booking::{BookingOutcome, MeetingBooker};
pub use session::SchedulerSession;
