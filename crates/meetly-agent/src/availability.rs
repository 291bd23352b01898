// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conflict detection and alternative-slot suggestion.
//!
//! Pure functions over an event list: no I/O, fully deterministic given a
//! `now`. Time-validity (a start in the past) is a separate rule from
//! conflict detection and lives in the booking flow.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;

use meetly_config::model::SchedulerConfig;
use meetly_core::types::CalendarEvent;

/// Slot-search policy, local to the scheduler timezone.
#[derive(Debug, Clone)]
pub struct SlotPolicy {
    pub work_day_start_hour: u32,
    pub work_day_end_hour: u32,
    pub increment_minutes: u32,
    pub max_slots: usize,
}

impl SlotPolicy {
    /// Builds the policy from the scheduler config section.
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self {
            work_day_start_hour: config.work_day_start_hour,
            work_day_end_hour: config.work_day_end_hour,
            increment_minutes: config.slot_increment_minutes,
            max_slots: config.max_suggested_slots,
        }
    }
}

/// Half-open interval overlap: `[start, end)` conflicts with
/// `[ev_start, ev_end)` iff `start < ev_end && end > ev_start`.
/// Touching boundaries do not overlap.
pub fn overlaps(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    ev_start: DateTime<Utc>,
    ev_end: DateTime<Utc>,
) -> bool {
    start < ev_end && end > ev_start
}

/// The first event the proposed interval overlaps, if any.
pub fn find_conflict<'a>(
    events: &'a [CalendarEvent],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Option<&'a CalendarEvent> {
    events
        .iter()
        .find(|ev| overlaps(start, end, ev.start, ev.end))
}

/// Suggests up to `policy.max_slots` conflict-free start times of the
/// requested duration on `day`.
///
/// The walk starts at max(`now` rounded up to the next increment, the
/// work-day start) and advances in increments; when a candidate overlaps an
/// event the cursor jumps to that event's end instead of stepping. A slot
/// is collected only if it ends by the work-day end.
pub fn suggest_slots(
    events: &[CalendarEvent],
    now: DateTime<Tz>,
    day: NaiveDate,
    duration_minutes: u32,
    policy: &SlotPolicy,
) -> Vec<DateTime<Tz>> {
    let tz = now.timezone();

    let Some(work_start) = local_instant(day, policy.work_day_start_hour, tz) else {
        return Vec::new();
    };
    let Some(work_end) = local_instant(day, policy.work_day_end_hour, tz) else {
        return Vec::new();
    };

    let aligned_now = round_up_to_increment(now, policy.increment_minutes);
    let mut cursor = if aligned_now > work_start {
        aligned_now
    } else {
        work_start
    };

    let duration = chrono::Duration::minutes(i64::from(duration_minutes));
    let increment = chrono::Duration::minutes(i64::from(policy.increment_minutes));
    let mut slots = Vec::new();

    while slots.len() < policy.max_slots && cursor + duration <= work_end {
        let start_utc = cursor.with_timezone(&Utc);
        let end_utc = (cursor + duration).with_timezone(&Utc);

        if let Some(blocking) = find_conflict(events, start_utc, end_utc) {
            let event_end = blocking.end.with_timezone(&tz);
            // Jump past the blocking event rather than stepping through it.
            cursor = if event_end > cursor {
                event_end
            } else {
                cursor + increment
            };
            continue;
        }

        slots.push(cursor);
        cursor += increment;
    }

    slots
}

/// An hour-of-day on `day` as a timezone-aware instant. Hour 24 is the
/// following midnight.
fn local_instant(day: NaiveDate, hour: u32, tz: Tz) -> Option<DateTime<Tz>> {
    let (day, hour) = if hour >= 24 {
        (day.succ_opt()?, hour - 24)
    } else {
        (day, hour)
    };
    day.and_hms_opt(hour, 0, 0)?.and_local_timezone(tz).single()
}

/// Rounds `t` up to the next increment boundary (minutes past midnight).
fn round_up_to_increment(t: DateTime<Tz>, increment_minutes: u32) -> DateTime<Tz> {
    let inc = i64::from(increment_minutes.max(1));
    let minutes = i64::from(t.hour()) * 60 + i64::from(t.minute());
    let rem = minutes % inc;
    let carry = if rem == 0 && t.second() == 0 && t.nanosecond() == 0 {
        0
    } else {
        inc - rem
    };

    let base = t.date_naive().and_hms_opt(0, 0, 0);
    match base {
        Some(midnight) => {
            let naive = midnight + chrono::Duration::minutes(minutes + carry);
            naive
                .and_local_timezone(t.timezone())
                .single()
                .unwrap_or(t)
        }
        None => t,
    }
}
