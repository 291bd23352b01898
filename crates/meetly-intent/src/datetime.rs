// SPDX-FileCopyrightText: 2026 Meetly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Date and time helpers shared by both intent parsers.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;

/// Converts a 12-hour clock reading to a 24-hour hour value.
///
/// Standard conversion: "12 am" is hour 0, "12 pm" stays hour 12.
pub fn to_24_hour(hour: u32, pm: bool) -> u32 {
    match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    }
}

/// Builds a time from parsed components, tolerating missing minutes.
///
/// Returns `None` for out-of-range values (hour 13+ with a meridiem,
/// minute 60+).
pub fn build_time(hour: u32, minute: Option<u32>, meridiem: Option<bool>) -> Option<NaiveTime> {
    let minute = minute.unwrap_or(0);
    let hour = match meridiem {
        Some(pm) => {
            if hour == 0 || hour > 12 {
                return None;
            }
            to_24_hour(hour, pm)
        }
        None => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// The top of the hour after `reference` -- the default meeting time when
/// an utterance does not mention one.
pub fn next_top_of_hour(reference: DateTime<Tz>) -> NaiveTime {
    let next = reference + chrono::Duration::hours(1);
    NaiveTime::from_hms_opt(next.hour(), 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Month number for an English month name, case-insensitive.
pub fn month_number(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "january" => Some(1),
        "february" => Some(2),
        "march" => Some(3),
        "april" => Some(4),
        "may" => Some(5),
        "june" => Some(6),
        "july" => Some(7),
        "august" => Some(8),
        "september" => Some(9),
        "october" => Some(10),
        "november" => Some(11),
        "december" => Some(12),
        _ => None,
    }
}

/// Resolves "on <Month> <Day>" against a reference date, rolling to the
/// next year when the day has already passed.
pub fn resolve_month_day(month: u32, day: u32, reference: NaiveDate) -> Option<NaiveDate> {
    use chrono::Datelike;

    let this_year = NaiveDate::from_ymd_opt(reference.year(), month, day)?;
    if this_year < reference {
        NaiveDate::from_ymd_opt(reference.year() + 1, month, day)
    } else {
        Some(this_year)
    }
}

/// Long-form date for chat replies, e.g. "Tuesday, March 10, 2026".
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Clock time for chat replies, e.g. "2:30 PM".
pub fn format_clock_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}
