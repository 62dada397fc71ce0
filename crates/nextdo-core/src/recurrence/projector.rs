//! One projector per rule kind. Each computes the next qualifying date
//! strictly after `now`, starting from the task's anchor date.

use chrono::{Datelike, NaiveDate};

use super::calendar::{
    add_days, add_year, days_before_month_end, first_of_next_month, iso_weekday,
};
use super::RecurrenceError;

/// Weekly scans give up after two full weeks.
pub const WEEKLY_SCAN_LIMIT: usize = 14;

/// Monthly scans cover eight Gregorian years, the longest gap between two
/// Feb 29ths (e.g. 1896 -> 1904).
pub const MONTHLY_SCAN_LIMIT_DAYS: u64 = 8 * 366;

fn exhausted(reason: impl Into<String>) -> RecurrenceError {
    RecurrenceError::NoUpcomingDate(reason.into())
}

/// The day after the later of `anchor` and `now`; where forward scans begin.
fn scan_start(now: NaiveDate, anchor: NaiveDate) -> Result<NaiveDate, RecurrenceError> {
    add_days(now.max(anchor), 1).ok_or_else(|| exhausted("calendar range exceeded"))
}

pub fn daily(now: NaiveDate, anchor: NaiveDate, interval: u32) -> Result<NaiveDate, RecurrenceError> {
    // Same-day daily tasks stay on today.
    if interval == 1 && anchor == now {
        return Ok(now);
    }

    let step = u64::from(interval);
    let jumps = if anchor >= now {
        1
    } else {
        // Smallest k with anchor + k * step > now.
        let behind = (now - anchor).num_days() as u64;
        behind / step + 1
    };

    jumps
        .checked_mul(step)
        .and_then(|days| add_days(anchor, days))
        .ok_or_else(|| exhausted("calendar range exceeded"))
}

pub fn yearly(now: NaiveDate, anchor: NaiveDate) -> Result<NaiveDate, RecurrenceError> {
    let mut next = add_year(anchor).ok_or_else(|| exhausted("calendar range exceeded"))?;
    while next <= now {
        next = add_year(next).ok_or_else(|| exhausted("calendar range exceeded"))?;
    }
    Ok(next)
}

pub fn weekly(now: NaiveDate, anchor: NaiveDate, weekdays: &[u8]) -> Result<NaiveDate, RecurrenceError> {
    let mut candidate = scan_start(now, anchor)?;
    for _ in 0..WEEKLY_SCAN_LIMIT {
        if weekdays.contains(&iso_weekday(candidate)) {
            return Ok(candidate);
        }
        candidate = add_days(candidate, 1).ok_or_else(|| exhausted("calendar range exceeded"))?;
    }
    Err(exhausted(format!(
        "no matching weekday within {WEEKLY_SCAN_LIMIT} days"
    )))
}

/// Whether `date` is one of the listed days of its month.
///
/// A negative entry `-k` matches the date `k` days before the first of the
/// following month.
fn matches_day(date: NaiveDate, days: &[i8]) -> bool {
    days.iter().any(|&day| {
        if day > 0 {
            date.day() == day as u32
        } else {
            days_before_month_end(date, u64::from(day.unsigned_abs())) == Some(date)
        }
    })
}

pub fn monthly(
    now: NaiveDate,
    anchor: NaiveDate,
    days: &[i8],
    months: Option<&[u8]>,
) -> Result<NaiveDate, RecurrenceError> {
    let start = scan_start(now, anchor)?;
    let limit = add_days(start, MONTHLY_SCAN_LIMIT_DAYS).unwrap_or(NaiveDate::MAX);

    let month_allowed = |date: NaiveDate| {
        months.map_or(true, |months| months.contains(&(date.month() as u8)))
    };

    let mut candidate = start;
    while candidate < limit {
        let next = if !month_allowed(candidate) {
            // Skip the rest of a month that is not on the list.
            first_of_next_month(candidate)
        } else if matches_day(candidate, days) {
            return Ok(candidate);
        } else {
            add_days(candidate, 1)
        };
        candidate = match next {
            Some(date) => date,
            None => break,
        };
    }

    Err(exhausted("no matching day of month within eight years"))
}
