//! Calendar arithmetic primitives used by the projectors.
//!
//! Every helper works on `NaiveDate` in whole days. Arithmetic is checked:
//! a `None` means the result would leave chrono's representable range, and the
//! projectors turn that into [`RecurrenceError::NoUpcomingDate`].

use chrono::{Datelike, Days, Months, NaiveDate};

use super::RecurrenceError;

/// Canonical wire format for dates: `YYYYMMDD`, no separators.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Parses an 8-digit `YYYYMMDD` string.
///
/// chrono's `%Y` accepts signs and variable widths, so the shape is checked
/// before handing the text over.
pub fn parse_date(text: &str) -> Result<NaiveDate, RecurrenceError> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RecurrenceError::MalformedDate(text.to_string()));
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| RecurrenceError::MalformedDate(text.to_string()))
}

/// Formats a date in the canonical `YYYYMMDD` form.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[inline]
pub fn add_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days))
}

#[inline]
pub fn sub_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(days))
}

/// Adds one calendar year.
///
/// Feb 29 has no counterpart in a common year; it normalises forward to Mar 1,
/// the way a field-wise date increment overflows into the next month.
pub fn add_year(date: NaiveDate) -> Option<NaiveDate> {
    let year = date.year().checked_add(1)?;
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

#[inline]
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month.
    date.with_day(1).unwrap_or(date)
}

/// First day of the month following `date`, wrapping into January.
pub fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    first_of_month(date).checked_add_months(Months::new(1))
}

/// The date `offset` days before the first of the following month.
///
/// `offset == 1` is the last day of the month, `offset == 2` the one before.
pub fn days_before_month_end(date: NaiveDate, offset: u64) -> Option<NaiveDate> {
    sub_days(first_of_next_month(date)?, offset)
}

/// ISO weekday number: Monday = 1 .. Sunday = 7.
///
/// This is the only place rule weekday numbers are related to chrono's
/// `Weekday`.
#[inline]
pub fn iso_weekday(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}
