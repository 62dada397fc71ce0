//! Recurrence date engine.
//!
//! Given a reference date ("now"), a task's anchor date and a textual
//! repetition rule, [`next_date`] computes the next date the task is due.
//! The computation is a pure function of its three inputs: it never reads the
//! system clock and holds no state, so it is safe to call from any number of
//! request handlers at once.
//!
//! ```
//! use chrono::NaiveDate;
//! use nextdo_core::recurrence::next_date;
//!
//! let now = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! assert_eq!(next_date(now, "20240101", "w 1,3").unwrap(), "20240304");
//! ```

pub mod calendar;
pub mod projector;
pub mod rule;

use chrono::NaiveDate;
use thiserror::Error;

pub use calendar::{format_date, parse_date, DATE_FORMAT};
pub use rule::RecurrenceRule;

/// Failures of a single evaluation. None of them leave any state behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("Malformed date '{0}', expected YYYYMMDD")]
    MalformedDate(String),

    #[error("Repeat rule is empty")]
    EmptyRule,

    #[error("Repeat rule '{0}' is not supported")]
    UnsupportedRule(String),

    #[error("Invalid parameter in repeat rule '{rule}': {reason}")]
    InvalidRuleParameter { rule: String, reason: String },

    /// A bounded forward scan ran out without a match.
    #[error("No upcoming date found: {0}")]
    NoUpcomingDate(String),
}

/// Result of projecting a rule forward.
pub type ProjectionResult = Result<NaiveDate, RecurrenceError>;

impl RecurrenceRule {
    /// Next date for this rule after `now`, starting from `anchor`.
    pub fn next_after(&self, now: NaiveDate, anchor: NaiveDate) -> ProjectionResult {
        match self {
            RecurrenceRule::Daily { interval } => projector::daily(now, anchor, *interval),
            RecurrenceRule::Yearly => projector::yearly(now, anchor),
            RecurrenceRule::Weekly { weekdays } => projector::weekly(now, anchor, weekdays),
            RecurrenceRule::Monthly { days, months } => {
                projector::monthly(now, anchor, days, months.as_deref())
            }
        }
    }
}

/// Computes the next occurrence for a task anchored at `anchor` (`YYYYMMDD`)
/// repeating by `rule`, relative to `now`.
///
/// An empty rule is an error: a task without a rule does not recur and callers
/// handle it before asking for a next date.
pub fn next_date(now: NaiveDate, anchor: &str, rule: &str) -> Result<String, RecurrenceError> {
    let anchor = parse_date(anchor)?;
    let rule: RecurrenceRule = rule.parse()?;
    rule.next_after(now, anchor).map(format_date)
}
