use std::fmt;
use std::str::FromStr;

use super::RecurrenceError;

pub const MIN_INTERVAL_DAYS: u32 = 1;
pub const MAX_INTERVAL_DAYS: u32 = 400;

/// A parsed repetition rule.
///
/// Rule text grammar:
///
/// ```text
/// rule := "y" | "d " INT | "w " WEEKDAYLIST | "m " DAYLIST [" " MONTHLIST]
/// ```
///
/// All lists are comma separated. Parsing validates every parameter, so a
/// `RecurrenceRule` value always satisfies the ranges documented on its
/// variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceRule {
    /// Every `interval` days, `interval` in 1..=400.
    Daily { interval: u32 },
    /// Same day every year.
    Yearly,
    /// On the listed ISO weekdays (Monday = 1 .. Sunday = 7).
    Weekly { weekdays: Vec<u8> },
    /// On the listed days of month, optionally only in the listed months.
    ///
    /// Days are 1..=31 or -1 (last day) / -2 (second to last day).
    Monthly {
        days: Vec<i8>,
        months: Option<Vec<u8>>,
    },
}

impl FromStr for RecurrenceRule {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(RecurrenceError::EmptyRule);
        }

        if let Some(rest) = s.strip_prefix("d ") {
            parse_daily(s, rest)
        } else if s == "y" {
            Ok(RecurrenceRule::Yearly)
        } else if let Some(rest) = s.strip_prefix("w ") {
            parse_weekly(s, rest)
        } else if let Some(rest) = s.strip_prefix("m ") {
            parse_monthly(s, rest)
        } else {
            Err(RecurrenceError::UnsupportedRule(s.to_string()))
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceRule::Daily { interval } => write!(f, "d {interval}"),
            RecurrenceRule::Yearly => f.write_str("y"),
            RecurrenceRule::Weekly { weekdays } => write!(f, "w {}", join(weekdays)),
            RecurrenceRule::Monthly { days, months } => {
                write!(f, "m {}", join(days))?;
                if let Some(months) = months {
                    write!(f, " {}", join(months))?;
                }
                Ok(())
            }
        }
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

fn invalid(rule: &str, reason: impl Into<String>) -> RecurrenceError {
    RecurrenceError::InvalidRuleParameter {
        rule: rule.to_string(),
        reason: reason.into(),
    }
}

fn parse_number(rule: &str, token: &str) -> Result<i64, RecurrenceError> {
    token
        .parse::<i64>()
        .map_err(|_| invalid(rule, format!("'{token}' is not an integer")))
}

fn parse_list<T>(
    rule: &str,
    list: &str,
    what: &str,
    accept: impl Fn(i64) -> Option<T>,
) -> Result<Vec<T>, RecurrenceError> {
    list.split(',')
        .map(|token| {
            let value = parse_number(rule, token)?;
            accept(value).ok_or_else(|| invalid(rule, format!("{what} {value} is out of range")))
        })
        .collect()
}

fn parse_daily(rule: &str, rest: &str) -> Result<RecurrenceRule, RecurrenceError> {
    let interval = parse_number(rule, rest)?;
    if !(MIN_INTERVAL_DAYS as i64..=MAX_INTERVAL_DAYS as i64).contains(&interval) {
        return Err(invalid(
            rule,
            format!("interval must be between {MIN_INTERVAL_DAYS} and {MAX_INTERVAL_DAYS} days, got {interval}"),
        ));
    }
    Ok(RecurrenceRule::Daily {
        interval: interval as u32,
    })
}

fn parse_weekly(rule: &str, rest: &str) -> Result<RecurrenceRule, RecurrenceError> {
    let weekdays = parse_list(rule, rest, "weekday", |v| {
        (1..=7).contains(&v).then_some(v as u8)
    })?;
    Ok(RecurrenceRule::Weekly { weekdays })
}

fn parse_monthly(rule: &str, rest: &str) -> Result<RecurrenceRule, RecurrenceError> {
    let parts: Vec<&str> = rest.split(' ').collect();
    if parts.len() > 2 {
        return Err(invalid(rule, "expected a day list and an optional month list"));
    }

    let days = parse_list(rule, parts[0], "day of month", |v| {
        ((-2..=31).contains(&v) && v != 0).then_some(v as i8)
    })?;

    let months = parts
        .get(1)
        .map(|list| {
            parse_list(rule, list, "month", |v| {
                (1..=12).contains(&v).then_some(v as u8)
            })
        })
        .transpose()?;

    Ok(RecurrenceRule::Monthly { days, months })
}
