//! Task lifecycle rules: how a task's stored date is chosen when it is
//! created, edited or completed. All date decisions go through
//! [`recurrence::next_date`]; this module only decides when to ask.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::CoreError;
use crate::models::{NewTaskData, Task};
use crate::recurrence::{self, format_date, parse_date};

/// Validated field values ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledFields {
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

/// Picks the date to store for a task being created or edited.
///
/// - an empty date means today;
/// - a non-empty rule must produce a next date, otherwise the task is rejected;
/// - a date in the past moves to today for one-off tasks and to the rule's
///   next date for recurring ones.
pub fn resolve_task_date(today: NaiveDate, date: &str, repeat: &str) -> Result<String, CoreError> {
    let date = if date.is_empty() {
        today
    } else {
        parse_date(date)?
    };
    let date_text = format_date(date);

    if repeat.is_empty() {
        return Ok(if date < today { format_date(today) } else { date_text });
    }

    let next = recurrence::next_date(today, &date_text, repeat)?;
    if date < today {
        debug!(from = %date_text, to = %next, repeat, "moving past task to its next date");
        Ok(next)
    } else {
        Ok(date_text)
    }
}

/// Validates incoming task fields and resolves the stored date.
pub fn prepare_task(today: NaiveDate, data: NewTaskData) -> Result<ScheduledFields, CoreError> {
    if data.title.trim().is_empty() {
        return Err(CoreError::InvalidInput("Task title is not specified".to_string()));
    }
    let date = resolve_task_date(today, &data.date, &data.repeat)?;
    Ok(ScheduledFields {
        date,
        title: data.title,
        comment: data.comment,
        repeat: data.repeat,
    })
}

/// The date a task moves to once it is done, or `None` when it does not recur
/// and should be removed instead.
pub fn date_after_completion(today: NaiveDate, task: &Task) -> Result<Option<String>, CoreError> {
    if !task.is_recurring() {
        return Ok(None);
    }
    let next = recurrence::next_date(today, &task.date, &task.repeat)?;
    Ok(Some(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::RecurrenceError;
    use chrono::Utc;
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn task(date: &str, repeat: &str) -> Task {
        Task {
            id: Uuid::now_v7(),
            date: date.to_string(),
            title: "Task".to_string(),
            comment: String::new(),
            repeat: repeat.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_date_is_today() {
        assert_eq!(resolve_task_date(today(), "", "").unwrap(), "20240301");
        assert_eq!(resolve_task_date(today(), "", "d 1").unwrap(), "20240301");
    }

    #[test]
    fn test_future_date_is_kept() {
        assert_eq!(resolve_task_date(today(), "20240310", "").unwrap(), "20240310");
        assert_eq!(resolve_task_date(today(), "20240310", "w 1").unwrap(), "20240310");
    }

    #[test]
    fn test_past_date_moves_forward() {
        assert_eq!(resolve_task_date(today(), "20240101", "").unwrap(), "20240301");
        assert_eq!(resolve_task_date(today(), "20240115", "d 10").unwrap(), "20240305");
    }

    #[test]
    fn test_invalid_rule_rejected_even_for_future_dates() {
        let err = resolve_task_date(today(), "20240310", "d 401").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Recurrence(RecurrenceError::InvalidRuleParameter { .. })
        ));
    }

    #[test]
    fn test_malformed_date_rejected() {
        let err = resolve_task_date(today(), "01.03.2024", "").unwrap_err();
        assert!(matches!(err, CoreError::Recurrence(RecurrenceError::MalformedDate(_))));
    }

    #[test]
    fn test_prepare_requires_title() {
        let data = NewTaskData {
            title: "   ".to_string(),
            ..Default::default()
        };
        assert!(matches!(prepare_task(today(), data), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_completion_dates() {
        assert_eq!(date_after_completion(today(), &task("20240301", "")).unwrap(), None);
        assert_eq!(
            date_after_completion(today(), &task("20240301", "d 3")).unwrap(),
            Some("20240304".to_string())
        );
        assert_eq!(
            date_after_completion(today(), &task("20240210", "y")).unwrap(),
            Some("20250210".to_string())
        );
    }
}
