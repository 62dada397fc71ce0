use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::recurrence::parse_date;

/// A scheduled task as stored in the `scheduler` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Task {
    pub id: Uuid,
    /// Due date in `YYYYMMDD` form.
    pub date: String,
    pub title: String,
    pub comment: String,
    /// Repeat rule text, empty for one-off tasks.
    pub repeat: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    #[inline]
    pub fn is_recurring(&self) -> bool {
        !self.repeat.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTaskData {
    /// `YYYYMMDD`; empty means today.
    #[serde(default)]
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub repeat: String,
}

/// Full replacement of a task's editable fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskData {
    #[serde(default)]
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub repeat: String,
}

impl From<UpdateTaskData> for NewTaskData {
    fn from(data: UpdateTaskData) -> Self {
        Self {
            date: data.date,
            title: data.title,
            comment: data.comment,
            repeat: data.repeat,
        }
    }
}

#[derive(Debug)]
pub enum CompletionResult {
    /// A one-off task was done and removed.
    Removed(Task),
    /// A recurring task moved on to its next date.
    Rescheduled { previous_date: String, task: Task },
}

/// How the task list is narrowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSearch {
    All,
    Date(NaiveDate),
    Text(String),
}

impl TaskSearch {
    /// Interprets a free-form search string.
    ///
    /// `DD.MM.YYYY` and `YYYYMMDD` select a single day, anything else is a
    /// substring search over title and comment.
    pub fn parse(search: &str) -> Self {
        let search = search.trim();
        if search.is_empty() {
            return TaskSearch::All;
        }
        if let Ok(date) = NaiveDate::parse_from_str(search, "%d.%m.%Y") {
            return TaskSearch::Date(date);
        }
        if let Ok(date) = parse_date(search) {
            return TaskSearch::Date(date);
        }
        TaskSearch::Text(search.to_string())
    }
}
