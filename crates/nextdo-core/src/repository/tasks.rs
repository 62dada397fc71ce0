use crate::error::CoreError;
use crate::models::{CompletionResult, NewTaskData, Task, TaskSearch, UpdateTaskData};
use crate::recurrence::format_date;
use crate::repository::SqliteRepository;
use crate::schedule::{date_after_completion, prepare_task};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

/// Substring pattern for `LIKE ... ESCAPE '\'`; user `%` and `_` match literally.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl super::TaskRepository for SqliteRepository {
    async fn add_task(&self, data: NewTaskData, today: NaiveDate) -> Result<Task, CoreError> {
        let fields = prepare_task(today, data)?;
        let now = Utc::now();
        let mut tx = self.pool().begin().await?;

        let task: Task = sqlx::query_as(
            r#"INSERT INTO scheduler (id, date, title, comment, repeat, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&fields.date)
        .bind(&fields.title)
        .bind(&fields.comment)
        .bind(&fields.repeat)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        info!(id = %task.id, date = %task.date, repeat = %task.repeat, "task added");
        Ok(task)
    }

    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, CoreError> {
        let task = sqlx::query_as("SELECT * FROM scheduler WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(task)
    }

    async fn find_tasks(&self, search: &TaskSearch, limit: u32) -> Result<Vec<Task>, CoreError> {
        let tasks: Vec<Task> = match search {
            TaskSearch::All => {
                sqlx::query_as("SELECT * FROM scheduler ORDER BY date, created_at LIMIT $1")
                    .bind(limit)
                    .fetch_all(self.pool())
                    .await?
            }
            TaskSearch::Date(date) => {
                sqlx::query_as(
                    "SELECT * FROM scheduler WHERE date = $1 ORDER BY date, created_at LIMIT $2",
                )
                .bind(format_date(*date))
                .bind(limit)
                .fetch_all(self.pool())
                .await?
            }
            TaskSearch::Text(text) => {
                let pattern = like_pattern(text);

                sqlx::query_as(
                    r#"SELECT * FROM scheduler
                    WHERE title LIKE $1 ESCAPE '\' OR comment LIKE $2 ESCAPE '\'
                    ORDER BY date, created_at
                    LIMIT $3
                    "#,
                )
                .bind(&pattern)
                .bind(&pattern)
                .bind(limit)
                .fetch_all(self.pool())
                .await?
            }
        };
        debug!(?search, count = tasks.len(), "tasks listed");
        Ok(tasks)
    }

    async fn update_task(&self, id: Uuid, data: UpdateTaskData, today: NaiveDate) -> Result<Task, CoreError> {
        let fields = prepare_task(today, data.into())?;
        let mut tx = self.pool().begin().await?;

        let task: Task = sqlx::query_as(
            r#"UPDATE scheduler
            SET date = $1, title = $2, comment = $3, repeat = $4, updated_at = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&fields.date)
        .bind(&fields.title)
        .bind(&fields.comment)
        .bind(&fields.repeat)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        tx.commit().await?;

        info!(id = %task.id, date = %task.date, "task updated");
        Ok(task)
    }

    async fn complete_task(&self, id: Uuid, today: NaiveDate) -> Result<CompletionResult, CoreError> {
        let mut tx = self.pool().begin().await?;

        let task: Task = sqlx::query_as("SELECT * FROM scheduler WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        let result = match date_after_completion(today, &task)? {
            Some(next_date) => {
                let rescheduled: Task = sqlx::query_as(
                    r#"UPDATE scheduler
                    SET date = $1, updated_at = $2
                    WHERE id = $3
                    RETURNING *
                    "#,
                )
                .bind(&next_date)
                .bind(Utc::now())
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

                info!(id = %id, from = %task.date, to = %next_date, "recurring task rescheduled");
                CompletionResult::Rescheduled {
                    previous_date: task.date,
                    task: rescheduled,
                }
            }
            None => {
                sqlx::query("DELETE FROM scheduler WHERE id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;

                info!(id = %id, "one-off task done and removed");
                CompletionResult::Removed(task)
            }
        };

        tx.commit().await?;
        Ok(result)
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM scheduler WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        info!(id = %id, "task deleted");
        Ok(())
    }
}
