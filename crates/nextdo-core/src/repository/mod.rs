use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{CompletionResult, NewTaskData, Task, TaskSearch, UpdateTaskData};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

pub mod tasks;

/// Task storage operations.
///
/// Operations that depend on the current date take `today` explicitly; the
/// repository never reads the clock itself.
#[async_trait]
pub trait TaskRepository {
    async fn add_task(&self, data: NewTaskData, today: NaiveDate) -> Result<Task, CoreError>;
    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, CoreError>;
    async fn find_tasks(&self, search: &TaskSearch, limit: u32) -> Result<Vec<Task>, CoreError>;
    async fn update_task(&self, id: Uuid, data: UpdateTaskData, today: NaiveDate) -> Result<Task, CoreError>;
    async fn complete_task(&self, id: Uuid, today: NaiveDate) -> Result<CompletionResult, CoreError>;
    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError>;
}

/// SQLite implementation of the repository pattern
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}
