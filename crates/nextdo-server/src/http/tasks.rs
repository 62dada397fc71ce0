//! Task endpoints under `/api/task` and `/api/tasks`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use nextdo_core::{
    models::{CompletionResult, NewTaskData, Task, TaskSearch, UpdateTaskData},
    repository::TaskRepository,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

/// Body of `PUT /api/task`: the full task with its id.
#[derive(Debug, Deserialize)]
pub struct EditTaskRequest {
    pub id: String,
    #[serde(flatten)]
    pub data: UpdateTaskData,
}

fn parse_id(raw: Option<&str>) -> Result<Uuid, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Task ID not specified".to_string()))?;
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid task ID: {}", raw)))
}

/// POST /api/task
pub async fn add_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewTaskData>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(data) = payload?;
    let task = state.repo.add_task(data, state.clock.today()).await?;
    Ok(Json(json!({ "id": task.id })))
}

/// GET /api/tasks?search=..
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let search = query
        .search
        .as_deref()
        .map(TaskSearch::parse)
        .unwrap_or(TaskSearch::All);
    let tasks = state.repo.find_tasks(&search, state.config.task_limit).await?;
    Ok(Json(json!({ "tasks": tasks })))
}

/// GET /api/task?id=..
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<Task>, ApiError> {
    let Query(query) = query?;
    let id = parse_id(query.id.as_deref())?;
    let task = state
        .repo
        .find_task_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task not found: {}", id)))?;
    Ok(Json(task))
}

/// PUT /api/task
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EditTaskRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let id = parse_id(Some(&request.id))?;
    state
        .repo
        .update_task(id, request.data, state.clock.today())
        .await?;
    Ok(Json(json!({})))
}

/// POST /api/task/done?id=..
///
/// One-off tasks are removed, recurring ones move to their next date.
pub async fn complete_task(
    State(state): State<Arc<AppState>>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let id = parse_id(query.id.as_deref())?;
    match state.repo.complete_task(id, state.clock.today()).await? {
        CompletionResult::Removed(task) => info!(id = %task.id, "task completed"),
        CompletionResult::Rescheduled { previous_date, task } => {
            info!(id = %task.id, from = %previous_date, to = %task.date, "task completed")
        }
    }
    Ok(Json(json!({})))
}

/// DELETE /api/task?id=..
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let id = parse_id(query.id.as_deref())?;
    state.repo.delete_task(id).await?;
    Ok(Json(json!({})))
}
