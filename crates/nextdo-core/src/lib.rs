//! # Nextdo Core Library
//!
//! The scheduling core of nextdo: a deterministic recurrence date engine and
//! the SQLite-backed task store that calls into it.
//!
//! ## Features
//!
//! - **Compact repeat rules**: `d <N>`, `y`, `w <weekdays>` and
//!   `m <days> [<months>]`, including "last day of month" offsets
//! - **Pure date engine**: no clock reads, no state, safe to share across
//!   request handlers
//! - **Task lifecycle**: past dates roll forward on create and edit,
//!   recurring tasks reschedule themselves when completed
//! - **Type Safety**: rules parse into a tagged enum before any projection
//!
//! ## Core Modules
//!
//! - [`recurrence`]: Rule parsing and next-date projection
//! - [`schedule`]: Date decisions for create, edit and completion
//! - [`db`]: Database connection and migration management
//! - [`models`]: Core data structures and transfer objects
//! - [`repository`]: Data access layer with Repository pattern
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::Local;
//! use nextdo_core::{
//!     db, models::NewTaskData,
//!     repository::{SqliteRepository, TaskRepository},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::establish_connection("scheduler.db").await?;
//!     let repo = SqliteRepository::new(pool);
//!
//!     let task = repo
//!         .add_task(
//!             NewTaskData {
//!                 title: "Water the plants".to_string(),
//!                 repeat: "w 1,4".to_string(),
//!                 ..Default::default()
//!             },
//!             Local::now().date_naive(),
//!         )
//!         .await?;
//!     println!("Next watering: {}", task.date);
//!
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod repository;
pub mod schedule;
