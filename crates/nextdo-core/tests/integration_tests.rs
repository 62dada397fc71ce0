use chrono::NaiveDate;
use nextdo_core::db::establish_connection;
use nextdo_core::error::CoreError;
use nextdo_core::models::*;
use nextdo_core::recurrence::{next_date, RecurrenceError};
use nextdo_core::repository::{SqliteRepository, TaskRepository};
use tempfile::TempDir;
use uuid::Uuid;

/// Helper function to create a test database
async fn setup_test_db() -> (SqliteRepository, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");

    let pool = establish_connection(&db_path.to_string_lossy())
        .await
        .expect("Failed to establish test database connection");

    (SqliteRepository::new(pool), temp_dir)
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

/// Helper function to create a test task
async fn create_test_task(repo: &SqliteRepository, title: &str, date: &str, repeat: &str) -> Task {
    let task_data = NewTaskData {
        date: date.to_string(),
        title: title.to_string(),
        comment: format!("Test task: {}", title),
        repeat: repeat.to_string(),
    };

    repo.add_task(task_data, today())
        .await
        .expect("Failed to create test task")
}

#[tokio::test]
async fn test_basic_task_crud_workflow() {
    let (repo, _temp_dir) = setup_test_db().await;

    let task = create_test_task(&repo, "Pay rent", "20240305", "").await;
    assert_eq!(task.title, "Pay rent");
    assert_eq!(task.date, "20240305");
    assert!(!task.is_recurring());

    let found = repo.find_task_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(found, task);

    let update_data = UpdateTaskData {
        date: "20240310".to_string(),
        title: "Pay rent early".to_string(),
        comment: String::new(),
        repeat: "m 10".to_string(),
    };
    let updated = repo
        .update_task(task.id, update_data, today())
        .await
        .expect("Failed to update task");
    assert_eq!(updated.id, task.id);
    assert_eq!(updated.title, "Pay rent early");
    assert_eq!(updated.repeat, "m 10");
    assert_eq!(updated.date, "20240310");

    repo.delete_task(task.id).await.expect("Failed to delete task");
    assert!(repo.find_task_by_id(task.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_add_task_normalises_dates() {
    let (repo, _temp_dir) = setup_test_db().await;

    let no_date = create_test_task(&repo, "Today", "", "").await;
    assert_eq!(no_date.date, "20240301");

    let past_one_off = create_test_task(&repo, "Overdue", "20240101", "").await;
    assert_eq!(past_one_off.date, "20240301");

    let past_recurring = create_test_task(&repo, "Every ten days", "20240115", "d 10").await;
    assert_eq!(past_recurring.date, "20240305");
}

#[tokio::test]
async fn test_add_task_validation_errors() {
    let (repo, _temp_dir) = setup_test_db().await;

    let no_title = NewTaskData {
        title: String::new(),
        ..Default::default()
    };
    assert!(matches!(
        repo.add_task(no_title, today()).await,
        Err(CoreError::InvalidInput(_))
    ));

    let bad_date = NewTaskData {
        title: "Bad date".to_string(),
        date: "2024-03-01".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        repo.add_task(bad_date, today()).await,
        Err(CoreError::Recurrence(RecurrenceError::MalformedDate(_)))
    ));

    let bad_rule = NewTaskData {
        title: "Bad rule".to_string(),
        repeat: "w 8".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        repo.add_task(bad_rule, today()).await,
        Err(CoreError::Recurrence(RecurrenceError::InvalidRuleParameter { .. }))
    ));

    let unknown_rule = NewTaskData {
        title: "Unknown rule".to_string(),
        repeat: "q 5".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        repo.add_task(unknown_rule, today()).await,
        Err(CoreError::Recurrence(RecurrenceError::UnsupportedRule(_)))
    ));

    let listed = repo.find_tasks(&TaskSearch::All, 50).await.unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_complete_recurring_task_round_trip() {
    let (repo, _temp_dir) = setup_test_db().await;

    let anchor = "20240115";
    let task = create_test_task(&repo, "Water plants", anchor, "d 10").await;
    let stored_before = task.date.clone();

    let result = repo.complete_task(task.id, today()).await.unwrap();
    let rescheduled = match result {
        CompletionResult::Rescheduled { previous_date, task } => {
            assert_eq!(previous_date, stored_before);
            task
        }
        other => panic!("Expected a rescheduled task, got {:?}", other),
    };

    assert!(rescheduled.date.as_str() > anchor);
    assert_eq!(
        rescheduled.date,
        next_date(today(), &stored_before, "d 10").unwrap()
    );

    let stored = repo.find_task_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(stored.date, rescheduled.date);
}

#[tokio::test]
async fn test_complete_one_off_task_removes_it() {
    let (repo, _temp_dir) = setup_test_db().await;

    let task = create_test_task(&repo, "Call the bank", "20240302", "").await;
    match repo.complete_task(task.id, today()).await.unwrap() {
        CompletionResult::Removed(done) => assert_eq!(done.id, task.id),
        other => panic!("Expected the task to be removed, got {:?}", other),
    }
    assert!(repo.find_task_by_id(task.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_task_errors() {
    let (repo, _temp_dir) = setup_test_db().await;
    let id = Uuid::now_v7();

    assert!(matches!(repo.delete_task(id).await, Err(CoreError::NotFound(_))));
    assert!(matches!(
        repo.complete_task(id, today()).await,
        Err(CoreError::NotFound(_))
    ));
    let update = UpdateTaskData {
        title: "Ghost".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        repo.update_task(id, update, today()).await,
        Err(CoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_task_search_workflow() {
    let (repo, _temp_dir) = setup_test_db().await;

    create_test_task(&repo, "Gym", "20240310", "w 1,3,5").await;
    create_test_task(&repo, "Dentist", "20240305", "").await;
    create_test_task(&repo, "Groceries", "20240310", "").await;

    let all = repo.find_tasks(&TaskSearch::All, 50).await.unwrap();
    let dates: Vec<&str> = all.iter().map(|t| t.date.as_str()).collect();
    assert_eq!(dates, vec!["20240305", "20240310", "20240310"]);

    let limited = repo.find_tasks(&TaskSearch::All, 2).await.unwrap();
    assert_eq!(limited.len(), 2);

    let on_date = repo.find_tasks(&TaskSearch::parse("10.03.2024"), 50).await.unwrap();
    assert_eq!(on_date.len(), 2);

    let by_text = repo.find_tasks(&TaskSearch::parse("Dent"), 50).await.unwrap();
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0].title, "Dentist");

    // Comments are searched too.
    let by_comment = repo.find_tasks(&TaskSearch::parse("Test task: Gr"), 50).await.unwrap();
    assert_eq!(by_comment.len(), 1);
    assert_eq!(by_comment[0].title, "Groceries");
}

#[tokio::test]
async fn test_writes_are_visible_to_next_read() {
    let (repo, _temp_dir) = setup_test_db().await;

    for round in 0..100 {
        let task = create_test_task(&repo, &format!("Task {}", round), "20240305", "").await;
        let found = repo.find_task_by_id(task.id).await.unwrap();
        assert_eq!(found.as_ref(), Some(&task), "round {}: task missing after add", round);

        let update_data = UpdateTaskData {
            date: "20240306".to_string(),
            title: format!("Edited {}", round),
            comment: String::new(),
            repeat: String::new(),
        };
        let updated = repo.update_task(task.id, update_data, today()).await.unwrap();
        let found = repo.find_task_by_id(task.id).await.unwrap().unwrap();
        assert_eq!(found, updated, "round {}: stale read after update", round);
        assert_eq!(found.title, format!("Edited {}", round));
    }
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let (repo, _temp_dir) = setup_test_db().await;

    create_test_task(&repo, "Buy 500 apples", "20240305", "").await;
    create_test_task(&repo, "Save 50% on rent", "20240305", "").await;
    create_test_task(&repo, "file_report", "20240305", "").await;
    create_test_task(&repo, "fileXreport", "20240305", "").await;

    let percent = repo.find_tasks(&TaskSearch::parse("50%"), 50).await.unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].title, "Save 50% on rent");

    let underscore = repo.find_tasks(&TaskSearch::parse("file_"), 50).await.unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].title, "file_report");
}
