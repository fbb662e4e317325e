//! Task queries, all scoped to an owning user id. Ownership is enforced here
//! by querying on `(id, user_id)` so a task owned by someone else is
//! indistinguishable from a missing one.

use sqlx::SqlitePool;

use super::models::{NewTask, Task};
use super::DatabaseError;

const TASK_COLUMNS: &str = "id, title, description, completed, due_date, user_id";

pub async fn list_by_owner(pool: &SqlitePool, owner_id: i64) -> Result<Vec<Task>, DatabaseError> {
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ? ORDER BY id"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

pub async fn page_by_owner(
    pool: &SqlitePool,
    owner_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<Task>, DatabaseError> {
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ? ORDER BY id LIMIT ? OFFSET ?"
    ))
    .bind(owner_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

pub async fn count_by_owner(pool: &SqlitePool, owner_id: i64) -> Result<i64, DatabaseError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE user_id = ?")
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub async fn find_by_id_and_owner(
    pool: &SqlitePool,
    task_id: i64,
    owner_id: i64,
) -> Result<Option<Task>, DatabaseError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ? AND user_id = ?"
    ))
    .bind(task_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(task)
}

pub async fn insert(
    pool: &SqlitePool,
    input: &NewTask,
    owner_id: i64,
) -> Result<Task, DatabaseError> {
    let result = sqlx::query(
        "INSERT INTO tasks (title, description, completed, due_date, user_id)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.completed)
    .bind(input.due_date)
    .bind(owner_id)
    .execute(pool)
    .await?;

    Ok(Task {
        id: result.last_insert_rowid(),
        title: input.title.clone(),
        description: input.description.clone(),
        completed: input.completed,
        due_date: input.due_date,
        user_id: owner_id,
    })
}

/// Overwrite the mutable fields of an owned task. Returns `None` when no row
/// matches `(id, user_id)`.
pub async fn update(
    pool: &SqlitePool,
    task_id: i64,
    owner_id: i64,
    input: &NewTask,
) -> Result<Option<Task>, DatabaseError> {
    let result = sqlx::query(
        "UPDATE tasks SET title = ?, description = ?, completed = ?, due_date = ?
         WHERE id = ? AND user_id = ?",
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.completed)
    .bind(input.due_date)
    .bind(task_id)
    .bind(owner_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    Ok(Some(Task {
        id: task_id,
        title: input.title.clone(),
        description: input.description.clone(),
        completed: input.completed,
        due_date: input.due_date,
        user_id: owner_id,
    }))
}

/// Returns true when an owned row was deleted.
pub async fn delete(
    pool: &SqlitePool,
    task_id: i64,
    owner_id: i64,
) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
        .bind(task_id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
