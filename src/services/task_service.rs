//! Task CRUD scoped to an owner, plus the ownership guard.
//!
//! Every read/update/delete resolves the task by `(id, owner)`, so a task
//! owned by another user yields the same `NotFound` as a task that does not
//! exist. This is deliberate: the API must not reveal whether a foreign id is
//! in use.

use sqlx::SqlitePool;
use thiserror::Error;

use crate::database::models::{NewTask, Task};
use crate::database::{tasks, users, DatabaseError};

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task not found")]
    NotFound,

    #[error("no user record for authenticated principal: {0}")]
    OwnerMissing(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub struct TaskService {
    pool: SqlitePool,
}

impl TaskService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All tasks of the owner, in id order.
    pub async fn list(&self, owner_id: i64) -> Result<Vec<Task>, TaskError> {
        Ok(tasks::list_by_owner(&self.pool, owner_id).await?)
    }

    /// One page of the owner's tasks plus the total count.
    pub async fn page(
        &self,
        owner_id: i64,
        page: i64,
        size: i64,
    ) -> Result<(Vec<Task>, i64), TaskError> {
        // page is client-supplied; saturate so absurd page numbers land past
        // the end instead of overflowing the offset
        let offset = page.saturating_mul(size);
        let items = tasks::page_by_owner(&self.pool, owner_id, size, offset).await?;
        let total = tasks::count_by_owner(&self.pool, owner_id).await?;
        Ok((items, total))
    }

    pub async fn get(&self, task_id: i64, owner_id: i64) -> Result<Task, TaskError> {
        tasks::find_by_id_and_owner(&self.pool, task_id, owner_id)
            .await?
            .ok_or(TaskError::NotFound)
    }

    /// Create a task owned by the authenticated principal. The principal was
    /// already verified by the auth middleware, so a missing user row is a
    /// server-side inconsistency, not a client error.
    pub async fn create(&self, input: NewTask, owner_username: &str) -> Result<Task, TaskError> {
        let owner = users::find_by_username(&self.pool, owner_username)
            .await?
            .ok_or_else(|| TaskError::OwnerMissing(owner_username.to_string()))?;

        Ok(tasks::insert(&self.pool, &input, owner.id).await?)
    }

    /// Overwrite title/description/completed/dueDate of an owned task. Id and
    /// owner are untouched.
    pub async fn update(
        &self,
        task_id: i64,
        owner_id: i64,
        input: NewTask,
    ) -> Result<Task, TaskError> {
        tasks::update(&self.pool, task_id, owner_id, &input)
            .await?
            .ok_or(TaskError::NotFound)
    }

    pub async fn delete(&self, task_id: i64, owner_id: i64) -> Result<(), TaskError> {
        if tasks::delete(&self.pool, task_id, owner_id).await? {
            Ok(())
        } else {
            Err(TaskError::NotFound)
        }
    }
}
