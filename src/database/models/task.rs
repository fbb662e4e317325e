use chrono::NaiveDate;
use sqlx::FromRow;

/// Persisted task record. `user_id` is the owning user and is never
/// serialized back to clients (see `api::dto::TaskDto`).
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
    pub user_id: i64,
}

/// Client-supplied task fields, validated by the handler layer. The owner is
/// always forced server-side from the authenticated principal.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
}
