use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::Extension;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::dto::{TaskDto, TaskPage};
use crate::database::models::NewTask;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::services::task_service::TaskService;
use crate::AppState;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Client-supplied task fields. Any owner field in the body is simply not
/// part of this shape and therefore ignored; the owner always comes from the
/// authenticated principal.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
}

impl TaskPayload {
    fn validated(self) -> Result<NewTask, ApiError> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::validation_error("title is required"))?;

        Ok(NewTask {
            title,
            description: self.description,
            completed: self.completed,
            due_date: self.due_date,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// GET /api/tasks - the caller's tasks; plain array, or a page envelope when
/// page/size query parameters are present
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let service = TaskService::new(state.pool.clone());

    if query.page.is_none() && query.size.is_none() {
        let tasks = service.list(user.user_id).await?;
        let dtos: Vec<TaskDto> = tasks.into_iter().map(TaskDto::from).collect();
        return Ok(Json(dtos).into_response());
    }

    let page = query.page.unwrap_or(0).max(0);
    let size = query.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let (tasks, total) = service.page(user.user_id, page, size).await?;
    let dtos: Vec<TaskDto> = tasks.into_iter().map(TaskDto::from).collect();

    Ok(Json(TaskPage::new(dtos, page, size, total)).into_response())
}

/// GET /api/tasks/:id - 404 whether the task is missing or owned by someone
/// else; the two cases must stay indistinguishable
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<TaskDto>, ApiError> {
    let task = TaskService::new(state.pool.clone())
        .get(id, user.user_id)
        .await?;

    Ok(Json(TaskDto::from(task)))
}

/// POST /api/tasks - create a task owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<TaskPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let input = payload.validated()?;

    let task = TaskService::new(state.pool.clone())
        .create(input, &user.username)
        .await?;

    let location = format!("/api/tasks/{}", task.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(TaskDto::from(task)),
    ))
}

/// PUT /api/tasks/:id - overwrite title/description/completed/dueDate
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<TaskPayload>,
) -> Result<Json<TaskDto>, ApiError> {
    let input = payload.validated()?;

    let task = TaskService::new(state.pool.clone())
        .update(id, user.user_id, input)
        .await?;

    Ok(Json(TaskDto::from(task)))
}

/// DELETE /api/tasks/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    TaskService::new(state.pool.clone())
        .delete(id, user.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
