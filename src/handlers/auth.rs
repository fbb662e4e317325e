use axum::extract::State;
use axum::response::Json;
use axum::Extension;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::dto::UserDto;
use crate::auth::{self, Claims};
use crate::database::{users, DatabaseError};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    fn validated(self) -> Result<(String, String), ApiError> {
        let username = self
            .username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ApiError::validation_error("username is required"))?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::validation_error("password is required"))?;
        Ok((username, password))
    }
}

/// POST /api/auth/register (public)
///
/// Creates a user with a one-way hash of the password. Duplicate usernames
/// are a 400, matching the HTTP contract rather than the 409 convention.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let (username, password) = payload.validated()?;

    if users::find_by_username(&state.pool, &username).await?.is_some() {
        return Err(ApiError::bad_request("username is already taken"));
    }

    let password_hash = auth::hash_password(&password)?;

    // The unique constraint closes the race between the check and the insert
    let user = users::insert(&state.pool, &username, &password_hash)
        .await
        .map_err(|e| match e {
            DatabaseError::UniqueViolation(_) => {
                ApiError::bad_request("username is already taken")
            }
            other => other.into(),
        })?;

    tracing::info!("registered user {}", user.username);
    Ok(Json(UserDto::from(user)))
}

/// POST /api/auth/login (protected)
///
/// Optional token path: verifies the credentials in the body and returns a
/// signed JWT. The basic-auth middleware does not accept these tokens; the
/// per-request credential check stays authoritative.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<Value>, ApiError> {
    let (username, password) = payload.validated()?;

    let user = users::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(|| ApiError::unauthorized("invalid username or password"))?;

    if !auth::verify_password(&password, &user.password_hash)? {
        return Err(ApiError::unauthorized("invalid username or password"));
    }

    let claims = Claims::new(user.username, user.id);
    let expires_in = claims.exp - claims.iat;
    let token = auth::generate_jwt(&claims)?;

    Ok(Json(json!({
        "token": token,
        "expiresIn": expires_in,
    })))
}

/// GET /api/auth/check (protected) - echo the authenticated principal
pub async fn check(Extension(user): Extension<AuthUser>) -> Json<Value> {
    Json(json!({
        "authenticated": true,
        "username": user.username,
    }))
}
