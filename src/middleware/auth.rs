use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::auth;
use crate::database::users;
use crate::error::ApiError;
use crate::AppState;

/// Authenticated principal injected into request extensions before handlers
/// run. Handlers take this via `Extension<AuthUser>`; there is no ambient
/// session state anywhere else.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
}

/// Basic-auth middleware: every protected request must carry credentials,
/// which are verified against the stored hash on each call.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (username, password) =
        parse_basic_credentials(&headers).map_err(ApiError::unauthorized)?;

    let user = users::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(|| ApiError::unauthorized("invalid credentials"))?;

    if !auth::verify_password(&password, &user.password_hash)? {
        return Err(ApiError::unauthorized("invalid credentials"));
    }

    request.extensions_mut().insert(AuthUser {
        user_id: user.id,
        username: user.username,
    });

    Ok(next.run(request).await)
}

/// Extract `(username, password)` from an `Authorization: Basic` header.
fn parse_basic_credentials(headers: &HeaderMap) -> Result<(String, String), String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    let encoded = auth_str
        .strip_prefix("Basic ")
        .ok_or_else(|| "Authorization header must use Basic scheme".to_string())?;

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| "Invalid base64 in Authorization header".to_string())?;

    let decoded =
        String::from_utf8(decoded).map_err(|_| "Credentials are not valid UTF-8".to_string())?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| "Credentials must be username:password".to_string())?;

    if username.is_empty() {
        return Err("Empty username".to_string());
    }

    Ok((username.to_string(), password.to_string()))
}
