use sqlx::FromRow;

/// Persisted user record. The hash never leaves the data layer; responses go
/// through `api::dto::UserDto`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}
