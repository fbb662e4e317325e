use sqlx::SqlitePool;

use super::models::User;
use super::DatabaseError;

pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn insert(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<User, DatabaseError> {
    let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
        .bind(username)
        .bind(password_hash)
        .execute(pool)
        .await;

    let result = match result {
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(DatabaseError::UniqueViolation("username"));
        }
        other => other?,
    };

    Ok(User {
        id: result.last_insert_rowid(),
        username: username.to_string(),
        password_hash: password_hash.to_string(),
    })
}
