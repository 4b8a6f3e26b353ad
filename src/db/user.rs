use uuid::Uuid;

use crate::models::{PublicUser, User};
use crate::PGPool;

pub async fn create(id: Uuid, email: &str, password_hash: &str, pool: &PGPool) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, email, password_hash)
         VALUES ($1, $2, $3)
         RETURNING id, email, password_hash, created_at",
    )
    .bind(id)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
}

pub async fn find_by_email(email: &str, pool: &PGPool) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(id: Uuid, pool: &PGPool) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Case-insensitive substring match on email, bounded by `limit`.
pub async fn search_by_email(
    email: &str,
    limit: i64,
    pool: &PGPool,
) -> Result<Vec<PublicUser>, sqlx::Error> {
    sqlx::query_as::<_, PublicUser>(
        "SELECT id, email, created_at FROM users WHERE email ILIKE $1 ORDER BY email LIMIT $2",
    )
    .bind(format!("%{}%", email))
    .bind(limit)
    .fetch_all(pool)
    .await
}
