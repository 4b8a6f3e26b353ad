use uuid::Uuid;

use crate::dto::{LoginRequest, RegisterRequest, UserSearchQuery};
use crate::errors::ApiError;
use crate::models::PublicUser;
use crate::service::auth::{jwt, SessionConfig};
use crate::service::crypto;
use crate::{db, PGPool};

const DEFAULT_SEARCH_LIMIT: i64 = 10;
const MAX_SEARCH_LIMIT: i64 = 50;

pub async fn register(dto: RegisterRequest, pool: &PGPool) -> Result<PublicUser, ApiError> {
    let email = dto.email.trim();
    if email.is_empty() || dto.password.is_empty() {
        return Err(ApiError::validation("email and password are required"));
    }
    if db::user::find_by_email(email, pool).await?.is_some() {
        return Err(ApiError::Conflict(
            "user with this email already exists".into(),
        ));
    }
    let password_hash = crypto::hash_password(&dto.password)?;
    let user = db::user::create(Uuid::new_v4(), email, &password_hash, pool).await?;
    Ok(user.into())
}

/// Lookup miss and password mismatch collapse to the same error so the
/// response does not reveal which half was wrong.
pub async fn login(
    dto: LoginRequest,
    session: &SessionConfig,
    pool: &PGPool,
) -> Result<(String, PublicUser), ApiError> {
    let email = dto.email.trim();
    if email.is_empty() || dto.password.is_empty() {
        return Err(ApiError::validation("email and password are required"));
    }
    let user = db::user::find_by_email(email, pool)
        .await?
        .ok_or_else(|| ApiError::authentication("invalid email or password"))?;
    if !crypto::verify_password(&dto.password, &user.password_hash)? {
        return Err(ApiError::authentication("invalid email or password"));
    }
    let token = jwt::sign(user.id, &user.email, session)?;
    Ok((token, user.into()))
}

pub async fn search(query: UserSearchQuery, pool: &PGPool) -> Result<Vec<PublicUser>, ApiError> {
    let term = query.email.as_deref().map(str::trim).unwrap_or_default();
    if term.chars().count() < 2 {
        return Err(ApiError::validation(
            "email search term must be at least 2 characters long",
        ));
    }
    let limit = query
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT);
    Ok(db::user::search_by_email(term, limit, pool).await?)
}
