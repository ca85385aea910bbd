//! Bearer-token sessions and the extractors that resolve them.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use sqlx::SqliteConnection;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// Issues a new session token for `user_id`. Expired sessions of every user
/// are purged first.
pub async fn create_session(
    conn: &mut SqliteConnection,
    user_id: i64,
    ttl_hours: i64,
) -> Result<String, sqlx::Error> {
    let token = Uuid::new_v4().simple().to_string();
    let now = Utc::now();
    let purged = purge_expired_sessions(conn, now).await?;
    if purged > 0 {
        debug!("Purged {purged} expired sessions");
    }
    sqlx::query(
        "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&token)
    .bind(user_id)
    .bind(now)
    .bind(now + Duration::hours(ttl_hours))
    .execute(&mut *conn)
    .await?;
    Ok(token)
}

/// The user behind an unexpired token.
pub async fn find_session_user(
    conn: &mut SqliteConnection,
    token: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT u.*
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token = ? AND s.expires_at > ?
        "#,
    )
    .bind(token)
    .bind(Utc::now())
    .fetch_optional(&mut *conn)
    .await
}

async fn purge_expired_sessions(
    conn: &mut SqliteConnection,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    Ok(sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(now)
        .execute(&mut *conn)
        .await?
        .rows_affected())
}

pub async fn delete_session(conn: &mut SqliteConnection, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authenticated requester; rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let mut conn = state.db.acquire().await?;
        let user = find_session_user(&mut conn, token)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(AuthUser(user))
    }
}

/// Optional requester for public pages. A bad or expired token is treated as
/// anonymous.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match bearer_token(&parts.headers) {
            Some(token) => {
                let mut conn = state.db.acquire().await?;
                Ok(MaybeUser(find_session_user(&mut conn, token).await?))
            }
            None => Ok(MaybeUser(None)),
        }
    }
}

impl MaybeUser {
    pub fn id(&self) -> Option<i64> {
        self.0.as_ref().map(|user| user.id)
    }
}
