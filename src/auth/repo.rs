use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::{repo_types::User, tokens::IssuedToken};

/// Marker error raised when an insert trips the unique email constraint.
/// Two signups racing on one email resolve through this, not through the
/// pre-insert existence check.
#[derive(Debug, thiserror::Error)]
#[error("email already registered")]
pub struct DuplicateEmail;

/// Fields needed to create a user; the verification pair is issued up front.
#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub verification: IssuedToken,
}

/// Persistence boundary for user records.
///
/// The live-token lookups take `now` from the caller so the expiry comparison
/// happens in exactly one place per request.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_by_live_verification_code(
        &self,
        code: &str,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<User>>;
    async fn find_by_live_reset_token(
        &self,
        token: &str,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<User>>;
    async fn create(&self, new_user: NewUser) -> anyhow::Result<User>;
    async fn mark_verified(&self, id: Uuid) -> anyhow::Result<User>;
    async fn set_verification(&self, id: Uuid, token: &IssuedToken) -> anyhow::Result<User>;
    async fn set_reset(&self, id: Uuid, token: &IssuedToken) -> anyhow::Result<User>;
    async fn reset_password(&self, id: Uuid, password_hash: &str) -> anyhow::Result<User>;
    async fn touch_last_login(&self, id: Uuid, now: OffsetDateTime) -> anyhow::Result<User>;
}

const USER_COLUMNS: &str = "id, email, name, password_hash, is_verified, \
     verification_token, verification_expires_at, reset_token, reset_expires_at, \
     last_login, created_at";

/// Postgres-backed store.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_live_verification_code(
        &self,
        code: &str,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE verification_token = $1 AND verification_expires_at > $2"
        ))
        .bind(code)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_live_reset_token(
        &self,
        token: &str,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE reset_token = $1 AND reset_expires_at > $2"
        ))
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create(&self, new_user: NewUser) -> anyhow::Result<User> {
        let result = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, name, password_hash, verification_token, verification_expires_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(&new_user.password_hash)
        .bind(&new_user.verification.value)
        .bind(new_user.verification.expires_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(DuplicateEmail.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn mark_verified(&self, id: Uuid) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users \
             SET is_verified = TRUE, verification_token = NULL, verification_expires_at = NULL \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn set_verification(&self, id: Uuid, token: &IssuedToken) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users \
             SET verification_token = $2, verification_expires_at = $3 \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(&token.value)
        .bind(token.expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn set_reset(&self, id: Uuid, token: &IssuedToken) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users \
             SET reset_token = $2, reset_expires_at = $3 \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(&token.value)
        .bind(token.expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn reset_password(&self, id: Uuid, password_hash: &str) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users \
             SET password_hash = $2, reset_token = NULL, reset_expires_at = NULL \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn touch_last_login(&self, id: Uuid, now: OffsetDateTime) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET last_login = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}
