use sqlx::{postgres::PgRow, FromRow, Row};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::tokens::IssuedToken;

/// User record in the database.
///
/// Pending tokens are modeled as a single `Option<IssuedToken>` per flow so
/// that a token value can never exist without its expiry (the schema enforces
/// the same pairing with CHECK constraints).
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String, // Argon2 hash, never exposed in JSON
    pub is_verified: bool,
    pub verification: Option<IssuedToken>,
    pub reset: Option<IssuedToken>,
    pub last_login: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

fn token_pair(
    row: &PgRow,
    value_col: &str,
    expiry_col: &str,
) -> Result<Option<IssuedToken>, sqlx::Error> {
    let value: Option<String> = row.try_get(value_col)?;
    let expires_at: Option<OffsetDateTime> = row.try_get(expiry_col)?;
    Ok(match (value, expires_at) {
        (Some(value), Some(expires_at)) => Some(IssuedToken { value, expires_at }),
        _ => None,
    })
}

impl FromRow<'_, PgRow> for User {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            password_hash: row.try_get("password_hash")?,
            is_verified: row.try_get("is_verified")?,
            verification: token_pair(row, "verification_token", "verification_expires_at")?,
            reset: token_pair(row, "reset_token", "reset_expires_at")?,
            last_login: row.try_get("last_login")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
