use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::User;

/// Request body for signup. Fields are optional so that missing input is
/// reported through the standard envelope instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Request body for email verification.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub code: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for the forgot-password flow.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request body for reset-password (the token travels in the path).
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// Request body for the resend-verification check.
#[derive(Debug, Deserialize)]
pub struct CheckVerifyRequest {
    pub email: String,
}

/// Sanitized user returned to the client; the password hash is omitted.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub is_verified: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            is_verified: user.is_verified,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}

/// Uniform response envelope for every auth endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUser>,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            user: None,
        }
    }

    pub fn with_user(message: impl Into<String>, user: &User) -> Self {
        Self {
            success: true,
            message: message.into(),
            user: Some(PublicUser::from(user)),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            user: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            name: "Ann".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            is_verified: false,
            verification: None,
            reset: None,
            last_login: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn envelope_never_contains_password_hash() {
        let response = ApiResponse::with_user("User created successfully", &sample_user());
        let json = serde_json::to_string(&response).expect("serialize envelope");
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("a@x.com"));
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn envelope_omits_user_when_absent() {
        let response = ApiResponse::ok("Logged out successfully");
        let json = serde_json::to_string(&response).expect("serialize envelope");
        assert!(!json.contains("\"user\""));
    }

    #[test]
    fn error_envelope_sets_success_false() {
        let response = ApiResponse::error("Invalid credentials");
        let json = serde_json::to_string(&response).expect("serialize envelope");
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("Invalid credentials"));
    }
}
