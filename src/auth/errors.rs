use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::auth::dto::ApiResponse;

/// Error taxonomy for the auth endpoints.
///
/// Lookup misses and dead tokens intentionally share generic messages so the
/// client cannot distinguish a wrong token from an expired one.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Password is too short")]
    WeakPassword,
    #[error("User already exists")]
    UserExists,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid or expired verification code")]
    InvalidVerificationCode,
    #[error("Invalid or expired reset token")]
    InvalidResetToken,
    #[error("Unauthorized - no valid session")]
    NoSession,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    fn status(&self) -> StatusCode {
        match self {
            AuthError::NoSession => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(ref e) = self {
            error!(error = %e, "internal error");
        }
        let status = self.status();
        (status, Json(ApiResponse::error(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        assert_eq!(AuthError::MissingFields.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::UserExists.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AuthError::InvalidVerificationCode.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::InvalidResetToken.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_session_maps_to_401() {
        assert_eq!(AuthError::NoSession.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_errors_map_to_500() {
        let err = AuthError::Internal(anyhow::anyhow!("db gone"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn expired_and_wrong_tokens_share_a_message() {
        assert_eq!(
            AuthError::InvalidVerificationCode.to_string(),
            "Invalid or expired verification code"
        );
        assert_eq!(
            AuthError::InvalidResetToken.to_string(),
            "Invalid or expired reset token"
        );
    }
}
