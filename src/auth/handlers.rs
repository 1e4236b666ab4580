use axum::{
    extract::{FromRef, Path, State},
    http::{header, StatusCode},
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            ApiResponse, CheckVerifyRequest, ForgotPasswordRequest, LoginRequest,
            ResetPasswordRequest, SignupRequest, VerifyEmailRequest,
        },
        errors::AuthError,
        password::{hash_password, validate_strength, verify_password},
        repo::{DuplicateEmail, NewUser},
        session::{SessionKeys, SessionUser},
        tokens::{issue_reset_token, issue_verification_code},
    },
    mail::dispatcher::Notification,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/verify-email", post(verify_email))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/:token", post(reset_password))
        .route("/check-verify", post(check_verify))
        .route("/check-auth", get(check_auth))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let (email, password, name) = match (
        payload.email.as_deref().map(str::trim),
        payload.password.as_deref(),
        payload.name.as_deref().map(str::trim),
    ) {
        (Some(email), Some(password), Some(name))
            if !email.is_empty() && !password.is_empty() && !name.is_empty() =>
        {
            (email.to_lowercase(), password, name.to_string())
        }
        _ => {
            warn!("signup with missing fields");
            return Err(AuthError::MissingFields);
        }
    };

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AuthError::InvalidEmail);
    }

    if !validate_strength(password) {
        warn!("password too short");
        return Err(AuthError::WeakPassword);
    }

    if state.store.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AuthError::UserExists);
    }

    let password_hash = hash_password(password)?;
    let verification = issue_verification_code();

    let user = match state
        .store
        .create(NewUser {
            email,
            name,
            password_hash,
            verification: verification.clone(),
        })
        .await
    {
        Ok(user) => user,
        // a concurrent signup won the insert race
        Err(e) if e.is::<DuplicateEmail>() => return Err(AuthError::UserExists),
        Err(e) => return Err(e.into()),
    };

    let keys = SessionKeys::from_ref(&state);
    let cookie = keys.session_cookie(keys.sign(user.id)?);

    state
        .notifier
        .dispatch(Notification::Verification {
            email: user.email.clone(),
            code: verification.value,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok((
        StatusCode::CREATED,
        AppendHeaders([(header::SET_COOKIE, cookie.to_string())]),
        Json(ApiResponse::with_user("User created successfully", &user)),
    ))
}

#[instrument(skip(state, payload))]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let now = OffsetDateTime::now_utc();
    let user = state
        .store
        .find_by_live_verification_code(payload.code.trim(), now)
        .await?
        .ok_or_else(|| {
            warn!("verification with dead or unknown code");
            AuthError::InvalidVerificationCode
        })?;

    let user = state.store.mark_verified(user.id).await?;

    state
        .notifier
        .dispatch(Notification::Welcome {
            email: user.email.clone(),
            name: user.name.clone(),
        })
        .await?;

    info!(user_id = %user.id, "email verified");
    Ok(Json(ApiResponse::with_user(
        "Email verified successfully",
        &user,
    )))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let email = normalize_email(&payload.email);

    let user = state.store.find_by_email(&email).await?.ok_or_else(|| {
        warn!(email = %email, "login unknown email");
        AuthError::InvalidCredentials
    })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    let user = state
        .store
        .touch_last_login(user.id, OffsetDateTime::now_utc())
        .await?;

    let keys = SessionKeys::from_ref(&state);
    let cookie = keys.session_cookie(keys.sign(user.id)?);

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        StatusCode::OK,
        AppendHeaders([(header::SET_COOKIE, cookie.to_string())]),
        Json(ApiResponse::with_user("Logged in successfully", &user)),
    ))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let keys = SessionKeys::from_ref(&state);
    (
        StatusCode::OK,
        AppendHeaders([(header::SET_COOKIE, keys.clear_cookie().to_string())]),
        Json(ApiResponse::ok("Logged out successfully")),
    )
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let email = normalize_email(&payload.email);

    let user = state.store.find_by_email(&email).await?.ok_or_else(|| {
        warn!(email = %email, "password reset for unknown email");
        AuthError::UserNotFound
    })?;

    let reset = issue_reset_token();
    state.store.set_reset(user.id, &reset).await?;

    let reset_url = format!(
        "{}/reset-password/{}",
        state.config.client_url.trim_end_matches('/'),
        reset.value
    );
    state
        .notifier
        .dispatch(Notification::PasswordReset {
            email: user.email.clone(),
            reset_url,
        })
        .await?;

    info!(user_id = %user.id, "password reset link issued");
    Ok(Json(ApiResponse::ok(
        "Password reset link sent to your email",
    )))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AuthError> {
    if !validate_strength(&payload.password) {
        warn!("reset password too short");
        return Err(AuthError::WeakPassword);
    }

    let now = OffsetDateTime::now_utc();
    let user = state
        .store
        .find_by_live_reset_token(&token, now)
        .await?
        .ok_or_else(|| {
            warn!("reset with dead or unknown token");
            AuthError::InvalidResetToken
        })?;

    let password_hash = hash_password(&payload.password)?;
    let user = state.store.reset_password(user.id, &password_hash).await?;

    state
        .notifier
        .dispatch(Notification::ResetSuccess {
            email: user.email.clone(),
        })
        .await?;

    info!(user_id = %user.id, "password reset");
    Ok(Json(ApiResponse::ok("Password reset successfully")))
}

#[instrument(skip(state, payload))]
pub async fn check_verify(
    State(state): State<AppState>,
    Json(payload): Json<CheckVerifyRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let email = normalize_email(&payload.email);

    let user = state.store.find_by_email(&email).await?.ok_or_else(|| {
        warn!(email = %email, "resend for unknown email");
        AuthError::UserNotFound
    })?;

    if user.is_verified {
        return Ok(Json(ApiResponse::ok("You are already verified")));
    }

    // persist before sending so the emailed code is the one that verifies
    let verification = issue_verification_code();
    state.store.set_verification(user.id, &verification).await?;

    state
        .notifier
        .dispatch(Notification::Verification {
            email: user.email.clone(),
            code: verification.value,
        })
        .await?;

    info!(user_id = %user.id, "verification code reissued");
    Ok(Json(ApiResponse::ok("Verification code sent to your email")))
}

#[instrument(skip(state))]
pub async fn check_auth(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> Result<impl IntoResponse, AuthError> {
    let user = state
        .store
        .find_by_id(user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;
    Ok(Json(ApiResponse::with_user("Authenticated", &user)))
}
