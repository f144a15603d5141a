//! Handlers for the `/auth` resource (signup, token exchange).
//!
//! Signup registers a (username, email) pair and emails a confirmation
//! code; the token endpoint exchanges that code for a JWT access token.
//! Both endpoints are public.

use axum::extract::State;
use axum::Json;
use opusdb_core::error::CoreError;
use opusdb_core::validate::{validate_email, validate_username};
use serde::{Deserialize, Serialize};

use opusdb_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`. Fields are optional so absence
/// maps to a 400 validation error instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Response body for `POST /auth/signup`: the echoed pair.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub username: String,
    pub email: String,
}

/// Request body for `POST /auth/token`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: Option<String>,
    pub confirmation_code: Option<String>,
}

/// Response body for `POST /auth/token`.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Generic failure message for the token endpoint. Deliberately identical
/// whether the username exists with a different code or the code itself is
/// stale, so the endpoint cannot be used as an oracle.
const INCORRECT_PAIR: &str = "incorrect username / confirmation code pair";

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register a (username, email) pair and send a confirmation code to the
/// address. Repeating the request with the same pair re-sends a code; a
/// partial collision (username or email taken by someone else) is a 409.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    // 1. Presence and format validation, before any storage access.
    let username = input
        .username
        .ok_or_else(|| AppError::Core(CoreError::Validation("username is required".into())))?;
    let email = input
        .email
        .ok_or_else(|| AppError::Core(CoreError::Validation("email is required".into())))?;

    validate_username(&username).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_email(&email).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // 2. Atomic insert-or-fetch. The unique constraints own the race:
    //    concurrent signups for the same pair both land on the same row.
    let user = UserRepo::signup_insert(&state.pool, &username, &email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "username or email is already registered to another account".into(),
            ))
        })?;

    // 3. Issue a code bound to the user's current state.
    let code = state.codes.issue(&user);

    // 4. Dispatch. Failures are logged, never surfaced: the client can
    //    repeat signup to trigger another send.
    match &state.mailer {
        Some(mailer) => {
            if let Err(err) = mailer.send_confirmation_code(&user.email, &code).await {
                tracing::warn!(error = %err, email = %user.email, "Confirmation email failed");
            }
        }
        None => {
            tracing::warn!(email = %user.email, "SMTP not configured; confirmation email skipped");
        }
    }

    Ok(Json(SignupResponse {
        username: user.username,
        email: user.email,
    }))
}

/// POST /api/v1/auth/token
///
/// Exchange a (username, confirmation code) pair for a JWT access token.
/// A successful exchange confirms the account, which consumes the code.
pub async fn token(
    State(state): State<AppState>,
    Json(input): Json<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    // 1. Both fields are required.
    let (Some(username), Some(code)) = (input.username, input.confirmation_code) else {
        return Err(AppError::BadRequest(
            "username and confirmation_code are required".into(),
        ));
    };

    // 2. Unknown usernames are a 404, per the resource-oriented contract.
    let user = UserRepo::find_by_username(&state.pool, &username)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            key: username,
        }))?;

    // 3. Check the code against the user's current state. The error body
    //    never says which half of the pair was wrong.
    if !state.codes.check(&user, &code) {
        return Err(AppError::BadRequest(INCORRECT_PAIR.into()));
    }

    // 4. Confirm the account; outstanding codes stop validating.
    if !user.is_confirmed {
        UserRepo::mark_confirmed(&state.pool, user.id).await?;
    }

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(TokenResponse { token }))
}
