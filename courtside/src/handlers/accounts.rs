//! Account API endpoints.
//!
//! - POST /api/users/register - Create an account and issue a token
//! - POST /api/users/login - Exchange credentials for a token
//! - POST /api/users/password-reset/request - Start a password reset
//! - POST /api/users/password-reset/confirm - Finish a password reset
//! - DELETE /api/users/:user_id - Delete an account and cascade (requires auth)

use crate::environment::AppEnvironment;
use crate::middleware::AuthUser;
use crate::providers::{
    Clock, EmailProvider, EventRepository, PasswordHasher, TokenService, UserRepository,
};
use crate::services::{AuthenticatedUser, CascadeOutcome};
use crate::state::UserId;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use courtside_web::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to register a new player account.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Desired username, at least 3 characters after trimming
    pub username: String,
    /// Email address, used for login and notifications
    pub email: String,
    /// Plaintext password, at least 6 characters
    pub password: String,
}

/// Request to log in with existing credentials.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// A signed-in session: who you are plus the bearer token to prove it.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// The account's id
    pub user_id: Uuid,
    /// The account's username
    pub username: String,
    /// Bearer token for subsequent requests
    pub token: String,
}

impl From<AuthenticatedUser> for SessionResponse {
    fn from(auth: AuthenticatedUser) -> Self {
        Self {
            user_id: auth.user_id.0,
            username: auth.username,
            token: auth.token,
        }
    }
}

/// Request to start a password reset.
#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    /// Email of the account to reset
    pub email: String,
}

/// Request to finish a password reset with the emailed code.
#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirm {
    /// The code received by email
    pub code: String,
    /// Replacement password, at least 6 characters
    pub new_password: String,
}

/// Generic acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome
    pub message: String,
}

/// Counts reported after an account cascade deletion.
#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    /// Events that had comments by the user removed
    pub comments_stripped: u64,
    /// Events deleted because the user participated in them
    pub events_deleted: u64,
}

impl From<CascadeOutcome> for DeleteUserResponse {
    fn from(outcome: CascadeOutcome) -> Self {
        Self {
            comments_stripped: outcome.comments_stripped,
            events_deleted: outcome.events_deleted,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Register a new account.
///
/// Validates the username, email and password, then persists the account
/// and issues a bearer token so the client is signed in immediately.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/users/register \
///   -H "Content-Type: application/json" \
///   -d '{
///     "username": "alice",
///     "email": "alice@example.com",
///     "password": "hunter22"
///   }'
/// ```
pub async fn register<U, E, P, T, M, C>(
    State(env): State<AppEnvironment<U, E, P, T, M, C>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError>
where
    U: UserRepository,
    E: EventRepository,
    P: PasswordHasher,
    T: TokenService,
    M: EmailProvider,
    C: Clock,
{
    let session = env
        .accounts
        .register(&request.username, &request.email, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Log in with email and password.
///
/// Returns the same session payload as registration. Failures never say
/// whether the email or the password was wrong.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/users/login \
///   -H "Content-Type: application/json" \
///   -d '{"email": "alice@example.com", "password": "hunter22"}'
/// ```
pub async fn login<U, E, P, T, M, C>(
    State(env): State<AppEnvironment<U, E, P, T, M, C>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError>
where
    U: UserRepository,
    E: EventRepository,
    P: PasswordHasher,
    T: TokenService,
    M: EmailProvider,
    C: Clock,
{
    let session = env.accounts.login(&request.email, &request.password).await?;

    Ok(Json(session.into()))
}

/// Request a password-reset code by email.
///
/// Always answers 200 with the same message, whether or not the email is
/// registered. When it is, a single-use code lands in the inbox.
pub async fn request_password_reset<U, E, P, T, M, C>(
    State(env): State<AppEnvironment<U, E, P, T, M, C>>,
    Json(request): Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, AppError>
where
    U: UserRepository,
    E: EventRepository,
    P: PasswordHasher,
    T: TokenService,
    M: EmailProvider,
    C: Clock,
{
    env.accounts.request_password_reset(&request.email).await?;

    Ok(Json(MessageResponse {
        message: "If that email is registered, a reset code has been sent".to_string(),
    }))
}

/// Set a new password using the emailed reset code.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/users/password-reset/confirm \
///   -H "Content-Type: application/json" \
///   -d '{"code": "<code from email>", "new_password": "correct-horse"}'
/// ```
pub async fn confirm_password_reset<U, E, P, T, M, C>(
    State(env): State<AppEnvironment<U, E, P, T, M, C>>,
    Json(request): Json<PasswordResetConfirm>,
) -> Result<Json<MessageResponse>, AppError>
where
    U: UserRepository,
    E: EventRepository,
    P: PasswordHasher,
    T: TokenService,
    M: EmailProvider,
    C: Clock,
{
    env.accounts
        .confirm_password_reset(&request.code, &request.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated".to_string(),
    }))
}

/// Delete an account and cascade through the event collection.
///
/// Callers may delete their own account; admins may delete any account.
/// Events the user participated in are removed entirely, and their
/// comments are scrubbed from the events that remain.
///
/// # Example
///
/// ```bash
/// curl -X DELETE http://localhost:8080/api/users/550e8400-e29b-41d4-a716-446655440000 \
///   -H "Authorization: Bearer <token>"
/// ```
pub async fn delete_user<U, E, P, T, M, C>(
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    State(env): State<AppEnvironment<U, E, P, T, M, C>>,
) -> Result<Json<DeleteUserResponse>, AppError>
where
    U: UserRepository,
    E: EventRepository,
    P: PasswordHasher,
    T: TokenService,
    M: EmailProvider,
    C: Clock,
{
    let outcome = env
        .cascade
        .delete_user(UserId(user_id), auth.user_id, auth.is_admin)
        .await?;

    Ok(Json(outcome.into()))
}
