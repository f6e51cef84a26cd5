//! Comment API endpoints.
//!
//! - POST /api/events/:event_id/comments - Comment on an event (requires auth)

use super::events::EventResponse;
use crate::environment::AppEnvironment;
use crate::middleware::AuthUser;
use crate::providers::{
    Clock, EmailProvider, EventRepository, PasswordHasher, TokenService, UserRepository,
};
use crate::state::EventId;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use courtside_web::AppError;
use serde::Deserialize;
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to add a comment to an event.
#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    /// Comment body; stored trimmed, must not be blank
    pub text: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Add a comment to an event.
///
/// Comments are stamped with the author's username and timestamp. The same
/// user posting the same trimmed text twice is rejected as a duplicate.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/events/550e8400-e29b-41d4-a716-446655440000/comments \
///   -H "Authorization: Bearer <token>" \
///   -H "Content-Type: application/json" \
///   -d '{"text": "great game everyone"}'
/// ```
pub async fn add_comment<U, E, P, T, M, C>(
    auth: AuthUser,
    Path(event_id): Path<Uuid>,
    State(env): State<AppEnvironment<U, E, P, T, M, C>>,
    Json(request): Json<AddCommentRequest>,
) -> Result<(StatusCode, Json<EventResponse>), AppError>
where
    U: UserRepository,
    E: EventRepository,
    P: PasswordHasher,
    T: TokenService,
    M: EmailProvider,
    C: Clock,
{
    let event = env
        .comments
        .add_comment(auth.user_id, EventId(event_id), &request.text)
        .await?;

    Ok((StatusCode::CREATED, Json(event.into())))
}
