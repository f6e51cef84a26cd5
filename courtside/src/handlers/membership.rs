//! Membership API endpoints.
//!
//! - POST /api/events/:event_id/join - Join an event (requires auth)
//! - POST /api/events/:event_id/leave - Leave an event (requires auth)
//! - POST /api/events/:event_id/invitations - Invite a player (creator only)

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
};
use courtside_web::AppError;
use serde::Deserialize;
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to invite a player to an event.
#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    /// Username of the player to invite
    pub username: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Join an event.
///
/// Public events admit anyone; private events only invited players. Racing
/// joins are serialized by the store's version check, so two players can
/// join at the same instant without losing either membership.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/events/550e8400-e29b-41d4-a716-446655440000/join \
///   -H "Authorization: Bearer <token>"
/// ```
pub async fn join_event<U, E, P, T, M, C>(
    auth: AuthUser,
    Path(event_id): Path<Uuid>,
    State(env): State<AppEnvironment<U, E, P, T, M, C>>,
) -> Result<Json<EventResponse>, AppError>
where
    U: UserRepository,
    E: EventRepository,
    P: PasswordHasher,
    T: TokenService,
    M: EmailProvider,
    C: Clock,
{
    let event = env.membership.join(auth.user_id, EventId(event_id)).await?;

    Ok(Json(event.into()))
}

/// Leave an event.
///
/// The creator cannot leave; they delete the event instead.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/events/550e8400-e29b-41d4-a716-446655440000/leave \
///   -H "Authorization: Bearer <token>"
/// ```
pub async fn leave_event<U, E, P, T, M, C>(
    auth: AuthUser,
    Path(event_id): Path<Uuid>,
    State(env): State<AppEnvironment<U, E, P, T, M, C>>,
) -> Result<Json<EventResponse>, AppError>
where
    U: UserRepository,
    E: EventRepository,
    P: PasswordHasher,
    T: TokenService,
    M: EmailProvider,
    C: Clock,
{
    let event = env.membership.leave(auth.user_id, EventId(event_id)).await?;

    Ok(Json(event.into()))
}

/// Invite a player to an event by username.
///
/// Creator only. The invitation is stored first; the notification email is
/// sent afterwards and its failure does not undo the invite.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/events/550e8400-e29b-41d4-a716-446655440000/invitations \
///   -H "Authorization: Bearer <token>" \
///   -H "Content-Type: application/json" \
///   -d '{"username": "bob"}'
/// ```
pub async fn invite_player<U, E, P, T, M, C>(
    auth: AuthUser,
    Path(event_id): Path<Uuid>,
    State(env): State<AppEnvironment<U, E, P, T, M, C>>,
    Json(request): Json<InviteRequest>,
) -> Result<Json<EventResponse>, AppError>
where
    U: UserRepository,
    E: EventRepository,
    P: PasswordHasher,
    T: TokenService,
    M: EmailProvider,
    C: Clock,
{
    let event = env
        .membership
        .invite(auth.user_id, EventId(event_id), &request.username)
        .await?;

    Ok(Json(event.into()))
}
