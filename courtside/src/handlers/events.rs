//! Event API endpoints.
//!
//! - POST /api/events - Create a new event (requires auth)
//! - GET /api/events - List events by scope (requires auth)
//! - GET /api/events/:event_id - Get one event (requires auth)
//! - PATCH /api/events/:event_id - Edit an event (creator only)
//! - DELETE /api/events/:event_id - Delete an event (creator only)

use crate::environment::AppEnvironment;
use crate::middleware::AuthUser;
use crate::providers::{
    Clock, EmailProvider, EventRepository, PasswordHasher, TokenService, UserRepository,
};
use crate::state::{Comment, Event, EventId, EventPatch, ListScope, NewEvent};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use courtside_web::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Event details returned to clients.
///
/// Mirrors the stored aggregate minus its concurrency version, which is an
/// implementation detail of the store.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    /// Event id
    pub id: Uuid,
    /// When the event takes place
    pub date: DateTime<Utc>,
    /// Display start time, e.g. "18:30"
    pub time: String,
    /// Kind of meetup
    pub event_type: String,
    /// Whether anyone may join without an invitation
    pub is_public: bool,
    /// Participation fee
    pub fees: u32,
    /// Indoor court flag
    pub is_indoor: bool,
    /// Where the event takes place
    pub address: String,
    /// Weather note
    pub weather: String,
    /// Creator's user id
    pub created_by: Uuid,
    /// Ids of invited players
    pub invited_players: Vec<Uuid>,
    /// Ids of joined players
    pub joined_players: Vec<Uuid>,
    /// Comments in posting order
    pub comments: Vec<Comment>,
    /// When the event was created
    pub created_at: DateTime<Utc>,
    /// When the event was last modified
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id.0,
            date: event.date,
            time: event.time,
            event_type: event.event_type,
            is_public: event.is_public,
            fees: event.fees,
            is_indoor: event.is_indoor,
            address: event.address,
            weather: event.weather,
            created_by: event.created_by.0,
            invited_players: event.invited_players.iter().map(|id| id.0).collect(),
            joined_players: event.joined_players.iter().map(|id| id.0).collect(),
            comments: event.comments,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Query parameters for event listings.
#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    /// Listing scope: `upcoming` (default), `mine`, `joined` or `history`
    pub scope: Option<ListScope>,
}

/// Response for event listings.
#[derive(Debug, Serialize)]
pub struct ListEventsResponse {
    /// Events in scope order
    pub events: Vec<EventResponse>,
    /// Number of events returned
    pub total: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a new event.
///
/// The authenticated user becomes the creator and is joined automatically.
/// Omitted optional fields fall back to the product defaults.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/events \
///   -H "Authorization: Bearer <token>" \
///   -H "Content-Type: application/json" \
///   -d '{
///     "date": "2026-06-01T00:00:00Z",
///     "time": "18:30",
///     "address": "Riverside Court 2",
///     "is_public": true,
///     "fees": 5
///   }'
/// ```
pub async fn create_event<U, E, P, T, M, C>(
    auth: AuthUser,
    State(env): State<AppEnvironment<U, E, P, T, M, C>>,
    Json(request): Json<NewEvent>,
) -> Result<(StatusCode, Json<EventResponse>), AppError>
where
    U: UserRepository,
    E: EventRepository,
    P: PasswordHasher,
    T: TokenService,
    M: EmailProvider,
    C: Clock,
{
    let event = env.events.create(auth.user_id, request).await?;

    Ok((StatusCode::CREATED, Json(event.into())))
}

/// List events in one of four scopes.
///
/// `upcoming` (the default) shows future events the caller may see, `mine`
/// the caller's own, `joined` those the caller has joined, and `history`
/// past events the caller took part in, most recent first.
///
/// # Example
///
/// ```bash
/// curl "http://localhost:8080/api/events?scope=joined" \
///   -H "Authorization: Bearer <token>"
/// ```
pub async fn list_events<U, E, P, T, M, C>(
    auth: AuthUser,
    Query(query): Query<ListEventsQuery>,
    State(env): State<AppEnvironment<U, E, P, T, M, C>>,
) -> Result<Json<ListEventsResponse>, AppError>
where
    U: UserRepository,
    E: EventRepository,
    P: PasswordHasher,
    T: TokenService,
    M: EmailProvider,
    C: Clock,
{
    let scope = query.scope.unwrap_or(ListScope::Upcoming);
    let events = env.events.list(auth.user_id, scope).await?;

    let events: Vec<EventResponse> = events.into_iter().map(Into::into).collect();
    let total = events.len();

    Ok(Json(ListEventsResponse { events, total }))
}

/// Get one event by id.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/api/events/550e8400-e29b-41d4-a716-446655440000 \
///   -H "Authorization: Bearer <token>"
/// ```
pub async fn get_event<U, E, P, T, M, C>(
    _auth: AuthUser,
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
    let event = env.events.get(EventId(event_id)).await?;

    Ok(Json(event.into()))
}

/// Edit an event's details.
///
/// Creator only. Absent fields are left unchanged; membership, comments
/// and the creator cannot be patched.
///
/// # Example
///
/// ```bash
/// curl -X PATCH http://localhost:8080/api/events/550e8400-e29b-41d4-a716-446655440000 \
///   -H "Authorization: Bearer <token>" \
///   -H "Content-Type: application/json" \
///   -d '{"time": "19:00", "weather": "light rain"}'
/// ```
pub async fn update_event<U, E, P, T, M, C>(
    auth: AuthUser,
    Path(event_id): Path<Uuid>,
    State(env): State<AppEnvironment<U, E, P, T, M, C>>,
    Json(patch): Json<EventPatch>,
) -> Result<Json<EventResponse>, AppError>
where
    U: UserRepository,
    E: EventRepository,
    P: PasswordHasher,
    T: TokenService,
    M: EmailProvider,
    C: Clock,
{
    let event = env.events.edit(auth.user_id, EventId(event_id), patch).await?;

    Ok(Json(event.into()))
}

/// Delete an event.
///
/// Creator only. Gone means gone: there is no soft delete.
///
/// # Example
///
/// ```bash
/// curl -X DELETE http://localhost:8080/api/events/550e8400-e29b-41d4-a716-446655440000 \
///   -H "Authorization: Bearer <token>"
/// ```
pub async fn delete_event<U, E, P, T, M, C>(
    auth: AuthUser,
    Path(event_id): Path<Uuid>,
    State(env): State<AppEnvironment<U, E, P, T, M, C>>,
) -> Result<StatusCode, AppError>
where
    U: UserRepository,
    E: EventRepository,
    P: PasswordHasher,
    T: TokenService,
    M: EmailProvider,
    C: Clock,
{
    env.events.delete(auth.user_id, EventId(event_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}
