//! Router composition for the Courtside API.
//!
//! Builds the complete Axum router over a generic [`AppEnvironment`], so the
//! same wiring serves the MongoDB-backed binary and mock-backed tests.

use crate::environment::AppEnvironment;
use crate::handlers::{accounts, comments, events, membership};
use crate::health::{health_check, readiness_check};
use crate::providers::{
    Clock, EmailProvider, EventRepository, PasswordHasher, TokenService, UserRepository,
};
use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use courtside_web::correlation_id_layer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the complete Axum router.
///
/// # Routes
///
/// ## Accounts (public)
/// - `POST /api/users/register` - Create an account
/// - `POST /api/users/login` - Exchange credentials for a token
/// - `POST /api/users/password-reset/request` - Start a password reset
/// - `POST /api/users/password-reset/confirm` - Finish a password reset
///
/// ## Accounts (bearer auth)
/// - `DELETE /api/users/:user_id` - Delete an account and cascade
///
/// ## Events (bearer auth)
/// - `GET /api/events` - List events by scope
/// - `POST /api/events` - Create an event
/// - `GET /api/events/:event_id` - Get one event
/// - `PATCH /api/events/:event_id` - Edit an event
/// - `DELETE /api/events/:event_id` - Delete an event
/// - `POST /api/events/:event_id/join` - Join
/// - `POST /api/events/:event_id/leave` - Leave
/// - `POST /api/events/:event_id/invitations` - Invite a player
/// - `POST /api/events/:event_id/comments` - Add a comment
///
/// ## Operations (public)
/// - `GET /health` - Liveness
/// - `GET /ready` - Readiness
///
/// # Example
///
/// ```rust,ignore
/// let env = AppEnvironment::new(users, events, hasher, tokens, email, clock);
/// let app = app_router(env);
/// axum::serve(listener, app).await?;
/// ```
pub fn app_router<U, E, P, T, M, C>(env: AppEnvironment<U, E, P, T, M, C>) -> Router
where
    U: UserRepository + 'static,
    E: EventRepository + 'static,
    P: PasswordHasher + 'static,
    T: TokenService + 'static,
    M: EmailProvider + 'static,
    C: Clock + 'static,
{
    let api_routes = Router::new()
        // Accounts
        .route("/users/register", post(accounts::register::<U, E, P, T, M, C>))
        .route("/users/login", post(accounts::login::<U, E, P, T, M, C>))
        .route(
            "/users/password-reset/request",
            post(accounts::request_password_reset::<U, E, P, T, M, C>),
        )
        .route(
            "/users/password-reset/confirm",
            post(accounts::confirm_password_reset::<U, E, P, T, M, C>),
        )
        .route("/users/:user_id", delete(accounts::delete_user::<U, E, P, T, M, C>))
        // Events
        .route("/events", get(events::list_events::<U, E, P, T, M, C>))
        .route("/events", post(events::create_event::<U, E, P, T, M, C>))
        .route("/events/:event_id", get(events::get_event::<U, E, P, T, M, C>))
        .route("/events/:event_id", patch(events::update_event::<U, E, P, T, M, C>))
        .route("/events/:event_id", delete(events::delete_event::<U, E, P, T, M, C>))
        // Membership
        .route("/events/:event_id/join", post(membership::join_event::<U, E, P, T, M, C>))
        .route("/events/:event_id/leave", post(membership::leave_event::<U, E, P, T, M, C>))
        .route(
            "/events/:event_id/invitations",
            post(membership::invite_player::<U, E, P, T, M, C>),
        )
        // Comments
        .route(
            "/events/:event_id/comments",
            post(comments::add_comment::<U, E, P, T, M, C>),
        );

    Router::new()
        // Health checks (no authentication)
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // API routes under /api prefix
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(correlation_id_layer())
        .with_state(env)
}
