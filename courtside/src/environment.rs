//! Application environment: every service wired to its providers.
//!
//! One value of [`AppEnvironment`] is built at startup (or per test) and
//! handed to the router as axum state. Handlers reach the services through
//! it; nothing else is global.

use crate::providers::{
    Clock, EmailProvider, EventRepository, PasswordHasher, TokenService, UserRepository,
};
use crate::services::{
    AccountService, CascadeCoordinator, CommentService, EventService, MembershipService,
};
use std::sync::Arc;

/// Dependency container shared by all handlers.
///
/// Generic over the provider implementations so the same wiring serves the
/// MongoDB-backed binary and the in-memory test setups.
pub struct AppEnvironment<U, E, P, T, M, C> {
    /// Registration, login and the password-reset flow.
    pub accounts: AccountService<U, P, T, M, C>,

    /// Event lifecycle: create, fetch, list, edit, delete.
    pub events: EventService<E, C>,

    /// Join, leave and invite.
    pub membership: MembershipService<E, U, M, C>,

    /// Append-only event comments.
    pub comments: CommentService<E, U, C>,

    /// Account deletion with cascade.
    pub cascade: CascadeCoordinator<E, U>,

    /// Token verification for the auth extractor.
    pub tokens: Arc<T>,
}

impl<U, E, P, T, M, C> AppEnvironment<U, E, P, T, M, C>
where
    U: UserRepository,
    E: EventRepository,
    P: PasswordHasher,
    T: TokenService,
    M: EmailProvider,
    C: Clock,
{
    /// Wire every service to the given providers.
    pub fn new(
        users: Arc<U>,
        events: Arc<E>,
        hasher: Arc<P>,
        tokens: Arc<T>,
        email: Arc<M>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            accounts: AccountService::new(
                Arc::clone(&users),
                hasher,
                Arc::clone(&tokens),
                Arc::clone(&email),
                Arc::clone(&clock),
            ),
            events: EventService::new(Arc::clone(&events), Arc::clone(&clock)),
            membership: MembershipService::new(
                Arc::clone(&events),
                Arc::clone(&users),
                email,
                Arc::clone(&clock),
            ),
            comments: CommentService::new(Arc::clone(&events), Arc::clone(&users), clock),
            cascade: CascadeCoordinator::new(events, users),
            tokens,
        }
    }
}

impl<U, E, P, T, M, C> Clone for AppEnvironment<U, E, P, T, M, C> {
    fn clone(&self) -> Self {
        Self {
            accounts: self.accounts.clone(),
            events: self.events.clone(),
            membership: self.membership.clone(),
            comments: self.comments.clone(),
            cascade: self.cascade.clone(),
            tokens: Arc::clone(&self.tokens),
        }
    }
}
