//! Membership service: join, leave, invite.

use crate::error::{Error, Result};
use crate::providers::{Clock, EmailProvider, EventRepository, UserRepository};
use crate::state::{Event, EventId, UserId};
use std::sync::Arc;

/// Membership operations on one event aggregate.
///
/// All three mutations run through the optimistic-concurrency retry cycle,
/// so two racing joins resolve to exactly one success and one
/// `AlreadyJoined`. The invitation email goes out only after the
/// membership write is durable, and a delivery failure never rolls the
/// invite back.
pub struct MembershipService<E, U, M, C> {
    events: Arc<E>,
    users: Arc<U>,
    email: Arc<M>,
    clock: Arc<C>,
}

impl<E, U, M, C> MembershipService<E, U, M, C>
where
    E: EventRepository,
    U: UserRepository,
    M: EmailProvider,
    C: Clock,
{
    /// Create a new membership service.
    pub fn new(events: Arc<E>, users: Arc<U>, email: Arc<M>, clock: Arc<C>) -> Self {
        Self {
            events,
            users,
            email,
            clock,
        }
    }

    /// Join `user` to an event.
    ///
    /// # Errors
    ///
    /// - [`Error::EventNotFound`] when the event is absent
    /// - [`Error::Forbidden`] when the event is private and `user` is not
    ///   invited
    /// - [`Error::AlreadyJoined`] when `user` already joined
    /// - [`Error::VersionConflict`] when every write attempt lost its race
    pub async fn join(&self, user: UserId, event_id: EventId) -> Result<Event> {
        let now = self.clock.now();
        let event =
            super::update_with_retry(self.events.as_ref(), event_id, |e| e.join(user, now))
                .await?;

        tracing::info!(event_id = %event_id, user = %user, "player joined event");
        Ok(event)
    }

    /// Remove `user` from an event's joined players.
    ///
    /// # Errors
    ///
    /// - [`Error::EventNotFound`] when the event is absent
    /// - [`Error::NotJoined`] when `user` never joined
    /// - [`Error::Forbidden`] when `user` is the creator
    /// - [`Error::VersionConflict`] when every write attempt lost its race
    pub async fn leave(&self, user: UserId, event_id: EventId) -> Result<Event> {
        let now = self.clock.now();
        let event =
            super::update_with_retry(self.events.as_ref(), event_id, |e| e.leave(user, now))
                .await?;

        tracing::info!(event_id = %event_id, user = %user, "player left event");
        Ok(event)
    }

    /// Invite the user named `invitee_username` on behalf of `inviter`.
    ///
    /// The invitee is notified by email after the invite is durable;
    /// delivery failure is logged and swallowed.
    ///
    /// # Errors
    ///
    /// - [`Error::UserNotFound`] when the inviter or invitee is unknown
    /// - [`Error::EventNotFound`] when the event is absent
    /// - [`Error::Forbidden`] when `inviter` is not the creator
    /// - [`Error::AlreadyInvited`] when the invitee is already invited
    /// - [`Error::VersionConflict`] when every write attempt lost its race
    pub async fn invite(
        &self,
        inviter: UserId,
        event_id: EventId,
        invitee_username: &str,
    ) -> Result<Event> {
        let inviter_record = self
            .users
            .find_by_id(inviter)
            .await?
            .ok_or(Error::UserNotFound)?;
        let invitee = self
            .users
            .find_by_username(invitee_username)
            .await?
            .ok_or(Error::UserNotFound)?;

        let now = self.clock.now();
        let event = super::update_with_retry(self.events.as_ref(), event_id, |e| {
            e.invite(inviter, invitee.id, now)
        })
        .await?;

        tracing::info!(
            event_id = %event_id,
            inviter = %inviter,
            invitee = %invitee.id,
            "player invited to event"
        );

        // Fire-and-forget notification; the invite itself is already durable.
        if let Err(e) = self
            .email
            .send_invitation(&invitee.email, &inviter_record.username, &event.address, event.date)
            .await
        {
            tracing::warn!(
                event_id = %event_id,
                invitee = %invitee.id,
                error = %e,
                "invitation email failed"
            );
        }

        Ok(event)
    }
}

impl<E, U, M, C> Clone for MembershipService<E, U, M, C> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            users: Arc::clone(&self.users),
            email: Arc::clone(&self.email),
            clock: Arc::clone(&self.clock),
        }
    }
}
