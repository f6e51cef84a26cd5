//! Comment service: append-only comments on events.

use crate::error::{Error, Result};
use crate::providers::{Clock, EventRepository, UserRepository};
use crate::state::{Event, EventId, UserId};
use std::sync::Arc;

/// Comment operations.
///
/// The author's username is denormalized into the comment at write time;
/// after that the comment has no link back to the user record.
pub struct CommentService<E, U, C> {
    events: Arc<E>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<E, U, C> CommentService<E, U, C>
where
    E: EventRepository,
    U: UserRepository,
    C: Clock,
{
    /// Create a new comment service.
    pub fn new(events: Arc<E>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            events,
            users,
            clock,
        }
    }

    /// Append a comment by `author` to an event.
    ///
    /// # Errors
    ///
    /// - [`Error::UserNotFound`] when the author record is gone
    /// - [`Error::EventNotFound`] when the event is absent
    /// - [`Error::InvalidInput`] when the trimmed text is empty
    /// - [`Error::DuplicateComment`] when the author already posted the
    ///   identical trimmed text on this event
    /// - [`Error::VersionConflict`] when every write attempt lost its race
    pub async fn add_comment(&self, author: UserId, event_id: EventId, text: &str) -> Result<Event> {
        let user = self
            .users
            .find_by_id(author)
            .await?
            .ok_or(Error::UserNotFound)?;

        let now = self.clock.now();
        let event = super::update_with_retry(self.events.as_ref(), event_id, |e| {
            e.add_comment(&user.username, text, now)
        })
        .await?;

        tracing::info!(event_id = %event_id, author = %author, "comment added");
        Ok(event)
    }
}

impl<E, U, C> Clone for CommentService<E, U, C> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            users: Arc::clone(&self.users),
            clock: Arc::clone(&self.clock),
        }
    }
}
