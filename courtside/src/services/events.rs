//! Event lifecycle service: create, fetch, list, edit, delete.

use crate::error::{Error, Result};
use crate::providers::{Clock, EventRepository};
use crate::state::{Event, EventId, EventPatch, EventQuery, ListScope, NewEvent, UserId};
use std::sync::Arc;

/// Event lifecycle operations.
///
/// Creation checks the duplicate-slot rule before inserting; edits and
/// deletes are creator-only. Edits go through the optimistic-concurrency
/// retry cycle in [`crate::services`].
pub struct EventService<E, C> {
    events: Arc<E>,
    clock: Arc<C>,
}

impl<E, C> EventService<E, C>
where
    E: EventRepository,
    C: Clock,
{
    /// Create a new event service.
    pub fn new(events: Arc<E>, clock: Arc<C>) -> Self {
        Self { events, clock }
    }

    /// Create an event owned by `creator`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] for blank required fields
    /// - [`Error::DuplicateEvent`] when the creator already has an event at
    ///   the same `(date, event_type, address)` slot
    pub async fn create(&self, creator: UserId, spec: NewEvent) -> Result<Event> {
        let event = Event::create(spec, creator, self.clock.now())?;

        if self
            .events
            .slot_taken(event.date, &event.event_type, &event.address, creator)
            .await?
        {
            return Err(Error::DuplicateEvent);
        }

        self.events.insert(&event).await?;
        tracing::info!(event_id = %event.id, creator = %creator, "event created");
        Ok(event)
    }

    /// Fetch one aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EventNotFound`] when absent.
    pub async fn get(&self, id: EventId) -> Result<Event> {
        self.events
            .find_by_id(id)
            .await?
            .ok_or(Error::EventNotFound)
    }

    /// List events in `scope` from `user`'s point of view.
    ///
    /// # Errors
    ///
    /// Returns error if the storage query fails.
    pub async fn list(&self, user: UserId, scope: ListScope) -> Result<Vec<Event>> {
        let query = EventQuery {
            scope,
            user,
            now: self.clock.now(),
        };
        self.events.list(&query).await
    }

    /// Apply a field-level patch on behalf of `editor`.
    ///
    /// # Errors
    ///
    /// - [`Error::EventNotFound`] when absent
    /// - [`Error::Forbidden`] when `editor` is not the creator
    /// - [`Error::InvalidInput`] for blank patched fields
    /// - [`Error::VersionConflict`] when every write attempt lost its race
    pub async fn edit(&self, editor: UserId, id: EventId, patch: EventPatch) -> Result<Event> {
        let now = self.clock.now();
        let updated = super::update_with_retry(self.events.as_ref(), id, |event| {
            if event.created_by != editor {
                return Err(Error::Forbidden {
                    reason: "only the creator can edit this event".to_string(),
                });
            }
            event.apply_patch(patch.clone(), now)
        })
        .await?;

        tracing::info!(event_id = %id, editor = %editor, "event updated");
        Ok(updated)
    }

    /// Delete an aggregate on behalf of `requester`.
    ///
    /// Comments vanish with the aggregate; there is no tombstone.
    ///
    /// # Errors
    ///
    /// - [`Error::EventNotFound`] when absent (also when a concurrent delete
    ///   got there first)
    /// - [`Error::Forbidden`] when `requester` is not the creator
    pub async fn delete(&self, requester: UserId, id: EventId) -> Result<()> {
        let event = self.get(id).await?;
        if event.created_by != requester {
            return Err(Error::Forbidden {
                reason: "only the creator can delete this event".to_string(),
            });
        }

        if !self.events.delete(id).await? {
            return Err(Error::EventNotFound);
        }
        tracing::info!(event_id = %id, requester = %requester, "event deleted");
        Ok(())
    }
}

impl<E, C> Clone for EventService<E, C> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            clock: Arc::clone(&self.clock),
        }
    }
}
