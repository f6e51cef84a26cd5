//! Event repository trait.

use crate::error::Result;
use crate::state::{Event, EventId, EventQuery, UserId};
use chrono::{DateTime, Utc};

/// Event repository.
///
/// Aggregates are loaded and persisted whole; there are no partial reads.
/// [`EventRepository::update`] is a compare-and-swap on the aggregate's
/// version counter, which is what makes the services' read-modify-write
/// cycles safe under concurrent requests.
pub trait EventRepository: Send + Sync {
    /// Get an event by ID.
    ///
    /// # Errors
    ///
    /// Returns error if the storage query fails.
    fn find_by_id(
        &self,
        id: EventId,
    ) -> impl std::future::Future<Output = Result<Option<Event>>> + Send;

    /// Whether an event already occupies the given slot.
    ///
    /// The slot key is `(date, event_type, address, created_by)`; a second
    /// event with the same key is a duplicate.
    ///
    /// # Errors
    ///
    /// Returns error if the storage query fails.
    fn slot_taken(
        &self,
        date: DateTime<Utc>,
        event_type: &str,
        address: &str,
        created_by: UserId,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// List events for a query, sorted by date.
    ///
    /// Ascending for upcoming-style scopes, descending for history; see
    /// [`crate::state::ListScope::is_descending`].
    ///
    /// # Errors
    ///
    /// Returns error if the storage query fails.
    fn list(
        &self,
        query: &EventQuery,
    ) -> impl std::future::Future<Output = Result<Vec<Event>>> + Send;

    /// Insert a new aggregate.
    ///
    /// # Errors
    ///
    /// Returns error if the storage query fails.
    fn insert(&self, event: &Event) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Replace an aggregate if its stored version still matches.
    ///
    /// `event.version` must already be bumped past `expected_version` by the
    /// caller; the swap only succeeds when the stored record is still at
    /// `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The storage query fails
    /// - The stored version moved on (or the record vanished) →
    ///   [`crate::Error::VersionConflict`]
    fn update(
        &self,
        event: &Event,
        expected_version: u64,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Delete an aggregate by ID.
    ///
    /// # Returns
    ///
    /// `true` if a record was removed, `false` if none existed.
    ///
    /// # Errors
    ///
    /// Returns error if the storage query fails.
    fn delete(&self, id: EventId) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// Remove every comment authored under `username`, across all events.
    ///
    /// Bulk operation used by the cascade coordinator; bypasses the version
    /// counter because it touches many aggregates at once.
    ///
    /// # Returns
    ///
    /// Number of events that lost at least one comment.
    ///
    /// # Errors
    ///
    /// Returns error if the storage query fails.
    fn strip_comments_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<u64>> + Send;

    /// Delete every event where `user` is creator, joiner or invitee.
    ///
    /// Bulk operation used by the cascade coordinator.
    ///
    /// # Returns
    ///
    /// Number of events removed.
    ///
    /// # Errors
    ///
    /// Returns error if the storage query fails.
    fn delete_for_participant(
        &self,
        user: UserId,
    ) -> impl std::future::Future<Output = Result<u64>> + Send;
}
