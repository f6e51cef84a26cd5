//! Cascade deletion coordinator.
//!
//! Removing an account must leave no dangling references, so deletion fans
//! out across the event store before touching the user record:
//! 1. Strip every comment the target authored (matched by username)
//! 2. Bulk-delete every event where the target is creator, joiner or invitee
//! 3. Delete the user record itself
//!
//! Stripping runs first so events that survive step 2 are already clean,
//! and the user record goes last so a retry after a partial failure still
//! finds the target and re-runs the earlier steps. The steps are not one
//! transaction; each is individually idempotent instead.

use crate::error::{Error, Result};
use crate::providers::{EventRepository, UserRepository};
use crate::state::UserId;
use serde::Serialize;
use std::sync::Arc;

/// What a completed cascade removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CascadeOutcome {
    /// Events that lost at least one comment in step 1.
    pub comments_stripped: u64,

    /// Events removed in step 2.
    pub events_deleted: u64,
}

/// Coordinates account deletion across the user and event stores.
pub struct CascadeCoordinator<E, U> {
    events: Arc<E>,
    users: Arc<U>,
}

impl<E, U> CascadeCoordinator<E, U>
where
    E: EventRepository,
    U: UserRepository,
{
    /// Create a new coordinator.
    pub fn new(events: Arc<E>, users: Arc<U>) -> Self {
        Self { events, users }
    }

    /// Delete `target`'s account and everything that references it.
    ///
    /// Only the account owner or an admin may do this. A second call for an
    /// already-deleted target fails `UserNotFound` before any side effect,
    /// which is what makes retrying the operation safe.
    ///
    /// # Errors
    ///
    /// - [`Error::Forbidden`] when `requester` is neither `target` nor admin
    /// - [`Error::UserNotFound`] when the target no longer exists
    pub async fn delete_user(
        &self,
        target: UserId,
        requester: UserId,
        requester_is_admin: bool,
    ) -> Result<CascadeOutcome> {
        if requester != target && !requester_is_admin {
            return Err(Error::Forbidden {
                reason: "you may only delete your own account".to_string(),
            });
        }

        let Some(user) = self.users.find_by_id(target).await? else {
            return Err(Error::UserNotFound);
        };

        let comments_stripped = self
            .events
            .strip_comments_by_username(&user.username)
            .await?;
        let events_deleted = self.events.delete_for_participant(target).await?;

        if !self.users.delete(target).await? {
            return Err(Error::UserNotFound);
        }

        tracing::info!(
            user_id = %target,
            comments_stripped,
            events_deleted,
            "account cascade-deleted"
        );

        Ok(CascadeOutcome {
            comments_stripped,
            events_deleted,
        })
    }
}

impl<E, U> Clone for CascadeCoordinator<E, U> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            users: Arc::clone(&self.users),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::mocks::{MockEventRepository, MockUserRepository};
    use crate::providers::{EventRepository as _, UserRepository as _};
    use crate::state::{Event, NewEvent, User};
    use chrono::{TimeZone, Utc};

    struct Fixture {
        coordinator: CascadeCoordinator<MockEventRepository, MockUserRepository>,
        events: Arc<MockEventRepository>,
        users: Arc<MockUserRepository>,
    }

    fn fixture() -> Fixture {
        let events = Arc::new(MockEventRepository::new());
        let users = Arc::new(MockUserRepository::new());
        Fixture {
            coordinator: CascadeCoordinator::new(Arc::clone(&events), Arc::clone(&users)),
            events,
            users,
        }
    }

    fn t0() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().unwrap()
    }

    async fn seeded_user(f: &Fixture, username: &str) -> User {
        let user = User::new(
            username.to_string(),
            format!("{username}@example.com"),
            "mock$pw".to_string(),
            t0(),
        );
        f.users.insert(&user).await.unwrap();
        user
    }

    async fn seeded_event(f: &Fixture, creator: UserId, address: &str) -> Event {
        let spec = NewEvent {
            date: Utc.with_ymd_and_hms(2099, 1, 1, 10, 0, 0).single().unwrap(),
            time: "10:00".to_string(),
            event_type: None,
            is_public: None,
            fees: None,
            is_indoor: None,
            address: address.to_string(),
            weather: None,
        };
        let event = Event::create(spec, creator, t0()).unwrap();
        f.events.insert(&event).await.unwrap();
        event
    }

    #[tokio::test]
    async fn only_self_or_admin_may_delete() {
        let f = fixture();
        let target = seeded_user(&f, "alice").await;
        let other = seeded_user(&f, "bob").await;

        assert!(matches!(
            f.coordinator.delete_user(target.id, other.id, false).await,
            Err(Error::Forbidden { .. })
        ));
        // Authorization is checked before existence
        assert!(f.users.find_by_id(target.id).await.unwrap().is_some());

        f.coordinator
            .delete_user(target.id, other.id, true)
            .await
            .unwrap();
        assert!(f.users.find_by_id(target.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cascade_removes_events_and_comments() {
        let f = fixture();
        let alice = seeded_user(&f, "alice").await;
        let bob = seeded_user(&f, "bob").await;

        // Alice's own event, with a comment from Bob that dies with it.
        let mut owned = seeded_event(&f, alice.id, "Court 1").await;
        owned.add_comment("bob", "see you there", t0()).unwrap();
        let v = owned.version;
        owned.version = v + 1;
        f.events.update(&owned, v).await.unwrap();

        // Bob's event that Alice joined and commented on.
        let mut joined = seeded_event(&f, bob.id, "Court 2").await;
        joined.join(alice.id, t0()).unwrap();
        joined.add_comment("alice", "count me in", t0()).unwrap();
        let v = joined.version;
        joined.version = v + 1;
        f.events.update(&joined, v).await.unwrap();

        // Bob's event that Alice only commented on.
        let mut commented = seeded_event(&f, bob.id, "Court 3").await;
        commented.add_comment("alice", "maybe next time", t0()).unwrap();
        commented.add_comment("bob", "shame", t0()).unwrap();
        let v = commented.version;
        commented.version = v + 1;
        f.events.update(&commented, v).await.unwrap();

        let outcome = f
            .coordinator
            .delete_user(alice.id, alice.id, false)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            CascadeOutcome {
                comments_stripped: 2,
                events_deleted: 2,
            }
        );

        // The merely-commented event survives, minus Alice's comment.
        let survivor = f.events.find_by_id(commented.id).await.unwrap().unwrap();
        assert_eq!(survivor.comments.len(), 1);
        assert_eq!(survivor.comments[0].username, "bob");
        assert!(!survivor.joined_players.contains(&alice.id));

        assert!(f.events.find_by_id(owned.id).await.unwrap().is_none());
        assert!(f.events.find_by_id(joined.id).await.unwrap().is_none());
        assert!(f.users.find_by_id(alice.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_delete_is_not_found_with_no_side_effects() {
        let f = fixture();
        let alice = seeded_user(&f, "alice").await;
        let bob = seeded_user(&f, "bob").await;
        let survivor = seeded_event(&f, bob.id, "Court 9").await;

        f.coordinator
            .delete_user(alice.id, alice.id, false)
            .await
            .unwrap();
        assert_eq!(
            f.coordinator.delete_user(alice.id, alice.id, false).await,
            Err(Error::UserNotFound)
        );

        assert!(f.events.find_by_id(survivor.id).await.unwrap().is_some());
        assert!(f.users.find_by_id(bob.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn invitee_events_are_deleted_too() {
        let f = fixture();
        let alice = seeded_user(&f, "alice").await;
        let bob = seeded_user(&f, "bob").await;

        let mut event = seeded_event(&f, bob.id, "Court 4").await;
        event.invite(bob.id, alice.id, t0()).unwrap();
        let v = event.version;
        event.version = v + 1;
        f.events.update(&event, v).await.unwrap();

        let outcome = f
            .coordinator
            .delete_user(alice.id, alice.id, false)
            .await
            .unwrap();
        assert_eq!(outcome.events_deleted, 1);
        assert!(f.events.find_by_id(event.id).await.unwrap().is_none());
    }
}
