//! Application services - operations that load, mutate and persist aggregates.
//!
//! Services coordinate between the pure aggregate rules and the provider
//! traits:
//! 1. Load the aggregate from the repository
//! 2. Apply the rule method (pure, may reject)
//! 3. Persist the whole aggregate back under optimistic concurrency
//! 4. Run any side effects (notification email) after the write is durable
//!
//! Step 3 uses a version compare-and-swap; on conflict the cycle re-runs
//! from step 1 so the rule is re-checked against fresh state.

use crate::constants::concurrency::MAX_UPDATE_ATTEMPTS;
use crate::error::{Error, Result};
use crate::providers::EventRepository;
use crate::state::{Event, EventId};

pub mod accounts;
pub mod cascade;
pub mod comments;
pub mod events;
pub mod membership;

pub use accounts::{AccountService, AuthenticatedUser};
pub use cascade::{CascadeCoordinator, CascadeOutcome};
pub use comments::CommentService;
pub use events::EventService;
pub use membership::MembershipService;

/// Load an event, apply a mutation, and persist it with bounded retries.
///
/// Each attempt re-reads the aggregate so the mutation is re-validated
/// against the state that actually wins the write. A rejected rule aborts
/// immediately; only version conflicts retry.
///
/// # Errors
///
/// - [`Error::EventNotFound`] when the event is absent (including mid-retry)
/// - whatever `apply` rejects with
/// - [`Error::VersionConflict`] when every attempt lost its race
pub(crate) async fn update_with_retry<E, F>(events: &E, id: EventId, mut apply: F) -> Result<Event>
where
    E: EventRepository,
    F: FnMut(&mut Event) -> Result<()>,
{
    for attempt in 1..=MAX_UPDATE_ATTEMPTS {
        let Some(mut event) = events.find_by_id(id).await? else {
            return Err(Error::EventNotFound);
        };

        let expected = event.version;
        apply(&mut event)?;
        event.version = expected + 1;

        match events.update(&event, expected).await {
            Ok(()) => return Ok(event),
            Err(Error::VersionConflict) if attempt < MAX_UPDATE_ATTEMPTS => {
                tracing::debug!(event_id = %id, attempt, "lost an aggregate write race, retrying");
            }
            Err(e) => return Err(e),
        }
    }

    Err(Error::VersionConflict)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::mocks::MockEventRepository;
    use crate::state::{EventQuery, NewEvent, UserId};
    use chrono::{DateTime, TimeZone, Utc};
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    /// Repository whose CAS loses to a scripted competing writer a set
    /// number of times before behaving normally.
    #[derive(Clone)]
    struct ContendedRepo {
        inner: MockEventRepository,
        interloper: UserId,
        conflicts_left: Arc<Mutex<u32>>,
        update_attempts: Arc<Mutex<u32>>,
    }

    impl ContendedRepo {
        fn new(inner: MockEventRepository, interloper: UserId, conflicts: u32) -> Self {
            Self {
                inner,
                interloper,
                conflicts_left: Arc::new(Mutex::new(conflicts)),
                update_attempts: Arc::new(Mutex::new(0)),
            }
        }

        fn update_attempts(&self) -> u32 {
            *self.update_attempts.lock().unwrap()
        }
    }

    impl EventRepository for ContendedRepo {
        fn find_by_id(&self, id: EventId) -> impl Future<Output = Result<Option<Event>>> + Send {
            self.inner.find_by_id(id)
        }

        fn slot_taken(
            &self,
            date: DateTime<Utc>,
            event_type: &str,
            address: &str,
            created_by: UserId,
        ) -> impl Future<Output = Result<bool>> + Send {
            self.inner.slot_taken(date, event_type, address, created_by)
        }

        fn list(&self, query: &EventQuery) -> impl Future<Output = Result<Vec<Event>>> + Send {
            self.inner.list(query)
        }

        fn insert(&self, event: &Event) -> impl Future<Output = Result<()>> + Send {
            self.inner.insert(event)
        }

        fn update(
            &self,
            event: &Event,
            expected_version: u64,
        ) -> impl Future<Output = Result<()>> + Send {
            let this = self.clone();
            let event = event.clone();

            async move {
                *this.update_attempts.lock().unwrap() += 1;
                let inject = {
                    let mut left = this.conflicts_left.lock().unwrap();
                    if *left > 0 {
                        *left -= 1;
                        true
                    } else {
                        false
                    }
                };

                if inject {
                    // The competing writer commits first; our swap then
                    // fails on the moved version.
                    if let Some(mut current) = this.inner.find_by_id(event.id).await? {
                        let stale = current.version;
                        if !current.joined_players.contains(&this.interloper) {
                            let at = current.updated_at;
                            current.join(this.interloper, at)?;
                        }
                        current.version = stale + 1;
                        this.inner.update(&current, stale).await?;
                    }
                    return Err(Error::VersionConflict);
                }

                this.inner.update(&event, expected_version).await
            }
        }

        fn delete(&self, id: EventId) -> impl Future<Output = Result<bool>> + Send {
            self.inner.delete(id)
        }

        fn strip_comments_by_username(
            &self,
            username: &str,
        ) -> impl Future<Output = Result<u64>> + Send {
            self.inner.strip_comments_by_username(username)
        }

        fn delete_for_participant(
            &self,
            user: UserId,
        ) -> impl Future<Output = Result<u64>> + Send {
            self.inner.delete_for_participant(user)
        }
    }

    async fn seeded_event(repo: &MockEventRepository) -> Event {
        let spec = NewEvent {
            date: Utc.with_ymd_and_hms(2099, 1, 1, 10, 0, 0).single().unwrap(),
            time: "10:00".to_string(),
            event_type: None,
            is_public: None,
            fees: None,
            is_indoor: None,
            address: "Court 1".to_string(),
            weather: None,
        };
        let event = Event::create(spec, UserId::new(), Utc::now()).unwrap();
        repo.insert(&event).await.unwrap();
        event
    }

    #[tokio::test]
    async fn retry_reapplies_on_conflict() {
        let inner = MockEventRepository::new();
        let event = seeded_event(&inner).await;
        let interloper = UserId::new();
        let repo = ContendedRepo::new(inner, interloper, 1);
        let joiner = UserId::new();
        let now = Utc::now();

        let result = update_with_retry(&repo, event.id, |e| e.join(joiner, now))
            .await
            .unwrap();

        assert_eq!(repo.update_attempts(), 2);
        assert!(result.joined_players.contains(&joiner));
        assert!(
            result.joined_players.contains(&interloper),
            "competing write survives the retry"
        );
        assert_eq!(result.version, 2);
    }

    #[tokio::test]
    async fn rule_rejection_does_not_retry() {
        let inner = MockEventRepository::new();
        let event = seeded_event(&inner).await;
        let repo = ContendedRepo::new(inner, UserId::new(), 0);

        let mut calls = 0;
        let result = update_with_retry(&repo, event.id, |_| {
            calls += 1;
            Err(Error::AlreadyJoined)
        })
        .await;

        assert_eq!(result, Err(Error::AlreadyJoined));
        assert_eq!(calls, 1);
        assert_eq!(repo.update_attempts(), 0, "nothing was written");
    }

    #[tokio::test]
    async fn missing_event_is_not_found() {
        let repo = MockEventRepository::new();
        let result = update_with_retry(&repo, EventId::new(), |_| Ok(())).await;
        assert_eq!(result, Err(Error::EventNotFound));
    }

    #[tokio::test]
    async fn exhausted_retries_surface_the_conflict() {
        let inner = MockEventRepository::new();
        let event = seeded_event(&inner).await;
        let repo = ContendedRepo::new(inner, UserId::new(), MAX_UPDATE_ATTEMPTS);
        let joiner = UserId::new();
        let now = Utc::now();

        let result = update_with_retry(&repo, event.id, |e| e.join(joiner, now)).await;

        assert_eq!(result, Err(Error::VersionConflict));
        assert_eq!(repo.update_attempts(), MAX_UPDATE_ATTEMPTS);
    }
}
