//! Mock event repository for testing.

use crate::error::{Error, Result};
use crate::providers::EventRepository;
use crate::state::{Event, EventId, EventQuery, UserId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock event repository.
///
/// Uses in-memory storage and enforces the same compare-and-swap contract
/// as the production store, so concurrency tests exercise the real retry
/// paths.
#[derive(Debug, Clone)]
pub struct MockEventRepository {
    events: Arc<Mutex<HashMap<EventId, Event>>>,
}

impl MockEventRepository {
    /// Create a new mock event repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for MockEventRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRepository for MockEventRepository {
    fn find_by_id(&self, id: EventId) -> impl Future<Output = Result<Option<Event>>> + Send {
        let events = Arc::clone(&self.events);

        async move {
            Ok(events
                .lock()
                .map_err(|_| Error::InternalError)?
                .get(&id)
                .cloned())
        }
    }

    fn slot_taken(
        &self,
        date: DateTime<Utc>,
        event_type: &str,
        address: &str,
        created_by: UserId,
    ) -> impl Future<Output = Result<bool>> + Send {
        let events = Arc::clone(&self.events);
        let event_type = event_type.to_string();
        let address = address.to_string();

        async move {
            Ok(events
                .lock()
                .map_err(|_| Error::InternalError)?
                .values()
                .any(|event| event.matches_slot(date, &event_type, &address, created_by)))
        }
    }

    fn list(&self, query: &EventQuery) -> impl Future<Output = Result<Vec<Event>>> + Send {
        let events = Arc::clone(&self.events);
        let query = *query;

        async move {
            let mut matched: Vec<Event> = events
                .lock()
                .map_err(|_| Error::InternalError)?
                .values()
                .filter(|event| query.matches(event))
                .cloned()
                .collect();

            matched.sort_by(|a, b| a.date.cmp(&b.date));
            if query.scope.is_descending() {
                matched.reverse();
            }
            Ok(matched)
        }
    }

    fn insert(&self, event: &Event) -> impl Future<Output = Result<()>> + Send {
        let events = Arc::clone(&self.events);
        let event = event.clone();

        async move {
            events
                .lock()
                .map_err(|_| Error::InternalError)?
                .insert(event.id, event);
            Ok(())
        }
    }

    fn update(
        &self,
        event: &Event,
        expected_version: u64,
    ) -> impl Future<Output = Result<()>> + Send {
        let events = Arc::clone(&self.events);
        let event = event.clone();

        async move {
            let mut guard = events.lock().map_err(|_| Error::InternalError)?;
            match guard.get(&event.id) {
                Some(stored) if stored.version == expected_version => {
                    guard.insert(event.id, event);
                    Ok(())
                }
                // A vanished record is a lost race with a delete.
                Some(_) | None => Err(Error::VersionConflict),
            }
        }
    }

    fn delete(&self, id: EventId) -> impl Future<Output = Result<bool>> + Send {
        let events = Arc::clone(&self.events);

        async move {
            Ok(events
                .lock()
                .map_err(|_| Error::InternalError)?
                .remove(&id)
                .is_some())
        }
    }

    fn strip_comments_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<u64>> + Send {
        let events = Arc::clone(&self.events);
        let username = username.to_string();

        async move {
            let mut guard = events.lock().map_err(|_| Error::InternalError)?;
            let mut touched = 0u64;
            for event in guard.values_mut() {
                let before = event.comments.len();
                event.comments.retain(|comment| comment.username != username);
                if event.comments.len() != before {
                    touched += 1;
                }
            }
            Ok(touched)
        }
    }

    fn delete_for_participant(&self, user: UserId) -> impl Future<Output = Result<u64>> + Send {
        let events = Arc::clone(&self.events);

        async move {
            let mut guard = events.lock().map_err(|_| Error::InternalError)?;
            let doomed: Vec<EventId> = guard
                .values()
                .filter(|event| {
                    event.created_by == user
                        || event.joined_players.contains(&user)
                        || event.invited_players.contains(&user)
                })
                .map(|event| event.id)
                .collect();

            let mut removed = 0u64;
            for id in &doomed {
                if guard.remove(id).is_some() {
                    removed += 1;
                }
            }
            Ok(removed)
        }
    }
}
