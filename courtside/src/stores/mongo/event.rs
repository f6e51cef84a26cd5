//! MongoDB event store.

use super::{from_millis, parse_uuid, to_millis};
use crate::error::{Error, Result};
use crate::providers::EventRepository;
use crate::state::{Comment, Event, EventId, EventQuery, ListScope, UserId};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{Collection, Database, IndexModel, bson::Document, bson::doc};
use serde::{Deserialize, Serialize};

/// Stored shape of a [`Comment`].
#[derive(Debug, Serialize, Deserialize)]
struct CommentDocument {
    username: String,
    text: String,
    created_at: i64,
}

/// Stored shape of an [`Event`].
#[derive(Debug, Serialize, Deserialize)]
struct EventDocument {
    #[serde(rename = "_id")]
    id: String,
    date: i64,
    time: String,
    event_type: String,
    is_public: bool,
    fees: i64,
    is_indoor: bool,
    address: String,
    weather: String,
    created_by: String,
    invited_players: Vec<String>,
    joined_players: Vec<String>,
    comments: Vec<CommentDocument>,
    created_at: i64,
    updated_at: i64,
    version: i64,
}

impl EventDocument {
    fn from_event(event: &Event) -> Result<Self> {
        let version = i64::try_from(event.version)
            .map_err(|_| Error::StorageError(format!("version {} out of range", event.version)))?;

        Ok(Self {
            id: event.id.0.to_string(),
            date: to_millis(event.date),
            time: event.time.clone(),
            event_type: event.event_type.clone(),
            is_public: event.is_public,
            fees: i64::from(event.fees),
            is_indoor: event.is_indoor,
            address: event.address.clone(),
            weather: event.weather.clone(),
            created_by: event.created_by.0.to_string(),
            invited_players: event
                .invited_players
                .iter()
                .map(|id| id.0.to_string())
                .collect(),
            joined_players: event
                .joined_players
                .iter()
                .map(|id| id.0.to_string())
                .collect(),
            comments: event
                .comments
                .iter()
                .map(|c| CommentDocument {
                    username: c.username.clone(),
                    text: c.text.clone(),
                    created_at: to_millis(c.created_at),
                })
                .collect(),
            created_at: to_millis(event.created_at),
            updated_at: to_millis(event.updated_at),
            version,
        })
    }

    fn into_event(self) -> Result<Event> {
        let fees = u32::try_from(self.fees)
            .map_err(|_| Error::StorageError(format!("invalid stored fee {}", self.fees)))?;
        let version = u64::try_from(self.version)
            .map_err(|_| Error::StorageError(format!("invalid stored version {}", self.version)))?;

        Ok(Event {
            id: EventId(parse_uuid(&self.id)?),
            date: from_millis(self.date)?,
            time: self.time,
            event_type: self.event_type,
            is_public: self.is_public,
            fees,
            is_indoor: self.is_indoor,
            address: self.address,
            weather: self.weather,
            created_by: UserId(parse_uuid(&self.created_by)?),
            invited_players: self
                .invited_players
                .iter()
                .map(|id| Ok(UserId(parse_uuid(id)?)))
                .collect::<Result<Vec<_>>>()?,
            joined_players: self
                .joined_players
                .iter()
                .map(|id| Ok(UserId(parse_uuid(id)?)))
                .collect::<Result<Vec<_>>>()?,
            comments: self
                .comments
                .into_iter()
                .map(|c| {
                    Ok(Comment {
                        username: c.username,
                        text: c.text,
                        created_at: from_millis(c.created_at)?,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            created_at: from_millis(self.created_at)?,
            updated_at: from_millis(self.updated_at)?,
            version,
        })
    }
}

/// MongoDB-backed implementation of [`EventRepository`].
#[derive(Clone)]
pub struct MongoEventStore {
    collection: Collection<EventDocument>,
}

impl MongoEventStore {
    /// Collection name within the database.
    pub const COLLECTION: &'static str = "events";

    /// Create a store over the given database.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(Self::COLLECTION),
        }
    }

    /// Create the listing and duplicate-check indexes.
    ///
    /// Idempotent; called once at startup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageError`] if index creation fails.
    pub async fn ensure_indexes(&self) -> Result<()> {
        // Duplicate-slot pre-check in the event service.
        self.collection
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "date": 1, "event_type": 1, "address": 1, "created_by": 1 })
                    .build(),
            )
            .await?;

        // Listing scopes filter on date and membership.
        self.collection
            .create_index(IndexModel::builder().keys(doc! { "date": 1 }).build())
            .await?;
        self.collection
            .create_index(IndexModel::builder().keys(doc! { "joined_players": 1 }).build())
            .await?;

        Ok(())
    }

    /// Translate an [`EventQuery`] into a MongoDB filter.
    ///
    /// Must stay equivalent to [`EventQuery::matches`], which is the
    /// definition the in-memory mock runs.
    fn filter_for(query: &EventQuery) -> Document {
        let user = query.user.0.to_string();
        let now = to_millis(query.now);

        match query.scope {
            ListScope::Upcoming => doc! {
                "date": { "$gte": now },
                "$or": [
                    { "is_public": true },
                    { "created_by": user.as_str() },
                    { "joined_players": user.as_str() },
                    { "invited_players": user.as_str() },
                ],
            },
            ListScope::Mine => doc! { "created_by": user },
            ListScope::Joined => doc! { "joined_players": user },
            ListScope::History => doc! {
                "date": { "$lt": now },
                "$or": [
                    { "created_by": user.as_str() },
                    { "joined_players": user.as_str() },
                ],
            },
        }
    }
}

impl EventRepository for MongoEventStore {
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>> {
        self.collection
            .find_one(doc! { "_id": id.0.to_string() })
            .await?
            .map(EventDocument::into_event)
            .transpose()
    }

    async fn slot_taken(
        &self,
        date: DateTime<Utc>,
        event_type: &str,
        address: &str,
        created_by: UserId,
    ) -> Result<bool> {
        let count = self
            .collection
            .count_documents(doc! {
                "date": to_millis(date),
                "event_type": event_type,
                "address": address,
                "created_by": created_by.0.to_string(),
            })
            .await?;

        Ok(count > 0)
    }

    async fn list(&self, query: &EventQuery) -> Result<Vec<Event>> {
        let direction = if query.scope.is_descending() { -1 } else { 1 };

        let cursor = self
            .collection
            .find(Self::filter_for(query))
            .sort(doc! { "date": direction })
            .await?;

        let documents: Vec<EventDocument> = cursor.try_collect().await?;
        documents.into_iter().map(EventDocument::into_event).collect()
    }

    async fn insert(&self, event: &Event) -> Result<()> {
        self.collection
            .insert_one(EventDocument::from_event(event)?)
            .await?;
        Ok(())
    }

    async fn update(&self, event: &Event, expected_version: u64) -> Result<()> {
        let expected = i64::try_from(expected_version).map_err(|_| {
            Error::StorageError(format!("version {expected_version} out of range"))
        })?;

        // Atomic compare-and-swap: replaces only if the stored version still
        // matches. A vanished record reports as a conflict too, which the
        // retry loop resolves to a definitive answer on re-read.
        let previous = self
            .collection
            .find_one_and_replace(
                doc! { "_id": event.id.0.to_string(), "version": expected },
                EventDocument::from_event(event)?,
            )
            .await?;

        if previous.is_none() {
            return Err(Error::VersionConflict);
        }

        Ok(())
    }

    async fn delete(&self, id: EventId) -> Result<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.0.to_string() })
            .await?;

        Ok(result.deleted_count > 0)
    }

    async fn strip_comments_by_username(&self, username: &str) -> Result<u64> {
        let result = self
            .collection
            .update_many(
                doc! { "comments.username": username },
                doc! { "$pull": { "comments": { "username": username } } },
            )
            .await?;

        Ok(result.modified_count)
    }

    async fn delete_for_participant(&self, user: UserId) -> Result<u64> {
        let id = user.0.to_string();

        let result = self
            .collection
            .delete_many(doc! {
                "$or": [
                    { "created_by": id.as_str() },
                    { "joined_players": id.as_str() },
                    { "invited_players": id.as_str() },
                ],
            })
            .await?;

        Ok(result.deleted_count)
    }
}
