//! MongoDB-backed repositories.
//!
//! Documents store ids as uuid strings and timestamps as epoch milliseconds,
//! so they round-trip through BSON without driver-specific types. The event
//! store's `update` is an atomic `find_one_and_replace` filtered on
//! `(_id, version)`, which is what makes the service-layer retry loop sound
//! against concurrent writers.

pub mod event;
pub mod user;

pub use event::MongoEventStore;
pub use user::MongoUserStore;

use crate::error::Error;
use chrono::{DateTime, Utc};

impl From<mongodb::error::Error> for Error {
    fn from(err: mongodb::error::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

/// Timestamp to its stored form.
pub(crate) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

/// Stored timestamp back to a [`DateTime`].
pub(crate) fn from_millis(ms: i64) -> crate::error::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| Error::StorageError(format!("invalid stored timestamp {ms}")))
}

/// Stored uuid string back to a [`uuid::Uuid`].
pub(crate) fn parse_uuid(value: &str) -> crate::error::Result<uuid::Uuid> {
    uuid::Uuid::parse_str(value)
        .map_err(|e| Error::StorageError(format!("invalid stored id {value}: {e}")))
}
