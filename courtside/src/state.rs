//! Domain types: users, event aggregates, and embedded comments.
//!
//! The [`Event`] aggregate owns its membership lists and comments and is
//! loaded/persisted as one unit. All membership and comment rules are pure
//! methods here, so they run without I/O; services wrap them with the
//! load/persist cycle.

use crate::constants::event_defaults;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub uuid::Uuid);

impl UserId {
    /// Generate a new random `UserId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub uuid::Uuid);

impl EventId {
    /// Generate a new random `EventId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// User
// ═══════════════════════════════════════════════════════════════════════

/// Identity record.
///
/// `username` and `email` are unique case-insensitively; repositories do the
/// case folding on lookup. Reset fields are populated only while a
/// password-reset is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,

    /// Display name, unique case-insensitively.
    pub username: String,

    /// Email address, unique case-insensitively.
    pub email: String,

    /// Password digest (PHC string, never the plaintext).
    pub password_digest: String,

    /// Digest of the outstanding reset code, if any.
    pub reset_code_digest: Option<String>,

    /// When the outstanding reset code stops being honored.
    pub reset_code_expires_at: Option<DateTime<Utc>>,

    /// Whether this user may delete accounts other than their own.
    pub is_admin: bool,

    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a freshly registered user.
    ///
    /// Callers validate and hash beforehand; this only assembles the record.
    #[must_use]
    pub fn new(username: String, email: String, password_digest: String, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::new(),
            username,
            email,
            password_digest,
            reset_code_digest: None,
            reset_code_expires_at: None,
            is_admin: false,
            created_at: now,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Event Aggregate
// ═══════════════════════════════════════════════════════════════════════

/// Comment embedded in an event.
///
/// Immutable once created; there is no edit or delete path. The username is
/// denormalized from the author at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Author's username at the time of writing.
    pub username: String,

    /// Comment body, stored trimmed.
    pub text: String,

    /// When the comment was posted.
    pub created_at: DateTime<Utc>,
}

/// Input for creating an event.
///
/// Optional fields fall back to the product defaults in
/// [`crate::constants::event_defaults`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewEvent {
    /// When the event takes place.
    pub date: DateTime<Utc>,

    /// Display start time, e.g. `"18:30"`.
    pub time: String,

    /// Kind of meetup; defaults to `"pickleball"`.
    pub event_type: Option<String>,

    /// Whether anyone may join; defaults to `true`.
    pub is_public: Option<bool>,

    /// Participation fee; defaults to `0`.
    pub fees: Option<u32>,

    /// Indoor court flag; defaults to `false`.
    pub is_indoor: Option<bool>,

    /// Where the event takes place.
    pub address: String,

    /// Weather note; defaults to `"N/A"`.
    pub weather: Option<String>,
}

/// Field-level patch for event edits.
///
/// Only these fields are mutable. Membership lists, comments and the
/// creator can never be patched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventPatch {
    /// New date.
    pub date: Option<DateTime<Utc>>,
    /// New display start time.
    pub time: Option<String>,
    /// New event type.
    pub event_type: Option<String>,
    /// New visibility.
    pub is_public: Option<bool>,
    /// New fee.
    pub fees: Option<u32>,
    /// New indoor flag.
    pub is_indoor: Option<bool>,
    /// New address.
    pub address: Option<String>,
    /// New weather note.
    pub weather: Option<String>,
}

/// Event aggregate root.
///
/// Invariants upheld by the rule methods:
/// - the creator is always in `joined_players`
/// - `joined_players` and `invited_players` contain no duplicates
/// - private events only admit invited players (or the creator)
/// - `(username, text)` pairs in `comments` are unique
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier.
    pub id: EventId,

    /// When the event takes place.
    pub date: DateTime<Utc>,

    /// Display start time, e.g. `"18:30"`.
    pub time: String,

    /// Kind of meetup.
    pub event_type: String,

    /// Whether anyone may join without an invitation.
    pub is_public: bool,

    /// Participation fee.
    pub fees: u32,

    /// Indoor court flag.
    pub is_indoor: bool,

    /// Where the event takes place.
    pub address: String,

    /// Weather note.
    pub weather: String,

    /// Creator; immutable after creation.
    pub created_by: UserId,

    /// Players invited by the creator.
    pub invited_players: Vec<UserId>,

    /// Players who joined; the creator is always present.
    pub joined_players: Vec<UserId>,

    /// Embedded comments, append-only.
    pub comments: Vec<Comment>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last mutation.
    pub updated_at: DateTime<Utc>,

    /// Optimistic-concurrency counter, bumped on every persisted update.
    pub version: u64,
}

impl Event {
    /// Build a new aggregate from creator input.
    ///
    /// The creator is auto-added to `joined_players`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when `time` or `address` is blank.
    pub fn create(spec: NewEvent, created_by: UserId, now: DateTime<Utc>) -> Result<Self> {
        let time = spec.time.trim();
        if time.is_empty() {
            return Err(Error::InvalidInput {
                reason: "time is required".to_string(),
            });
        }
        let address = spec.address.trim();
        if address.is_empty() {
            return Err(Error::InvalidInput {
                reason: "address is required".to_string(),
            });
        }

        Ok(Self {
            id: EventId::new(),
            date: spec.date,
            time: time.to_string(),
            event_type: spec
                .event_type
                .unwrap_or_else(|| event_defaults::EVENT_TYPE.to_string()),
            is_public: spec.is_public.unwrap_or(true),
            fees: spec.fees.unwrap_or(event_defaults::FEES),
            is_indoor: spec.is_indoor.unwrap_or(false),
            address: address.to_string(),
            weather: spec
                .weather
                .unwrap_or_else(|| event_defaults::WEATHER.to_string()),
            created_by,
            invited_players: Vec::new(),
            joined_players: vec![created_by],
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    /// Whether `user` is the creator, a joiner, or an invitee.
    #[must_use]
    pub fn is_participant(&self, user: UserId) -> bool {
        self.created_by == user
            || self.joined_players.contains(&user)
            || self.invited_players.contains(&user)
    }

    /// Whether this event occupies the same slot as the given key.
    ///
    /// Two events by the same creator at the same date, type and address are
    /// considered duplicates.
    #[must_use]
    pub fn matches_slot(
        &self,
        date: DateTime<Utc>,
        event_type: &str,
        address: &str,
        created_by: UserId,
    ) -> bool {
        self.date == date
            && self.event_type == event_type
            && self.address == address
            && self.created_by == created_by
    }

    /// Add `user` to the joined players.
    ///
    /// # Errors
    ///
    /// - [`Error::Forbidden`] when the event is private and `user` is
    ///   neither invited nor the creator
    /// - [`Error::AlreadyJoined`] when `user` already joined
    pub fn join(&mut self, user: UserId, now: DateTime<Utc>) -> Result<()> {
        if !self.is_public && !self.invited_players.contains(&user) && user != self.created_by {
            return Err(Error::Forbidden {
                reason: "you are not invited to this event".to_string(),
            });
        }
        if self.joined_players.contains(&user) {
            return Err(Error::AlreadyJoined);
        }

        self.joined_players.push(user);
        self.updated_at = now;
        Ok(())
    }

    /// Remove `user` from the joined players.
    ///
    /// # Errors
    ///
    /// - [`Error::NotJoined`] when `user` never joined
    /// - [`Error::Forbidden`] when `user` is the creator; the creator stays
    ///   joined for the lifetime of the event and removes it with delete
    ///   instead
    pub fn leave(&mut self, user: UserId, now: DateTime<Utc>) -> Result<()> {
        let Some(index) = self.joined_players.iter().position(|&u| u == user) else {
            return Err(Error::NotJoined);
        };
        if user == self.created_by {
            return Err(Error::Forbidden {
                reason: "the creator cannot leave their own event".to_string(),
            });
        }

        self.joined_players.remove(index);
        self.updated_at = now;
        Ok(())
    }

    /// Add `invitee` to the invited players on behalf of `inviter`.
    ///
    /// # Errors
    ///
    /// - [`Error::Forbidden`] when `inviter` is not the creator
    /// - [`Error::AlreadyInvited`] when `invitee` is already invited
    pub fn invite(&mut self, inviter: UserId, invitee: UserId, now: DateTime<Utc>) -> Result<()> {
        if inviter != self.created_by {
            return Err(Error::Forbidden {
                reason: "only the creator can invite players".to_string(),
            });
        }
        if self.invited_players.contains(&invitee) {
            return Err(Error::AlreadyInvited);
        }

        self.invited_players.push(invitee);
        self.updated_at = now;
        Ok(())
    }

    /// Append a comment by `username`.
    ///
    /// The text is trimmed before the duplicate check and before storage.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] when the trimmed text is empty
    /// - [`Error::DuplicateComment`] when this user already posted the same
    ///   trimmed text on this event
    pub fn add_comment(&mut self, username: &str, text: &str, now: DateTime<Utc>) -> Result<()> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput {
                reason: "comment must not be empty".to_string(),
            });
        }
        let duplicate = self
            .comments
            .iter()
            .any(|c| c.username == username && c.text == trimmed);
        if duplicate {
            return Err(Error::DuplicateComment);
        }

        self.comments.push(Comment {
            username: username.to_string(),
            text: trimmed.to_string(),
            created_at: now,
        });
        self.updated_at = now;
        Ok(())
    }

    /// Apply a field-level patch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when a patched `time` or `address`
    /// is blank.
    pub fn apply_patch(&mut self, patch: EventPatch, now: DateTime<Utc>) -> Result<()> {
        if let Some(time) = &patch.time {
            if time.trim().is_empty() {
                return Err(Error::InvalidInput {
                    reason: "time must not be blank".to_string(),
                });
            }
        }
        if let Some(address) = &patch.address {
            if address.trim().is_empty() {
                return Err(Error::InvalidInput {
                    reason: "address must not be blank".to_string(),
                });
            }
        }

        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = patch.time {
            self.time = time.trim().to_string();
        }
        if let Some(event_type) = patch.event_type {
            self.event_type = event_type;
        }
        if let Some(is_public) = patch.is_public {
            self.is_public = is_public;
        }
        if let Some(fees) = patch.fees {
            self.fees = fees;
        }
        if let Some(is_indoor) = patch.is_indoor {
            self.is_indoor = is_indoor;
        }
        if let Some(address) = patch.address {
            self.address = address.trim().to_string();
        }
        if let Some(weather) = patch.weather {
            self.weather = weather;
        }

        self.updated_at = now;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Listing Queries
// ═══════════════════════════════════════════════════════════════════════

/// Which slice of the event collection a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListScope {
    /// Future events visible to the user, soonest first.
    Upcoming,
    /// Events the user created, soonest first.
    Mine,
    /// Events the user joined, soonest first.
    Joined,
    /// Past events the user created or joined, most recent first.
    History,
}

impl ListScope {
    /// Stable query-parameter name of this scope.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Mine => "mine",
            Self::Joined => "joined",
            Self::History => "history",
        }
    }

    /// Parse a query-parameter value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "upcoming" => Some(Self::Upcoming),
            "mine" => Some(Self::Mine),
            "joined" => Some(Self::Joined),
            "history" => Some(Self::History),
            _ => None,
        }
    }

    /// Whether this scope sorts descending by date.
    #[must_use]
    pub const fn is_descending(self) -> bool {
        matches!(self, Self::History)
    }
}

/// A listing request against the event store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventQuery {
    /// Which slice to return.
    pub scope: ListScope,
    /// Whose point of view the listing is for.
    pub user: UserId,
    /// The current instant, for past/future splits.
    pub now: DateTime<Utc>,
}

impl EventQuery {
    /// Whether `event` belongs in this listing.
    ///
    /// Store implementations translate this predicate into their native
    /// query language; the in-memory mock calls it directly, which keeps
    /// both on the same definition.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        match self.scope {
            ListScope::Upcoming => {
                event.date >= self.now && (event.is_public || event.is_participant(self.user))
            }
            ListScope::Mine => event.created_by == self.user,
            ListScope::Joined => event.joined_players.contains(&self.user),
            ListScope::History => {
                event.date < self.now
                    && (event.created_by == self.user
                        || event.joined_players.contains(&self.user))
            }
        }
    }
}
