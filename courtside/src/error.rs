//! Error types for Courtside domain operations.

use thiserror::Error;

/// Result type alias for domain operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the scheduling domain.
///
/// Every service operation returns one of these kinds; the HTTP layer maps
/// them onto statuses and stable client codes. Messages are user-safe and
/// never carry internal identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // ═══════════════════════════════════════════════════════════
    // Validation Errors
    // ═══════════════════════════════════════════════════════════

    /// Input failed validation (missing field, malformed date, short password).
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Lookup Errors
    // ═══════════════════════════════════════════════════════════

    /// Event does not exist.
    #[error("Event not found")]
    EventNotFound,

    /// User does not exist.
    #[error("User not found")]
    UserNotFound,

    // ═══════════════════════════════════════════════════════════
    // Authorization Errors
    // ═══════════════════════════════════════════════════════════

    /// Acting user is not allowed to perform the operation.
    #[error("Not permitted: {reason}")]
    Forbidden {
        /// Why the action is not permitted
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════
    // State Conflicts
    // ═══════════════════════════════════════════════════════════

    /// An event with the same date, type, address and creator already exists.
    #[error("An identical event already exists")]
    DuplicateEvent,

    /// The same user already posted the same comment on this event.
    #[error("Duplicate comment not allowed")]
    DuplicateComment,

    /// User is already in the joined-players list.
    #[error("You have already joined this event")]
    AlreadyJoined,

    /// User is already in the invited-players list.
    #[error("Player is already invited to this event")]
    AlreadyInvited,

    /// User is not in the joined-players list.
    #[error("You have not joined this event")]
    NotJoined,

    /// Registration identity field is already in use.
    #[error("{field} is already taken")]
    IdentityTaken {
        /// Which unique field collided (`email` or `username`)
        field: &'static str,
    },

    // ═══════════════════════════════════════════════════════════
    // Authentication Errors
    // ═══════════════════════════════════════════════════════════

    /// Login failed; deliberately does not say which part was wrong.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Bearer token failed verification or has expired.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Password-reset code is unknown or past its expiry.
    #[error("Invalid or expired reset code")]
    InvalidResetCode,

    // ═══════════════════════════════════════════════════════════
    // Dependency Failures
    // ═══════════════════════════════════════════════════════════

    /// Document store operation failed.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Outbound email could not be delivered.
    #[error("Email delivery failed: {0}")]
    EmailError(String),

    /// Aggregate changed underneath a compare-and-swap update.
    #[error("Concurrent update conflict")]
    VersionConflict,

    /// Internal error (never exposes detail to users).
    #[error("Internal error")]
    InternalError,
}

impl Error {
    /// Returns `true` if this error was caused by the caller (4xx family)
    /// rather than by a failing dependency.
    ///
    /// # Examples
    ///
    /// ```
    /// # use courtside::Error;
    /// assert!(Error::AlreadyJoined.is_user_error());
    /// assert!(!Error::StorageError("down".into()).is_user_error());
    /// ```
    pub const fn is_user_error(&self) -> bool {
        !matches!(
            self,
            Self::StorageError(_)
                | Self::EmailError(_)
                | Self::VersionConflict
                | Self::InternalError
        )
    }

    /// Returns `true` for state conflicts that map to HTTP 409.
    ///
    /// # Examples
    ///
    /// ```
    /// # use courtside::Error;
    /// assert!(Error::DuplicateComment.is_conflict());
    /// assert!(!Error::EventNotFound.is_conflict());
    /// ```
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateEvent
                | Self::DuplicateComment
                | Self::AlreadyJoined
                | Self::AlreadyInvited
                | Self::NotJoined
                | Self::IdentityTaken { .. }
        )
    }

    /// Returns `true` for authentication failures that map to HTTP 401.
    pub const fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::InvalidToken | Self::InvalidResetCode
        )
    }
}
