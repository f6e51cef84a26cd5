//! User repository trait.

use crate::error::Result;
use crate::state::{User, UserId};

/// User repository.
///
/// This trait abstracts over user persistence (MongoDB in production, an
/// in-memory map in tests). Email and username lookups are
/// case-insensitive; implementations fold case on both write and read.
pub trait UserRepository: Send + Sync {
    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns error if the storage query fails.
    fn find_by_id(&self, id: UserId) -> impl std::future::Future<Output = Result<Option<User>>> + Send;

    /// Get a user by email, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns error if the storage query fails.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>>> + Send;

    /// Get a user by username, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns error if the storage query fails.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>>> + Send;

    /// Get the user holding an outstanding reset-code digest.
    ///
    /// The digest is the stored hash of the code, never the code itself.
    /// Expiry is checked by the caller against its clock.
    ///
    /// # Errors
    ///
    /// Returns error if the storage query fails.
    fn find_by_reset_digest(
        &self,
        digest: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>>> + Send;

    /// Insert a new user.
    ///
    /// Uniqueness of email and username is checked by the caller before
    /// insertion; implementations may additionally enforce it with indexes.
    ///
    /// # Errors
    ///
    /// Returns error if the storage query fails.
    fn insert(&self, user: &User) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Replace an existing user record.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The storage query fails
    /// - No record exists for `user.id` → [`crate::Error::UserNotFound`]
    fn update(&self, user: &User) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Delete a user by ID.
    ///
    /// # Returns
    ///
    /// `true` if a record was removed, `false` if none existed.
    ///
    /// # Errors
    ///
    /// Returns error if the storage query fails.
    fn delete(&self, id: UserId) -> impl std::future::Future<Output = Result<bool>> + Send;
}
