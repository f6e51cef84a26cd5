//! Email provider trait.

use crate::error::Result;
use chrono::{DateTime, Utc};

/// Email provider.
///
/// This trait abstracts over email delivery (SMTP in production, a
/// recording mock in tests). Callers treat delivery as fire-and-forget:
/// a failed send is logged, never rolled back into the triggering
/// operation.
pub trait EmailProvider: Send + Sync {
    /// Send an event invitation.
    ///
    /// # Arguments
    ///
    /// - `to`: Recipient email address
    /// - `inviter_username`: Who sent the invitation
    /// - `event_address`: Where the event takes place
    /// - `event_date`: When the event takes place
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The transport fails
    /// - The provider rejects the message
    fn send_invitation(
        &self,
        to: &str,
        inviter_username: &str,
        event_address: &str,
        event_date: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Send a password-reset code.
    ///
    /// # Arguments
    ///
    /// - `to`: Recipient email address
    /// - `code`: Plaintext reset code (only ever held in memory and in
    ///   this message; storage keeps a digest)
    /// - `expires_at`: When the code stops being honored
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The transport fails
    /// - The provider rejects the message
    fn send_password_reset(
        &self,
        to: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
