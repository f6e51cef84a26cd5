//! Password hashing trait.

use crate::error::Result;

/// Password hashing service.
///
/// Hashing is deliberately slow, so both operations are async; the
/// production implementation runs the work on a blocking thread.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a storable digest.
    ///
    /// # Errors
    ///
    /// Returns error if the hashing backend fails.
    fn hash(&self, password: &str) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Verify a plaintext password against a stored digest.
    ///
    /// A wrong password is `Ok(false)`, not an error; errors are reserved
    /// for malformed digests and backend failures.
    ///
    /// # Errors
    ///
    /// Returns error if the digest cannot be parsed or the backend fails.
    fn verify(
        &self,
        password: &str,
        digest: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;
}
