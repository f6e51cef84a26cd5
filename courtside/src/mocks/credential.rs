//! Mock password hasher for testing.

use crate::error::Result;
use crate::providers::PasswordHasher;
use std::future::Future;

/// Mock password hasher.
///
/// Stamps the plaintext instead of hashing it, so tests stay fast and a
/// stored digest is readable in assertions. Never use outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockPasswordHasher;

impl MockPasswordHasher {
    /// Create a new mock hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PasswordHasher for MockPasswordHasher {
    fn hash(&self, password: &str) -> impl Future<Output = Result<String>> + Send {
        let digest = format!("mock${password}");
        async move { Ok(digest) }
    }

    fn verify(&self, password: &str, digest: &str) -> impl Future<Output = Result<bool>> + Send {
        let matches = digest == format!("mock${password}");
        async move { Ok(matches) }
    }
}
