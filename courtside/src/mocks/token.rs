//! Mock token service for testing.

use crate::error::{Error, Result};
use crate::providers::{Claims, TokenService};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock token service.
///
/// Issues opaque random tokens and remembers their claims in memory. TTLs
/// are ignored; use [`crate::providers::SignedTokenService`] with a
/// [`crate::mocks::FixedClock`] to exercise expiry.
#[derive(Debug, Clone)]
pub struct MockTokenService {
    issued: Arc<Mutex<HashMap<String, Claims>>>,
}

impl MockTokenService {
    /// Create a new mock token service.
    #[must_use]
    pub fn new() -> Self {
        Self {
            issued: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for MockTokenService {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenService for MockTokenService {
    fn issue(&self, claims: &Claims, _ttl_minutes: i64) -> Result<String> {
        let token = uuid::Uuid::new_v4().to_string();
        self.issued
            .lock()
            .map_err(|_| Error::InternalError)?
            .insert(token.clone(), claims.clone());
        Ok(token)
    }

    fn verify(&self, token: &str) -> Result<Claims> {
        self.issued
            .lock()
            .map_err(|_| Error::InternalError)?
            .get(token)
            .cloned()
            .ok_or(Error::InvalidToken)
    }
}
