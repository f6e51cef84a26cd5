//! Bearer-token service trait.

use crate::error::Result;
use crate::state::UserId;
use serde::{Deserialize, Serialize};

/// Claims carried inside a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user.
    pub user_id: UserId,

    /// Username at issue time, for logging and denormalized writes.
    pub username: String,

    /// Whether the user may delete accounts other than their own.
    pub is_admin: bool,
}

/// Token issue/verify service.
///
/// Tokens are stateless: everything needed to verify one is in the token
/// and the service's signing key, so there is no token store and both
/// operations are synchronous.
pub trait TokenService: Send + Sync {
    /// Issue a signed token for `claims`, valid for `ttl_minutes`.
    ///
    /// # Errors
    ///
    /// Returns error if the claims cannot be serialized.
    fn issue(&self, claims: &Claims, ttl_minutes: i64) -> Result<String>;

    /// Verify a token and recover its claims.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidToken`] if the token is malformed,
    /// carries a bad signature, or has expired.
    fn verify(&self, token: &str) -> Result<Claims>;
}
