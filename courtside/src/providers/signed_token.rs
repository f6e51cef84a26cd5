//! HMAC-signed bearer token implementation.

use crate::error::{Error, Result};
use crate::providers::{Claims, Clock, TokenService};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Duration;
use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// What actually gets signed: the claims plus an expiry instant.
#[derive(Debug, Serialize, Deserialize)]
struct TokenPayload {
    user_id: crate::state::UserId,
    username: String,
    is_admin: bool,
    /// Expiry as epoch seconds; the token is valid strictly before this.
    exp: i64,
}

/// Stateless HMAC-SHA256 token service.
///
/// A token is `base64url(payload_json) + "." + base64url(tag)` where the
/// tag authenticates the encoded payload bytes. Nothing is stored server
/// side; revocation before expiry is out of scope, which the short TTL
/// accounts for.
#[derive(Clone)]
pub struct SignedTokenService<C> {
    key: Vec<u8>,
    clock: C,
}

impl<C: Clock> SignedTokenService<C> {
    /// Create a token service from a signing secret.
    pub fn new(secret: &[u8], clock: C) -> Self {
        Self {
            key: secret.to_vec(),
            clock,
        }
    }

    fn mac(&self) -> Result<HmacSha256> {
        // HMAC accepts keys of any length, so this only fails on an
        // implementation bug.
        HmacSha256::new_from_slice(&self.key).map_err(|_| Error::InternalError)
    }
}

impl<C: Clock> TokenService for SignedTokenService<C> {
    fn issue(&self, claims: &Claims, ttl_minutes: i64) -> Result<String> {
        let expires_at = self.clock.now() + Duration::minutes(ttl_minutes);
        let payload = TokenPayload {
            user_id: claims.user_id,
            username: claims.username.clone(),
            is_admin: claims.is_admin,
            exp: expires_at.timestamp(),
        };

        let json = serde_json::to_vec(&payload).map_err(|_| Error::InternalError)?;
        let encoded = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac()?;
        mac.update(encoded.as_bytes());
        let tag = mac.finalize().into_bytes();

        Ok(format!("{encoded}.{}", URL_SAFE_NO_PAD.encode(tag)))
    }

    fn verify(&self, token: &str) -> Result<Claims> {
        let (encoded, tag) = token.split_once('.').ok_or(Error::InvalidToken)?;

        let given_tag = URL_SAFE_NO_PAD
            .decode(tag)
            .map_err(|_| Error::InvalidToken)?;
        let mut mac = self.mac()?;
        mac.update(encoded.as_bytes());
        let expected_tag = mac.finalize().into_bytes();
        if !constant_time_eq(&expected_tag, &given_tag) {
            return Err(Error::InvalidToken);
        }

        // Signature checks out, so the payload is ours; decode it.
        let json = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| Error::InvalidToken)?;
        let payload: TokenPayload =
            serde_json::from_slice(&json).map_err(|_| Error::InvalidToken)?;

        if self.clock.now().timestamp() >= payload.exp {
            return Err(Error::InvalidToken);
        }

        Ok(Claims {
            user_id: payload.user_id,
            username: payload.username,
            is_admin: payload.is_admin,
        })
    }
}
