//! Validation and small crypto helpers shared across services.

use crate::constants::auth::{MIN_PASSWORD_LEN, MIN_USERNAME_LEN, RESET_CODE_BYTES};
use crate::error::{Error, Result};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Validate email address format.
///
/// Lightweight RFC 5322 subset:
/// - exactly one `@` with non-empty local and domain parts
/// - dotted domain with no empty labels
/// - total length between 3 and 255 characters
///
/// # Examples
///
/// ```
/// use courtside::utils::is_valid_email;
///
/// assert!(is_valid_email("player@example.com"));
/// assert!(is_valid_email("player+league@club.example.com"));
/// assert!(!is_valid_email("no-at-sign"));
/// assert!(!is_valid_email("player@"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > 255 {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    if !domain.contains('.') {
        return false;
    }

    let valid_local = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '_');
    let valid_domain = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-');

    if !local.chars().all(valid_local) || !domain.chars().all(valid_domain) {
        return false;
    }

    // No empty labels between dots
    domain.split('.').all(|label| !label.is_empty())
}

/// Validate a username, returning its trimmed form.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when the trimmed username is shorter than
/// the minimum length.
pub fn validate_username(username: &str) -> Result<String> {
    let trimmed = username.trim();
    if trimmed.chars().count() < MIN_USERNAME_LEN {
        return Err(Error::InvalidInput {
            reason: format!("username must be at least {MIN_USERNAME_LEN} characters"),
        });
    }
    Ok(trimmed.to_string())
}

/// Validate password strength.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when the password is shorter than the
/// minimum length.
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::InvalidInput {
            reason: format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        });
    }
    Ok(())
}

/// Generate a random password-reset code (base64url, no padding).
#[must_use]
pub fn generate_reset_code() -> String {
    let mut bytes = [0u8; RESET_CODE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Digest of a reset code as stored on the user record.
///
/// Only the digest is ever persisted; the code itself goes out by email and
/// is compared by hashing the submitted value.
#[must_use]
pub fn reset_code_digest(code: &str) -> String {
    let digest = Sha256::digest(code.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_email_shapes() {
        assert!(is_valid_email("player@example.com"));
        assert!(is_valid_email("player.name@example.com"));
        assert!(is_valid_email("player+tag@example.com"));
        assert!(is_valid_email("p_n@courts.example.co.uk"));
        assert!(is_valid_email("a@b.c"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("player@"));
        assert!(!is_valid_email("player@@example.com"));
        assert!(!is_valid_email("player@.com"));
        assert!(!is_valid_email("player@example."));
        assert!(!is_valid_email("player@example..com"));
        assert!(!is_valid_email("a@b")); // no dot in domain
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(!is_valid_email(&long));
    }

    #[test]
    fn username_is_trimmed_and_length_checked() {
        assert_eq!(validate_username("  marta  ").as_deref(), Ok("marta"));
        assert!(validate_username("ab").is_err());
        assert!(validate_username("  a  ").is_err());
        assert!(validate_username("abc").is_ok());
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn reset_codes_are_unique_and_digestable() {
        let a = generate_reset_code();
        let b = generate_reset_code();
        assert_ne!(a, b);
        assert!(a.len() >= 40); // 32 bytes base64url

        let d1 = reset_code_digest(&a);
        let d2 = reset_code_digest(&a);
        assert_eq!(d1, d2);
        assert_ne!(d1, reset_code_digest(&b));
        assert_ne!(d1, a); // digest never equals the code
    }
}
