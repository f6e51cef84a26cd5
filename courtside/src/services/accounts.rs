//! Account service: registration, login and the password-reset flow.

use crate::constants::auth::{RESET_CODE_TTL_MINUTES, TOKEN_TTL_MINUTES};
use crate::error::{Error, Result};
use crate::providers::{
    Claims, Clock, EmailProvider, PasswordHasher, TokenService, UserRepository,
};
use crate::state::User;
use crate::utils;
use serde::Serialize;
use std::sync::Arc;

/// Successful registration/login payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    /// The account's id.
    pub user_id: crate::state::UserId,

    /// The account's username.
    pub username: String,

    /// Fresh bearer token.
    pub token: String,
}

/// Account operations.
///
/// Login and the reset flow are deliberately uninformative about which
/// accounts exist: login failures collapse into one error, and a reset
/// request reports success whether or not the email matched anything.
pub struct AccountService<U, P, T, M, C> {
    users: Arc<U>,
    hasher: Arc<P>,
    tokens: Arc<T>,
    email: Arc<M>,
    clock: Arc<C>,
}

impl<U, P, T, M, C> AccountService<U, P, T, M, C>
where
    U: UserRepository,
    P: PasswordHasher,
    T: TokenService,
    M: EmailProvider,
    C: Clock,
{
    /// Create a new account service.
    pub fn new(users: Arc<U>, hasher: Arc<P>, tokens: Arc<T>, email: Arc<M>, clock: Arc<C>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            email,
            clock,
        }
    }

    /// Register a new account and log it in.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] for a short username/password or malformed
    ///   email
    /// - [`Error::IdentityTaken`] when the email or username is already
    ///   registered (case-insensitive)
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser> {
        let username = utils::validate_username(username)?;
        if !utils::is_valid_email(email) {
            return Err(Error::InvalidInput {
                reason: "email is not valid".to_string(),
            });
        }
        utils::validate_password(password)?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(Error::IdentityTaken { field: "email" });
        }
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(Error::IdentityTaken { field: "username" });
        }

        let digest = self.hasher.hash(password).await?;
        let user = User::new(username, email.to_string(), digest, self.clock.now());
        self.users.insert(&user).await?;

        tracing::info!(user_id = %user.id, "account registered");
        self.issue_session(&user)
    }

    /// Log an account in by email and password.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredentials`] for an unknown email or a
    /// password that does not verify; the two cases are indistinguishable
    /// on purpose.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(Error::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_digest).await? {
            return Err(Error::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "login succeeded");
        self.issue_session(&user)
    }

    /// Start a password reset for `email`.
    ///
    /// Always reports success. When the account exists, a fresh random code
    /// is generated, its digest and expiry stored on the user, and the
    /// plaintext code emailed; delivery failure is logged, not surfaced.
    ///
    /// # Errors
    ///
    /// Returns error only when storage itself fails.
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        let Some(mut user) = self.users.find_by_email(email).await? else {
            tracing::debug!("password reset requested for unknown email");
            return Ok(());
        };

        let code = utils::generate_reset_code();
        let expires_at = self.clock.now() + chrono::Duration::minutes(RESET_CODE_TTL_MINUTES);
        user.reset_code_digest = Some(utils::reset_code_digest(&code));
        user.reset_code_expires_at = Some(expires_at);
        self.users.update(&user).await?;

        if let Err(e) = self
            .email
            .send_password_reset(&user.email, &code, expires_at)
            .await
        {
            tracing::error!(user_id = %user.id, error = %e, "password reset email failed");
        } else {
            tracing::info!(user_id = %user.id, "password reset code issued");
        }
        Ok(())
    }

    /// Complete a password reset with the emailed code.
    ///
    /// The account is found by the digest of the submitted code; the code
    /// itself was never stored.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] for a short replacement password
    /// - [`Error::InvalidResetCode`] when no account holds this code's
    ///   digest or the code has expired
    pub async fn confirm_password_reset(&self, code: &str, new_password: &str) -> Result<()> {
        utils::validate_password(new_password)?;

        let digest = utils::reset_code_digest(code);
        let Some(mut user) = self.users.find_by_reset_digest(&digest).await? else {
            return Err(Error::InvalidResetCode);
        };

        let expired = user
            .reset_code_expires_at
            .is_none_or(|expiry| self.clock.now() >= expiry);
        if expired {
            return Err(Error::InvalidResetCode);
        }

        user.password_digest = self.hasher.hash(new_password).await?;
        user.reset_code_digest = None;
        user.reset_code_expires_at = None;
        self.users.update(&user).await?;

        tracing::info!(user_id = %user.id, "password reset completed");
        Ok(())
    }

    fn issue_session(&self, user: &User) -> Result<AuthenticatedUser> {
        let claims = Claims {
            user_id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
        };
        let token = self.tokens.issue(&claims, TOKEN_TTL_MINUTES)?;

        Ok(AuthenticatedUser {
            user_id: user.id,
            username: user.username.clone(),
            token,
        })
    }
}

impl<U, P, T, M, C> Clone for AccountService<U, P, T, M, C> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            hasher: Arc::clone(&self.hasher),
            tokens: Arc::clone(&self.tokens),
            email: Arc::clone(&self.email),
            clock: Arc::clone(&self.clock),
        }
    }
}
