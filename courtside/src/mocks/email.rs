//! Mock email provider for testing.

use crate::error::{Error, Result};
use crate::providers::EmailProvider;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::{Arc, Mutex};

/// A message the mock provider "delivered".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentEmail {
    /// An event invitation.
    Invitation {
        /// Recipient address.
        to: String,
        /// Who sent the invitation.
        inviter_username: String,
    },

    /// A password-reset code.
    PasswordReset {
        /// Recipient address.
        to: String,
        /// The plaintext code, as the user would receive it.
        code: String,
    },
}

/// Mock email provider.
///
/// Records deliveries instead of sending them; tests read them back with
/// [`MockEmailProvider::sent`].
#[derive(Debug, Clone)]
pub struct MockEmailProvider {
    /// Whether to simulate success or failure.
    should_succeed: bool,
    sent: Arc<Mutex<Vec<SentEmail>>>,
}

impl MockEmailProvider {
    /// Create a mock provider that delivers successfully.
    #[must_use]
    pub fn new() -> Self {
        Self {
            should_succeed: true,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider whose every send fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            should_succeed: false,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Everything delivered so far, in order.
    ///
    /// # Errors
    ///
    /// Returns error if the internal lock is poisoned.
    pub fn sent(&self) -> Result<Vec<SentEmail>> {
        Ok(self
            .sent
            .lock()
            .map_err(|_| Error::InternalError)?
            .clone())
    }

    fn record(&self, email: SentEmail) -> Result<()> {
        if !self.should_succeed {
            return Err(Error::EmailError("mock delivery failure".to_string()));
        }
        self.sent
            .lock()
            .map_err(|_| Error::InternalError)?
            .push(email);
        Ok(())
    }
}

impl Default for MockEmailProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailProvider for MockEmailProvider {
    fn send_invitation(
        &self,
        to: &str,
        inviter_username: &str,
        _event_address: &str,
        _event_date: DateTime<Utc>,
    ) -> impl Future<Output = Result<()>> + Send {
        let result = self.record(SentEmail::Invitation {
            to: to.to_string(),
            inviter_username: inviter_username.to_string(),
        });
        async move { result }
    }

    fn send_password_reset(
        &self,
        to: &str,
        code: &str,
        _expires_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<()>> + Send {
        let result = self.record(SentEmail::PasswordReset {
            to: to.to_string(),
            code: code.to_string(),
        });
        async move { result }
    }
}
