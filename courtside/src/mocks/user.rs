//! Mock user repository for testing.

use crate::error::{Error, Result};
use crate::providers::UserRepository;
use crate::state::{User, UserId};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock user repository.
///
/// Uses in-memory storage. Lookups scan the map, which keeps the
/// case-insensitive email/username semantics in one obvious place.
#[derive(Debug, Clone)]
pub struct MockUserRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
}

impl MockUserRepository {
    /// Create a new mock user repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository for MockUserRepository {
    fn find_by_id(&self, id: UserId) -> impl Future<Output = Result<Option<User>>> + Send {
        let users = Arc::clone(&self.users);

        async move {
            Ok(users
                .lock()
                .map_err(|_| Error::InternalError)?
                .get(&id)
                .cloned())
        }
    }

    fn find_by_email(&self, email: &str) -> impl Future<Output = Result<Option<User>>> + Send {
        let users = Arc::clone(&self.users);
        let email = email.to_string();

        async move {
            Ok(users
                .lock()
                .map_err(|_| Error::InternalError)?
                .values()
                .find(|user| user.email.eq_ignore_ascii_case(&email))
                .cloned())
        }
    }

    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>>> + Send {
        let users = Arc::clone(&self.users);
        let username = username.to_string();

        async move {
            Ok(users
                .lock()
                .map_err(|_| Error::InternalError)?
                .values()
                .find(|user| user.username.eq_ignore_ascii_case(&username))
                .cloned())
        }
    }

    fn find_by_reset_digest(
        &self,
        digest: &str,
    ) -> impl Future<Output = Result<Option<User>>> + Send {
        let users = Arc::clone(&self.users);
        let digest = digest.to_string();

        async move {
            Ok(users
                .lock()
                .map_err(|_| Error::InternalError)?
                .values()
                .find(|user| user.reset_code_digest.as_deref() == Some(digest.as_str()))
                .cloned())
        }
    }

    fn insert(&self, user: &User) -> impl Future<Output = Result<()>> + Send {
        let users = Arc::clone(&self.users);
        let user = user.clone();

        async move {
            users
                .lock()
                .map_err(|_| Error::InternalError)?
                .insert(user.id, user);
            Ok(())
        }
    }

    fn update(&self, user: &User) -> impl Future<Output = Result<()>> + Send {
        let users = Arc::clone(&self.users);
        let user = user.clone();

        async move {
            let mut guard = users.lock().map_err(|_| Error::InternalError)?;
            if !guard.contains_key(&user.id) {
                return Err(Error::UserNotFound);
            }
            guard.insert(user.id, user);
            Ok(())
        }
    }

    fn delete(&self, id: UserId) -> impl Future<Output = Result<bool>> + Send {
        let users = Arc::clone(&self.users);

        async move {
            Ok(users
                .lock()
                .map_err(|_| Error::InternalError)?
                .remove(&id)
                .is_some())
        }
    }
}
