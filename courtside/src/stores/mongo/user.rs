//! MongoDB user store.

use super::{from_millis, parse_uuid, to_millis};
use crate::error::{Error, Result};
use crate::providers::UserRepository;
use crate::state::{User, UserId};
use mongodb::{Collection, Database, IndexModel, bson::doc, options::IndexOptions};
use serde::{Deserialize, Serialize};

/// Stored shape of a [`User`].
///
/// Lowercased copies of the identity fields back the unique indexes, making
/// uniqueness case-insensitive without collation configuration.
#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: String,
    username: String,
    username_lower: String,
    email: String,
    email_lower: String,
    password_digest: String,
    reset_code_digest: Option<String>,
    reset_code_expires_at: Option<i64>,
    is_admin: bool,
    created_at: i64,
}

impl UserDocument {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id.0.to_string(),
            username: user.username.clone(),
            username_lower: user.username.to_lowercase(),
            email: user.email.clone(),
            email_lower: user.email.to_lowercase(),
            password_digest: user.password_digest.clone(),
            reset_code_digest: user.reset_code_digest.clone(),
            reset_code_expires_at: user.reset_code_expires_at.map(to_millis),
            is_admin: user.is_admin,
            created_at: to_millis(user.created_at),
        }
    }

    fn into_user(self) -> Result<User> {
        Ok(User {
            id: UserId(parse_uuid(&self.id)?),
            username: self.username,
            email: self.email,
            password_digest: self.password_digest,
            reset_code_digest: self.reset_code_digest,
            reset_code_expires_at: self.reset_code_expires_at.map(from_millis).transpose()?,
            is_admin: self.is_admin,
            created_at: from_millis(self.created_at)?,
        })
    }
}

/// MongoDB-backed implementation of [`UserRepository`].
#[derive(Clone)]
pub struct MongoUserStore {
    collection: Collection<UserDocument>,
}

impl MongoUserStore {
    /// Collection name within the database.
    pub const COLLECTION: &'static str = "users";

    /// Create a store over the given database.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(Self::COLLECTION),
        }
    }

    /// Create the identity and reset-code indexes.
    ///
    /// Idempotent; called once at startup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageError`] if index creation fails.
    pub async fn ensure_indexes(&self) -> Result<()> {
        self.collection
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email_lower": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await?;

        self.collection
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "username_lower": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await?;

        // Sparse: most users have no outstanding reset code.
        self.collection
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "reset_code_digest": 1 })
                    .options(IndexOptions::builder().sparse(true).build())
                    .build(),
            )
            .await?;

        Ok(())
    }

    async fn find_one(&self, filter: mongodb::bson::Document) -> Result<Option<User>> {
        self.collection
            .find_one(filter)
            .await?
            .map(UserDocument::into_user)
            .transpose()
    }
}

impl UserRepository for MongoUserStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        self.find_one(doc! { "_id": id.0.to_string() }).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_one(doc! { "email_lower": email.to_lowercase() })
            .await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.find_one(doc! { "username_lower": username.to_lowercase() })
            .await
    }

    async fn find_by_reset_digest(&self, digest: &str) -> Result<Option<User>> {
        self.find_one(doc! { "reset_code_digest": digest }).await
    }

    async fn insert(&self, user: &User) -> Result<()> {
        self.collection.insert_one(UserDocument::from_user(user)).await?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<()> {
        let result = self
            .collection
            .replace_one(
                doc! { "_id": user.id.0.to_string() },
                UserDocument::from_user(user),
            )
            .await?;

        if result.matched_count == 0 {
            return Err(Error::UserNotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.0.to_string() })
            .await?;

        Ok(result.deleted_count > 0)
    }
}
