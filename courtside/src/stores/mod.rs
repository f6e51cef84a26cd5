//! Production storage backends.
//!
//! The MongoDB stores live behind the `mongodb` feature so the domain crate
//! and its tests build without a database driver. The in-crate mocks under
//! [`crate::mocks`] implement the same repository traits for tests.

#[cfg(feature = "mongodb")]
pub mod mongo;

#[cfg(feature = "mongodb")]
pub use mongo::{MongoEventStore, MongoUserStore};
