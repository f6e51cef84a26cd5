//! # Courtside
//!
//! Backend for a social pickleball scheduling app: players register, create
//! events, join or get invited to them, and comment on them. Deleting an
//! account cascades across the event collection so no event ever references
//! a player that no longer exists.
//!
//! ## Architecture
//!
//! The domain rules are pure methods on the [`state::Event`] aggregate; all
//! I/O goes through provider traits so the rules and services test at memory
//! speed against the in-crate mocks:
//!
//! ```text
//! HTTP (axum handlers)
//!   → services (load aggregate, apply rule, persist with version check)
//!     → providers (UserRepository, EventRepository, PasswordHasher,
//!                  TokenService, EmailProvider, Clock)
//! ```
//!
//! Event mutations are optimistic: each aggregate carries a version, the
//! store update is a compare-and-swap, and services re-read and re-apply the
//! rule on conflict. Two racing joins can never silently overwrite each
//! other.
//!
//! ## Example: joining an event
//!
//! ```rust,ignore
//! use courtside::{environment::AppEnvironment, services::MembershipService};
//!
//! let updated = env.membership.join(claims.user_id, event_id).await?;
//! assert!(updated.joined_players.contains(&claims.user_id));
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod providers;
pub mod router;
pub mod services;
pub mod state;
pub mod stores;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use environment::AppEnvironment;
pub use error::{Error, Result};
pub use state::{Comment, Event, EventId, User, UserId};
