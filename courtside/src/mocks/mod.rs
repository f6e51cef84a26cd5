//! Mock provider implementations for testing.
//!
//! This module provides simple, in-memory implementations of all provider
//! traits for use in unit and integration tests. They are deterministic:
//! the clock only moves when told to, the hasher is a cheap reversible
//! stamp, and the email provider records instead of sending.

pub mod clock;
pub mod credential;
pub mod email;
pub mod event;
pub mod harness;
pub mod token;
pub mod user;

pub use clock::FixedClock;
pub use credential::MockPasswordHasher;
pub use email::{MockEmailProvider, SentEmail};
pub use event::MockEventRepository;
pub use harness::{MockEnvironment, TestEnvironment};
pub use token::MockTokenService;
pub use user::MockUserRepository;
