//! One-line wiring of a fully mocked [`AppEnvironment`].

use super::{
    FixedClock, MockEmailProvider, MockEventRepository, MockPasswordHasher, MockTokenService,
    MockUserRepository,
};
use crate::environment::AppEnvironment;
use std::sync::Arc;

/// [`AppEnvironment`] instantiated with every mock provider.
pub type MockEnvironment = AppEnvironment<
    MockUserRepository,
    MockEventRepository,
    MockPasswordHasher,
    MockTokenService,
    MockEmailProvider,
    FixedClock,
>;

/// A mocked environment plus direct handles on its providers.
///
/// The handles share state with the environment, so tests can seed users
/// or inspect recorded email without going through the HTTP surface.
pub struct TestEnvironment {
    /// The wired environment, ready to hand to a router.
    pub env: MockEnvironment,
    /// Shared user store.
    pub users: Arc<MockUserRepository>,
    /// Shared event store.
    pub events: Arc<MockEventRepository>,
    /// Shared token service.
    pub tokens: Arc<MockTokenService>,
    /// Outbox of recorded email.
    pub email: Arc<MockEmailProvider>,
    /// Manually advanced clock.
    pub clock: Arc<FixedClock>,
}

impl TestEnvironment {
    /// Wire a fresh environment with empty stores.
    #[must_use]
    pub fn new() -> Self {
        let users = Arc::new(MockUserRepository::new());
        let events = Arc::new(MockEventRepository::new());
        let tokens = Arc::new(MockTokenService::new());
        let email = Arc::new(MockEmailProvider::new());
        let clock = Arc::new(FixedClock::default());

        let env = AppEnvironment::new(
            Arc::clone(&users),
            Arc::clone(&events),
            Arc::new(MockPasswordHasher::new()),
            Arc::clone(&tokens),
            Arc::clone(&email),
            Arc::clone(&clock),
        );

        Self {
            env,
            users,
            events,
            tokens,
            email,
            clock,
        }
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}
