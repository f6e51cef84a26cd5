//! Provider traits for every external dependency.
//!
//! Services depend on these traits, never on concrete stores or transports.
//! Tests swap in the in-memory mocks from [`crate::mocks`]; the binary wires
//! up MongoDB-backed repositories, Argon2 hashing, HMAC tokens and SMTP
//! delivery.
//!
//! Repository traits return `Option` for lookups; classifying a miss as
//! [`crate::Error::EventNotFound`] or [`crate::Error::UserNotFound`] is the
//! caller's job, because the right answer depends on the operation (an
//! unknown invitee is a different failure than an unknown event).

pub mod clock;
pub mod credential;
pub mod email;
pub mod event;
pub mod password;
pub mod signed_token;
pub mod smtp_email;
pub mod token;
pub mod user;

pub use clock::{Clock, SystemClock};
pub use credential::PasswordHasher;
pub use email::EmailProvider;
pub use event::EventRepository;
pub use password::Argon2PasswordHasher;
pub use signed_token::SignedTokenService;
pub use smtp_email::{SmtpConfig, SmtpEmailProvider};
pub use token::{Claims, TokenService};
pub use user::UserRepository;
