//! HTTP API handlers, organized by resource:
//! - Accounts: registration, login, password reset, account deletion
//! - Events: CRUD operations and scoped listings
//! - Membership: joining, leaving and inviting
//! - Comments: appending comments to events
//!
//! Handlers stay thin: parse the DTO, call the service, convert the domain
//! [`Error`] into an [`AppError`] response. The conversion below is the
//! single place where domain error kinds meet HTTP statuses and stable
//! client-facing codes.

pub mod accounts;
pub mod comments;
pub mod events;
pub mod membership;

pub use accounts::{
    confirm_password_reset, delete_user, login, register, request_password_reset,
};
pub use comments::add_comment;
pub use events::{create_event, delete_event, get_event, list_events, update_event};
pub use membership::{invite_player, join_event, leave_event};

use crate::error::Error;
use axum::http::StatusCode;
use courtside_web::AppError;

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput { reason } => {
                Self::bad_request(reason).with_code("INVALID_INPUT")
            }
            Error::EventNotFound => Self::new(
                StatusCode::NOT_FOUND,
                "Event not found".to_string(),
                "EVENT_NOT_FOUND".to_string(),
            ),
            Error::UserNotFound => Self::new(
                StatusCode::NOT_FOUND,
                "User not found".to_string(),
                "USER_NOT_FOUND".to_string(),
            ),
            Error::Forbidden { reason } => Self::forbidden(reason),
            Error::DuplicateEvent => {
                Self::conflict("An identical event already exists").with_code("DUPLICATE_EVENT")
            }
            Error::DuplicateComment => {
                Self::conflict("Duplicate comment not allowed").with_code("DUPLICATE_COMMENT")
            }
            Error::AlreadyJoined => {
                Self::conflict("You have already joined this event").with_code("ALREADY_JOINED")
            }
            Error::AlreadyInvited => Self::conflict("Player is already invited to this event")
                .with_code("ALREADY_INVITED"),
            Error::NotJoined => {
                Self::conflict("You have not joined this event").with_code("NOT_JOINED")
            }
            Error::IdentityTaken { field } => {
                Self::conflict(format!("{field} is already taken")).with_code("IDENTITY_TAKEN")
            }
            Error::InvalidCredentials => {
                Self::unauthorized("Invalid email or password").with_code("INVALID_CREDENTIALS")
            }
            Error::InvalidToken => {
                Self::unauthorized("Invalid or expired token").with_code("INVALID_TOKEN")
            }
            Error::InvalidResetCode => {
                Self::unauthorized("Invalid or expired reset code").with_code("INVALID_RESET_CODE")
            }
            Error::VersionConflict => {
                Self::unavailable("The event was updated concurrently, please retry")
                    .with_code("VERSION_CONFLICT")
            }
            // Dependency failures keep their detail in the log, not the body.
            other @ (Error::StorageError(_) | Error::EmailError(_) | Error::InternalError) => {
                Self::internal("Internal server error").with_source(anyhow::Error::new(other))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapped(err: Error) -> (StatusCode, String) {
        let app_err = AppError::from(err);
        (app_err.status(), app_err.code().to_string())
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let (status, code) = mapped(Error::InvalidInput {
            reason: "address must not be empty".into(),
        });
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "INVALID_INPUT");
    }

    #[test]
    fn lookups_map_to_not_found() {
        assert_eq!(
            mapped(Error::EventNotFound),
            (StatusCode::NOT_FOUND, "EVENT_NOT_FOUND".into())
        );
        assert_eq!(
            mapped(Error::UserNotFound),
            (StatusCode::NOT_FOUND, "USER_NOT_FOUND".into())
        );
    }

    #[test]
    fn conflicts_map_to_409_with_distinct_codes() {
        assert_eq!(
            mapped(Error::AlreadyJoined),
            (StatusCode::CONFLICT, "ALREADY_JOINED".into())
        );
        assert_eq!(
            mapped(Error::DuplicateComment),
            (StatusCode::CONFLICT, "DUPLICATE_COMMENT".into())
        );
        assert_eq!(
            mapped(Error::IdentityTaken { field: "email" }),
            (StatusCode::CONFLICT, "IDENTITY_TAKEN".into())
        );
    }

    #[test]
    fn auth_failures_map_to_unauthorized() {
        assert_eq!(
            mapped(Error::InvalidCredentials),
            (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS".into())
        );
        assert_eq!(
            mapped(Error::InvalidResetCode),
            (StatusCode::UNAUTHORIZED, "INVALID_RESET_CODE".into())
        );
    }

    #[test]
    fn dependency_failures_hide_detail() {
        let app_err = AppError::from(Error::StorageError("mongo timed out at 10.0.0.3".into()));
        assert_eq!(app_err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!app_err.message().contains("10.0.0.3"));
    }

    #[test]
    fn version_conflict_asks_for_retry() {
        let (status, code) = mapped(Error::VersionConflict);
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "VERSION_CONFLICT");
    }
}
