//! Authentication extractors for the HTTP API.
//!
//! Provides Axum extractors for:
//! - Bearer token extraction from the Authorization header
//! - Claims verification (turns a token into an [`AuthUser`])
//!
//! # Usage
//!
//! ```rust,ignore
//! use courtside::middleware::AuthUser;
//!
//! // Require authentication
//! async fn my_events(
//!     auth: AuthUser,
//! ) -> Result<Json<EventListResponse>, AppError> {
//!     // auth.user_id is guaranteed to come from a valid token
//!     Ok(Json(list_for(auth.user_id).await?))
//! }
//! ```

use crate::environment::AppEnvironment;
use crate::providers::{
    Clock, EmailProvider, EventRepository, PasswordHasher, TokenService, UserRepository,
};
use crate::state::UserId;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use courtside_web::AppError;

/// Bearer token extracted from the `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::unauthorized(
                "Invalid authorization format. Expected 'Bearer <token>'",
            ));
        }

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid bearer token format"))?
            .to_string();

        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer token"));
        }

        Ok(Self(token))
    }
}

/// Authenticated caller, decoded from the bearer token.
///
/// Use this as a handler parameter to require authentication. Extraction
/// fails with `401 Unauthorized` when the header is missing or the token
/// does not verify.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The authenticated user's id.
    pub user_id: UserId,
    /// Username as of token issue time.
    pub username: String,
    /// Whether the token carries the admin flag.
    pub is_admin: bool,
}

#[async_trait]
impl<U, E, P, T, M, C> FromRequestParts<AppEnvironment<U, E, P, T, M, C>> for AuthUser
where
    U: UserRepository,
    E: EventRepository,
    P: PasswordHasher,
    T: TokenService,
    M: EmailProvider,
    C: Clock,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppEnvironment<U, E, P, T, M, C>,
    ) -> Result<Self, Self::Rejection> {
        let bearer = BearerToken::from_request_parts(parts, state).await?;

        let claims = state
            .tokens
            .verify(&bearer.0)
            .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

        Ok(Self {
            user_id: claims.user_id,
            username: claims.username,
            is_admin: claims.is_admin,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::mocks::{
        FixedClock, MockEmailProvider, MockEventRepository, MockPasswordHasher, MockTokenService,
        MockUserRepository,
    };
    use crate::providers::Claims;
    use axum::http::Request;
    use std::sync::Arc;

    fn test_env() -> AppEnvironment<
        MockUserRepository,
        MockEventRepository,
        MockPasswordHasher,
        MockTokenService,
        MockEmailProvider,
        FixedClock,
    > {
        AppEnvironment::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockEventRepository::new()),
            Arc::new(MockPasswordHasher::new()),
            Arc::new(MockTokenService::new()),
            Arc::new(MockEmailProvider::new()),
            Arc::new(FixedClock::default()),
        )
    }

    fn parts_with_auth(value: &str) -> Parts {
        let req = Request::builder()
            .header("authorization", value)
            .body(())
            .unwrap();
        req.into_parts().0
    }

    #[tokio::test]
    async fn bearer_token_happy_path() {
        let mut parts = parts_with_auth("Bearer abc123");
        let bearer = BearerToken::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(bearer.0, "abc123");
    }

    #[tokio::test]
    async fn bearer_token_missing_header() {
        let req = Request::builder().body(()).unwrap();
        let (mut parts, ()) = req.into_parts();

        let err = BearerToken::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bearer_token_rejects_basic_scheme() {
        let mut parts = parts_with_auth("Basic dXNlcjpwYXNz");
        let err = BearerToken::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bearer_token_rejects_empty_token() {
        let mut parts = parts_with_auth("Bearer ");
        let err = BearerToken::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn auth_user_from_valid_token() {
        let env = test_env();
        let claims = Claims {
            user_id: UserId::new(),
            username: "alice".to_string(),
            is_admin: false,
        };
        let token = env.tokens.issue(&claims, 60).unwrap();

        let mut parts = parts_with_auth(&format!("Bearer {token}"));
        let auth = AuthUser::from_request_parts(&mut parts, &env).await.unwrap();

        assert_eq!(auth.user_id, claims.user_id);
        assert_eq!(auth.username, "alice");
        assert!(!auth.is_admin);
    }

    #[tokio::test]
    async fn auth_user_rejects_unknown_token() {
        let env = test_env();
        let mut parts = parts_with_auth("Bearer not-a-real-token");

        let err = AuthUser::from_request_parts(&mut parts, &env)
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
