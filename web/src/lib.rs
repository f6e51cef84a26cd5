//! HTTP boundary plumbing for the Courtside API.
//!
//! This crate holds the pieces of the HTTP layer that carry no domain
//! knowledge: the [`AppError`] response type, request-metadata extractors,
//! and the correlation-id middleware. The domain crate depends on it to map
//! its typed errors onto wire responses and to thread request identity
//! through logs.
//!
//! # Request flow
//!
//! 1. The correlation-id layer stamps every request with an id (taken from
//!    the `X-Correlation-ID` header when the client sent one).
//! 2. Handlers pull request metadata through the extractors in
//!    [`extractors`].
//! 3. Handler errors surface as [`AppError`], which renders a JSON body with
//!    a stable machine-readable code and never leaks internals.
//!
//! ```ignore
//! use courtside_web::{AppError, CorrelationId, correlation_id_layer};
//! use axum::{Router, routing::get, Json};
//!
//! async fn whoami(correlation_id: CorrelationId) -> Result<Json<Me>, AppError> {
//!     let me = lookup().await.map_err(|_| AppError::unavailable("try again"))?;
//!     tracing::info!(correlation_id = %correlation_id.0, "whoami");
//!     Ok(Json(me))
//! }
//!
//! let app = Router::new()
//!     .route("/api/whoami", get(whoami))
//!     .layer(correlation_id_layer());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{ClientIp, CorrelationId, UserAgent};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
