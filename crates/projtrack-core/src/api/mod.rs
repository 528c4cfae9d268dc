//! REST API client for the project tracking backend.
//!
//! Two layers:
//!
//! - [`SessionClient`] sends a single request with the session cookies
//!   attached and returns the JSON body or an [`HttpError`].
//! - [`ApiClient`] wraps it with the 401 refresh-and-replay policy and
//!   exposes the typed auth, project and task operations.
//!
//! Authentication is cookie based: `access_token` and `refresh_token` are
//! set by the backend and never inspected here beyond their presence.

pub mod auth;
pub mod client;
pub mod error;
pub mod projects;
pub mod refresh;
pub mod tasks;

pub use client::{PendingRequest, SessionClient, SessionClientBuilder, DEFAULT_TIMEOUT_SECS};
pub use error::{ApiError, HttpError, RefreshFailure};
pub use refresh::{ApiClient, REFRESH_PATH};
pub use reqwest::Url;
