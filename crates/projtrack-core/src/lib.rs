//! Core library for projtrack.
//!
//! A client for a project and task tracking backend:
//!
//! - [`api`]: cookie-session HTTP client and the 401 refresh interceptor
//! - [`auth`]: session credentials, their persistence and the keychain
//! - [`routes`]: public/protected route classification and the guard
//! - [`navigator`]: current-location and redirect capability
//! - [`resources`]: cached project, task and account stores
//! - [`cache`], [`config`], [`models`]

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod navigator;
pub mod resources;
pub mod routes;

pub use api::{ApiClient, ApiError, SessionClient};
pub use config::Config;
pub use navigator::{MemoryNavigator, Navigator};
pub use routes::{guard, GuardDecision};
