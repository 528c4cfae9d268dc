//! Data models for the project tracking backend.
//!
//! - `User`, `Gender`: the signed-in account
//! - `LoginRequest`, `RegisterRequest`, `AuthResponse`: auth payloads
//! - `Project`, `Category`, `ProjectInput`: projects and their edit form
//! - `Task`, `TaskStatus`, `TaskInput`: tasks scoped to a project

pub mod project;
pub mod task;
pub mod user;

pub use project::{Category, Project, ProjectInput};
pub use task::{Task, TaskInput, TaskStatus};
pub use user::{AuthResponse, Gender, LoginRequest, RegisterRequest, User};

/// Error for enum values typed on the command line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseChoiceError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Canonical form for matching CLI input: lowercase, spaces and dashes as `_`
pub(crate) fn choice_key(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .replace([' ', '-'], "_")
}
