//! Authentication module for session credentials.
//!
//! This module provides:
//! - `CredentialProvider`: the capability the HTTP client uses to attach,
//!   absorb and clear session cookies, with `CookieCredentials` as the
//!   cookie-jar implementation
//! - `Session`: persistence of the opaque cookie session between runs
//! - `PasswordStore`: optional OS-keychain storage for remembered passwords

pub mod credentials;
pub mod keychain;
pub mod session;

pub use credentials::{
    expired_cookie, CookieCredentials, CredentialProvider, ACCESS_TOKEN_COOKIE,
    REFRESH_TOKEN_COOKIE, SESSION_COOKIES,
};
pub use keychain::PasswordStore;
pub use session::{Session, SessionData};
