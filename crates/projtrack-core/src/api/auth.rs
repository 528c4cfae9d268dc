use tracing::info;

use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User};

use super::client::PendingRequest;
use super::error::ApiError;
use super::refresh::{ApiClient, REFRESH_PATH};

const LOGIN_PATH: &str = "/auth/login/";
const REGISTER_PATH: &str = "/auth/register/";
const LOGOUT_PATH: &str = "/auth/logout/";
const ME_PATH: &str = "/auth/me/";

impl ApiClient {
    /// Sign in. The backend sets both session cookies on success.
    pub async fn login(&self, request: &LoginRequest) -> Result<User, ApiError> {
        let auth: AuthResponse = self.post(LOGIN_PATH, request).await?;
        info!(user_id = auth.user.id, "Logged in");
        Ok(auth.user)
    }

    /// Create an account; the new user is signed in immediately.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        let auth: AuthResponse = self.post(REGISTER_PATH, request).await?;
        info!(user_id = auth.user.id, "Registered");
        Ok(auth.user)
    }

    /// Rotate the session cookies. Sent through the raw transport, so a
    /// rejected refresh is reported as-is and never triggers another one.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        self.session()
            .send(&PendingRequest::post(REFRESH_PATH))
            .await?;
        Ok(())
    }

    /// End the session server-side. Clearing local state is up to the caller.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.execute(PendingRequest::post(LOGOUT_PATH)).await?;
        info!("Logged out");
        Ok(())
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.get(ME_PATH).await
    }
}
