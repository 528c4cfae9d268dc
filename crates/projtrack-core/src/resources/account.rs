use std::sync::Arc;

use anyhow::Result;

use crate::api::ApiClient;
use crate::cache::CacheManager;
use crate::models::{LoginRequest, RegisterRequest, User};

use super::{fresh, log_cache_error, Fetched};

/// The signed-in user and the auth mutations around it
#[derive(Clone)]
pub struct AccountStore {
    api: ApiClient,
    cache: Arc<CacheManager>,
}

impl AccountStore {
    pub fn new(api: ApiClient, cache: Arc<CacheManager>) -> Self {
        Self { api, cache }
    }

    pub async fn me(&self, force: bool) -> Result<Fetched<User>> {
        if !force {
            if let Some(hit) = fresh("me", || self.cache.load_me()) {
                return Ok(hit);
            }
        }

        let user = self.api.me().await?;
        log_cache_error("me", self.cache.save_me(&user));
        Ok(Fetched::network(user))
    }

    /// A new session starts with an empty cache: whatever is on disk may
    /// belong to the previous account.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let user = self.api.login(&request).await?;
        self.forget();
        Ok(user)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        let user = self.api.register(request).await?;
        self.forget();
        Ok(user)
    }

    /// Sign out server-side, then drop everything cached for this user.
    pub async fn logout(&self) -> Result<()> {
        self.api.logout().await?;
        self.forget();
        Ok(())
    }

    /// Drop all cached data without contacting the server
    pub fn forget(&self) {
        log_cache_error("all", self.cache.clear());
    }
}
