//! Application state for one CLI invocation.
//!
//! `App` restores the persisted cookie session, builds the API client over
//! it and runs each command as a navigation: the route guard is evaluated
//! first, and after the command the session is written back to disk.

use std::sync::Arc;

use anyhow::{Context, Result};
use projtrack_core::api::{ApiClient, SessionClient, Url};
use projtrack_core::auth::{CookieCredentials, CredentialProvider, PasswordStore, Session};
use projtrack_core::cache::CacheManager;
use projtrack_core::navigator::{MemoryNavigator, Navigator};
use projtrack_core::resources::Resources;
use projtrack_core::routes::{self, GuardDecision};
use projtrack_core::Config;
use tracing::{debug, info, warn};

/// Cache subdirectory for resource data, kept apart from the session file
const DATA_DIR: &str = "data";

pub struct App {
    pub config: Config,
    pub resources: Resources,
    pub passwords: PasswordStore,
    session: Session,
    credentials: Arc<CookieCredentials>,
    navigator: Arc<MemoryNavigator>,
    /// Email of the account signed in during this run
    signed_in_as: Option<String>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let cache_dir = config.cache_dir()?;
        let api_url = config.api_url()?;
        let origin =
            Url::parse(&api_url).with_context(|| format!("Invalid API URL: {}", api_url))?;

        let passwords = PasswordStore::new(&origin);
        let credentials = Arc::new(CookieCredentials::new(origin));
        let mut session = Session::new(cache_dir.clone());
        match session.load() {
            Ok(true) => {
                session.restore_into(&credentials);
                debug!("Restored saved session");
            }
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable session file"),
        }

        let navigator = Arc::new(MemoryNavigator::default());
        let client = SessionClient::builder()
            .base_url(api_url)
            .timeout(config.request_timeout())
            .credentials(credentials.clone())
            .build()?;
        let api = ApiClient::new(client, navigator.clone());

        let cache = Arc::new(CacheManager::new(cache_dir.join(DATA_DIR))?);

        Ok(Self {
            config,
            resources: Resources::new(api, cache),
            passwords,
            session,
            credentials,
            navigator,
            signed_in_as: None,
        })
    }

    pub fn has_session(&self) -> bool {
        self.credentials.has_session()
    }

    /// Evaluate the guard for `path` and move there, or to where the guard
    /// sends us instead.
    pub fn navigate(&self, path: &str) -> GuardDecision {
        let decision = routes::guard(path, self.has_session());
        match decision {
            GuardDecision::Allow => self.navigator.visit(path),
            GuardDecision::Redirect(target) => {
                debug!(from = %path, to = %target, "Route guard redirected");
                self.navigator.visit(target);
            }
        }
        decision
    }

    pub fn current_path(&self) -> String {
        self.navigator.current_path()
    }

    /// True once a failed refresh has sent us back to the login screen
    pub fn session_expired(&self) -> bool {
        self.navigator.last_redirect().as_deref() == Some(routes::LOGIN)
    }

    /// Email of the signed-in account, as far as we know it
    pub fn email(&self) -> Option<String> {
        self.signed_in_as
            .clone()
            .or_else(|| self.session.email().map(str::to_string))
    }

    pub fn set_signed_in(&mut self, email: &str) {
        self.signed_in_as = Some(email.to_string());
        self.config.last_email = Some(email.to_string());
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }

    /// Drop the local session: cookies, session file and cached data
    pub fn sign_out_locally(&mut self) {
        self.credentials.clear();
        self.resources.account.forget();
        self.signed_in_as = None;
        info!("Local session cleared");
    }

    /// Write the current cookies back to the session file, or delete it
    /// when the session is gone.
    pub fn persist_session(&mut self) {
        let email = self.signed_in_as.clone();
        if let Err(e) = self.session.sync_from(&self.credentials, email.as_deref()) {
            warn!(error = %e, "Failed to save session");
        }
    }
}
