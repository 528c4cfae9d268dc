use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::CookieCredentials;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Persisted session: the opaque cookie string plus who it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub cookies: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(cookies: String, email: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            cookies,
            email,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Carries the cookie session between process runs.
pub struct Session {
    cache_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            data: None,
        }
    }

    /// Load session from disk
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(false);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        let data: SessionData =
            serde_json::from_str(&contents).context("Failed to parse session file")?;
        self.data = Some(data);
        Ok(true)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Clear session data
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Seed the credential jar from the persisted cookies
    pub fn restore_into(&self, credentials: &CookieCredentials) {
        if let Some(ref data) = self.data {
            credentials.restore(&data.cookies);
        }
    }

    /// Capture the jar's current cookies. Saves them when a session is held,
    /// deletes the session file when it is not.
    pub fn sync_from(&mut self, credentials: &CookieCredentials, email: Option<&str>) -> Result<()> {
        match credentials.snapshot() {
            Some(cookies) => {
                let email = email
                    .map(str::to_string)
                    .or_else(|| self.data.as_ref().and_then(|d| d.email.clone()));
                if let Some(data) = self.data.as_mut() {
                    if data.cookies != cookies || data.email != email {
                        data.cookies = cookies;
                        data.email = email;
                        data.updated_at = Utc::now();
                    }
                } else {
                    self.data = Some(SessionData::new(cookies, email));
                }
                self.save()
            }
            None => {
                debug!("No session cookies held, removing session file");
                self.clear()
            }
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.email.as_deref())
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}
