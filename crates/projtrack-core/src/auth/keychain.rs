use anyhow::{Context, Result};
use keyring::Entry;
use reqwest::Url;
use tracing::debug;

const SERVICE_NAME: &str = "projtrack";

/// Remembered passwords in the OS keychain.
///
/// Entries are scoped to the backend origin, so the same email on two
/// servers gets two entries.
#[derive(Debug, Clone)]
pub struct PasswordStore {
    origin: String,
}

impl PasswordStore {
    pub fn new(api_url: &Url) -> Self {
        Self {
            origin: api_url.origin().ascii_serialization(),
        }
    }

    /// Keychain account name: `<email> @ <origin>`, email lowercased
    pub fn account(&self, email: &str) -> String {
        format!("{} @ {}", email.trim().to_lowercase(), self.origin)
    }

    fn entry(&self, email: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, &self.account(email)).context("Failed to open keychain entry")
    }

    pub fn store(&self, email: &str, password: &str) -> Result<()> {
        self.entry(email)?
            .set_password(password)
            .context("Failed to store password in keychain")?;
        debug!(origin = %self.origin, "Password remembered");
        Ok(())
    }

    pub fn get_password(&self, email: &str) -> Result<String> {
        self.entry(email)?
            .get_password()
            .context("Failed to read password from keychain")
    }

    pub fn delete(&self, email: &str) -> Result<()> {
        self.entry(email)?
            .delete_credential()
            .context("Failed to delete password from keychain")
    }

    pub fn has_password(&self, email: &str) -> bool {
        self.entry(email)
            .map(|entry| entry.get_password().is_ok())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(url: &str) -> PasswordStore {
        PasswordStore::new(&Url::parse(url).unwrap())
    }

    #[test]
    fn test_account_scoped_to_origin() {
        let store = store("https://tracker.example.com/api/");
        assert_eq!(
            store.account("ada@example.com"),
            "ada@example.com @ https://tracker.example.com"
        );
    }

    #[test]
    fn test_backends_get_separate_accounts() {
        let prod = store("https://tracker.example.com");
        let local = store("http://localhost:8000");
        assert_ne!(prod.account("ada@example.com"), local.account("ada@example.com"));
        assert_eq!(local.account("ada@example.com"), "ada@example.com @ http://localhost:8000");
    }

    #[test]
    fn test_email_normalized() {
        let store = store("https://tracker.example.com");
        assert_eq!(store.account(" Ada@Example.com "), store.account("ada@example.com"));
    }

    #[test]
    fn test_path_does_not_split_entries() {
        assert_eq!(
            store("https://tracker.example.com/v2").account("a@b.c"),
            store("https://tracker.example.com/").account("a@b.c")
        );
    }
}
