use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use reqwest::Url;
use tracing::{debug, info};

/// Cookie holding the short-lived access token
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Cookie holding the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

pub const SESSION_COOKIES: [&str; 2] = [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE];

/// Cookie string that invalidates `name` client-side (empty value, epoch expiry).
pub fn expired_cookie(name: &str) -> String {
    format!("{}=; expires=Thu, 01 Jan 1970 00:00:00 UTC; path=/;", name)
}

/// Supplies and clears the session credentials attached to outbound requests.
///
/// Token values are opaque: implementations only hand them to the transport
/// and report whether a session is present.
pub trait CredentialProvider: Send + Sync {
    /// `Cookie` header value to send with a request to `url`
    fn cookie_header(&self, url: &Url) -> Option<HeaderValue>;

    /// Absorb `Set-Cookie` headers from a response to `url`
    fn store(&self, url: &Url, set_cookies: &mut dyn Iterator<Item = &HeaderValue>);

    /// Whether an access token cookie is currently held
    fn has_session(&self) -> bool;

    /// Drop both session cookies
    fn clear(&self);
}

/// Cookie-jar backed credentials for a single backend origin.
pub struct CookieCredentials {
    jar: Jar,
    origin: Url,
}

impl CookieCredentials {
    pub fn new(origin: Url) -> Self {
        Self {
            jar: Jar::default(),
            origin,
        }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Current cookies for the origin as a `name=value; name=value` string,
    /// suitable for [`CookieCredentials::restore`].
    pub fn snapshot(&self) -> Option<String> {
        self.live_cookies(&self.origin)
    }

    /// Cookies the jar holds for `url`, minus any left with an empty value by
    /// a client-side clear.
    fn live_cookies(&self, url: &Url) -> Option<String> {
        let header = self.jar.cookies(url)?;
        let header = header.to_str().ok()?;
        let live: Vec<&str> = header
            .split(';')
            .map(str::trim)
            .filter(|pair| matches!(pair.split_once('='), Some((_, value)) if !value.is_empty()))
            .collect();
        (!live.is_empty()).then(|| live.join("; "))
    }

    /// Re-seed the jar from a [`CookieCredentials::snapshot`] string
    pub fn restore(&self, cookies: &str) {
        let mut restored = 0;
        for pair in cookies.split(';').map(str::trim) {
            if pair.is_empty() || !pair.contains('=') {
                continue;
            }
            self.jar
                .add_cookie_str(&format!("{}; path=/", pair), &self.origin);
            restored += 1;
        }
        debug!(count = restored, "Restored session cookies");
    }
}

/// Value of cookie `name` in a `Cookie` header string
fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').map(str::trim).find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then_some(value.trim())
    })
}

impl CredentialProvider for CookieCredentials {
    fn cookie_header(&self, url: &Url) -> Option<HeaderValue> {
        self.live_cookies(url)
            .and_then(|cookies| HeaderValue::from_str(&cookies).ok())
    }

    fn store(&self, url: &Url, set_cookies: &mut dyn Iterator<Item = &HeaderValue>) {
        self.jar.set_cookies(set_cookies, url);
    }

    fn has_session(&self) -> bool {
        self.snapshot()
            .as_deref()
            .and_then(|header| cookie_value(header, ACCESS_TOKEN_COOKIE))
            .map(|value| !value.is_empty())
            .unwrap_or(false)
    }

    fn clear(&self) {
        for name in SESSION_COOKIES {
            self.jar.add_cookie_str(&expired_cookie(name), &self.origin);
        }
        info!("Session cookies cleared");
    }
}
