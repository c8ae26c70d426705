//! Anti-forgery token retrieval.
//!
//! The server requires a session-bound token on state-mutating requests.
//! Retrieval is injected as a collaborator rather than read from ambient
//! document state, so adapters stay testable without a real browser page.

/// Supplies the anti-forgery token attached to mutating requests.
pub trait TokenProvider: Send + Sync {
    /// Current token, if the session has one.
    fn token(&self) -> Option<String>;
}

/// Token sourced from a same-site cookie header string.
///
/// The host glue hands over the page's cookie string (`document.cookie` or a
/// `Cookie` request header); the named cookie's value is the token.
#[derive(Debug, Clone)]
pub struct CookieToken {
    name: String,
    cookies: String,
}

impl CookieToken {
    /// Create a provider reading `name` out of `cookies`.
    #[must_use]
    pub fn new(name: impl Into<String>, cookies: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cookies: cookies.into(),
        }
    }
}

impl TokenProvider for CookieToken {
    fn token(&self) -> Option<String> {
        self.cookies
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .find(|(name, _)| name.trim() == self.name)
            .map(|(_, value)| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    }
}

/// Fixed token, for tests and non-browser hosts.
#[derive(Debug, Clone)]
pub struct FixedToken(pub String);

impl TokenProvider for FixedToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// No token available; mutating requests go out without the header.
#[derive(Debug, Clone, Copy)]
pub struct NoToken;

impl TokenProvider for NoToken {
    fn token(&self) -> Option<String> {
        None
    }
}
