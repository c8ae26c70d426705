//! Widget configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PANIER_API_FLAVOR` - Backend endpoint family: `snapshot` or
//!   `add-summary`
//! - `PANIER_CART_URL` - Cart resource URL (snapshot flavor only)
//! - `PANIER_ADD_URL` - Add endpoint URL (add-summary flavor only)
//! - `PANIER_SUMMARY_URL` - Summary endpoint URL (add-summary flavor only)
//!
//! ## Optional
//! - `PANIER_CSRF_COOKIE` - Anti-forgery cookie name (default: csrftoken)
//! - `PANIER_TOAST_VISIBLE_MS` - Toast display window (default: 2200)
//! - `PANIER_TOAST_FADE_MS` - Toast fade-out duration (default: 300)
//! - `PANIER_DRAWER_AUTO_CLOSE_MS` - Transient drawer delay (default: 1600)

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which backend endpoint family this page talks to.
///
/// The two families evolved independently and disagree on request/response
/// shape; they are alternative integrations for different page types, never
/// merged and never co-resident in one widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFlavor {
    /// Single JSON cart resource supporting GET/POST/DELETE.
    Snapshot,
    /// Separate add and summary endpoints.
    AddSummary,
}

impl std::str::FromStr for ApiFlavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "snapshot" => Ok(Self::Snapshot),
            "add-summary" => Ok(Self::AddSummary),
            other => Err(format!(
                "unknown API flavor {other:?}, expected \"snapshot\" or \"add-summary\""
            )),
        }
    }
}

/// Timer durations for transient UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// How long a toast stays fully visible.
    pub toast_visible: Duration,
    /// Toast fade-out window before removal.
    pub toast_fade: Duration,
    /// Delay before a transiently opened drawer auto-closes.
    pub drawer_auto_close: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            toast_visible: Duration::from_millis(2200),
            toast_fade: Duration::from_millis(300),
            drawer_auto_close: Duration::from_millis(1600),
        }
    }
}

/// Widget configuration.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    /// Selected backend endpoint family.
    pub flavor: ApiFlavor,
    /// Cart resource URL (snapshot flavor).
    pub cart_url: Option<Url>,
    /// Add endpoint URL (add-summary flavor).
    pub add_url: Option<Url>,
    /// Summary endpoint URL (add-summary flavor).
    pub summary_url: Option<Url>,
    /// Name of the session cookie carrying the anti-forgery token.
    pub csrf_cookie: String,
    /// Toast and drawer timer durations.
    pub timings: Timings,
}

impl WidgetConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable for the selected flavor is
    /// missing or unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let flavor: ApiFlavor = parse_env("PANIER_API_FLAVOR")?;

        let (cart_url, add_url, summary_url) = match flavor {
            ApiFlavor::Snapshot => (Some(env_url("PANIER_CART_URL")?), None, None),
            ApiFlavor::AddSummary => (
                None,
                Some(env_url("PANIER_ADD_URL")?),
                Some(env_url("PANIER_SUMMARY_URL")?),
            ),
        };

        Ok(Self {
            flavor,
            cart_url,
            add_url,
            summary_url,
            csrf_cookie: std::env::var("PANIER_CSRF_COOKIE")
                .unwrap_or_else(|_| "csrftoken".to_owned()),
            timings: Timings {
                toast_visible: env_ms("PANIER_TOAST_VISIBLE_MS", 2200)?,
                toast_fade: env_ms("PANIER_TOAST_FADE_MS", 300)?,
                drawer_auto_close: env_ms("PANIER_DRAWER_AUTO_CLOSE_MS", 1600)?,
            },
        })
    }

    /// Configuration for a snapshot-flavor page.
    #[must_use]
    pub fn snapshot(cart_url: Url) -> Self {
        Self {
            flavor: ApiFlavor::Snapshot,
            cart_url: Some(cart_url),
            add_url: None,
            summary_url: None,
            csrf_cookie: "csrftoken".to_owned(),
            timings: Timings::default(),
        }
    }

    /// Configuration for an add/summary-flavor page.
    #[must_use]
    pub fn add_summary(add_url: Url, summary_url: Url) -> Self {
        Self {
            flavor: ApiFlavor::AddSummary,
            cart_url: None,
            add_url: Some(add_url),
            summary_url: Some(summary_url),
            csrf_cookie: "csrftoken".to_owned(),
            timings: Timings::default(),
        }
    }
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

fn parse_env<T>(name: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    required_var(name)?
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string()))
}

fn env_url(name: &str) -> Result<Url, ConfigError> {
    Url::parse(&required_var(name)?)
        .map_err(|e| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string()))
}

fn env_ms(name: &str, default: u64) -> Result<Duration, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map(Duration::from_millis)
            .map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidEnvVar(name.to_owned(), e.to_string())
            }),
        Err(_) => Ok(Duration::from_millis(default)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flavor_parses_known_names() {
        assert_eq!("snapshot".parse::<ApiFlavor>().unwrap(), ApiFlavor::Snapshot);
        assert_eq!(
            "add-summary".parse::<ApiFlavor>().unwrap(),
            ApiFlavor::AddSummary
        );
        assert!("graphql".parse::<ApiFlavor>().is_err());
    }

    #[test]
    fn default_timings_are_the_shipped_values() {
        let timings = Timings::default();
        assert_eq!(timings.toast_visible, Duration::from_millis(2200));
        assert_eq!(timings.toast_fade, Duration::from_millis(300));
        assert_eq!(timings.drawer_auto_close, Duration::from_millis(1600));
    }

    #[test]
    fn builders_set_the_matching_urls() {
        let config = WidgetConfig::snapshot(Url::parse("http://localhost/api/cart/").unwrap());
        assert_eq!(config.flavor, ApiFlavor::Snapshot);
        assert!(config.cart_url.is_some());
        assert!(config.add_url.is_none());

        let config = WidgetConfig::add_summary(
            Url::parse("http://localhost/cart/add/").unwrap(),
            Url::parse("http://localhost/cart/summary/").unwrap(),
        );
        assert_eq!(config.flavor, ApiFlavor::AddSummary);
        assert!(config.cart_url.is_none());
        assert!(config.summary_url.is_some());
    }
}
