//! Widget error type and its mapping to user-facing toast text.
//!
//! No error here is ever fatal to the page: every failure path leaves the
//! previously rendered UI state intact, and nothing is retried automatically.

use thiserror::Error;

/// Generic toast text for transport-level failures.
const MSG_NETWORK: &str = "Erreur réseau";

/// Errors that can occur while synchronizing the cart.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// HTTP request failed (transport-level, request never completed).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Server answered with a non-success HTTP status.
    #[error("server returned status {status}")]
    Status {
        status: reqwest::StatusCode,
        /// Server-supplied detail text, preferred in notifications.
        detail: Option<String>,
    },

    /// Server answered 2xx but flagged the operation as failed.
    #[error("server rejected the request")]
    Rejected(Option<String>),

    /// The configured endpoint family has no such operation.
    #[error("operation not supported by this endpoint family: {0}")]
    Unsupported(&'static str),

    /// Item row template failed to render.
    #[error("template render error: {0}")]
    Render(#[from] askama::Error),
}

impl WidgetError {
    /// Toast text for this error.
    ///
    /// Server-supplied detail text wins when present; transport failures get
    /// the generic network message; everything else falls back to the
    /// operation-specific `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status {
                detail: Some(detail),
                ..
            }
            | Self::Rejected(Some(detail))
                if !detail.is_empty() =>
            {
                detail.clone()
            }
            Self::Http(_) => MSG_NETWORK.to_owned(),
            _ => fallback.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_detail_wins_over_fallback() {
        let err = WidgetError::Rejected(Some("out of stock".to_owned()));
        assert_eq!(err.user_message("Erreur ajout panier"), "out of stock");

        let err = WidgetError::Status {
            status: reqwest::StatusCode::FORBIDDEN,
            detail: Some("CSRF check failed".to_owned()),
        };
        assert_eq!(err.user_message("Erreur ajout panier"), "CSRF check failed");
    }

    #[test]
    fn missing_detail_uses_operation_fallback() {
        let err = WidgetError::Rejected(None);
        assert_eq!(err.user_message("Erreur ajout panier"), "Erreur ajout panier");

        let err = WidgetError::Rejected(Some(String::new()));
        assert_eq!(err.user_message("Erreur suppression"), "Erreur suppression");

        let err = WidgetError::Unsupported("remove");
        assert_eq!(err.user_message("Erreur suppression"), "Erreur suppression");
    }
}
