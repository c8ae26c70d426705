//! Backend cart API contract and its two endpoint-family adapters.
//!
//! Two independently evolved endpoint families exist server-side: a
//! snapshot-style JSON resource (GET/POST/DELETE on one URL) and an
//! add/summary pair. Both satisfy the same [`CartApi`] contract; the engine
//! holds the orchestration once and the adapters only translate wire shapes.

mod add_summary;
mod snapshot;

pub use add_summary::AddSummaryApi;
pub use snapshot::SnapshotApi;

use std::sync::Arc;

use panier_core::{CartLine, CartSnapshot, ProductId};

use crate::config::{ApiFlavor, ConfigError, WidgetConfig};
use crate::error::WidgetError;
use crate::token::TokenProvider;

/// Header carrying the anti-forgery token on mutating calls.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Server-side cart operations.
///
/// `load` returns the authoritative snapshot; `add` and `remove` only
/// acknowledge - the engine always follows a successful mutation with a full
/// `load` rather than patching state from the acknowledgement.
pub trait CartApi: Send + Sync {
    /// Fetch the current authoritative cart snapshot.
    fn load(&self) -> impl Future<Output = Result<CartSnapshot, WidgetError>> + Send;

    /// Add a line to the cart.
    fn add(&self, line: &CartLine) -> impl Future<Output = Result<(), WidgetError>> + Send;

    /// Remove the line with this identity key.
    fn remove(&self, product_id: &ProductId)
    -> impl Future<Output = Result<(), WidgetError>> + Send;
}

/// Configuration-selected adapter, one per page type.
pub enum CartBackend {
    /// Single JSON cart resource.
    Snapshot(SnapshotApi),
    /// Separate add and summary endpoints.
    AddSummary(AddSummaryApi),
}

impl CartBackend {
    /// Build the adapter the configuration selects.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration lacks the URLs its flavor
    /// requires.
    pub fn from_config(
        config: &WidgetConfig,
        token: Arc<dyn TokenProvider>,
    ) -> Result<Self, ConfigError> {
        let client = reqwest::Client::new();
        match config.flavor {
            ApiFlavor::Snapshot => {
                let cart_url = config.cart_url.clone().ok_or_else(|| {
                    ConfigError::MissingEnvVar("PANIER_CART_URL".to_owned())
                })?;
                Ok(Self::Snapshot(SnapshotApi::new(client, cart_url, token)))
            }
            ApiFlavor::AddSummary => {
                let add_url = config.add_url.clone().ok_or_else(|| {
                    ConfigError::MissingEnvVar("PANIER_ADD_URL".to_owned())
                })?;
                let summary_url = config.summary_url.clone().ok_or_else(|| {
                    ConfigError::MissingEnvVar("PANIER_SUMMARY_URL".to_owned())
                })?;
                Ok(Self::AddSummary(AddSummaryApi::new(
                    client,
                    add_url,
                    summary_url,
                    token,
                )))
            }
        }
    }
}

impl CartApi for CartBackend {
    async fn load(&self) -> Result<CartSnapshot, WidgetError> {
        match self {
            Self::Snapshot(api) => api.load().await,
            Self::AddSummary(api) => api.load().await,
        }
    }

    async fn add(&self, line: &CartLine) -> Result<(), WidgetError> {
        match self {
            Self::Snapshot(api) => api.add(line).await,
            Self::AddSummary(api) => api.add(line).await,
        }
    }

    async fn remove(&self, product_id: &ProductId) -> Result<(), WidgetError> {
        match self {
            Self::Snapshot(api) => api.remove(product_id).await,
            Self::AddSummary(api) => api.remove(product_id).await,
        }
    }
}

/// JSON body of a mutating add call, shared by both endpoint families.
#[derive(Debug, serde::Serialize)]
pub(crate) struct AddBody<'a> {
    pub product_id: &'a str,
    pub name: &'a str,
    pub price: i64,
    pub quantity: u32,
}

impl<'a> From<&'a CartLine> for AddBody<'a> {
    fn from(line: &'a CartLine) -> Self {
        Self {
            product_id: line.product_id.as_str(),
            name: &line.name,
            price: line.unit_price_minor,
            quantity: line.quantity,
        }
    }
}

/// Mutation acknowledgement, tolerant of both families' detail fields.
#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct AckWire {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AckWire {
    /// Server-supplied failure text, `detail` preferred over `error`.
    pub fn detail_text(self) -> Option<String> {
        self.detail.or(self.error)
    }
}

/// Map a mutation response (status + body) onto the error taxonomy.
pub(crate) fn check_ack(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<(), WidgetError> {
    // Error bodies are sometimes not JSON at all; treat those as detail-less.
    let ack: AckWire = serde_json::from_str(body).unwrap_or_default();
    let success = ack.success;
    let detail = ack.detail_text();

    if !status.is_success() {
        return Err(WidgetError::Status { status, detail });
    }
    if !success {
        return Err(WidgetError::Rejected(detail));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn ack_success_passes() {
        assert!(check_ack(StatusCode::OK, r#"{"success": true}"#).is_ok());
    }

    #[test]
    fn rejected_payload_carries_server_text() {
        let err = check_ack(StatusCode::OK, r#"{"success": false, "error": "out of stock"}"#)
            .unwrap_err();
        match err {
            WidgetError::Rejected(detail) => assert_eq!(detail.as_deref(), Some("out of stock")),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn detail_field_wins_over_error_field() {
        let err = check_ack(
            StatusCode::OK,
            r#"{"success": false, "detail": "quantité invalide", "error": "bad"}"#,
        )
        .unwrap_err();
        match err {
            WidgetError::Rejected(detail) => {
                assert_eq!(detail.as_deref(), Some("quantité invalide"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn http_failure_outranks_payload_flag() {
        let err = check_ack(
            StatusCode::FORBIDDEN,
            r#"{"success": false, "detail": "CSRF check failed"}"#,
        )
        .unwrap_err();
        match err {
            WidgetError::Status { status, detail } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(detail.as_deref(), Some("CSRF check failed"));
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[test]
    fn non_json_error_body_is_detail_less() {
        let err = check_ack(StatusCode::BAD_GATEWAY, "<html>upstream down</html>").unwrap_err();
        match err {
            WidgetError::Status { status, detail } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert!(detail.is_none());
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }
}
