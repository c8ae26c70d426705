//! Add/summary-style adapter: separate add and summary endpoints.
//!
//! This family carries no line items: the summary answers only an item count
//! and a total, so its snapshots always have empty `lines` (pages using this
//! family render a checkout affordance and totals, not a drawer list). It
//! has no remove endpoint either; `remove` reports an unsupported operation
//! which the engine surfaces like any other failure.

use std::sync::Arc;

use serde::Deserialize;
use tracing::instrument;
use url::Url;

use panier_core::money::parse_display_to_minor;
use panier_core::{CartLine, CartSnapshot, ProductId};

use super::{AddBody, CSRF_HEADER, CartApi, check_ack};
use crate::error::WidgetError;
use crate::token::TokenProvider;

/// Client for the add/summary endpoint pair.
pub struct AddSummaryApi {
    client: reqwest::Client,
    add_url: Url,
    summary_url: Url,
    token: Arc<dyn TokenProvider>,
}

/// Wire shape of the summary response.
#[derive(Debug, Deserialize)]
struct SummaryWire {
    #[serde(default)]
    item_count: u32,
    #[serde(default)]
    total_display: Option<String>,
    #[serde(default)]
    total_cents: Option<i64>,
}

impl AddSummaryApi {
    /// Create an adapter against the add and summary endpoints.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        add_url: Url,
        summary_url: Url,
        token: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            client,
            add_url,
            summary_url,
            token,
        }
    }
}

impl CartApi for AddSummaryApi {
    /// Fetch the cart summary as a (line-less) snapshot.
    #[instrument(skip(self))]
    async fn load(&self) -> Result<CartSnapshot, WidgetError> {
        let response = self.client.get(self.summary_url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::Status {
                status,
                detail: None,
            });
        }

        let body = response.text().await?;
        let wire: SummaryWire = serde_json::from_str(&body)?;
        Ok(convert_summary(wire))
    }

    /// Add a line to the cart.
    ///
    /// The acknowledgement's own totals are ignored; the engine resyncs with
    /// a full load instead of patching state from the acknowledgement.
    #[instrument(skip(self, line), fields(product_id = %line.product_id))]
    async fn add(&self, line: &CartLine) -> Result<(), WidgetError> {
        let request = self
            .client
            .post(self.add_url.clone())
            .json(&AddBody::from(line));
        let request = match self.token.token() {
            Some(token) => request.header(CSRF_HEADER, token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        check_ack(status, &body)
    }

    /// This endpoint family has no remove operation; always reports
    /// [`WidgetError::Unsupported`].
    #[instrument(skip(self))]
    async fn remove(&self, product_id: &ProductId) -> Result<(), WidgetError> {
        let _ = product_id;
        Err(WidgetError::Unsupported("remove"))
    }
}

fn convert_summary(wire: SummaryWire) -> CartSnapshot {
    // Minor units are authoritative when present; the display string is the
    // fallback the server sends on older deployments.
    let total_minor = wire.total_cents.unwrap_or_else(|| {
        wire.total_display
            .as_deref()
            .map_or(0, parse_display_to_minor)
    });

    CartSnapshot {
        lines: indexmap::IndexMap::new(),
        total_minor,
        item_count: wire.item_count,
    }
}
