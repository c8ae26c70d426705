//! Snapshot-style adapter: one JSON cart resource, GET/POST/DELETE.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use panier_core::{CartLine, CartSnapshot, ProductId};

use super::{AddBody, CSRF_HEADER, CartApi, check_ack};
use crate::error::WidgetError;
use crate::token::TokenProvider;

/// Client for the snapshot-style cart resource.
///
/// `GET` returns the full authoritative snapshot; `POST` adds a line and
/// `DELETE` removes one, both answering `{success, detail?}`. Mutating calls
/// carry the anti-forgery token header.
pub struct SnapshotApi {
    client: reqwest::Client,
    endpoint: Url,
    token: Arc<dyn TokenProvider>,
}

/// Wire shape of the GET response.
#[derive(Debug, Deserialize)]
struct SnapshotWire {
    #[serde(default)]
    cart: IndexMap<String, LineWire>,
    #[serde(default)]
    total_cents: i64,
    #[serde(default)]
    item_count: u32,
}

#[derive(Debug, Deserialize)]
struct LineWire {
    #[serde(default)]
    name: String,
    #[serde(default)]
    price: i64,
    #[serde(default = "default_quantity")]
    quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

impl SnapshotApi {
    /// Create an adapter against `endpoint`.
    #[must_use]
    pub fn new(client: reqwest::Client, endpoint: Url, token: Arc<dyn TokenProvider>) -> Self {
        Self {
            client,
            endpoint,
            token,
        }
    }

    async fn send_mutation(&self, request: reqwest::RequestBuilder) -> Result<(), WidgetError> {
        let request = match self.token.token() {
            Some(token) => request.header(CSRF_HEADER, token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        check_ack(status, &body)
    }
}

impl CartApi for SnapshotApi {
    /// Fetch the authoritative snapshot.
    #[instrument(skip(self))]
    async fn load(&self) -> Result<CartSnapshot, WidgetError> {
        let response = self.client.get(self.endpoint.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::Status {
                status,
                detail: None,
            });
        }

        let body = response.text().await?;
        let wire: SnapshotWire = serde_json::from_str(&body)?;
        Ok(convert_snapshot(wire))
    }

    /// Add a line to the cart.
    #[instrument(skip(self, line), fields(product_id = %line.product_id))]
    async fn add(&self, line: &CartLine) -> Result<(), WidgetError> {
        let request = self
            .client
            .post(self.endpoint.clone())
            .json(&AddBody::from(line));
        self.send_mutation(request).await
    }

    /// Remove the line with this identity key.
    #[instrument(skip(self))]
    async fn remove(&self, product_id: &ProductId) -> Result<(), WidgetError> {
        let request = self
            .client
            .delete(self.endpoint.clone())
            .json(&serde_json::json!({ "product_id": product_id }));
        self.send_mutation(request).await
    }
}

fn convert_snapshot(wire: SnapshotWire) -> CartSnapshot {
    let lines = wire
        .cart
        .into_iter()
        .map(|(id, line)| {
            let product_id = ProductId::from(id);
            (
                product_id.clone(),
                CartLine {
                    product_id,
                    name: line.name,
                    unit_price_minor: line.price,
                    quantity: line.quantity.max(1),
                },
            )
        })
        .collect();

    CartSnapshot {
        lines,
        total_minor: wire.total_cents,
        item_count: wire.item_count,
    }
}
