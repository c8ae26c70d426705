//! Cart sync engine: orchestrates server calls and pushes results into the
//! page regions, toasts, and drawer.
//!
//! This is the only component with sequencing and error-handling
//! responsibility. The flow is always: user action → mutating request →
//! authoritative server response → region renders and side effects. There
//! are no speculative updates: displayed cart contents change only on the
//! response-handling path, and a successful mutation is followed by exactly
//! one full reload before any further item render.

use std::sync::Arc;

use tracing::{error, instrument, warn};

use panier_core::money::parse_display_to_minor;
use panier_core::{CartLine, ProductId};

use crate::api::CartApi;
use crate::config::Timings;
use crate::drawer::Drawer;
use crate::page::{Page, PageBinder};
use crate::toast::ToastHub;

const MSG_ADDED: &str = "Produit ajouté au panier";
const MSG_REMOVED: &str = "Produit supprimé";
const MSG_ADD_FAILED: &str = "Erreur ajout panier";
const MSG_REMOVE_FAILED: &str = "Erreur suppression";

/// Quick-add form data: a human-typed decimal price and optional quantity.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct QuickAddForm {
    pub product_id: String,
    pub name: String,
    /// Decimal display string ("4,50" or "4.50"), not minor units.
    pub price: String,
    pub quantity: Option<u32>,
}

/// One cart widget instance for one host page.
///
/// Holds all page references and transient state behind an explicit
/// lifecycle ([`CartWidget::init`] / [`CartWidget::dispose`]); independent
/// instances do not collide.
pub struct CartWidget<A: CartApi> {
    api: A,
    binder: PageBinder,
    drawer: Drawer,
    toasts: ToastHub,
}

impl<A: CartApi> CartWidget<A> {
    /// Build a widget for `page` talking to `api`.
    #[must_use]
    pub fn new(api: A, page: Arc<dyn Page>, timings: Timings) -> Self {
        let binder = PageBinder::new(Arc::clone(&page));
        let drawer = Drawer::new(Arc::clone(&page), timings.drawer_auto_close);
        let toasts = ToastHub::new(page, timings);
        Self {
            api,
            binder,
            drawer,
            toasts,
        }
    }

    /// Re-establish ground truth on page load.
    pub async fn init(&self) {
        self.load_cart().await;
    }

    /// Cancel outstanding drawer and toast timers.
    pub fn dispose(&self) {
        self.drawer.dispose();
        self.toasts.dispose();
    }

    /// The drawer state machine (also driven by host close/toggle events).
    #[must_use]
    pub fn drawer(&self) -> &Drawer {
        &self.drawer
    }

    /// Fetch the authoritative snapshot and re-render items and summary.
    ///
    /// A failed background refresh must not disrupt the UI: every failure is
    /// logged and otherwise silent, leaving prior regions intact.
    #[instrument(skip(self))]
    pub async fn load_cart(&self) {
        match self.api.load().await {
            Ok(snapshot) => {
                if let Err(e) = self.binder.render_items(&snapshot) {
                    error!("failed to render cart items: {e}");
                }
                self.binder.render_summary(&snapshot);
            }
            Err(e) => {
                warn!("background cart load failed: {e}");
            }
        }
    }

    /// Add a product to the cart.
    ///
    /// On success: success toast, full resync, transient drawer open. On any
    /// failure: error toast (server detail preferred), no displayed state
    /// modified.
    #[instrument(skip(self, name))]
    pub async fn add_to_cart(
        &self,
        product_id: &str,
        name: &str,
        unit_price_minor: i64,
        quantity: u32,
    ) {
        let line = CartLine {
            product_id: ProductId::from(product_id),
            name: name.to_owned(),
            unit_price_minor,
            quantity: quantity.max(1),
        };

        match self.api.add(&line).await {
            Ok(()) => {
                self.toasts.notify(MSG_ADDED);
                self.load_cart().await;
                self.drawer.open_transient();
            }
            Err(e) => {
                error!("add to cart failed: {e}");
                self.toasts.notify(&e.user_message(MSG_ADD_FAILED));
            }
        }
    }

    /// Add from the quick-add form, parsing the human-typed decimal price.
    pub async fn quick_add(&self, form: QuickAddForm) {
        let price_minor = parse_display_to_minor(&form.price);
        let quantity = form.quantity.unwrap_or(1);
        self.add_to_cart(&form.product_id, &form.name, price_minor, quantity)
            .await;
    }

    /// Remove the line with this identity key.
    ///
    /// On success: toast and full reload. On failure: toast only, no state
    /// change.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, product_id: &str) {
        match self.api.remove(&ProductId::from(product_id)).await {
            Ok(()) => {
                self.toasts.notify(MSG_REMOVED);
                self.load_cart().await;
            }
            Err(e) => {
                error!("remove from cart failed: {e}");
                self.toasts.notify(&e.user_message(MSG_REMOVE_FAILED));
            }
        }
    }

    /// Explicit drawer open (toggle control): opportunistic refresh, then
    /// open.
    pub async fn open_drawer(&self) {
        self.load_cart().await;
        self.drawer.open();
    }

    /// Explicit drawer close (close control or backdrop).
    pub fn close_drawer(&self) {
        self.drawer.close();
    }
}
