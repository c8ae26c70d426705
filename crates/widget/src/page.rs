//! Host-page seam: named UI regions and idempotent render operations.
//!
//! The widget never touches a document directly. It talks to a [`Page`]
//! implementation (browser glue, terminal display, or a test fake) through a
//! fixed set of named [`Region`]s resolved once at startup. Every operation
//! on an absent region is a no-op, never an error, so the widget degrades
//! gracefully on pages missing some elements.

use std::sync::Arc;

use askama::Template;

use panier_core::CartSnapshot;
use panier_core::money::format_minor;

use crate::error::WidgetError;
use crate::filters;

/// Named UI regions of the cart widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Control that opens the drawer.
    CartToggle,
    /// Item count badge on the toggle control.
    CountBadge,
    /// Slide-in drawer panel.
    DrawerPanel,
    /// Backdrop behind the open drawer.
    Backdrop,
    /// Close control inside the drawer.
    DrawerClose,
    /// Container receiving rendered item rows.
    ItemsContainer,
    /// Total shown inside the drawer.
    DrawerTotal,
    /// Total shown in the page summary.
    SummaryTotal,
    /// Item count shown in the page summary.
    SummaryCount,
    /// Primary checkout control.
    CheckoutPrimary,
    /// Secondary (compact) checkout control.
    CheckoutSecondary,
    /// Quick-add form.
    QuickAddForm,
}

impl Region {
    /// Conventional element id for this region on the host page.
    #[must_use]
    pub const fn dom_id(self) -> &'static str {
        match self {
            Self::CartToggle => "cart-toggle-btn",
            Self::CountBadge => "cart-count",
            Self::DrawerPanel => "cart-drawer",
            Self::Backdrop => "drawer-backdrop",
            Self::DrawerClose => "cart-drawer-close",
            Self::ItemsContainer => "cart-items",
            Self::DrawerTotal => "drawer-total",
            Self::SummaryTotal => "summary-total",
            Self::SummaryCount => "summary-count",
            Self::CheckoutPrimary => "pay-now",
            Self::CheckoutSecondary => "pay-now-small",
            Self::QuickAddForm => "quick-add-form",
        }
    }
}

/// Abstraction over the host page.
///
/// Implementations must treat operations on regions they do not have as
/// no-ops. All methods take `&self`; implementations are internally
/// synchronized because drawer and toast timers call in from spawned tasks.
pub trait Page: Send + Sync {
    /// Whether the page has this region.
    fn has(&self, region: Region) -> bool;

    /// Replace the region's text content.
    fn set_text(&self, region: Region, text: &str);

    /// Replace the region's inner markup. Callers pass escaped markup only.
    fn set_html(&self, region: Region, html: &str);

    /// Show or hide the region.
    fn set_visible(&self, region: Region, visible: bool);

    /// Mark the region hidden or visible for assistive technology.
    fn set_aria_hidden(&self, region: Region, hidden: bool);

    /// Lock or restore page scrolling.
    fn set_scroll_locked(&self, locked: bool);

    /// Mount a toast element. Returns `false` when the page's toast
    /// mechanism is unavailable or failed; the caller then falls back to
    /// [`Page::mount_toast_fallback`].
    fn mount_toast(&self, id: u64, text: &str) -> bool;

    /// Mount a minimal, manually constructed toast element. Must not fail.
    fn mount_toast_fallback(&self, id: u64, text: &str);

    /// Start fading out the toast with this id.
    fn begin_toast_fade(&self, id: u64);

    /// Remove the toast with this id from the page.
    fn unmount_toast(&self, id: u64);
}

/// Item row display data for the drawer template.
struct CartItemView {
    product_id: String,
    name: String,
    unit_price_minor: i64,
    quantity: u32,
}

/// Drawer item rows fragment template.
///
/// Askama escapes every interpolated value, covering the user-controlled
/// name and identifier strings.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
struct CartItemsTemplate {
    items: Vec<CartItemView>,
}

/// Renders snapshots into the page's regions.
///
/// All renders are idempotent: re-rendering the same snapshot writes the
/// same region values. The binder holds no cart state of its own; the most
/// recently received snapshot is always what the page shows.
#[derive(Clone)]
pub struct PageBinder {
    page: Arc<dyn Page>,
}

impl PageBinder {
    /// Bind to a host page.
    #[must_use]
    pub fn new(page: Arc<dyn Page>) -> Self {
        Self { page }
    }

    /// The bound page.
    #[must_use]
    pub fn page(&self) -> &Arc<dyn Page> {
        &self.page
    }

    /// Render badge, totals, count, and checkout visibility from a snapshot.
    pub fn render_summary(&self, snapshot: &CartSnapshot) {
        let count = snapshot.item_count;
        self.page.set_visible(Region::CountBadge, count > 0);
        self.page.set_text(Region::CountBadge, &count.to_string());

        let total = format_minor(snapshot.total_minor);
        self.page.set_text(Region::DrawerTotal, &total);
        self.page.set_text(Region::SummaryTotal, &total);
        self.page.set_text(Region::SummaryCount, &count.to_string());

        // Checkout affordance is a pure function of the item count.
        let checkout_visible = count > 0;
        self.page.set_visible(Region::CheckoutPrimary, checkout_visible);
        self.page.set_visible(Region::CheckoutSecondary, checkout_visible);
    }

    /// Render the drawer item rows from a snapshot, in server order.
    ///
    /// An empty cart renders a single explanatory placeholder row.
    ///
    /// # Errors
    ///
    /// Returns an error if the row template fails to render; no region is
    /// touched in that case.
    pub fn render_items(&self, snapshot: &CartSnapshot) -> Result<(), WidgetError> {
        let template = CartItemsTemplate {
            items: snapshot
                .lines
                .values()
                .map(|line| CartItemView {
                    product_id: line.product_id.to_string(),
                    name: line.name.clone(),
                    unit_price_minor: line.unit_price_minor,
                    quantity: line.quantity,
                })
                .collect(),
        };
        let html = template.render()?;
        self.page.set_html(Region::ItemsContainer, &html);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use indexmap::IndexMap;
    use panier_core::{CartLine, CartSnapshot, ProductId};

    use super::fake::FakePage;
    use super::*;

    fn snapshot_with(lines: &[(&str, &str, i64, u32)], total: i64, count: u32) -> CartSnapshot {
        let mut map = IndexMap::new();
        for (id, name, price, quantity) in lines {
            map.insert(
                ProductId::from(*id),
                CartLine {
                    product_id: ProductId::from(*id),
                    name: (*name).to_owned(),
                    unit_price_minor: *price,
                    quantity: *quantity,
                },
            );
        }
        CartSnapshot {
            lines: map,
            total_minor: total,
            item_count: count,
        }
    }

    #[test]
    fn summary_renders_badge_totals_and_checkout() {
        let page = Arc::new(FakePage::default());
        let binder = PageBinder::new(page.clone() as Arc<dyn Page>);

        binder.render_summary(&snapshot_with(&[("p1", "Bread", 250, 2)], 500, 1));

        let state = page.state();
        assert_eq!(state.text.get(&Region::CountBadge).unwrap(), "1");
        assert_eq!(state.visible.get(&Region::CountBadge), Some(&true));
        assert_eq!(state.text.get(&Region::DrawerTotal).unwrap(), "5,00 €");
        assert_eq!(state.text.get(&Region::SummaryTotal).unwrap(), "5,00 €");
        assert_eq!(state.text.get(&Region::SummaryCount).unwrap(), "1");
        assert_eq!(state.visible.get(&Region::CheckoutPrimary), Some(&true));
        assert_eq!(state.visible.get(&Region::CheckoutSecondary), Some(&true));
    }

    #[test]
    fn empty_summary_hides_badge_and_checkout() {
        let page = Arc::new(FakePage::default());
        let binder = PageBinder::new(page.clone() as Arc<dyn Page>);

        binder.render_summary(&CartSnapshot::empty());

        let state = page.state();
        assert_eq!(state.visible.get(&Region::CountBadge), Some(&false));
        assert_eq!(state.text.get(&Region::DrawerTotal).unwrap(), "0,00 €");
        assert_eq!(state.visible.get(&Region::CheckoutPrimary), Some(&false));
        assert_eq!(state.visible.get(&Region::CheckoutSecondary), Some(&false));
    }

    #[test]
    fn items_render_in_server_order_with_prices() {
        let page = Arc::new(FakePage::default());
        let binder = PageBinder::new(page.clone() as Arc<dyn Page>);

        let snapshot = snapshot_with(
            &[("p2", "Cheese", 700, 1), ("p1", "Bread", 250, 2)],
            1200,
            2,
        );
        binder.render_items(&snapshot).unwrap();

        let state = page.state();
        let html = state.html.get(&Region::ItemsContainer).unwrap();
        assert!(html.contains("Cheese"));
        assert!(html.contains("Bread"));
        assert!(html.contains("2,50 €"));
        assert!(html.find("Cheese").unwrap() < html.find("Bread").unwrap());
        assert!(html.contains("data-product-id=\"p1\""));
        assert_eq!(html.matches("cart-item ").count(), 2);
    }

    #[test]
    fn empty_cart_renders_placeholder_row() {
        let page = Arc::new(FakePage::default());
        let binder = PageBinder::new(page.clone() as Arc<dyn Page>);

        binder.render_items(&CartSnapshot::empty()).unwrap();

        let state = page.state();
        let html = state.html.get(&Region::ItemsContainer).unwrap();
        assert!(html.contains("Votre panier est vide."));
        assert!(!html.contains("cart-item "));
    }

    #[test]
    fn user_controlled_strings_are_escaped() {
        let page = Arc::new(FakePage::default());
        let binder = PageBinder::new(page.clone() as Arc<dyn Page>);

        let snapshot = snapshot_with(
            &[("p\"1", "<script>alert(1)</script>", 100, 1)],
            100,
            1,
        );
        binder.render_items(&snapshot).unwrap();

        let state = page.state();
        let html = state.html.get(&Region::ItemsContainer).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("data-product-id=\"p\"1\""));
    }

    #[test]
    fn absent_regions_are_ignored_without_error() {
        let page = Arc::new(FakePage::without([
            Region::CountBadge,
            Region::CheckoutSecondary,
        ]));
        let binder = PageBinder::new(page.clone() as Arc<dyn Page>);

        binder.render_summary(&snapshot_with(&[("p1", "Bread", 250, 2)], 500, 1));

        let state = page.state();
        assert!(state.text.get(&Region::CountBadge).is_none());
        assert!(state.visible.get(&Region::CheckoutSecondary).is_none());
        // Remaining regions still update.
        assert_eq!(state.text.get(&Region::DrawerTotal).unwrap(), "5,00 €");
        assert_eq!(state.visible.get(&Region::CheckoutPrimary), Some(&true));
    }

    #[test]
    fn region_dom_ids_are_stable() {
        assert_eq!(Region::CountBadge.dom_id(), "cart-count");
        assert_eq!(Region::ItemsContainer.dom_id(), "cart-items");
        assert_eq!(Region::CheckoutPrimary.dom_id(), "pay-now");
    }
}
