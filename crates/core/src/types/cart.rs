//! Cart lines and the server-authoritative snapshot.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// A single product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Identity key, unique per cart.
    pub product_id: ProductId,
    /// Display name, user-controlled; must be escaped when rendered.
    pub name: String,
    /// Unit price in minor units (cents).
    pub unit_price_minor: i64,
    /// Line quantity, at least 1.
    pub quantity: u32,
}

/// The full, authoritative cart state as returned by the server.
///
/// The client never computes `total_minor` or `item_count` itself; both are
/// trusted verbatim. A snapshot is replaced wholesale on every successful
/// load/add/remove response and never partially patched.
///
/// `lines` iterates in the order the server returned them. That order is not
/// guaranteed stable across reloads and is used for rendering only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Line mapping keyed by product identity.
    pub lines: IndexMap<ProductId, CartLine>,
    /// Server-computed cart total in minor units.
    pub total_minor: i64,
    /// Server-computed item count (distinct lines or units, server's call).
    pub item_count: u32,
}

impl CartSnapshot {
    /// An empty cart with zero totals.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the snapshot holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_preserve_server_order() {
        let mut snapshot = CartSnapshot::empty();
        for id in ["b", "a", "c"] {
            snapshot.lines.insert(
                ProductId::from(id),
                CartLine {
                    product_id: ProductId::from(id),
                    name: id.to_uppercase(),
                    unit_price_minor: 100,
                    quantity: 1,
                },
            );
        }
        let order: Vec<&str> = snapshot.lines.keys().map(ProductId::as_str).collect();
        assert_eq!(order, ["b", "a", "c"]);
    }

    #[test]
    fn empty_snapshot_has_zero_totals() {
        let snapshot = CartSnapshot::empty();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.total_minor, 0);
        assert_eq!(snapshot.item_count, 0);
    }
}
