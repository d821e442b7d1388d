//! Session-scoped shopping cart.
//!
//! The cart is an ordered sequence of pending line items owned by exactly
//! one conversational session. Each line snapshots name, variant, unit,
//! price, and quantity at add-time; later stock changes do not touch it.
//! Lines carry back-references to the originating rows so checkout can
//! re-verify live stock.
//!
//! The cart itself does no I/O and no locking; the owning session wraps it
//! when shared with tool closures.

use crate::model::ResolvedVariant;
use serde::{Deserialize, Serialize};

/// One pending purchase entry, snapshotted at add-time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Canonical item name.
    pub item_name: String,
    /// Variant label ("Default" for items without variants).
    pub variant: String,
    /// Quantity requested.
    pub quantity: i32,
    /// Unit of measurement.
    pub unit: String,
    /// Price per unit at add-time.
    pub price_per_unit: f64,
    /// quantity x price_per_unit, fixed at add-time.
    pub total_price: f64,
    /// Backing stock item row, for checkout verification.
    pub stock_item_id: i32,
    /// Backing variant row, when one exists.
    pub variant_id: Option<i32>,
}

/// Ordered collection of [`CartLine`]s for one session.
///
/// State machine: `EMPTY -> HAS_ITEMS -> (checked out | cleared) -> EMPTY`.
/// Checkout consumes all lines atomically; [`Cart::clear`] discards them
/// unconditionally.
#[derive(Clone, Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Append a line for a resolved (item, variant) pair.
    ///
    /// The caller has already verified `quantity` against live stock;
    /// the cart only records the snapshot. Returns the appended line.
    pub fn add(&mut self, resolved: &ResolvedVariant, quantity: i32) -> CartLine {
        let line = CartLine {
            item_name: resolved.item_name.clone(),
            variant: resolved.variant.clone(),
            quantity,
            unit: resolved.unit.clone(),
            price_per_unit: resolved.price,
            total_price: resolved.price * f64::from(quantity),
            stock_item_id: resolved.stock_item_id,
            variant_id: resolved.variant_id,
        };
        self.lines.push(line.clone());
        line
    }

    /// All lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.lines.iter().map(|line| line.total_price).sum()
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when no lines exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Discard all lines unconditionally.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(name: &str, variant: &str, price: f64) -> ResolvedVariant {
        ResolvedVariant {
            stock_item_id: 1,
            variant_id: Some(10),
            item_name: name.to_string(),
            variant: variant.to_string(),
            quantity: 100,
            unit: "bottles".to_string(),
            price,
        }
    }

    #[test]
    fn line_total_is_quantity_times_price() {
        let mut cart = Cart::new();
        let line = cart.add(&resolved("Coke", "Regular", 1.5), 4);
        assert!((line.total_price - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cart_total_sums_line_totals() {
        let mut cart = Cart::new();
        cart.add(&resolved("Coke", "Regular", 1.5), 4);
        cart.add(&resolved("Lays", "Default", 2.0), 3);
        assert!((cart.total() - 12.0).abs() < f64::EPSILON);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn snapshot_is_independent_of_later_resolution_changes() {
        let mut cart = Cart::new();
        let mut source = resolved("Coke", "Regular", 1.5);
        cart.add(&source, 2);
        // Simulate a price change after add-time
        source.price = 9.99;
        assert!((cart.total() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn clear_always_empties() {
        let mut cart = Cart::new();
        assert!(cart.is_empty());
        cart.add(&resolved("Coke", "Regular", 1.5), 1);
        assert!(!cart.is_empty());
        cart.clear();
        assert!(cart.is_empty());
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&resolved("Coke", "Regular", 1.0), 1);
        cart.add(&resolved("Lays", "Default", 1.0), 1);
        cart.add(&resolved("Bisckets", "Default", 1.0), 1);
        let names: Vec<&str> = cart.lines().iter().map(|l| l.item_name.as_str()).collect();
        assert_eq!(names, vec!["Coke", "Lays", "Bisckets"]);
    }
}
