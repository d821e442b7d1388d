//! Domain model for the inventory catalog.
//!
//! The wire shapes here deliberately match the HTTP API field names
//! (`item_name`, `quantity_to_add`, ...) so handlers serialize them
//! directly without mapping layers.

use serde::{Deserialize, Serialize};

/// A row in the stock catalog, as exposed over the API.
///
/// The backing table additionally carries an optional default price and an
/// optional category reference; neither is part of the CRUD wire shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    /// Store-generated identifier.
    pub id: i32,
    /// Display name, unique case-insensitively.
    pub item_name: String,
    /// On-hand quantity. Never negative.
    pub quantity: i32,
    /// Unit of measurement (e.g. carton, kg, pieces).
    pub unit: String,
}

/// Payload for creating a stock item.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewStockItem {
    /// Display name for the new item.
    pub item_name: String,
    /// Initial on-hand quantity (must be >= 0).
    pub quantity: i32,
    /// Unit of measurement.
    pub unit: String,
}

/// Partial update for a stock item. Only supplied fields change.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StockItemUpdate {
    /// New display name, if changing.
    pub item_name: Option<String>,
    /// New quantity, if changing (must be >= 0).
    pub quantity: Option<i32>,
    /// New unit, if changing.
    pub unit: Option<String>,
}

impl StockItemUpdate {
    /// True when no field is supplied. Such an update is rejected
    /// with [`crate::InventoryError::InvalidArgument`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item_name.is_none() && self.quantity.is_none() && self.unit.is_none()
    }
}

/// Identity of a deleted item, returned by the delete operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeletedItem {
    /// Identifier the item had.
    pub id: i32,
    /// Name the item had.
    pub item_name: String,
}

/// One variant row for an item, with the item's own quantity/unit
/// substituted when the item carries no variant rows ("Default").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantInfo {
    /// Canonical name of the owning item.
    pub item_name: String,
    /// Variant label ("Default" for items without variant rows).
    pub variant: String,
    /// On-hand quantity for this variant.
    pub quantity: i32,
    /// Unit of measurement.
    pub unit: String,
    /// Price per unit.
    pub price: f64,
}

/// A variant label with its price, used when listing valid choices
/// after a failed variant lookup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantChoice {
    /// Variant label.
    pub variant: String,
    /// Price per unit.
    pub price: f64,
}

/// A fully resolved (item, variant) pair ready to become a cart line.
///
/// `variant_id` is `None` when the item has no variant rows; checkout then
/// decrements the stock item row itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedVariant {
    /// Identifier of the owning stock item.
    pub stock_item_id: i32,
    /// Identifier of the variant row, when one exists.
    pub variant_id: Option<i32>,
    /// Canonical item name.
    pub item_name: String,
    /// Variant label ("Default" when no variant rows exist).
    pub variant: String,
    /// Live quantity at resolution time.
    pub quantity: i32,
    /// Unit of measurement.
    pub unit: String,
    /// Price per unit at resolution time.
    pub price: f64,
}

/// An item listed under a category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryItem {
    /// Item name.
    pub item_name: String,
    /// True when the item carries variant rows.
    pub has_variants: bool,
}

/// Result of a single-item purchase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOutcome {
    /// Name of the purchased item.
    pub item_name: String,
    /// Unit of measurement.
    pub unit: String,
    /// Quantity that was purchased.
    pub purchased_quantity: i32,
    /// Quantity remaining after the purchase.
    pub remaining_quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_is_detected() {
        assert!(StockItemUpdate::default().is_empty());
        assert!(!StockItemUpdate {
            quantity: Some(3),
            ..StockItemUpdate::default()
        }
        .is_empty());
    }

    #[test]
    fn stock_item_wire_shape() {
        let item = StockItem {
            id: 7,
            item_name: "Coke".to_string(),
            quantity: 12,
            unit: "bottles".to_string(),
        };
        let json = serde_json::to_value(&item).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "item_name": "Coke",
                "quantity": 12,
                "unit": "bottles"
            })
        );
    }

    #[test]
    fn partial_update_deserializes_missing_fields_as_none() {
        let update: StockItemUpdate =
            serde_json::from_str(r#"{"quantity": 5}"#).expect("deserializes");
        assert_eq!(update.quantity, Some(5));
        assert!(update.item_name.is_none());
        assert!(update.unit.is_none());
    }
}
