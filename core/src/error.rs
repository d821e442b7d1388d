//! Inventory failure taxonomy.
//!
//! Both surfaces consume this one enum: the HTTP layer maps variants to
//! status codes, the voice-agent layer converts them into apologetic
//! natural-language sentences. Display strings double as the HTTP `detail`
//! field, so they match the API's wording exactly.

use crate::model::VariantChoice;
use thiserror::Error;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, InventoryError>;

/// Everything that can go wrong with an inventory operation.
#[derive(Clone, Debug, Error)]
pub enum InventoryError {
    /// No stock item with the given id.
    #[error("Stock item with ID {0} not found")]
    ItemNotFound(i32),

    /// No stock item with the given (canonical) name.
    #[error("Item '{0}' not found in inventory")]
    ItemNameNotFound(String),

    /// The item exists but the requested variant does not.
    /// Carries the valid choices so callers can suggest them.
    #[error("Variant '{variant}' of '{item}' not found")]
    VariantNotFound {
        /// Item whose variant was requested.
        item: String,
        /// The variant label that failed to resolve.
        variant: String,
        /// Valid variants with prices, for a helpful message.
        available: Vec<VariantChoice>,
    },

    /// Create collided with an existing name (case-insensitive).
    #[error("Item '{0}' already exists. Use PUT to update quantity.")]
    DuplicateItem(String),

    /// Malformed request: empty update, non-positive quantity, empty cart.
    #[error("{0}")]
    InvalidArgument(String),

    /// Requested quantity exceeds what is on hand.
    #[error("Insufficient stock. Available: {available}, Requested: {requested}")]
    InsufficientStock {
        /// Item that came up short.
        item: String,
        /// Variant label, when the shortage is on a variant row.
        variant: Option<String>,
        /// Live quantity at check time.
        available: i32,
        /// Quantity that was requested.
        requested: i32,
    },

    /// Connection or transaction failure in the backing store.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl InventoryError {
    /// Shorthand for an [`InventoryError::InvalidArgument`].
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_api_detail_strings() {
        assert_eq!(
            InventoryError::ItemNotFound(42).to_string(),
            "Stock item with ID 42 not found"
        );
        assert_eq!(
            InventoryError::DuplicateItem("Coke".to_string()).to_string(),
            "Item 'Coke' already exists. Use PUT to update quantity."
        );
        assert_eq!(
            InventoryError::InsufficientStock {
                item: "Coke".to_string(),
                variant: None,
                available: 3,
                requested: 9,
            }
            .to_string(),
            "Insufficient stock. Available: 3, Requested: 9"
        );
    }
}
