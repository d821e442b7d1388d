//! The store seam between business logic and persistence.
//!
//! Handlers and agent tools depend on this trait, never on a concrete
//! backend. Production uses the PostgreSQL implementation; tests use
//! [`crate::MemoryInventoryStore`].

use crate::cart::CartLine;
use crate::error::Result;
use crate::model::{
    CategoryItem, DeletedItem, NewStockItem, PurchaseOutcome, ResolvedVariant, StockItem,
    StockItemUpdate, VariantInfo,
};
use async_trait::async_trait;

/// Catalog queries and mutations.
///
/// All multi-statement mutations (`purchase`, `checkout`) are atomic with
/// respect to concurrent callers: the implementation must make the
/// read-check-write sequence a single transaction.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Cheap connectivity probe, used by the health endpoint.
    async fn ping(&self) -> Result<()>;

    /// All items, ordered by id.
    async fn list_items(&self) -> Result<Vec<StockItem>>;

    /// One item by id.
    ///
    /// # Errors
    ///
    /// [`crate::InventoryError::ItemNotFound`] when the id is absent.
    async fn get_item(&self, id: i32) -> Result<StockItem>;

    /// Case-insensitive substring search, ordered by name.
    async fn search_items(&self, name: &str) -> Result<Vec<StockItem>>;

    /// Items with quantity strictly below `threshold`, ascending quantity.
    async fn low_stock(&self, threshold: i32) -> Result<Vec<StockItem>>;

    /// Insert a new item.
    ///
    /// # Errors
    ///
    /// [`crate::InventoryError::DuplicateItem`] when the name already
    /// exists case-insensitively.
    async fn create_item(&self, new: NewStockItem) -> Result<StockItem>;

    /// Apply a partial update; only supplied fields change.
    ///
    /// # Errors
    ///
    /// [`crate::InventoryError::InvalidArgument`] when no field is
    /// supplied, [`crate::InventoryError::ItemNotFound`] when the id is
    /// absent.
    async fn update_item(&self, id: i32, update: StockItemUpdate) -> Result<StockItem>;

    /// Atomically increment an item's quantity (restocking).
    ///
    /// # Errors
    ///
    /// [`crate::InventoryError::InvalidArgument`] when `delta <= 0`,
    /// [`crate::InventoryError::ItemNotFound`] when the id is absent.
    async fn add_quantity(&self, id: i32, delta: i32) -> Result<StockItem>;

    /// Delete an item, returning its former identity.
    ///
    /// # Errors
    ///
    /// [`crate::InventoryError::ItemNotFound`] when the id is absent.
    async fn delete_item(&self, id: i32) -> Result<DeletedItem>;

    /// Purchase `quantity` of an item: read current stock, check
    /// availability, and write the decrement in one transaction.
    ///
    /// # Errors
    ///
    /// [`crate::InventoryError::InvalidArgument`] when `quantity <= 0`,
    /// [`crate::InventoryError::ItemNotFound`] when the id is absent,
    /// [`crate::InventoryError::InsufficientStock`] when requested exceeds
    /// available (stock is left unchanged).
    async fn purchase(&self, id: i32, quantity: i32) -> Result<PurchaseOutcome>;

    /// All variants of an item by canonical name. An item without variant
    /// rows yields one synthesized "Default" row from its own
    /// quantity/unit (price 0, matching the join's fallback).
    ///
    /// # Errors
    ///
    /// [`crate::InventoryError::ItemNameNotFound`] when the item is absent.
    async fn item_variants(&self, item_name: &str) -> Result<Vec<VariantInfo>>;

    /// Resolve an (item, variant) pair to the row a cart line will
    /// reference. For an item without variant rows any requested variant
    /// resolves to its "Default" row.
    ///
    /// # Errors
    ///
    /// [`crate::InventoryError::ItemNameNotFound`] when the item is
    /// absent; [`crate::InventoryError::VariantNotFound`] (carrying the
    /// valid choices) when the item has variants but none matches.
    async fn resolve_variant(&self, item_name: &str, variant: &str) -> Result<ResolvedVariant>;

    /// Items belonging to a category, with a has-variants marker.
    /// An unknown category yields an empty list, not an error.
    async fn category_items(&self, category: &str) -> Result<Vec<CategoryItem>>;

    /// Commit a cart: within one transaction, re-read live stock for each
    /// line in insertion order and write the decrement. All-or-nothing: a
    /// short line rolls back every prior decrement.
    ///
    /// # Errors
    ///
    /// [`crate::InventoryError::InsufficientStock`] naming the first line
    /// whose live stock no longer covers it; no partial write survives.
    async fn checkout(&self, lines: &[CartLine]) -> Result<()>;
}
