//! # Storevoice Core
//!
//! Domain model and business rules for the Storevoice inventory system.
//!
//! This crate is the functional core shared by the HTTP surface and the
//! voice-agent tool surface:
//!
//! - **Model**: catalog items, variants, categories, and the wire shapes
//!   the API exposes
//! - **Errors**: the full failure taxonomy ([`InventoryError`]) that both
//!   surfaces map to their own response formats
//! - **Normalizer**: free-text item/variant/category names resolved to
//!   canonical catalog names via static lookup tables
//! - **Cart**: the per-session pending-purchase state machine
//! - **Store seam**: the [`InventoryStore`] trait implemented by the
//!   PostgreSQL backend and by [`MemoryInventoryStore`] for tests
//!
//! Everything here is testable at memory speed; I/O lives behind the
//! store trait.

pub mod cart;
pub mod error;
pub mod memory;
pub mod model;
pub mod normalize;
pub mod store;

pub use cart::{Cart, CartLine};
pub use error::{InventoryError, Result};
pub use memory::MemoryInventoryStore;
pub use model::{
    CategoryItem, DeletedItem, NewStockItem, PurchaseOutcome, ResolvedVariant, StockItem,
    StockItemUpdate, VariantChoice, VariantInfo,
};
pub use normalize::{normalize, NameKind};
pub use store::InventoryStore;
