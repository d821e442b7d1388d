//! PostgreSQL inventory store for Storevoice.
//!
//! Implements the `InventoryStore` trait from `storevoice-core` over a
//! pooled sqlx connection. Multi-statement mutations (purchase, checkout)
//! run inside one transaction with `SELECT ... FOR UPDATE` row locks so the
//! read-check-write sequence cannot interleave with a concurrent purchase
//! of the same row.
//!
//! # Example
//!
//! ```ignore
//! use storevoice_postgres::{DatabaseConfig, PostgresInventoryStore};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let store = PostgresInventoryStore::connect(&config).await?;
//!     store.migrate().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod store;

pub use config::DatabaseConfig;
pub use store::PostgresInventoryStore;
