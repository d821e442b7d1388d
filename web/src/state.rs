//! Application state for Axum handlers.

use std::sync::Arc;
use storevoice_core::InventoryStore;

/// Shared state injected into every handler.
///
/// Holds the store behind the trait seam so tests can swap in
/// [`storevoice_core::MemoryInventoryStore`] while production wires up the
/// PostgreSQL implementation.
#[derive(Clone)]
pub struct AppState {
    /// The catalog store.
    pub store: Arc<dyn InventoryStore>,
}

impl AppState {
    /// Create state over any store implementation.
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }
}
