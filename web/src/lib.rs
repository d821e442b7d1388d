//! Axum REST surface for the Storevoice inventory API.
//!
//! Handlers are thin: extract the request, call the [`storevoice_core::InventoryStore`]
//! behind [`AppState`], and map the domain result (or [`storevoice_core::InventoryError`])
//! to JSON. No business rule lives in this crate.
//!
//! # Routes
//!
//! ```text
//! GET    /                              service banner
//! GET    /health                        store connectivity probe
//! GET    /stocks                        all items
//! GET    /stocks/:item_id               one item
//! GET    /stocks/search/:item_name      case-insensitive substring search
//! GET    /stocks/low-stock/:threshold   items below threshold
//! POST   /stocks                        create item (201)
//! PUT    /stocks/:item_id               partial update
//! POST   /stocks/:item_id/add-quantity  restock
//! POST   /purchase                      atomic purchase
//! DELETE /stocks/:item_id               delete item
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use error::AppError;
pub use middleware::{correlation_id_layer, CORRELATION_ID_HEADER};
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;

/// Build the full application router over the given state.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::meta::root))
        .route("/health", get(handlers::meta::health))
        .route(
            "/stocks",
            get(handlers::stocks::get_all).post(handlers::stocks::create),
        )
        .route(
            "/stocks/:item_id",
            get(handlers::stocks::get_by_id)
                .put(handlers::stocks::update)
                .delete(handlers::stocks::delete),
        )
        .route("/stocks/search/:item_name", get(handlers::stocks::search))
        .route(
            "/stocks/low-stock/:threshold",
            get(handlers::stocks::low_stock),
        )
        .route(
            "/stocks/:item_id/add-quantity",
            post(handlers::stocks::add_quantity),
        )
        .route("/purchase", post(handlers::stocks::purchase))
        .layer(correlation_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
