//! Stock CRUD and purchase handlers.
//!
//! Request/response field names match the service's published API
//! (`item_name`, `quantity_to_add`, ...). Input constraints that the
//! store treats as caller responsibility (non-negative quantities) are
//! enforced here with 400s.

use crate::error::AppError;
use crate::state::AppState;
use crate::WebResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use storevoice_core::{NewStockItem, StockItem, StockItemUpdate};

/// Body of `POST /purchase`.
#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    /// Item to purchase.
    pub item_id: i32,
    /// Quantity to purchase (must be > 0).
    pub quantity: i32,
}

/// Response of `POST /purchase`.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// Purchased item name.
    pub item_name: String,
    /// Quantity purchased.
    pub purchased_quantity: i32,
    /// Quantity remaining on hand.
    pub remaining_quantity: i32,
}

/// Body of `POST /stocks/:item_id/add-quantity`.
#[derive(Debug, Deserialize)]
pub struct AddQuantityRequest {
    /// Quantity to add to stock (must be > 0).
    pub quantity_to_add: i32,
}

/// Confirmation message body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// `GET /stocks` — all items ordered by id.
pub async fn get_all(State(state): State<AppState>) -> WebResult<Json<Vec<StockItem>>> {
    Ok(Json(state.store.list_items().await?))
}

/// `GET /stocks/:item_id` — one item or 404.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> WebResult<Json<StockItem>> {
    Ok(Json(state.store.get_item(item_id).await?))
}

/// `GET /stocks/search/:item_name` — case-insensitive substring match.
pub async fn search(
    State(state): State<AppState>,
    Path(item_name): Path<String>,
) -> WebResult<Json<Vec<StockItem>>> {
    Ok(Json(state.store.search_items(&item_name).await?))
}

/// `GET /stocks/low-stock/:threshold` — items below threshold.
pub async fn low_stock(
    State(state): State<AppState>,
    Path(threshold): Path<i32>,
) -> WebResult<Json<Vec<StockItem>>> {
    Ok(Json(state.store.low_stock(threshold).await?))
}

/// `POST /stocks` — create an item; 201 on success, 400 on duplicate name.
pub async fn create(
    State(state): State<AppState>,
    Json(new): Json<NewStockItem>,
) -> WebResult<(StatusCode, Json<StockItem>)> {
    if new.quantity < 0 {
        return Err(AppError::bad_request("Quantity must be >= 0"));
    }
    let item = state.store.create_item(new).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /stocks/:item_id` — partial update; 400 on empty body, 404 on
/// missing id.
pub async fn update(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
    Json(update): Json<StockItemUpdate>,
) -> WebResult<Json<StockItem>> {
    if update.quantity.is_some_and(|q| q < 0) {
        return Err(AppError::bad_request("Quantity must be >= 0"));
    }
    Ok(Json(state.store.update_item(item_id, update).await?))
}

/// `POST /stocks/:item_id/add-quantity` — restock an existing item.
pub async fn add_quantity(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
    Json(request): Json<AddQuantityRequest>,
) -> WebResult<Json<StockItem>> {
    Ok(Json(
        state
            .store
            .add_quantity(item_id, request.quantity_to_add)
            .await?,
    ))
}

/// `POST /purchase` — atomic purchase with insufficient-stock check.
pub async fn purchase(
    State(state): State<AppState>,
    Json(request): Json<PurchaseRequest>,
) -> WebResult<Json<PurchaseResponse>> {
    let outcome = state
        .store
        .purchase(request.item_id, request.quantity)
        .await?;
    Ok(Json(PurchaseResponse {
        message: format!(
            "Successfully purchased {} {} of {}",
            outcome.purchased_quantity, outcome.unit, outcome.item_name
        ),
        item_name: outcome.item_name,
        purchased_quantity: outcome.purchased_quantity,
        remaining_quantity: outcome.remaining_quantity,
    }))
}

/// `DELETE /stocks/:item_id` — delete an item, confirming its identity.
pub async fn delete(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> WebResult<Json<MessageResponse>> {
    let deleted = state.store.delete_item(item_id).await?;
    Ok(Json(MessageResponse {
        message: format!(
            "Stock item '{}' (ID: {}) deleted successfully",
            deleted.item_name, deleted.id
        ),
    }))
}
