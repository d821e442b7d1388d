//! In-memory [`InventoryStore`] for tests.
//!
//! Mirrors the PostgreSQL implementation's semantics exactly, including
//! checkout atomicity (lines validated sequentially before any write) and
//! the COALESCE fallbacks of the variant join. Handler and agent-tool
//! tests run against this store at memory speed.

use crate::cart::CartLine;
use crate::error::{InventoryError, Result};
use crate::model::{
    CategoryItem, DeletedItem, NewStockItem, PurchaseOutcome, ResolvedVariant, StockItem,
    StockItemUpdate, VariantChoice, VariantInfo,
};
use crate::store::InventoryStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Clone, Debug)]
struct ItemRow {
    id: i32,
    item_name: String,
    quantity: i32,
    unit: String,
    price: Option<f64>,
    category_id: Option<i32>,
}

#[derive(Clone, Debug)]
struct VariantRow {
    id: i32,
    stock_item_id: i32,
    variant: String,
    quantity: i32,
    unit: String,
    price: f64,
}

#[derive(Clone, Debug)]
struct CategoryRow {
    id: i32,
    name: String,
}

#[derive(Debug, Default)]
struct Inner {
    items: Vec<ItemRow>,
    variants: Vec<VariantRow>,
    categories: Vec<CategoryRow>,
    next_item_id: i32,
    next_variant_id: i32,
    next_category_id: i32,
}

/// Thread-safe in-memory catalog store.
#[derive(Debug, Default)]
pub struct MemoryInventoryStore {
    inner: Mutex<Inner>,
}

fn ci_eq(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

impl MemoryInventoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::expect_used)]
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .expect("memory store lock poisoned - indicates a panic in another thread")
    }

    /// Seed a stock item, returning its id.
    pub fn seed_item(&self, name: &str, quantity: i32, unit: &str) -> i32 {
        let mut inner = self.lock();
        inner.next_item_id += 1;
        let id = inner.next_item_id;
        inner.items.push(ItemRow {
            id,
            item_name: name.to_string(),
            quantity,
            unit: unit.to_string(),
            price: None,
            category_id: None,
        });
        id
    }

    /// Seed a variant row under an item, returning its id.
    pub fn seed_variant(&self, item_id: i32, label: &str, quantity: i32, unit: &str, price: f64) -> i32 {
        let mut inner = self.lock();
        inner.next_variant_id += 1;
        let id = inner.next_variant_id;
        inner.variants.push(VariantRow {
            id,
            stock_item_id: item_id,
            variant: label.to_string(),
            quantity,
            unit: unit.to_string(),
            price,
        });
        id
    }

    /// Seed a category, returning its id.
    pub fn seed_category(&self, name: &str) -> i32 {
        let mut inner = self.lock();
        inner.next_category_id += 1;
        let id = inner.next_category_id;
        inner.categories.push(CategoryRow {
            id,
            name: name.to_string(),
        });
        id
    }

    /// Attach an item to a category.
    pub fn assign_category(&self, item_id: i32, category_id: i32) {
        let mut inner = self.lock();
        if let Some(item) = inner.items.iter_mut().find(|i| i.id == item_id) {
            item.category_id = Some(category_id);
        }
    }

    /// Set an item's default price (the fallback used when listing
    /// variant choices).
    pub fn set_item_price(&self, item_id: i32, price: f64) {
        let mut inner = self.lock();
        if let Some(item) = inner.items.iter_mut().find(|i| i.id == item_id) {
            item.price = Some(price);
        }
    }

    /// Current quantity of a variant row, for test assertions.
    #[must_use]
    pub fn variant_quantity(&self, variant_id: i32) -> Option<i32> {
        let inner = self.lock();
        inner
            .variants
            .iter()
            .find(|v| v.id == variant_id)
            .map(|v| v.quantity)
    }
}

fn to_stock_item(row: &ItemRow) -> StockItem {
    StockItem {
        id: row.id,
        item_name: row.item_name.clone(),
        quantity: row.quantity,
        unit: row.unit.clone(),
    }
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn list_items(&self) -> Result<Vec<StockItem>> {
        let inner = self.lock();
        let mut items: Vec<StockItem> = inner.items.iter().map(to_stock_item).collect();
        items.sort_by_key(|item| item.id);
        Ok(items)
    }

    async fn get_item(&self, id: i32) -> Result<StockItem> {
        let inner = self.lock();
        inner
            .items
            .iter()
            .find(|item| item.id == id)
            .map(to_stock_item)
            .ok_or(InventoryError::ItemNotFound(id))
    }

    async fn search_items(&self, name: &str) -> Result<Vec<StockItem>> {
        let needle = name.to_lowercase();
        let inner = self.lock();
        let mut items: Vec<StockItem> = inner
            .items
            .iter()
            .filter(|item| item.item_name.to_lowercase().contains(&needle))
            .map(to_stock_item)
            .collect();
        items.sort_by(|a, b| a.item_name.cmp(&b.item_name));
        Ok(items)
    }

    async fn low_stock(&self, threshold: i32) -> Result<Vec<StockItem>> {
        let inner = self.lock();
        let mut items: Vec<StockItem> = inner
            .items
            .iter()
            .filter(|item| item.quantity < threshold)
            .map(to_stock_item)
            .collect();
        items.sort_by_key(|item| item.quantity);
        Ok(items)
    }

    async fn create_item(&self, new: NewStockItem) -> Result<StockItem> {
        let mut inner = self.lock();
        if inner
            .items
            .iter()
            .any(|item| ci_eq(&item.item_name, &new.item_name))
        {
            return Err(InventoryError::DuplicateItem(new.item_name));
        }
        inner.next_item_id += 1;
        let row = ItemRow {
            id: inner.next_item_id,
            item_name: new.item_name,
            quantity: new.quantity,
            unit: new.unit,
            price: None,
            category_id: None,
        };
        inner.items.push(row.clone());
        Ok(to_stock_item(&row))
    }

    async fn update_item(&self, id: i32, update: StockItemUpdate) -> Result<StockItem> {
        if update.is_empty() {
            return Err(InventoryError::invalid("No fields to update"));
        }
        let mut inner = self.lock();
        if let Some(new_name) = &update.item_name {
            if inner
                .items
                .iter()
                .any(|item| item.id != id && ci_eq(&item.item_name, new_name))
            {
                return Err(InventoryError::DuplicateItem(new_name.clone()));
            }
        }
        let item = inner
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(InventoryError::ItemNotFound(id))?;
        if let Some(name) = update.item_name {
            item.item_name = name;
        }
        if let Some(quantity) = update.quantity {
            item.quantity = quantity;
        }
        if let Some(unit) = update.unit {
            item.unit = unit;
        }
        Ok(to_stock_item(item))
    }

    async fn add_quantity(&self, id: i32, delta: i32) -> Result<StockItem> {
        if delta <= 0 {
            return Err(InventoryError::invalid("Quantity to add must be > 0"));
        }
        let mut inner = self.lock();
        let item = inner
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(InventoryError::ItemNotFound(id))?;
        item.quantity += delta;
        Ok(to_stock_item(item))
    }

    async fn delete_item(&self, id: i32) -> Result<DeletedItem> {
        let mut inner = self.lock();
        let position = inner
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(InventoryError::ItemNotFound(id))?;
        let removed = inner.items.remove(position);
        inner.variants.retain(|variant| variant.stock_item_id != id);
        Ok(DeletedItem {
            id: removed.id,
            item_name: removed.item_name,
        })
    }

    async fn purchase(&self, id: i32, quantity: i32) -> Result<PurchaseOutcome> {
        if quantity <= 0 {
            return Err(InventoryError::invalid("Purchase quantity must be > 0"));
        }
        let mut inner = self.lock();
        let item = inner
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(InventoryError::ItemNotFound(id))?;
        if item.quantity < quantity {
            return Err(InventoryError::InsufficientStock {
                item: item.item_name.clone(),
                variant: None,
                available: item.quantity,
                requested: quantity,
            });
        }
        item.quantity -= quantity;
        Ok(PurchaseOutcome {
            item_name: item.item_name.clone(),
            unit: item.unit.clone(),
            purchased_quantity: quantity,
            remaining_quantity: item.quantity,
        })
    }

    async fn item_variants(&self, item_name: &str) -> Result<Vec<VariantInfo>> {
        let inner = self.lock();
        let item = inner
            .items
            .iter()
            .find(|item| ci_eq(&item.item_name, item_name))
            .ok_or_else(|| InventoryError::ItemNameNotFound(item_name.to_string()))?;
        let mut rows: Vec<VariantInfo> = inner
            .variants
            .iter()
            .filter(|variant| variant.stock_item_id == item.id)
            .map(|variant| VariantInfo {
                item_name: item.item_name.clone(),
                variant: variant.variant.clone(),
                quantity: variant.quantity,
                unit: variant.unit.clone(),
                price: variant.price,
            })
            .collect();
        if rows.is_empty() {
            // Same fallback the LEFT JOIN produces: the item's own row
            // labeled "Default" with price 0.
            rows.push(VariantInfo {
                item_name: item.item_name.clone(),
                variant: "Default".to_string(),
                quantity: item.quantity,
                unit: item.unit.clone(),
                price: 0.0,
            });
        }
        rows.sort_by(|a, b| a.variant.cmp(&b.variant));
        Ok(rows)
    }

    async fn resolve_variant(&self, item_name: &str, variant: &str) -> Result<ResolvedVariant> {
        let inner = self.lock();
        let item = inner
            .items
            .iter()
            .find(|item| ci_eq(&item.item_name, item_name))
            .ok_or_else(|| InventoryError::ItemNameNotFound(item_name.to_string()))?;
        let variants: Vec<&VariantRow> = inner
            .variants
            .iter()
            .filter(|row| row.stock_item_id == item.id)
            .collect();
        if variants.is_empty() {
            // No variant rows: any requested label resolves to the item's
            // implicit Default row.
            return Ok(ResolvedVariant {
                stock_item_id: item.id,
                variant_id: None,
                item_name: item.item_name.clone(),
                variant: "Default".to_string(),
                quantity: item.quantity,
                unit: item.unit.clone(),
                price: 0.0,
            });
        }
        match variants.iter().find(|row| ci_eq(&row.variant, variant)) {
            Some(row) => Ok(ResolvedVariant {
                stock_item_id: item.id,
                variant_id: Some(row.id),
                item_name: item.item_name.clone(),
                variant: row.variant.clone(),
                quantity: row.quantity,
                unit: row.unit.clone(),
                price: row.price,
            }),
            None => Err(InventoryError::VariantNotFound {
                item: item.item_name.clone(),
                variant: variant.to_string(),
                available: variants
                    .iter()
                    .map(|row| VariantChoice {
                        variant: row.variant.clone(),
                        price: row.price,
                    })
                    .collect(),
            }),
        }
    }

    async fn category_items(&self, category: &str) -> Result<Vec<CategoryItem>> {
        let inner = self.lock();
        let Some(cat) = inner
            .categories
            .iter()
            .find(|row| ci_eq(&row.name, category))
        else {
            return Ok(Vec::new());
        };
        let mut items: Vec<CategoryItem> = inner
            .items
            .iter()
            .filter(|item| item.category_id == Some(cat.id))
            .map(|item| CategoryItem {
                item_name: item.item_name.clone(),
                has_variants: inner
                    .variants
                    .iter()
                    .any(|variant| variant.stock_item_id == item.id),
            })
            .collect();
        items.sort_by(|a, b| a.item_name.cmp(&b.item_name));
        Ok(items)
    }

    async fn checkout(&self, lines: &[CartLine]) -> Result<()> {
        let mut inner = self.lock();
        // Validate in insertion order before touching any row, tracking
        // decrements from earlier lines so a repeated row comes up short
        // exactly where the sequential transaction would.
        let mut pending: HashMap<(bool, i32), i32> = HashMap::new();
        for line in lines {
            let (key, on_hand, item, variant) = match line.variant_id {
                Some(variant_id) => {
                    let row = inner.variants.iter().find(|v| v.id == variant_id);
                    (
                        (true, variant_id),
                        row.map_or(0, |v| v.quantity),
                        line.item_name.clone(),
                        Some(line.variant.clone()),
                    )
                }
                None => {
                    let row = inner.items.iter().find(|i| i.id == line.stock_item_id);
                    (
                        (false, line.stock_item_id),
                        row.map_or(0, |i| i.quantity),
                        line.item_name.clone(),
                        None,
                    )
                }
            };
            let available = on_hand - pending.get(&key).copied().unwrap_or(0);
            if available < line.quantity {
                return Err(InventoryError::InsufficientStock {
                    item,
                    variant,
                    available,
                    requested: line.quantity,
                });
            }
            *pending.entry(key).or_insert(0) += line.quantity;
        }
        for line in lines {
            match line.variant_id {
                Some(variant_id) => {
                    if let Some(row) = inner.variants.iter_mut().find(|v| v.id == variant_id) {
                        row.quantity -= line.quantity;
                    }
                }
                None => {
                    if let Some(row) = inner.items.iter_mut().find(|i| i.id == line.stock_item_id) {
                        row.quantity -= line.quantity;
                    }
                }
            }
        }
        Ok(())
    }
}
