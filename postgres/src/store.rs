//! `InventoryStore` over a pooled sqlx connection.

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use storevoice_core::{
    CartLine, CategoryItem, DeletedItem, InventoryError, InventoryStore, NewStockItem,
    PurchaseOutcome, ResolvedVariant, Result, StockItem, StockItemUpdate, VariantChoice,
    VariantInfo,
};

use crate::config::DatabaseConfig;

/// PostgreSQL-backed catalog store.
#[derive(Clone)]
pub struct PostgresInventoryStore {
    pool: PgPool,
}

fn db_err(e: sqlx::Error) -> InventoryError {
    InventoryError::Unavailable(e.to_string())
}

fn row_to_item(row: &PgRow) -> Result<StockItem> {
    Ok(StockItem {
        id: row.try_get("id").map_err(db_err)?,
        item_name: row.try_get("item_name").map_err(db_err)?,
        quantity: row.try_get("quantity").map_err(db_err)?,
        unit: row.try_get("unit").map_err(db_err)?,
    })
}

impl PostgresInventoryStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a pool from config and connect.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Unavailable`] when the database cannot
    /// be reached.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.connection_string())
            .await
            .map_err(db_err)?;
        Ok(Self::new(pool))
    }

    /// Run embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Unavailable`] when a migration fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| InventoryError::Unavailable(format!("Migration failed: {e}")))?;
        Ok(())
    }

    /// The underlying pool, for callers that need raw access.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Valid variants of an item with prices, for the not-found message.
    /// Falls back to the item's own price when a variant carries none.
    async fn variant_choices(&self, item_name: &str) -> Result<Vec<VariantChoice>> {
        let rows = sqlx::query(
            r"
            SELECT COALESCE(v.variant, 'Default') AS variant,
                   COALESCE(v.price, s.price, 0) AS price
            FROM stock_items s
            LEFT JOIN item_variants v ON s.id = v.stock_item_id
            WHERE LOWER(TRIM(s.item_name)) = LOWER(TRIM($1))
            ORDER BY variant
            ",
        )
        .bind(item_name)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter()
            .map(|row| {
                Ok(VariantChoice {
                    variant: row.try_get("variant").map_err(db_err)?,
                    price: row.try_get("price").map_err(db_err)?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl InventoryStore for PostgresInventoryStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list_items(&self) -> Result<Vec<StockItem>> {
        let rows = sqlx::query(
            "SELECT id, item_name, quantity, unit FROM stock_items ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(row_to_item).collect()
    }

    async fn get_item(&self, id: i32) -> Result<StockItem> {
        let row = sqlx::query(
            "SELECT id, item_name, quantity, unit FROM stock_items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(InventoryError::ItemNotFound(id))?;
        row_to_item(&row)
    }

    async fn search_items(&self, name: &str) -> Result<Vec<StockItem>> {
        let rows = sqlx::query(
            r"
            SELECT id, item_name, quantity, unit
            FROM stock_items
            WHERE item_name ILIKE $1
            ORDER BY item_name
            ",
        )
        .bind(format!("%{name}%"))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(row_to_item).collect()
    }

    async fn low_stock(&self, threshold: i32) -> Result<Vec<StockItem>> {
        let rows = sqlx::query(
            r"
            SELECT id, item_name, quantity, unit
            FROM stock_items
            WHERE quantity < $1
            ORDER BY quantity ASC
            ",
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(row_to_item).collect()
    }

    async fn create_item(&self, new: NewStockItem) -> Result<StockItem> {
        let row = sqlx::query(
            r"
            INSERT INTO stock_items (item_name, quantity, unit)
            VALUES ($1, $2, $3)
            RETURNING id, item_name, quantity, unit
            ",
        )
        .bind(&new.item_name)
        .bind(new.quantity)
        .bind(&new.unit)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return InventoryError::DuplicateItem(new.item_name.clone());
                }
            }
            db_err(e)
        })?;
        row_to_item(&row)
    }

    async fn update_item(&self, id: i32, update: StockItemUpdate) -> Result<StockItem> {
        if update.is_empty() {
            return Err(InventoryError::invalid("No fields to update"));
        }
        // Static statement: absent fields bind NULL and COALESCE away,
        // so the parameter list never changes shape.
        let renamed_to = update.item_name.clone();
        let row = sqlx::query(
            r"
            UPDATE stock_items
            SET item_name = COALESCE($2, item_name),
                quantity  = COALESCE($3, quantity),
                unit      = COALESCE($4, unit)
            WHERE id = $1
            RETURNING id, item_name, quantity, unit
            ",
        )
        .bind(id)
        .bind(update.item_name)
        .bind(update.quantity)
        .bind(update.unit)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return InventoryError::DuplicateItem(renamed_to.unwrap_or_default());
                }
            }
            db_err(e)
        })?
        .ok_or(InventoryError::ItemNotFound(id))?;
        row_to_item(&row)
    }

    async fn add_quantity(&self, id: i32, delta: i32) -> Result<StockItem> {
        if delta <= 0 {
            return Err(InventoryError::invalid("Quantity to add must be > 0"));
        }
        let row = sqlx::query(
            r"
            UPDATE stock_items
            SET quantity = quantity + $2
            WHERE id = $1
            RETURNING id, item_name, quantity, unit
            ",
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(InventoryError::ItemNotFound(id))?;
        row_to_item(&row)
    }

    async fn delete_item(&self, id: i32) -> Result<DeletedItem> {
        let row = sqlx::query(
            "DELETE FROM stock_items WHERE id = $1 RETURNING id, item_name",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(InventoryError::ItemNotFound(id))?;
        Ok(DeletedItem {
            id: row.try_get("id").map_err(db_err)?,
            item_name: row.try_get("item_name").map_err(db_err)?,
        })
    }

    async fn purchase(&self, id: i32, quantity: i32) -> Result<PurchaseOutcome> {
        if quantity <= 0 {
            return Err(InventoryError::invalid("Purchase quantity must be > 0"));
        }

        // Row lock serializes concurrent purchases of the same item under
        // READ COMMITTED; dropping the transaction on any error path rolls
        // everything back.
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row = sqlx::query(
            r"
            SELECT id, item_name, quantity, unit
            FROM stock_items
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?
        .ok_or(InventoryError::ItemNotFound(id))?;
        let current = row_to_item(&row)?;

        if current.quantity < quantity {
            return Err(InventoryError::InsufficientStock {
                item: current.item_name,
                variant: None,
                available: current.quantity,
                requested: quantity,
            });
        }

        let remaining = current.quantity - quantity;
        sqlx::query("UPDATE stock_items SET quantity = $1 WHERE id = $2")
            .bind(remaining)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        tracing::info!(
            item = %current.item_name,
            purchased = quantity,
            remaining,
            "purchase committed"
        );

        Ok(PurchaseOutcome {
            item_name: current.item_name,
            unit: current.unit,
            purchased_quantity: quantity,
            remaining_quantity: remaining,
        })
    }

    async fn item_variants(&self, item_name: &str) -> Result<Vec<VariantInfo>> {
        let rows = sqlx::query(
            r"
            SELECT s.item_name,
                   COALESCE(v.variant, 'Default') AS variant,
                   COALESCE(v.quantity, s.quantity) AS quantity,
                   COALESCE(v.unit, s.unit) AS unit,
                   COALESCE(v.price, 0) AS price
            FROM stock_items s
            LEFT JOIN item_variants v ON s.id = v.stock_item_id
            WHERE LOWER(TRIM(s.item_name)) = LOWER(TRIM($1))
            ORDER BY variant
            ",
        )
        .bind(item_name)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        if rows.is_empty() {
            return Err(InventoryError::ItemNameNotFound(item_name.to_string()));
        }

        rows.iter()
            .map(|row| {
                Ok(VariantInfo {
                    item_name: row.try_get("item_name").map_err(db_err)?,
                    variant: row.try_get("variant").map_err(db_err)?,
                    quantity: row.try_get("quantity").map_err(db_err)?,
                    unit: row.try_get("unit").map_err(db_err)?,
                    price: row.try_get("price").map_err(db_err)?,
                })
            })
            .collect()
    }

    async fn resolve_variant(&self, item_name: &str, variant: &str) -> Result<ResolvedVariant> {
        // For an item without variant rows the LEFT JOIN leaves v.variant
        // NULL, so any requested label resolves to the implicit Default row.
        let row = sqlx::query(
            r"
            SELECT s.id AS stock_item_id,
                   s.item_name,
                   COALESCE(v.variant, 'Default') AS variant,
                   COALESCE(v.quantity, s.quantity) AS quantity,
                   COALESCE(v.unit, s.unit) AS unit,
                   COALESCE(v.price, 0) AS price,
                   v.id AS variant_id
            FROM stock_items s
            LEFT JOIN item_variants v ON s.id = v.stock_item_id
            WHERE LOWER(TRIM(s.item_name)) = LOWER(TRIM($1))
              AND (v.variant IS NULL OR LOWER(TRIM(v.variant)) = LOWER(TRIM($2)))
            ",
        )
        .bind(item_name)
        .bind(variant)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        if let Some(row) = row {
            return Ok(ResolvedVariant {
                stock_item_id: row.try_get("stock_item_id").map_err(db_err)?,
                variant_id: row.try_get("variant_id").map_err(db_err)?,
                item_name: row.try_get("item_name").map_err(db_err)?,
                variant: row.try_get("variant").map_err(db_err)?,
                quantity: row.try_get("quantity").map_err(db_err)?,
                unit: row.try_get("unit").map_err(db_err)?,
                price: row.try_get("price").map_err(db_err)?,
            });
        }

        let available = self.variant_choices(item_name).await?;
        if available.is_empty() {
            return Err(InventoryError::ItemNameNotFound(item_name.to_string()));
        }
        Err(InventoryError::VariantNotFound {
            item: item_name.to_string(),
            variant: variant.to_string(),
            available,
        })
    }

    async fn category_items(&self, category: &str) -> Result<Vec<CategoryItem>> {
        let rows = sqlx::query(
            r"
            SELECT s.item_name,
                   COUNT(v.id) > 0 AS has_variants
            FROM stock_items s
            JOIN categories c ON s.category_id = c.id
            LEFT JOIN item_variants v ON s.id = v.stock_item_id
            WHERE LOWER(c.name) = LOWER($1)
            GROUP BY s.item_name
            ORDER BY s.item_name
            ",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter()
            .map(|row| {
                Ok(CategoryItem {
                    item_name: row.try_get("item_name").map_err(db_err)?,
                    has_variants: row.try_get("has_variants").map_err(db_err)?,
                })
            })
            .collect()
    }

    async fn checkout(&self, lines: &[CartLine]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        for line in lines {
            // Re-read live stock under a row lock; the add-time check may
            // be stale by now.
            let (table, row_id) = match line.variant_id {
                Some(variant_id) => ("item_variants", variant_id),
                None => ("stock_items", line.stock_item_id),
            };
            let current: Option<i32> = sqlx::query_scalar(&format!(
                "SELECT quantity FROM {table} WHERE id = $1 FOR UPDATE"
            ))
            .bind(row_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?;

            let available = current.unwrap_or(0);
            if available < line.quantity {
                // Dropping the transaction rolls back every prior
                // decrement; no partial write survives.
                return Err(InventoryError::InsufficientStock {
                    item: line.item_name.clone(),
                    variant: line.variant_id.map(|_| line.variant.clone()),
                    available,
                    requested: line.quantity,
                });
            }

            sqlx::query(&format!(
                "UPDATE {table} SET quantity = $1 WHERE id = $2"
            ))
            .bind(available - line.quantity)
            .bind(row_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        tracing::info!(lines = lines.len(), "cart checkout committed");
        Ok(())
    }
}
