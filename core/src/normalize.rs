//! Free-text name normalization.
//!
//! Voice callers say "a large coca cola"; the catalog stores "Coke" with a
//! "1.5 Liter" variant. [`normalize`] bridges the two with static lookup
//! tables, one per name kind. The function is pure and total: unknown input
//! passes through unchanged, it never fails.
//!
//! Extending a table is a data change only; no control flow is touched.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Which lookup table to consult.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameKind {
    /// Catalog item names ("cola" -> "Coke").
    Item,
    /// Variant labels ("large" -> "1.5 Liter").
    Variant,
    /// Category names ("beverages" -> "Drinks").
    Category,
}

static ITEM_NAMES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("cola", "Coke"),
        ("soda", "Coke"),
        ("coke", "Coke"),
        ("coca cola", "Coke"),
        ("coca-cola", "Coke"),
        ("chips", "Lays"),
        ("potato chips", "Lays"),
        ("lays", "Lays"),
        ("biscuit", "Bisckets"),
        ("cookies", "Bisckets"),
        ("biscuits", "Bisckets"),
        ("bisckets", "Bisckets"),
    ])
});

static VARIANT_NAMES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("regular", "Regular"),
        ("normal", "Regular"),
        ("small", "Regular"),
        ("half liter", "Half Liter"),
        ("half litre", "Half Liter"),
        ("500ml", "Half Liter"),
        ("medium", "Half Liter"),
        ("1.5 liter", "1.5 Liter"),
        ("1.5 litre", "1.5 Liter"),
        ("1500ml", "1.5 Liter"),
        ("large", "1.5 Liter"),
        ("big", "1.5 Liter"),
    ])
});

static CATEGORY_NAMES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("drink", "Drinks"),
        ("drinks", "Drinks"),
        ("beverage", "Drinks"),
        ("beverages", "Drinks"),
        ("snack", "Snacks"),
        ("snacks", "Snacks"),
        ("chips", "Snacks"),
        ("biscuit", "Biscuits"),
        ("biscuits", "Biscuits"),
        ("cookie", "Biscuits"),
        ("cookies", "Biscuits"),
    ])
});

/// Resolve a free-text name to its canonical catalog form.
///
/// The input is trimmed and lower-cased before lookup. When no mapping
/// exists the original input is returned unchanged.
#[must_use]
pub fn normalize(kind: NameKind, raw: &str) -> String {
    let table = match kind {
        NameKind::Item => &*ITEM_NAMES,
        NameKind::Variant => &*VARIANT_NAMES,
        NameKind::Category => &*CATEGORY_NAMES,
    };
    let key = raw.trim().to_lowercase();
    match table.get(key.as_str()) {
        Some(canonical) => {
            tracing::debug!(kind = ?kind, raw, canonical, "name normalized");
            (*canonical).to_string()
        }
        None => raw.to_string(),
    }
}
