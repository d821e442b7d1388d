//! Conversational session over the inventory store.
//!
//! A [`VoiceSession`] owns one caller's cart and renders every store
//! outcome as a plain spoken sentence. Tool executors call these methods
//! and hand the text straight to the TTS engine, so no method ever returns
//! an error to the runtime: domain failures become apologetic sentences
//! and the underlying condition goes to `tracing`.

use crate::log::ChatLogger;
use std::fmt::Write as _;
use std::sync::Arc;
use storevoice_core::normalize::{normalize, NameKind};
use storevoice_core::{Cart, InventoryError, InventoryStore, VariantChoice};
use tokio::sync::Mutex;

/// Remove asterisks so the TTS engine never reads formatting aloud.
fn strip_formatting(message: &str) -> String {
    message.replace('*', "")
}

/// Render variant choices as "Regular ($1.00), 1.5 Liter ($2.50)".
fn choice_list(choices: &[VariantChoice]) -> String {
    choices
        .iter()
        .map(|c| format!("{} (${:.2})", c.variant, c.price))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One caller's conversation state: the shared store, a private cart, and
/// the session event log.
pub struct VoiceSession {
    store: Arc<dyn InventoryStore>,
    cart: Mutex<Cart>,
    logger: Mutex<ChatLogger>,
}

impl VoiceSession {
    /// Create a session over `store`, logging events under `log_dir`.
    pub fn new(store: Arc<dyn InventoryStore>, log_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            store,
            cart: Mutex::new(Cart::new()),
            logger: Mutex::new(ChatLogger::new(log_dir)),
        }
    }

    /// Record one conversation event; write failures are logged, never
    /// surfaced to the caller.
    pub async fn record(&self, source: &str, message: &str) {
        let mut logger = self.logger.lock().await;
        if let Err(error) = logger.log_event(source, message) {
            tracing::warn!(%error, "failed to write session event");
        }
    }

    /// All variants of an item, with stock and prices.
    pub async fn get_item_variants(&self, item_name: &str) -> String {
        let canonical = normalize(NameKind::Item, item_name);
        match self.store.item_variants(&canonical).await {
            Ok(variants) => {
                let display_name = variants
                    .first()
                    .map_or_else(|| canonical.clone(), |v| v.item_name.clone());
                let parts: Vec<String> = variants
                    .iter()
                    .map(|v| format!("{}: {} {} at ${:.2} each", v.variant, v.quantity, v.unit, v.price))
                    .collect();
                strip_formatting(&format!(
                    "Available {display_name} variants: {}",
                    parts.join(", ")
                ))
            }
            Err(InventoryError::ItemNameNotFound(_)) => {
                format!("Sorry, I couldn't find '{item_name}' in our inventory.")
            }
            Err(error) => {
                tracing::error!(%error, item = item_name, "variant lookup failed");
                format!("Sorry, I encountered an error while getting variants for '{item_name}'. Please try again.")
            }
        }
    }

    /// Stock details for an item, optionally narrowed to one variant.
    pub async fn get_stock_info(&self, item_name: &str, variant: &str) -> String {
        let canonical = normalize(NameKind::Item, item_name);
        if variant.trim().is_empty() {
            match self.store.item_variants(&canonical).await {
                Ok(variants) => {
                    let display_name = variants
                        .first()
                        .map_or_else(|| canonical.clone(), |v| v.item_name.clone());
                    let parts: Vec<String> = variants
                        .iter()
                        .map(|v| {
                            format!("{}: {} {} at ${:.2} each", v.variant, v.quantity, v.unit, v.price)
                        })
                        .collect();
                    strip_formatting(&format!(
                        "We have {display_name} available in these options: {}",
                        parts.join(", ")
                    ))
                }
                Err(InventoryError::ItemNameNotFound(_)) => {
                    format!("Sorry, I couldn't find '{item_name}' in our inventory.")
                }
                Err(error) => {
                    tracing::error!(%error, item = item_name, "stock lookup failed");
                    format!("Sorry, I encountered an error while checking stock for '{item_name}'. Please try again.")
                }
            }
        } else {
            let canonical_variant = normalize(NameKind::Variant, variant);
            match self.store.resolve_variant(&canonical, &canonical_variant).await {
                Ok(resolved) => format!(
                    "We have {} {} of {} ({}) in stock at ${:.2} per {}.",
                    resolved.quantity,
                    resolved.unit,
                    resolved.item_name,
                    resolved.variant,
                    resolved.price,
                    resolved.unit
                ),
                Err(InventoryError::VariantNotFound { available, .. }) => strip_formatting(&format!(
                    "Sorry, I couldn't find '{variant}' variant of {item_name}. Available variants are: {}",
                    choice_list(&available)
                )),
                Err(InventoryError::ItemNameNotFound(_)) => {
                    format!("Sorry, I couldn't find '{item_name}' in our inventory.")
                }
                Err(error) => {
                    tracing::error!(%error, item = item_name, "stock lookup failed");
                    format!("Sorry, I encountered an error while checking stock for '{item_name}'. Please try again.")
                }
            }
        }
    }

    /// Add a line to the cart after checking live stock. Stock itself is
    /// not reduced until checkout.
    pub async fn add_to_cart(&self, item_name: &str, quantity: i32, variant: &str) -> String {
        if quantity <= 0 {
            return "Sorry, the quantity must be at least one.".to_string();
        }
        let canonical = normalize(NameKind::Item, item_name);
        let canonical_variant = if variant.trim().is_empty() {
            "Default".to_string()
        } else {
            normalize(NameKind::Variant, variant)
        };
        match self.store.resolve_variant(&canonical, &canonical_variant).await {
            Ok(resolved) => {
                if resolved.quantity < quantity {
                    return format!(
                        "Sorry, we only have {} {} of {} ({}) available.",
                        resolved.quantity, resolved.unit, resolved.item_name, resolved.variant
                    );
                }
                let mut cart = self.cart.lock().await;
                let line = cart.add(&resolved, quantity);
                let cart_total = cart.total();
                format!(
                    "Added {} {} of {} ({}) to cart at ${:.2} each = ${:.2}. Cart total: ${:.2}",
                    line.quantity,
                    line.unit,
                    line.item_name,
                    line.variant,
                    line.price_per_unit,
                    line.total_price,
                    cart_total
                )
            }
            Err(InventoryError::VariantNotFound { available, .. }) => strip_formatting(&format!(
                "Sorry, I couldn't find '{variant}' variant of {item_name}. Available options are: {}",
                choice_list(&available)
            )),
            Err(InventoryError::ItemNameNotFound(_)) => {
                format!("Sorry, I couldn't find '{item_name}' in our inventory.")
            }
            Err(error) => {
                tracing::error!(%error, item = item_name, "add to cart failed");
                format!("Sorry, I encountered an error while adding {quantity} {item_name} to cart. Please try again.")
            }
        }
    }

    /// Itemized cart contents with the running total.
    pub async fn show_cart(&self) -> String {
        let cart = self.cart.lock().await;
        if cart.is_empty() {
            return "Your cart is empty.".to_string();
        }
        let mut summary = String::from("Your cart:\n");
        for line in cart.lines() {
            let _ = writeln!(
                summary,
                "{} {} of {} ({}) - ${:.2} each = ${:.2}",
                line.quantity,
                line.unit,
                line.item_name,
                line.variant,
                line.price_per_unit,
                line.total_price
            );
        }
        let _ = write!(summary, "\nTotal: ${:.2}", cart.total());
        summary
    }

    /// Discard every cart line.
    pub async fn clear_cart(&self) -> String {
        self.cart.lock().await.clear();
        "Cart cleared successfully.".to_string()
    }

    /// Check out the cart: one transaction, all lines or none. The cart is
    /// cleared only after the store commits.
    pub async fn complete_purchase(&self) -> String {
        let mut cart = self.cart.lock().await;
        if cart.is_empty() {
            return "Your cart is empty. Please add items before completing purchase.".to_string();
        }
        match self.store.checkout(cart.lines()).await {
            Ok(()) => {
                let mut details = String::new();
                for line in cart.lines() {
                    let _ = writeln!(
                        details,
                        "{} {} of {} ({}) - ${:.2}",
                        line.quantity, line.unit, line.item_name, line.variant, line.total_price
                    );
                }
                let total = cart.total();
                cart.clear();
                format!(
                    "Purchase completed successfully!\n\nOrder details:\n{details}\nTotal amount: ${total:.2}\n\nThank you for your purchase!"
                )
            }
            Err(InventoryError::InsufficientStock { item, variant, .. }) => match variant {
                Some(label) => format!(
                    "Sorry, {item} ({label}) is no longer available in the requested quantity. Please check stock and try again."
                ),
                None => format!(
                    "Sorry, {item} is no longer available in the requested quantity. Please check stock and try again."
                ),
            },
            Err(error) => {
                tracing::error!(%error, "checkout failed");
                "Sorry, I encountered an error while processing your purchase. Please try again."
                    .to_string()
            }
        }
    }

    /// Items in a category, flagging those with multiple variants.
    pub async fn list_category_items(&self, category: &str) -> String {
        let canonical = normalize(NameKind::Category, category);
        match self.store.category_items(&canonical).await {
            Ok(items) if items.is_empty() => {
                format!("No items found in the {category} category.")
            }
            Ok(items) => {
                let entries: Vec<String> = items
                    .iter()
                    .map(|item| {
                        if item.has_variants {
                            format!("{} (multiple variants available)", item.item_name)
                        } else {
                            item.item_name.clone()
                        }
                    })
                    .collect();
                format!("Available items in {canonical}:\n- {}", entries.join("\n- "))
            }
            Err(error) => {
                tracing::error!(%error, category, "category listing failed");
                format!("Sorry, I encountered an error while listing items in {category}.")
            }
        }
    }

    /// Legacy single-step purchase: add to cart, then show the cart and
    /// ask the caller to confirm.
    pub async fn purchase_item(&self, item_name: &str, quantity: i32, variant: &str) -> String {
        let added = self.add_to_cart(item_name, quantity, variant).await;
        if added.starts_with("Added") {
            let cart = self.show_cart().await;
            format!("{added}\n\n{cart}\n\nWould you like to complete this purchase or add more items?")
        } else {
            added
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storevoice_core::MemoryInventoryStore;

    fn seeded_session() -> (VoiceSession, Arc<MemoryInventoryStore>, tempfile::TempDir) {
        let store = Arc::new(MemoryInventoryStore::new());
        let coke = store.seed_item("Coke", 0, "bottles");
        store.seed_variant(coke, "Regular", 10, "bottles", 1.0);
        store.seed_variant(coke, "1.5 Liter", 4, "bottles", 2.5);
        let lays = store.seed_item("Lays", 20, "packets");
        store.set_item_price(lays, 1.5);
        let drinks = store.seed_category("Drinks");
        store.assign_category(coke, drinks);
        let dir = tempfile::tempdir().expect("tempdir");
        let session = VoiceSession::new(
            Arc::clone(&store) as Arc<dyn InventoryStore>,
            dir.path().to_path_buf(),
        );
        (session, store, dir)
    }

    #[tokio::test]
    async fn variants_listing_names_each_option_with_price() {
        let (session, _store, _dir) = seeded_session();
        let reply = session.get_item_variants("coca-cola").await;
        assert!(reply.starts_with("Available Coke variants:"), "{reply}");
        assert!(reply.contains("Regular: 10 bottles at $1.00 each"), "{reply}");
        assert!(reply.contains("1.5 Liter: 4 bottles at $2.50 each"), "{reply}");
    }

    #[tokio::test]
    async fn unknown_item_gets_apology_with_original_wording() {
        let (session, _store, _dir) = seeded_session();
        let reply = session.get_item_variants("caviar").await;
        assert_eq!(reply, "Sorry, I couldn't find 'caviar' in our inventory.");
    }

    #[tokio::test]
    async fn stock_info_with_variant_reports_price_per_unit() {
        let (session, _store, _dir) = seeded_session();
        let reply = session.get_stock_info("coke", "large").await;
        assert_eq!(
            reply,
            "We have 4 bottles of Coke (1.5 Liter) in stock at $2.50 per bottles."
        );
    }

    #[tokio::test]
    async fn stock_info_unknown_variant_lists_choices() {
        let (session, _store, _dir) = seeded_session();
        let reply = session.get_stock_info("coke", "gigantic").await;
        assert!(
            reply.starts_with("Sorry, I couldn't find 'gigantic' variant of coke."),
            "{reply}"
        );
        assert!(reply.contains("Regular ($1.00)"), "{reply}");
        assert!(reply.contains("1.5 Liter ($2.50)"), "{reply}");
    }

    #[tokio::test]
    async fn add_to_cart_reports_line_and_cart_totals() {
        let (session, _store, _dir) = seeded_session();
        let reply = session.add_to_cart("coke", 3, "regular").await;
        assert_eq!(
            reply,
            "Added 3 bottles of Coke (Regular) to cart at $1.00 each = $3.00. Cart total: $3.00"
        );
        // Items without variant rows resolve to their implicit Default row
        // at price 0; the item-level price never reaches the cart.
        let reply = session.add_to_cart("lays", 2, "").await;
        assert_eq!(
            reply,
            "Added 2 packets of Lays (Default) to cart at $0.00 each = $0.00. Cart total: $3.00"
        );
    }

    #[tokio::test]
    async fn add_to_cart_rejects_more_than_live_stock() {
        let (session, _store, _dir) = seeded_session();
        let reply = session.add_to_cart("coke", 11, "regular").await;
        assert_eq!(
            reply,
            "Sorry, we only have 10 bottles of Coke (Regular) available."
        );
        assert_eq!(session.show_cart().await, "Your cart is empty.");
    }

    #[tokio::test]
    async fn add_to_cart_rejects_non_positive_quantity() {
        let (session, _store, _dir) = seeded_session();
        let reply = session.add_to_cart("coke", 0, "regular").await;
        assert_eq!(reply, "Sorry, the quantity must be at least one.");
    }

    #[tokio::test]
    async fn show_cart_itemizes_lines_and_total() {
        let (session, _store, _dir) = seeded_session();
        session.add_to_cart("coke", 2, "regular").await;
        session.add_to_cart("lays", 1, "").await;
        let reply = session.show_cart().await;
        assert!(reply.starts_with("Your cart:\n"), "{reply}");
        assert!(
            reply.contains("2 bottles of Coke (Regular) - $1.00 each = $2.00"),
            "{reply}"
        );
        assert!(
            reply.contains("1 packets of Lays (Default) - $0.00 each = $0.00"),
            "{reply}"
        );
        assert!(reply.ends_with("Total: $2.00"), "{reply}");
    }

    #[tokio::test]
    async fn clear_cart_always_succeeds() {
        let (session, _store, _dir) = seeded_session();
        assert_eq!(session.clear_cart().await, "Cart cleared successfully.");
        session.add_to_cart("coke", 1, "regular").await;
        assert_eq!(session.clear_cart().await, "Cart cleared successfully.");
        assert_eq!(session.show_cart().await, "Your cart is empty.");
    }

    #[tokio::test]
    async fn complete_purchase_decrements_stock_and_clears_cart() {
        let (session, store, _dir) = seeded_session();
        session.add_to_cart("coke", 3, "regular").await;
        session.add_to_cart("lays", 2, "").await;
        let reply = session.complete_purchase().await;
        assert!(reply.starts_with("Purchase completed successfully!"), "{reply}");
        assert!(
            reply.contains("3 bottles of Coke (Regular) - $3.00"),
            "{reply}"
        );
        assert!(reply.contains("Total amount: $3.00"), "{reply}");
        assert!(reply.ends_with("Thank you for your purchase!"), "{reply}");
        assert_eq!(session.show_cart().await, "Your cart is empty.");
        let lays = store
            .search_items("Lays")
            .await
            .expect("search works")
            .remove(0);
        assert_eq!(lays.quantity, 18);
    }

    #[tokio::test]
    async fn complete_purchase_on_empty_cart_prompts_for_items() {
        let (session, _store, _dir) = seeded_session();
        assert_eq!(
            session.complete_purchase().await,
            "Your cart is empty. Please add items before completing purchase."
        );
    }

    #[tokio::test]
    async fn stale_cart_line_aborts_checkout_and_keeps_cart() {
        let (session, store, _dir) = seeded_session();
        session.add_to_cart("coke", 8, "regular").await;
        // Another purchase drains the variant between add and checkout.
        let other = VoiceSession::new(
            Arc::clone(&store) as Arc<dyn InventoryStore>,
            std::env::temp_dir(),
        );
        other.add_to_cart("coke", 5, "regular").await;
        assert!(other
            .complete_purchase()
            .await
            .starts_with("Purchase completed successfully!"));

        let reply = session.complete_purchase().await;
        assert_eq!(
            reply,
            "Sorry, Coke (Regular) is no longer available in the requested quantity. Please check stock and try again."
        );
        // Cart survives so the caller can adjust and retry.
        assert!(session.show_cart().await.contains("8 bottles of Coke"));
    }

    #[tokio::test]
    async fn two_cart_lines_for_the_same_variant_are_checked_independently() {
        let (session, _store, _dir) = seeded_session();
        // Each add sees the full live stock of 10; the sum is never checked.
        assert!(session.add_to_cart("coke", 6, "regular").await.starts_with("Added"));
        assert!(session.add_to_cart("coke", 6, "regular").await.starts_with("Added"));
        // Checkout re-reads live stock per line in order, so the second
        // line comes up short and nothing is committed.
        let reply = session.complete_purchase().await;
        assert!(reply.starts_with("Sorry, Coke (Regular)"), "{reply}");
    }

    #[tokio::test]
    async fn category_listing_marks_variant_items() {
        let (session, _store, _dir) = seeded_session();
        let reply = session.list_category_items("beverages").await;
        assert_eq!(
            reply,
            "Available items in Drinks:\n- Coke (multiple variants available)"
        );
    }

    #[tokio::test]
    async fn unknown_category_reports_no_items() {
        let (session, _store, _dir) = seeded_session();
        let reply = session.list_category_items("tools").await;
        assert_eq!(reply, "No items found in the tools category.");
    }

    #[tokio::test]
    async fn purchase_item_chains_cart_summary_and_confirmation() {
        let (session, _store, _dir) = seeded_session();
        let reply = session.purchase_item("coke", 2, "regular").await;
        assert!(reply.starts_with("Added 2 bottles of Coke (Regular)"), "{reply}");
        assert!(reply.contains("Your cart:"), "{reply}");
        assert!(
            reply.ends_with("Would you like to complete this purchase or add more items?"),
            "{reply}"
        );
    }

    #[tokio::test]
    async fn purchase_item_passes_failures_through_unchanged() {
        let (session, _store, _dir) = seeded_session();
        let reply = session.purchase_item("caviar", 2, "").await;
        assert_eq!(reply, "Sorry, I couldn't find 'caviar' in our inventory.");
    }
}
