//! Inventory tools exposed to the language model.
//!
//! Each tool pairs a JSON-schema definition with an executor closure that
//! parses the call arguments, dispatches to the shared [`VoiceSession`],
//! and records the turn in the session event log. Executors only fail on
//! malformed input; domain outcomes are always spoken text.

use crate::registry::ToolRegistry;
use crate::session::VoiceSession;
use crate::types::{Tool, ToolError, ToolExecutorFn, ToolResult};
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

fn parse_input(input: &str) -> Result<serde_json::Value, ToolError> {
    serde_json::from_str(input).map_err(|e| ToolError::new(format!("Invalid input JSON: {e}")))
}

fn require_str(input: &serde_json::Value, field: &str) -> Result<String, ToolError> {
    input[field]
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| ToolError::new(format!("Missing required field: {field}")))
}

fn require_quantity(input: &serde_json::Value) -> Result<i32, ToolError> {
    let raw = input["quantity"]
        .as_i64()
        .ok_or_else(|| ToolError::new("Missing required field: quantity"))?;
    i32::try_from(raw).map_err(|_| ToolError::new(format!("Quantity out of range: {raw}")))
}

fn optional_variant(input: &serde_json::Value) -> String {
    input["variant"].as_str().unwrap_or("").to_string()
}

/// Create the `get_item_variants` tool.
#[must_use]
pub fn get_item_variants_tool(session: Arc<VoiceSession>) -> (Tool, ToolExecutorFn) {
    let tool = Tool {
        name: "get_item_variants".to_string(),
        description: "Get all available variants for a specific item with prices".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "item_name": {
                    "type": "string",
                    "description": "Name of the item to get variants for"
                }
            },
            "required": ["item_name"]
        }),
    };

    let executor: ToolExecutorFn = Arc::new(move |input: String| {
        let session = Arc::clone(&session);
        Box::pin(async move {
            session.record("caller", &format!("get_item_variants {input}")).await;
            let parsed = parse_input(&input)?;
            let item_name = require_str(&parsed, "item_name")?;
            let reply = session.get_item_variants(&item_name).await;
            session.record("agent", &reply).await;
            Ok(reply)
        }) as Pin<Box<dyn Future<Output = ToolResult> + Send>>
    });

    (tool, executor)
}

/// Create the `get_stock_info` tool.
#[must_use]
pub fn get_stock_info_tool(session: Arc<VoiceSession>) -> (Tool, ToolExecutorFn) {
    let tool = Tool {
        name: "get_stock_info".to_string(),
        description:
            "Check stock information for a specific item and optionally a specific variant with prices"
                .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "item_name": {
                    "type": "string",
                    "description": "Name of the item to check stock for"
                },
                "variant": {
                    "type": "string",
                    "description": "Specific variant of the item (leave empty if not specified)"
                }
            },
            "required": ["item_name"]
        }),
    };

    let executor: ToolExecutorFn = Arc::new(move |input: String| {
        let session = Arc::clone(&session);
        Box::pin(async move {
            session.record("caller", &format!("get_stock_info {input}")).await;
            let parsed = parse_input(&input)?;
            let item_name = require_str(&parsed, "item_name")?;
            let variant = optional_variant(&parsed);
            let reply = session.get_stock_info(&item_name, &variant).await;
            session.record("agent", &reply).await;
            Ok(reply)
        }) as Pin<Box<dyn Future<Output = ToolResult> + Send>>
    });

    (tool, executor)
}

/// Create the `add_to_cart` tool.
#[must_use]
pub fn add_to_cart_tool(session: Arc<VoiceSession>) -> (Tool, ToolExecutorFn) {
    let tool = Tool {
        name: "add_to_cart".to_string(),
        description: "Add items to cart (does not reduce stock yet)".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "item_name": {
                    "type": "string",
                    "description": "Name of the item to add to cart"
                },
                "quantity": {
                    "type": "integer",
                    "description": "Quantity to add to cart"
                },
                "variant": {
                    "type": "string",
                    "description": "Specific variant of the item (leave empty if not specified)"
                }
            },
            "required": ["item_name", "quantity"]
        }),
    };

    let executor: ToolExecutorFn = Arc::new(move |input: String| {
        let session = Arc::clone(&session);
        Box::pin(async move {
            session.record("caller", &format!("add_to_cart {input}")).await;
            let parsed = parse_input(&input)?;
            let item_name = require_str(&parsed, "item_name")?;
            let quantity = require_quantity(&parsed)?;
            let variant = optional_variant(&parsed);
            let reply = session.add_to_cart(&item_name, quantity, &variant).await;
            session.record("agent", &reply).await;
            Ok(reply)
        }) as Pin<Box<dyn Future<Output = ToolResult> + Send>>
    });

    (tool, executor)
}

/// Create the `show_cart` tool.
#[must_use]
pub fn show_cart_tool(session: Arc<VoiceSession>) -> (Tool, ToolExecutorFn) {
    let tool = Tool {
        name: "show_cart".to_string(),
        description: "Show current cart contents and total price".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    };

    let executor: ToolExecutorFn = Arc::new(move |input: String| {
        let session = Arc::clone(&session);
        Box::pin(async move {
            session.record("caller", &format!("show_cart {input}")).await;
            let reply = session.show_cart().await;
            session.record("agent", &reply).await;
            Ok(reply)
        }) as Pin<Box<dyn Future<Output = ToolResult> + Send>>
    });

    (tool, executor)
}

/// Create the `clear_cart` tool.
#[must_use]
pub fn clear_cart_tool(session: Arc<VoiceSession>) -> (Tool, ToolExecutorFn) {
    let tool = Tool {
        name: "clear_cart".to_string(),
        description: "Clear all items from cart".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    };

    let executor: ToolExecutorFn = Arc::new(move |input: String| {
        let session = Arc::clone(&session);
        Box::pin(async move {
            session.record("caller", &format!("clear_cart {input}")).await;
            let reply = session.clear_cart().await;
            session.record("agent", &reply).await;
            Ok(reply)
        }) as Pin<Box<dyn Future<Output = ToolResult> + Send>>
    });

    (tool, executor)
}

/// Create the `complete_purchase` tool.
#[must_use]
pub fn complete_purchase_tool(session: Arc<VoiceSession>) -> (Tool, ToolExecutorFn) {
    let tool = Tool {
        name: "complete_purchase".to_string(),
        description: "Complete the purchase of all items in cart (reduces stock)".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    };

    let executor: ToolExecutorFn = Arc::new(move |input: String| {
        let session = Arc::clone(&session);
        Box::pin(async move {
            session.record("caller", &format!("complete_purchase {input}")).await;
            let reply = session.complete_purchase().await;
            session.record("agent", &reply).await;
            Ok(reply)
        }) as Pin<Box<dyn Future<Output = ToolResult> + Send>>
    });

    (tool, executor)
}

/// Create the `list_category_items` tool.
#[must_use]
pub fn list_category_items_tool(session: Arc<VoiceSession>) -> (Tool, ToolExecutorFn) {
    let tool = Tool {
        name: "list_category_items".to_string(),
        description: "List all available items in a specific category".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "description": "Category name to list items for"
                }
            },
            "required": ["category"]
        }),
    };

    let executor: ToolExecutorFn = Arc::new(move |input: String| {
        let session = Arc::clone(&session);
        Box::pin(async move {
            session.record("caller", &format!("list_category_items {input}")).await;
            let parsed = parse_input(&input)?;
            let category = require_str(&parsed, "category")?;
            let reply = session.list_category_items(&category).await;
            session.record("agent", &reply).await;
            Ok(reply)
        }) as Pin<Box<dyn Future<Output = ToolResult> + Send>>
    });

    (tool, executor)
}

/// Create the `purchase_item` tool (legacy single-step purchase).
#[must_use]
pub fn purchase_item_tool(session: Arc<VoiceSession>) -> (Tool, ToolExecutorFn) {
    let tool = Tool {
        name: "purchase_item".to_string(),
        description: "Add an item to the cart and ask the caller to confirm the purchase"
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "item_name": {
                    "type": "string",
                    "description": "Name of the item to purchase"
                },
                "quantity": {
                    "type": "integer",
                    "description": "Quantity to purchase"
                },
                "variant": {
                    "type": "string",
                    "description": "Specific variant of the item (leave empty if not specified)"
                }
            },
            "required": ["item_name", "quantity"]
        }),
    };

    let executor: ToolExecutorFn = Arc::new(move |input: String| {
        let session = Arc::clone(&session);
        Box::pin(async move {
            session.record("caller", &format!("purchase_item {input}")).await;
            let parsed = parse_input(&input)?;
            let item_name = require_str(&parsed, "item_name")?;
            let quantity = require_quantity(&parsed)?;
            let variant = optional_variant(&parsed);
            let reply = session.purchase_item(&item_name, quantity, &variant).await;
            session.record("agent", &reply).await;
            Ok(reply)
        }) as Pin<Box<dyn Future<Output = ToolResult> + Send>>
    });

    (tool, executor)
}

/// Build the full inventory tool registry for one session.
#[must_use]
pub fn inventory_toolset(session: &Arc<VoiceSession>) -> ToolRegistry {
    let registry = ToolRegistry::new();
    let builders = [
        get_item_variants_tool(Arc::clone(session)),
        get_stock_info_tool(Arc::clone(session)),
        add_to_cart_tool(Arc::clone(session)),
        show_cart_tool(Arc::clone(session)),
        clear_cart_tool(Arc::clone(session)),
        complete_purchase_tool(Arc::clone(session)),
        list_category_items_tool(Arc::clone(session)),
        purchase_item_tool(Arc::clone(session)),
    ];
    for (tool, executor) in builders {
        registry.register(tool, executor);
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use storevoice_core::{InventoryStore, MemoryInventoryStore};

    fn toolset() -> (ToolRegistry, tempfile::TempDir) {
        let store = Arc::new(MemoryInventoryStore::new());
        let coke = store.seed_item("Coke", 0, "bottles");
        store.seed_variant(coke, "Regular", 10, "bottles", 1.0);
        let dir = tempfile::tempdir().expect("tempdir");
        let session = Arc::new(VoiceSession::new(
            store as Arc<dyn InventoryStore>,
            dir.path().to_path_buf(),
        ));
        (inventory_toolset(&session), dir)
    }

    #[test]
    fn toolset_registers_all_eight_tools() {
        let (registry, _dir) = toolset();
        assert_eq!(registry.count(), 8);
        assert_eq!(
            registry.list_tools(),
            vec![
                "add_to_cart",
                "clear_cart",
                "complete_purchase",
                "get_item_variants",
                "get_stock_info",
                "list_category_items",
                "purchase_item",
                "show_cart",
            ]
        );
    }

    #[test]
    fn every_tool_schema_is_an_object() {
        let (registry, _dir) = toolset();
        for tool in registry.get_tools() {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
        }
    }

    #[tokio::test]
    async fn execute_dispatches_to_the_session() {
        let (registry, _dir) = toolset();
        let reply = registry
            .execute(
                "get_stock_info",
                serde_json::json!({"item_name": "coke", "variant": "regular"}).to_string(),
            )
            .await
            .expect("tool runs");
        assert_eq!(
            reply,
            "We have 10 bottles of Coke (Regular) in stock at $1.00 per bottles."
        );
    }

    #[tokio::test]
    async fn missing_required_field_is_a_tool_error() {
        let (registry, _dir) = toolset();
        let err = registry
            .execute("add_to_cart", "{}".to_string())
            .await
            .expect_err("should fail");
        assert!(err.message.contains("item_name"), "{}", err.message);
    }

    #[tokio::test]
    async fn malformed_json_is_a_tool_error() {
        let (registry, _dir) = toolset();
        let err = registry
            .execute("add_to_cart", "not json".to_string())
            .await
            .expect_err("should fail");
        assert!(err.message.contains("Invalid input JSON"), "{}", err.message);
    }

    #[tokio::test]
    async fn cart_flow_through_the_registry() {
        let (registry, _dir) = toolset();
        let added = registry
            .execute(
                "add_to_cart",
                serde_json::json!({"item_name": "coke", "quantity": 2, "variant": "regular"})
                    .to_string(),
            )
            .await
            .expect("adds");
        assert!(added.starts_with("Added 2 bottles of Coke (Regular)"), "{added}");

        let receipt = registry
            .execute("complete_purchase", "{}".to_string())
            .await
            .expect("checks out");
        assert!(receipt.starts_with("Purchase completed successfully!"), "{receipt}");

        let cart = registry
            .execute("show_cart", "{}".to_string())
            .await
            .expect("shows");
        assert_eq!(cart, "Your cart is empty.");
    }
}
