//! Tool registry for dynamic tool management.
//!
//! The registry provides:
//! - Explicit tool registration under a name
//! - Thread-safe tool storage
//! - Tool execution by name
//! - Tool listing and introspection

use crate::types::{Tool, ToolError, ToolExecutorFn, ToolResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe tool registry.
///
/// Stores tool definitions alongside their executors, allowing the hosting
/// runtime to advertise the set to the language model and dispatch calls
/// by name.
///
/// ## Example
///
/// ```ignore
/// let registry = inventory_toolset(session);
/// let result = registry.execute("show_cart", "{}".to_string()).await;
/// ```
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Arc<RwLock<HashMap<String, (Tool, ToolExecutorFn)>>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a tool with its executor.
    ///
    /// If a tool with the same name already exists it is replaced and this
    /// method returns `true`. Otherwise, returns `false`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[allow(clippy::expect_used)]
    pub fn register(&self, tool: Tool, executor: ToolExecutorFn) -> bool {
        let mut tools = self
            .tools
            .write()
            .expect("Tool registry lock poisoned - indicates a panic in another thread");
        tools.insert(tool.name.clone(), (tool, executor)).is_some()
    }

    /// Execute a tool by name with the given JSON input.
    ///
    /// # Errors
    ///
    /// Returns `ToolError` if the tool is not found or execution fails.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[allow(clippy::expect_used)]
    pub async fn execute(&self, name: &str, input: String) -> ToolResult {
        // Get executor (release lock quickly)
        let executor = {
            let tools = self
                .tools
                .read()
                .expect("Tool registry lock poisoned - indicates a panic in another thread");
            tools.get(name).map(|(_, executor)| executor.clone())
        };

        match executor {
            Some(executor) => executor(input).await,
            None => Err(ToolError {
                message: format!("Tool not found: {name}"),
            }),
        }
    }

    /// Names of all registered tools, sorted alphabetically.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn list_tools(&self) -> Vec<String> {
        let tools = self
            .tools
            .read()
            .expect("Tool registry lock poisoned - indicates a panic in another thread");
        let mut names: Vec<String> = tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// All registered tool definitions sorted by name, for passing to the
    /// language-model API.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn get_tools(&self) -> Vec<Tool> {
        let tools = self
            .tools
            .read()
            .expect("Tool registry lock poisoned - indicates a panic in another thread");
        let mut tool_list: Vec<Tool> = tools.values().map(|(tool, _)| tool.clone()).collect();
        tool_list.sort_by(|a, b| a.name.cmp(&b.name));
        tool_list
    }

    /// Look up a specific tool definition by name.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn get_tool(&self, name: &str) -> Option<Tool> {
        let tools = self
            .tools
            .read()
            .expect("Tool registry lock poisoned - indicates a panic in another thread");
        tools.get(name).map(|(tool, _)| tool.clone())
    }

    /// Number of registered tools.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn count(&self) -> usize {
        let tools = self
            .tools
            .read()
            .expect("Tool registry lock poisoned - indicates a panic in another thread");
        tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.list_tools())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo_tool(name: &str) -> (Tool, ToolExecutorFn) {
        let tool = Tool {
            name: name.to_string(),
            description: "Echo the input back".to_string(),
            input_schema: json!({"type": "object"}),
        };
        let executor: ToolExecutorFn = Arc::new(|input: String| {
            Box::pin(async move { Ok(input) })
                as std::pin::Pin<Box<dyn std::future::Future<Output = ToolResult> + Send>>
        });
        (tool, executor)
    }

    #[test]
    fn test_registry_new() {
        let registry = ToolRegistry::new();
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_registry_register() {
        let registry = ToolRegistry::new();
        let (tool, executor) = echo_tool("show_cart");

        let replaced = registry.register(tool, executor);
        assert!(!replaced); // First registration
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_registry_register_replace() {
        let registry = ToolRegistry::new();
        let (tool1, executor1) = echo_tool("show_cart");
        let (tool2, executor2) = echo_tool("show_cart");

        registry.register(tool1, executor1);
        let replaced = registry.register(tool2, executor2);
        assert!(replaced); // Second registration replaces
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_registry_list_tools_sorted() {
        let registry = ToolRegistry::new();
        let (tool1, executor1) = echo_tool("show_cart");
        let (tool2, executor2) = echo_tool("add_to_cart");

        registry.register(tool1, executor1);
        registry.register(tool2, executor2);

        let tools = registry.list_tools();
        assert_eq!(tools, vec!["add_to_cart", "show_cart"]);
    }

    #[test]
    fn test_registry_get_tool() {
        let registry = ToolRegistry::new();
        let (tool, executor) = echo_tool("show_cart");
        registry.register(tool, executor);

        assert!(registry.get_tool("show_cart").is_some());
        assert!(registry.get_tool("nonexistent").is_none());
    }

    #[tokio::test]
    async fn test_registry_execute() {
        let registry = ToolRegistry::new();
        let (tool, executor) = echo_tool("show_cart");
        registry.register(tool, executor);

        let result = registry
            .execute("show_cart", json!({"x": 1}).to_string())
            .await;
        assert_eq!(result.expect("should succeed"), json!({"x": 1}).to_string());
    }

    #[tokio::test]
    async fn test_registry_execute_not_found() {
        let registry = ToolRegistry::new();

        let result = registry.execute("nonexistent", "{}".to_string()).await;
        assert!(result
            .expect_err("should fail")
            .message
            .contains("Tool not found"));
    }
}
