//! Tool surface shared by the voice session and the registry.
//!
//! A tool is a named, JSON-schema-described capability the language model
//! can call mid-conversation. Executors are type-erased async closures so
//! the registry can hold a heterogeneous set behind one signature.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A tool definition, as advertised to the language model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tool {
    /// Name the model uses to invoke the tool.
    pub name: String,
    /// What the tool does, phrased for the model.
    pub description: String,
    /// JSON schema of the tool's input object.
    pub input_schema: serde_json::Value,
}

/// Failure raised by a tool executor.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct ToolError {
    /// Human-readable description of what went wrong.
    pub message: String,
}

impl ToolError {
    /// Build an error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outcome of a tool execution: the text handed back to the model.
pub type ToolResult = Result<String, ToolError>;

/// Type-erased async executor, invoked with the raw JSON input of a call.
pub type ToolExecutorFn =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = ToolResult> + Send>> + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_serializes_with_schema() {
        let tool = Tool {
            name: "show_cart".to_string(),
            description: "Show the cart".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        };
        let value = serde_json::to_value(&tool).expect("serializes");
        assert_eq!(value["name"], "show_cart");
        assert_eq!(value["input_schema"]["type"], "object");
    }

    #[test]
    fn tool_error_displays_message() {
        let err = ToolError::new("missing field: item_name");
        assert_eq!(err.to_string(), "missing field: item_name");
    }
}
