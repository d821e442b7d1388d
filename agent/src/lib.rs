//! # Storevoice Agent
//!
//! Voice-call tool surface for the Storevoice inventory system.
//!
//! The speech transport (telephony, STT, LLM, TTS) is hosted externally;
//! this crate supplies everything the host needs to let a caller operate
//! the inventory:
//!
//! - **Types**: [`Tool`] definitions, [`ToolResult`], and the type-erased
//!   [`ToolExecutorFn`] executor signature
//! - **Registry**: [`ToolRegistry`], name-based tool dispatch
//! - **Session**: [`VoiceSession`], one caller's cart plus natural-language
//!   rendering of every store outcome
//! - **Tools**: [`inventory_toolset`], the eight inventory tools with
//!   JSON-schema argument specs
//! - **Log**: [`ChatLogger`], the append-only per-session event log
//! - **Config**: [`SessionConfig`], model identifiers, credentials, and the
//!   phone-operator system prompt

pub mod config;
pub mod log;
pub mod registry;
pub mod session;
pub mod tools;
pub mod types;

pub use config::SessionConfig;
pub use log::ChatLogger;
pub use registry::ToolRegistry;
pub use session::VoiceSession;
pub use tools::inventory_toolset;
pub use types::{Tool, ToolError, ToolExecutorFn, ToolResult};
