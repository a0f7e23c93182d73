//! LLM provider abstraction for the sentiment agents
//!
//! This crate provides provider-agnostic types for talking to a hosted
//! model:
//!
//! - Message and content-block types, including server-side tool blocks
//! - Completion request/response types
//! - Server tool definitions (hosted web search)
//! - A retry policy for transient provider failures
//! - The [`LLMProvider`] trait and the Anthropic implementation

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;
pub mod retry;
pub mod tools;

pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{ContentBlock, Message, MessageContent, Role};
pub use provider::LLMProvider;
pub use retry::RetryPolicy;
pub use tools::ToolDefinition;
