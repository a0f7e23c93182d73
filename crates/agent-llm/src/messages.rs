//! Message types for LLM communication
//!
//! Modeled on the Anthropic Messages API. Besides plain text, an assistant
//! turn may carry blocks produced by server-side tools (the hosted web
//! search); those have to be sent back verbatim when a paused turn is
//! continued.

use serde::{Deserialize, Serialize};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message
    User,
    /// Assistant message
    Assistant,
}

/// Content block in a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text content
    Text {
        /// Text content
        text: String,
    },

    /// A server-side tool invocation made by the model (e.g. web search)
    ServerToolUse {
        /// Unique ID for this tool use
        id: String,
        /// Tool name
        name: String,
        /// Tool input (JSON)
        input: serde_json::Value,
    },

    /// Results of a hosted web search
    WebSearchToolResult {
        /// ID of the server tool use this answers
        tool_use_id: String,
        /// Result payload, passed through untouched
        content: serde_json::Value,
    },

    /// Any block type this crate does not model
    #[serde(other)]
    Unsupported,
}

impl ContentBlock {
    /// Create a text block
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Message content: either simple text or structured blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple text content
    Text(String),
    /// Structured content blocks
    Blocks(Vec<ContentBlock>),
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Message content
    pub content: MessageContent,
}

impl Message {
    /// Create a user message with text
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create an assistant message with text
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create an assistant message from blocks
    pub fn assistant_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// Concatenated text of every text block, in order
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(|b| match b {
                    ContentBlock::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }

    /// Number of server tool invocations in this message
    pub fn server_tool_uses(&self) -> usize {
        match &self.content {
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter(|b| matches!(b, ContentBlock::ServerToolUse { .. }))
                .count(),
            MessageContent::Text(_) => 0,
        }
    }

    /// Copy of this message without blocks the API would reject on resend
    pub fn without_unsupported(&self) -> Self {
        let content = match &self.content {
            MessageContent::Blocks(blocks) => MessageContent::Blocks(
                blocks
                    .iter()
                    .filter(|b| !matches!(b, ContentBlock::Unsupported))
                    .cloned()
                    .collect(),
            ),
            text @ MessageContent::Text(_) => text.clone(),
        };
        Self {
            role: self.role,
            content,
        }
    }
}
