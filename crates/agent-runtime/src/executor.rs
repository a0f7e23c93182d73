//! Agent executor for running one model exchange
//!
//! The executor sends the conversation to the provider and inspects the stop
//! reason:
//! 1. `end_turn` / `stop_sequence`: done, return the text
//! 2. `pause_turn`: a hosted tool (web search) is still working; send the
//!    partial assistant turn back and continue
//! 3. `max_tokens`: return what was produced, with a warning
//! 4. `refusal` / `tool_use`: fail, there is nothing this runtime can do

use agent_core::{Error, Result};
use agent_llm::{
    CompletionRequest, LLMProvider, Message, StopReason, TokenUsage, ToolDefinition,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Upper bound on paused-turn continuations
    pub max_continuations: usize,

    /// Model to use
    pub model: String,

    /// System prompt
    pub system_prompt: Option<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature
    pub temperature: Option<f32>,

    /// Server tools offered to the model
    pub tools: Vec<ToolDefinition>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_continuations: 5,
            model: "claude-sonnet-4-20250514".to_string(),
            system_prompt: None,
            max_tokens: 8192,
            temperature: None,
            tools: Vec::new(),
        }
    }
}

/// What one execution produced
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    /// Text of the assistant turn, across continuations
    pub text: String,
    /// Stop reason of the last response
    pub stop_reason: StopReason,
    /// Tokens used by all requests
    pub usage: TokenUsage,
    /// Number of requests sent
    pub requests: usize,
    /// Server tool invocations (web searches) made by the model
    pub searches: usize,
}

/// Runs a conversation against a provider until the turn is complete
pub struct AgentExecutor {
    provider: Arc<dyn LLMProvider>,
    config: ExecutorConfig,
}

impl AgentExecutor {
    /// Create a new agent executor
    pub fn new(provider: Arc<dyn LLMProvider>, config: ExecutorConfig) -> Self {
        Self { provider, config }
    }

    /// Executor configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run a single user message
    pub async fn run(&self, user_message: String) -> Result<ExecutionOutcome> {
        self.run_with_history(user_message, Vec::new()).await
    }

    /// Run a user message after earlier conversation turns
    pub async fn run_with_history(
        &self,
        user_message: String,
        history: Vec<Message>,
    ) -> Result<ExecutionOutcome> {
        let mut conversation = history;
        conversation.push(Message::user(user_message));

        let mut text = String::new();
        let mut usage = TokenUsage::default();
        let mut searches = 0;
        let mut requests = 0;

        loop {
            requests += 1;
            info!(
                model = %self.config.model,
                request = requests,
                messages = conversation.len(),
                tools = self.config.tools.len(),
                "Sending request to LLM"
            );

            let response = self
                .provider
                .complete(self.build_request(&conversation))
                .await?;

            usage += response.usage;
            searches += response.message.server_tool_uses();
            text.push_str(&response.message.text());

            info!(
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "LLM response received"
            );

            match response.stop_reason {
                StopReason::EndTurn | StopReason::StopSequence => {}
                StopReason::MaxTokens => {
                    warn!(max_tokens = self.config.max_tokens, "Response truncated at token limit");
                }
                StopReason::PauseTurn => {
                    if requests > self.config.max_continuations {
                        warn!(
                            max_continuations = self.config.max_continuations,
                            "Turn still paused after max continuations, returning partial text"
                        );
                    } else {
                        debug!("Turn paused by server tool, continuing");
                        conversation.push(response.message.without_unsupported());
                        continue;
                    }
                }
                StopReason::Refusal => {
                    return Err(Error::ProcessingFailed(
                        "Model declined to answer the request".to_string(),
                    ));
                }
                StopReason::ToolUse => {
                    return Err(Error::ProcessingFailed(
                        "Model requested a client-side tool, none are available".to_string(),
                    ));
                }
            }

            if text.trim().is_empty() {
                return Err(Error::ProcessingFailed(
                    "Model returned no text".to_string(),
                ));
            }

            return Ok(ExecutionOutcome {
                text,
                stop_reason: response.stop_reason,
                usage,
                requests,
                searches,
            });
        }
    }

    fn build_request(&self, conversation: &[Message]) -> CompletionRequest {
        let mut builder = CompletionRequest::builder(&self.config.model)
            .messages(conversation.to_vec())
            .max_tokens(self.config.max_tokens)
            .tools(self.config.tools.clone());

        if let Some(system) = &self.config.system_prompt {
            builder = builder.system(system.clone());
        }
        if let Some(temperature) = self.config.temperature {
            builder = builder.temperature(temperature);
        }
        builder.build()
    }
}
