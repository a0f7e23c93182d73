//! A single LLM-backed team member

use crate::executor::{AgentExecutor, ExecutorConfig};
use crate::history::{HistoryStore, Turn};
use agent_core::{Agent, Context, Result};
use agent_llm::{LLMProvider, Message, ToolDefinition};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Session used when the context carries none
const DEFAULT_SESSION: &str = "default";

/// Configuration for a team member
#[derive(Debug, Clone)]
pub struct MemberConfig {
    /// Model to use
    pub model: String,

    /// One-line role description
    pub role: String,

    /// Instructions, one line each in the system prompt
    pub instructions: Vec<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature for sampling
    pub temperature: Option<f32>,

    /// Server tools (web search)
    pub tools: Vec<ToolDefinition>,

    /// Previous turns replayed before each task; 0 disables history
    pub history_turns: usize,

    /// Upper bound on paused-turn continuations
    pub max_continuations: usize,
}

impl Default for MemberConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            role: String::new(),
            instructions: Vec::new(),
            max_tokens: 8192,
            temperature: None,
            tools: Vec::new(),
            history_turns: 3,
            max_continuations: 5,
        }
    }
}

/// An agent with a name, role, and instructions backed by one model
///
/// # Example
///
/// ```no_run
/// use agent_runtime::{MemberAgent, MemberConfig};
/// use agent_core::{Agent, Context};
/// use agent_llm::providers::AnthropicProvider;
/// use std::sync::Arc;
///
/// # async fn example() -> agent_core::Result<()> {
/// let provider = Arc::new(AnthropicProvider::from_env()?);
/// let config = MemberConfig {
///     role: "Collects recent news".to_string(),
///     instructions: vec!["Cite every source".to_string()],
///     ..MemberConfig::default()
/// };
///
/// let agent = MemberAgent::new(provider, config, "News Reliability Analyst");
/// let mut context = Context::new();
/// let answer = agent.process("AAPL".to_string(), &mut context).await?;
/// # Ok(())
/// # }
/// ```
pub struct MemberAgent {
    executor: AgentExecutor,
    config: MemberConfig,
    name: String,
    history: Option<Arc<dyn HistoryStore>>,
}

impl MemberAgent {
    /// Create a member without history
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        config: MemberConfig,
        name: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let executor = AgentExecutor::new(
            provider,
            ExecutorConfig {
                max_continuations: config.max_continuations,
                model: config.model.clone(),
                system_prompt: Some(system_prompt(&name, &config)),
                max_tokens: config.max_tokens,
                temperature: config.temperature,
                tools: config.tools.clone(),
            },
        );

        Self {
            executor,
            config,
            name,
            history: None,
        }
    }

    /// Keep conversation history in `store`
    pub fn with_history(mut self, store: Arc<dyn HistoryStore>) -> Self {
        self.history = Some(store);
        self
    }

    /// Member configuration
    pub fn config(&self) -> &MemberConfig {
        &self.config
    }

    /// The system prompt sent with every request
    pub fn system_prompt(&self) -> Option<&str> {
        self.executor.config().system_prompt.as_deref()
    }

    fn history_key(&self, context: &Context) -> String {
        let session = context.session_id().unwrap_or(DEFAULT_SESSION);
        format!("{session}:{}", self.name)
    }

    async fn load_history(&self, key: &str) -> Vec<Message> {
        let Some(store) = self.history.as_ref().filter(|_| self.config.history_turns > 0) else {
            return Vec::new();
        };

        match store.load(key, self.config.history_turns).await {
            Ok(turns) => turns.iter().flat_map(Turn::to_messages).collect(),
            Err(e) => {
                warn!(member = %self.name, error = %e, "Failed to load history, continuing without it");
                Vec::new()
            }
        }
    }
}

fn system_prompt(name: &str, config: &MemberConfig) -> String {
    let mut prompt = format!("You are {name}.");
    if !config.role.is_empty() {
        prompt.push_str(&format!("\nRole: {}", config.role));
    }
    if !config.instructions.is_empty() {
        prompt.push_str("\n\nInstructions:\n");
        prompt.push_str(&config.instructions.join("\n"));
    }
    prompt
}

#[async_trait]
impl Agent for MemberAgent {
    #[instrument(skip(self, input, context), fields(member = %self.name))]
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        let key = self.history_key(context);
        let history = self.load_history(&key).await;

        let outcome = self
            .executor
            .run_with_history(input.clone(), history)
            .await?;

        info!(
            requests = outcome.requests,
            searches = outcome.searches,
            total_tokens = outcome.usage.total(),
            "Member finished"
        );

        if let Some(store) = self.history.as_ref().filter(|_| self.config.history_turns > 0) {
            if let Err(e) = store.append(&key, Turn::new(input, outcome.text.clone())).await {
                warn!(member = %self.name, error = %e, "Failed to save history");
            }
        }

        context.record_member_output(&self.name, outcome.text.clone());
        Ok(outcome.text)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> &str {
        &self.config.role
    }
}
