//! Assembly of the two-member sentiment team

use crate::config::SentimentConfig;
use crate::prompts::{
    APPROVED_NEWS_DOMAINS, NEWS_ANALYST_INSTRUCTIONS, NEWS_ANALYST_NAME, NEWS_ANALYST_ROLE,
    SYNTHESIZER_INSTRUCTIONS, SYNTHESIZER_NAME, SYNTHESIZER_ROLE, TEAM_INSTRUCTIONS, TEAM_NAME,
    instruction_lines,
};
use agent_core::{Agent, Error, Result};
use agent_llm::providers::{AnthropicConfig, AnthropicProvider};
use agent_llm::{LLMProvider, RetryPolicy, ToolDefinition};
use agent_runtime::{HistoryStore, JsonFileHistory, MemberAgent, MemberConfig, Team};
use std::sync::Arc;
use tracing::info;

/// Build the news analyst and synthesizer team on `provider`
pub fn build_team(
    config: &SentimentConfig,
    provider: Arc<dyn LLMProvider>,
    history: Option<Arc<dyn HistoryStore>>,
) -> Result<Team> {
    let mut web_search = ToolDefinition::web_search(config.web_search_max_uses);
    if config.restrict_news_domains {
        web_search = web_search.with_allowed_domains(APPROVED_NEWS_DOMAINS.iter().copied());
    }

    let base = MemberConfig {
        model: config.model.clone(),
        max_tokens: config.max_tokens as usize,
        temperature: config.temperature,
        history_turns: config.history_turns,
        ..MemberConfig::default()
    };

    let news_analyst = MemberAgent::new(
        Arc::clone(&provider),
        MemberConfig {
            role: NEWS_ANALYST_ROLE.to_string(),
            instructions: instruction_lines(NEWS_ANALYST_INSTRUCTIONS),
            tools: vec![web_search],
            ..base.clone()
        },
        NEWS_ANALYST_NAME,
    );
    let synthesizer = MemberAgent::new(
        provider,
        MemberConfig {
            role: SYNTHESIZER_ROLE.to_string(),
            instructions: instruction_lines(SYNTHESIZER_INSTRUCTIONS),
            ..base
        },
        SYNTHESIZER_NAME,
    );

    let (news_analyst, synthesizer) = match history {
        Some(store) => (
            news_analyst.with_history(Arc::clone(&store)),
            synthesizer.with_history(store),
        ),
        None => (news_analyst, synthesizer),
    };

    Team::builder(TEAM_NAME)
        .instructions(TEAM_INSTRUCTIONS.iter().copied())
        .add_member(Arc::new(news_analyst))
        .add_member(Arc::new(synthesizer))
        .build()
}

/// Anthropic provider with the configured timeout and retry policy
pub fn anthropic_provider(config: &SentimentConfig) -> Result<Arc<dyn LLMProvider>> {
    let api_key = config
        .require_api_key()
        .map_err(|e| Error::InitializationFailed(e.to_string()))?;

    let provider = AnthropicProvider::with_config(
        AnthropicConfig::new(api_key)
            .with_timeout(config.llm_timeout)
            .with_retry(RetryPolicy::with_retries(
                config.max_retries,
                config.retry_backoff_base,
            )),
    )
    .map_err(|e| Error::InitializationFailed(e.to_string()))?;

    Ok(Arc::new(provider))
}

/// The production team: Anthropic models with history in the configured file
pub fn anthropic_team(config: &SentimentConfig) -> Result<Arc<dyn Agent>> {
    let provider = anthropic_provider(config)?;
    let history: Arc<dyn HistoryStore> = Arc::new(JsonFileHistory::new(config.history_path.clone()));
    let team = build_team(config, provider, Some(history))?;
    info!(
        model = %config.model,
        members = team.member_count(),
        history = %config.history_path.display(),
        "Sentiment team initialized"
    );
    Ok(Arc::new(team))
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::Context;
    use agent_llm::{CompletionRequest, CompletionResponse, Message, StopReason, TokenUsage};
    use agent_runtime::InMemoryHistory;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingProvider {
        requests: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl LLMProvider for RecordingProvider {
        async fn complete(&self, request: CompletionRequest) -> agent_llm::Result<CompletionResponse> {
            let n = {
                let mut requests = self.requests.lock().unwrap();
                requests.push(request);
                requests.len()
            };
            Ok(CompletionResponse {
                message: Message::assistant(format!("answer {n}")),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    #[tokio::test]
    async fn test_team_runs_analyst_then_synthesizer() {
        let provider = Arc::new(RecordingProvider {
            requests: Mutex::new(Vec::new()),
        });
        let team = build_team(
            &SentimentConfig::default(),
            provider.clone(),
            Some(Arc::new(InMemoryHistory::new())),
        )
        .unwrap();
        assert_eq!(team.member_names(), vec![NEWS_ANALYST_NAME, SYNTHESIZER_NAME]);

        let mut context = Context::new();
        let answer = team.process("AAPL".to_string(), &mut context).await.unwrap();
        assert_eq!(answer, "answer 2");

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);

        let analyst = &requests[0];
        assert_eq!(analyst.model, crate::config::DEFAULT_MODEL);
        assert_eq!(analyst.tools.as_ref().map(Vec::len), Some(1));
        assert!(
            analyst
                .system
                .as_deref()
                .unwrap()
                .starts_with("You are News Reliability Analyst.")
        );

        let synthesizer = &requests[1];
        assert!(synthesizer.tools.is_none());
        let prompt = synthesizer.messages.last().unwrap().text();
        assert!(prompt.contains("## Findings from News Reliability Analyst\nanswer 1"));
    }

    #[tokio::test]
    async fn test_restricted_search_domains() {
        let provider = Arc::new(RecordingProvider {
            requests: Mutex::new(Vec::new()),
        });
        let config = SentimentConfig {
            restrict_news_domains: true,
            ..SentimentConfig::default()
        };
        let team = build_team(&config, provider.clone(), None).unwrap();
        team.process("MSFT".to_string(), &mut Context::new())
            .await
            .unwrap();

        let requests = provider.requests.lock().unwrap();
        let tools = serde_json::to_value(requests[0].tools.as_ref().unwrap()).unwrap();
        assert_eq!(tools[0]["type"], "web_search_20250305");
        assert_eq!(tools[0]["max_uses"], 5);
        assert_eq!(tools[0]["allowed_domains"][0], "bloomberg.com");
    }

    #[test]
    fn test_missing_key_fails_initialization() {
        let err = anthropic_team(&SentimentConfig::default()).err().unwrap();
        assert!(matches!(err, Error::InitializationFailed(_)));
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }
}
