//! Configuration for portfolio sentiment analysis

use crate::error::{Result, SentimentError};
use crate::market::LookbackPeriod;
use agent_utils::{env_duration_secs, env_parse, env_string};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default Claude model for both team members
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default location of the team's conversation history
pub const DEFAULT_HISTORY_PATH: &str = "sentiment_agents.json";

/// Configuration for portfolio sentiment analysis
#[derive(Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Lookback window for price history
    pub period: LookbackPeriod,

    /// Model used by every team member
    pub model: String,

    /// Maximum tokens per model response
    pub max_tokens: u32,

    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,

    /// Anthropic API key; only needed once the team is built
    #[serde(skip_serializing)]
    pub anthropic_api_key: Option<String>,

    /// Timeout for each market data request
    pub request_timeout: Duration,

    /// HTTP timeout for each model request
    pub llm_timeout: Duration,

    /// Retries for retryable model failures
    pub max_retries: u32,

    /// Initial backoff between model retries
    pub retry_backoff_base: Duration,

    /// Lifetime of cached provider responses
    pub cache_ttl: Duration,

    /// Market data requests allowed per minute
    pub rate_limit_per_minute: u32,

    /// JSON file holding agent conversation history
    pub history_path: PathBuf,

    /// Previous turns replayed to each member
    pub history_turns: usize,

    /// Web searches the news analyst may run per request
    pub web_search_max_uses: u32,

    /// Restrict web search to the approved news domains
    pub restrict_news_domains: bool,

    /// Conversation history session; one shared session when unset
    pub session_id: Option<String>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            period: LookbackPeriod::default(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 8192,
            temperature: None,
            anthropic_api_key: None,
            request_timeout: Duration::from_secs(30),
            llm_timeout: Duration::from_secs(300),
            max_retries: 3,
            retry_backoff_base: Duration::from_secs(1),
            cache_ttl: Duration::from_secs(300),
            rate_limit_per_minute: 60,
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
            history_turns: 3,
            web_search_max_uses: 5,
            restrict_news_domains: false,
            session_id: None,
        }
    }
}

impl fmt::Debug for SentimentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentConfig")
            .field("period", &self.period)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field(
                "anthropic_api_key",
                &self.anthropic_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("request_timeout", &self.request_timeout)
            .field("llm_timeout", &self.llm_timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base", &self.retry_backoff_base)
            .field("cache_ttl", &self.cache_ttl)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("history_path", &self.history_path)
            .field("history_turns", &self.history_turns)
            .field("web_search_max_uses", &self.web_search_max_uses)
            .field("restrict_news_domains", &self.restrict_news_domains)
            .field("session_id", &self.session_id)
            .finish()
    }
}

impl SentimentConfig {
    /// Create a new configuration builder
    pub fn builder() -> SentimentConfigBuilder {
        SentimentConfigBuilder::default()
    }

    /// Defaults overridden by `ANTHROPIC_API_KEY` and `SENTIMENT_*` variables
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(SentimentError::ConfigError(
                "model must not be empty".to_string(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(SentimentError::ConfigError(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        if let Some(t) = self.temperature
            && !(0.0..=1.0).contains(&t)
        {
            return Err(SentimentError::ConfigError(format!(
                "temperature must be between 0.0 and 1.0, got {t}"
            )));
        }

        if self.request_timeout.is_zero() || self.llm_timeout.is_zero() {
            return Err(SentimentError::ConfigError(
                "timeouts must be greater than 0".to_string(),
            ));
        }

        if self.rate_limit_per_minute == 0 {
            return Err(SentimentError::ConfigError(
                "rate_limit_per_minute must be greater than 0".to_string(),
            ));
        }

        if self.web_search_max_uses == 0 {
            return Err(SentimentError::ConfigError(
                "web_search_max_uses must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// The API key, or a configuration error naming the variable to set
    pub fn require_api_key(&self) -> Result<&str> {
        self.anthropic_api_key.as_deref().ok_or_else(|| {
            SentimentError::ConfigError(
                "ANTHROPIC_API_KEY not found. Please set it in your environment.".to_string(),
            )
        })
    }
}

/// Builder for SentimentConfig
#[derive(Debug, Default)]
pub struct SentimentConfigBuilder {
    period: Option<LookbackPeriod>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    anthropic_api_key: Option<String>,
    request_timeout: Option<Duration>,
    llm_timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_backoff_base: Option<Duration>,
    cache_ttl: Option<Duration>,
    rate_limit_per_minute: Option<u32>,
    history_path: Option<PathBuf>,
    history_turns: Option<usize>,
    web_search_max_uses: Option<u32>,
    restrict_news_domains: Option<bool>,
    session_id: Option<String>,
}

impl SentimentConfigBuilder {
    /// Set the lookback period
    pub fn period(mut self, period: LookbackPeriod) -> Self {
        self.period = Some(period);
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set maximum tokens per response
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the Anthropic API key
    pub fn anthropic_api_key(mut self, key: impl Into<String>) -> Self {
        self.anthropic_api_key = Some(key.into());
        self
    }

    /// Set the market data request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the model request timeout
    pub fn llm_timeout(mut self, duration: Duration) -> Self {
        self.llm_timeout = Some(duration);
        self
    }

    /// Set maximum retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set the provider cache lifetime
    pub fn cache_ttl(mut self, duration: Duration) -> Self {
        self.cache_ttl = Some(duration);
        self
    }

    /// Set the market data rate limit
    pub fn rate_limit_per_minute(mut self, limit: u32) -> Self {
        self.rate_limit_per_minute = Some(limit);
        self
    }

    /// Set the history file
    pub fn history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = Some(path.into());
        self
    }

    /// Set how many previous turns each member sees
    pub fn history_turns(mut self, turns: usize) -> Self {
        self.history_turns = Some(turns);
        self
    }

    /// Set the web search budget
    pub fn web_search_max_uses(mut self, uses: u32) -> Self {
        self.web_search_max_uses = Some(uses);
        self
    }

    /// Restrict web search to approved news domains
    pub fn restrict_news_domains(mut self, restrict: bool) -> Self {
        self.restrict_news_domains = Some(restrict);
        self
    }

    /// Set the history session
    pub fn session_id(mut self, session: impl Into<String>) -> Self {
        self.session_id = Some(session.into());
        self
    }

    /// Fill unset fields from the environment
    ///
    /// Values already set on the builder win over the environment.
    pub fn with_env(mut self) -> Result<Self> {
        if let Some(raw) = env_string("SENTIMENT_PERIOD") {
            self.period = self.period.or(Some(raw.parse()?));
        }
        self.anthropic_api_key = self
            .anthropic_api_key
            .or_else(|| env_string("ANTHROPIC_API_KEY"));
        self.model = self.model.or_else(|| env_string("SENTIMENT_MODEL"));
        self.max_tokens = self.max_tokens.or(env_parse("SENTIMENT_MAX_TOKENS")?);
        self.temperature = self.temperature.or(env_parse("SENTIMENT_TEMPERATURE")?);
        self.request_timeout = self
            .request_timeout
            .or(env_duration_secs("SENTIMENT_REQUEST_TIMEOUT_SECS")?);
        self.llm_timeout = self
            .llm_timeout
            .or(env_duration_secs("SENTIMENT_LLM_TIMEOUT_SECS")?);
        self.max_retries = self.max_retries.or(env_parse("SENTIMENT_MAX_RETRIES")?);
        self.cache_ttl = self
            .cache_ttl
            .or(env_duration_secs("SENTIMENT_CACHE_TTL_SECS")?);
        self.rate_limit_per_minute = self
            .rate_limit_per_minute
            .or(env_parse("SENTIMENT_RATE_LIMIT_PER_MINUTE")?);
        self.history_path = self
            .history_path
            .or_else(|| env_string("SENTIMENT_HISTORY_PATH").map(PathBuf::from));
        self.history_turns = self
            .history_turns
            .or(env_parse("SENTIMENT_HISTORY_TURNS")?);
        self.web_search_max_uses = self
            .web_search_max_uses
            .or(env_parse("SENTIMENT_WEB_SEARCH_MAX_USES")?);
        self.restrict_news_domains = self
            .restrict_news_domains
            .or(env_parse("SENTIMENT_RESTRICT_NEWS_DOMAINS")?);
        self.session_id = self
            .session_id
            .or_else(|| env_string("SENTIMENT_SESSION_ID"));
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<SentimentConfig> {
        let defaults = SentimentConfig::default();

        let config = SentimentConfig {
            period: self.period.unwrap_or(defaults.period),
            model: self.model.unwrap_or(defaults.model),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.or(defaults.temperature),
            anthropic_api_key: self.anthropic_api_key,
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            llm_timeout: self.llm_timeout.unwrap_or(defaults.llm_timeout),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff_base: self
                .retry_backoff_base
                .unwrap_or(defaults.retry_backoff_base),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            rate_limit_per_minute: self
                .rate_limit_per_minute
                .unwrap_or(defaults.rate_limit_per_minute),
            history_path: self.history_path.unwrap_or(defaults.history_path),
            history_turns: self.history_turns.unwrap_or(defaults.history_turns),
            web_search_max_uses: self
                .web_search_max_uses
                .unwrap_or(defaults.web_search_max_uses),
            restrict_news_domains: self
                .restrict_news_domains
                .unwrap_or(defaults.restrict_news_domains),
            session_id: self.session_id,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SentimentConfig::default();
        assert_eq!(config.period, LookbackPeriod::ThreeMonths);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 8192);
        assert_eq!(config.history_turns, 3);
        assert_eq!(config.history_path, PathBuf::from("sentiment_agents.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = SentimentConfig::builder()
            .period(LookbackPeriod::OneYear)
            .model("claude-test")
            .max_retries(5)
            .request_timeout(Duration::from_secs(10))
            .anthropic_api_key("sk-test")
            .build()
            .unwrap();

        assert_eq!(config.period, LookbackPeriod::OneYear);
        assert_eq!(config.model, "claude-test");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.require_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(SentimentConfig::builder().max_tokens(0).build().is_err());
        assert!(SentimentConfig::builder().temperature(1.5).build().is_err());
        assert!(SentimentConfig::builder().model("  ").build().is_err());
        assert!(
            SentimentConfig::builder()
                .rate_limit_per_minute(0)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let config = SentimentConfig::default();
        let err = config.require_api_key().unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = SentimentConfig::builder()
            .anthropic_api_key("sk-secret")
            .build()
            .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
