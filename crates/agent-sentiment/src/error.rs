//! Error types for portfolio sentiment analysis
//!
//! Every failure a caller can observe falls into one of the kinds in
//! [`FailureKind`]. Internal errors (configuration, templates, indicators)
//! surface as [`FailureKind::Unexpected`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Longest diagnostic detail shown to the user, in characters
pub const MAX_DETAIL_CHARS: usize = 1500;

/// Failure marker every user-facing error text starts with
pub const FAILURE_MARKER: &str = "❌";

/// The user-visible failure taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// No tickers in the request
    EmptyInput,
    /// The provider returned nothing for a ticker
    NoData,
    /// The provider failed for a ticker
    ProviderError,
    /// Every ticker failed; the analysis was not attempted
    AllTickersFailed,
    /// Anything else, including LLM failures
    Unexpected,
}

/// Why one ticker produced no market data block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerFailure {
    /// Ticker symbol
    pub symbol: String,
    /// NoData or ProviderError
    pub kind: FailureKind,
    /// Human-readable reason
    pub reason: String,
}

impl fmt::Display for TickerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- {}: {}", self.symbol, self.reason)
    }
}

/// Sentiment analysis errors
#[derive(Debug, Error)]
pub enum SentimentError {
    /// The request contained no tickers
    #[error("Please enter at least one stock ticker")]
    EmptyInput,

    /// No price history for the symbol
    #[error("No data available for {symbol}: {reason}")]
    NoData {
        /// Ticker symbol
        symbol: String,
        /// Provider explanation
        reason: String,
    },

    /// The market data provider failed for the symbol
    #[error("Error fetching data for {symbol}: {reason}")]
    ProviderError {
        /// Ticker symbol
        symbol: String,
        /// Provider explanation
        reason: String,
    },

    /// Every ticker in the request failed
    #[error("All tickers failed to fetch data")]
    AllTickersFailed {
        /// One entry per ticker, in request order
        failures: Vec<TickerFailure>,
    },

    /// Unclassified failure with diagnostic detail
    #[error("{message}")]
    Unexpected {
        /// Short description
        message: String,
        /// Diagnostic detail (truncated when rendered)
        detail: String,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Technical indicator calculation error
    #[error("Technical indicator error: {0}")]
    IndicatorError(String),

    /// Prompt template error
    #[error("Template error: {0}")]
    TemplateError(#[from] minijinja::Error),
}

/// Result type alias for sentiment operations
pub type Result<T> = std::result::Result<T, SentimentError>;

impl SentimentError {
    /// Wrap any error as `Unexpected`
    pub fn unexpected(message: impl Into<String>, detail: impl fmt::Display) -> Self {
        Self::Unexpected {
            message: message.into(),
            detail: detail.to_string(),
        }
    }

    /// Which taxonomy bucket this error belongs to
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::EmptyInput => FailureKind::EmptyInput,
            Self::NoData { .. } => FailureKind::NoData,
            Self::ProviderError { .. } => FailureKind::ProviderError,
            Self::AllTickersFailed { .. } => FailureKind::AllTickersFailed,
            Self::Unexpected { .. }
            | Self::ConfigError(_)
            | Self::IndicatorError(_)
            | Self::TemplateError(_) => FailureKind::Unexpected,
        }
    }

    /// Per-ticker failure note, if this error concerns a single ticker
    pub fn ticker_failure(&self, symbol: &str) -> TickerFailure {
        let reason = match self {
            Self::NoData { reason, .. } | Self::ProviderError { reason, .. } => reason.clone(),
            other => other.to_string(),
        };
        let kind = match self.kind() {
            FailureKind::NoData => FailureKind::NoData,
            _ => FailureKind::ProviderError,
        };
        TickerFailure {
            symbol: symbol.to_string(),
            kind,
            reason,
        }
    }

    /// Markdown shown to the user; always starts with the failure marker
    pub fn to_markdown(&self) -> String {
        match self {
            Self::EmptyInput => format!("{FAILURE_MARKER} Please enter at least one stock ticker."),
            Self::AllTickersFailed { failures } => {
                let notes = failures
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n");
                format!(
                    "{FAILURE_MARKER} **All tickers failed to fetch data:**\n\n{notes}\n\n\
                     **Please check:**\n\
                     - Ticker symbols are correct\n\
                     - The market data provider is reachable\n\
                     - Network connection is working"
                )
            }
            Self::NoData { .. } | Self::ProviderError { .. } => {
                format!("{FAILURE_MARKER} {self}")
            }
            Self::Unexpected { message, detail } => render_unexpected(message, detail),
            other => render_unexpected(&other.to_string(), ""),
        }
    }
}

fn render_unexpected(message: &str, detail: &str) -> String {
    let mut out = format!("{FAILURE_MARKER} **Error:** {message}\n\n");
    if !detail.is_empty() {
        out.push_str(&format!(
            "**Details:**\n```\n{}\n```\n\n",
            truncate_detail(detail)
        ));
    }
    out.push_str("Please check your API key and stock tickers, then try again.");
    out
}

/// Cut `detail` to [`MAX_DETAIL_CHARS`] characters
pub fn truncate_detail(detail: &str) -> String {
    match detail.char_indices().nth(MAX_DETAIL_CHARS) {
        Some((byte_idx, _)) => format!("{}\n... (truncated)", &detail[..byte_idx]),
        None => detail.to_string(),
    }
}

/// Convert SentimentError to agent_core::Error
impl From<SentimentError> for agent_core::Error {
    fn from(err: SentimentError) -> Self {
        agent_core::Error::ProcessingFailed(err.to_string())
    }
}

impl From<agent_utils::EnvError> for SentimentError {
    fn from(err: agent_utils::EnvError) -> Self {
        SentimentError::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SentimentError::NoData {
            symbol: "ZZZZ".to_string(),
            reason: "empty history".to_string(),
        };
        assert_eq!(err.to_string(), "No data available for ZZZZ: empty history");
        assert_eq!(err.kind(), FailureKind::NoData);
    }

    #[test]
    fn test_every_failure_renders_with_marker() {
        let errors = vec![
            SentimentError::EmptyInput,
            SentimentError::NoData {
                symbol: "A".into(),
                reason: "r".into(),
            },
            SentimentError::ProviderError {
                symbol: "A".into(),
                reason: "r".into(),
            },
            SentimentError::AllTickersFailed { failures: vec![] },
            SentimentError::unexpected("boom", "trace"),
            SentimentError::ConfigError("bad".into()),
        ];
        for err in errors {
            assert!(err.to_markdown().starts_with(FAILURE_MARKER), "{err:?}");
        }
    }

    #[test]
    fn test_all_failed_lists_every_ticker() {
        let err = SentimentError::AllTickersFailed {
            failures: vec![
                SentimentError::NoData {
                    symbol: "AAA".into(),
                    reason: "no rows".into(),
                }
                .ticker_failure("AAA"),
                SentimentError::ProviderError {
                    symbol: "BBB".into(),
                    reason: "timeout".into(),
                }
                .ticker_failure("BBB"),
            ],
        };
        let text = err.to_markdown();
        assert!(text.contains("- AAA: no rows"));
        assert!(text.contains("- BBB: timeout"));
        assert_eq!(err.kind(), FailureKind::AllTickersFailed);
    }

    #[test]
    fn test_unexpected_detail_is_truncated() {
        let detail = "x".repeat(MAX_DETAIL_CHARS + 100);
        let text = SentimentError::unexpected("LLM failed", &detail).to_markdown();

        assert!(text.contains("**Error:** LLM failed"));
        assert!(text.contains("(truncated)"));
        assert!(!text.contains(&detail));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let detail = "é".repeat(MAX_DETAIL_CHARS + 1);
        let cut = truncate_detail(&detail);
        assert!(cut.starts_with(&"é".repeat(MAX_DETAIL_CHARS)));
        assert_eq!(truncate_detail("short"), "short");
    }

    #[test]
    fn test_internal_errors_are_unexpected() {
        assert_eq!(
            SentimentError::IndicatorError("x".into()).kind(),
            FailureKind::Unexpected
        );
        let agent_err: agent_core::Error = SentimentError::EmptyInput.into();
        assert!(matches!(agent_err, agent_core::Error::ProcessingFailed(_)));
    }
}
