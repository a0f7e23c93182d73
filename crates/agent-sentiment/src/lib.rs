//! Portfolio sentiment analysis
//!
//! Given a list of stock tickers, this crate fetches market data for each,
//! renders it into a markdown report, and hands the combined report to a
//! two-member LLM team that curates news and synthesizes a sentiment index.
//!
//! - Market data from Yahoo Finance (daily history plus fundamentals)
//! - Technical indicators: SMA 10/20/50, volatility, price changes, volume trend
//! - A fixed markdown report per ticker
//! - A sequential team: News Reliability Analyst (hosted web search) then
//!   Portfolio Sentiment Synthesizer
//!
//! # Example
//!
//! ```no_run
//! use agent_sentiment::{PortfolioAnalyzer, SentimentConfig};
//!
//! # async fn example() -> agent_sentiment::Result<()> {
//! let analyzer = PortfolioAnalyzer::from_config(SentimentConfig::from_env()?)?;
//! let markdown = analyzer.analyze_markdown("AAPL, MSFT, NVDA").await;
//! println!("{markdown}");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod indicators;
pub mod market;
pub mod orchestrator;
pub mod presets;
pub mod prompts;
pub mod repl;
pub mod report;
pub mod team;

pub use config::SentimentConfig;
pub use error::{FailureKind, Result, SentimentError, TickerFailure};
pub use indicators::{TechnicalSnapshot, Trend, VolumeTrend};
pub use market::{
    Bar, CompanyProfile, LookbackPeriod, MarketData, MarketDataFetcher, MarketDataProvider,
    PriceSeries,
};
pub use orchestrator::{AnalysisReport, PortfolioAnalyzer, TeamFactory, parse_tickers};
