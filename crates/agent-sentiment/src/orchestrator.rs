//! Portfolio orchestration
//!
//! Parses the ticker list, builds a market data block per ticker, and
//! hands one combined query to the sentiment team. A failing ticker never
//! aborts the others; the team is only asked when at least one ticker has
//! data.

use crate::api::YahooClient;
use crate::config::SentimentConfig;
use crate::error::{Result, SentimentError, TickerFailure};
use crate::indicators;
use crate::market::{LookbackPeriod, MarketDataFetcher};
use crate::prompts::{MarketBlock, portfolio_query};
use crate::report;
use crate::team::anthropic_team;
use agent_core::{Agent, Context};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};

/// Builds the team on first use
pub type TeamFactory = Box<dyn Fn() -> agent_core::Result<Arc<dyn Agent>> + Send + Sync>;

/// Split free text on commas and newlines into uppercase tickers
///
/// Blank entries are dropped; duplicates and order are kept.
pub fn parse_tickers(input: &str) -> Vec<String> {
    input
        .split([',', '\n'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_uppercase)
        .collect()
}

/// A finished analysis
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Requested tickers, in input order
    pub tickers: Vec<String>,
    /// When the analysis finished
    pub generated_at: DateTime<Utc>,
    /// Tickers that produced no market data
    pub failures: Vec<TickerFailure>,
    /// The team's report
    pub body: String,
}

impl AnalysisReport {
    /// Header, optional partial-failure warning, and the team's report
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# 📊 Portfolio Sentiment Analysis\n\n");
        out.push_str(&format!("**Stocks:** {}\n\n", self.tickers.join(", ")));
        out.push_str(&format!(
            "**Timestamp:** {}\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        if !self.failures.is_empty() {
            out.push_str("⚠️ **Warning:** Some tickers failed:\n");
            for failure in &self.failures {
                out.push_str(&format!("{failure}\n"));
            }
            out.push('\n');
        }
        out.push_str("---\n\n");
        out.push_str(&self.body);
        out
    }
}

/// Runs portfolio analyses against one market data source and one team
pub struct PortfolioAnalyzer {
    fetcher: MarketDataFetcher,
    period: LookbackPeriod,
    team: OnceCell<Arc<dyn Agent>>,
    team_factory: TeamFactory,
    session_id: Option<String>,
}

impl PortfolioAnalyzer {
    /// Create an analyzer; `team_factory` runs at most once, on the first
    /// analysis that reaches the team
    pub fn new(fetcher: MarketDataFetcher, period: LookbackPeriod, team_factory: TeamFactory) -> Self {
        Self {
            fetcher,
            period,
            team: OnceCell::new(),
            team_factory,
            session_id: None,
        }
    }

    /// Yahoo market data and the Anthropic team, both per `config`
    pub fn from_config(config: SentimentConfig) -> Result<Self> {
        let provider = YahooClient::from_config(&config)?;
        let fetcher = MarketDataFetcher::new(Arc::new(provider), config.request_timeout);
        let period = config.period;
        let session_id = config.session_id.clone();

        let analyzer = Self::new(fetcher, period, Box::new(move || anthropic_team(&config)));
        Ok(match session_id {
            Some(id) => analyzer.with_session_id(id),
            None => analyzer,
        })
    }

    /// Scope the team's conversation history to `session_id`
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Change the lookback period for later analyses
    pub fn set_period(&mut self, period: LookbackPeriod) {
        self.period = period;
    }

    /// Current lookback period
    pub fn period(&self) -> LookbackPeriod {
        self.period
    }

    /// The market data fetcher
    pub fn fetcher(&self) -> &MarketDataFetcher {
        &self.fetcher
    }

    /// Analyze the tickers in `request`, stamped with the current time
    pub async fn analyze(&self, request: &str) -> Result<AnalysisReport> {
        self.analyze_at(request, Utc::now()).await
    }

    /// Markdown for `request`: the report, or the failure text
    pub async fn analyze_markdown(&self, request: &str) -> String {
        match self.analyze(request).await {
            Ok(report) => report.to_markdown(),
            Err(e) => e.to_markdown(),
        }
    }

    /// Analyze the tickers in `request`, stamping the report with `now`
    #[instrument(skip(self, request, now), fields(period = %self.period))]
    pub async fn analyze_at(&self, request: &str, now: DateTime<Utc>) -> Result<AnalysisReport> {
        let tickers = parse_tickers(request);
        if tickers.is_empty() {
            return Err(SentimentError::EmptyInput);
        }
        info!(tickers = ?tickers, "Starting portfolio analysis");

        let mut blocks = Vec::with_capacity(tickers.len());
        let mut failures = Vec::new();
        for symbol in &tickers {
            match self.market_block(symbol).await {
                Ok(block) => blocks.push(block),
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "Ticker failed");
                    failures.push(e.ticker_failure(symbol));
                }
            }
        }

        if blocks.is_empty() {
            return Err(SentimentError::AllTickersFailed { failures });
        }

        let unavailable: Vec<String> = failures.iter().map(|f| f.symbol.clone()).collect();
        let query = portfolio_query(&tickers, &blocks, &unavailable)
            .map_err(|e| SentimentError::unexpected("Failed to build the analysis query", e))?;

        let team = self.team().await?;
        let mut context = match &self.session_id {
            Some(id) => Context::new().with_session_id(id.clone()),
            None => Context::new(),
        };
        let body = team
            .process(query, &mut context)
            .await
            .map_err(|e| SentimentError::unexpected("Sentiment analysis failed", e))?;

        info!(
            analyzed = blocks.len(),
            failed = failures.len(),
            "Portfolio analysis finished"
        );

        Ok(AnalysisReport {
            tickers,
            generated_at: now,
            failures,
            body,
        })
    }

    async fn market_block(&self, symbol: &str) -> Result<MarketBlock> {
        let data = self.fetcher.fetch(symbol, self.period).await?;
        let snapshot = indicators::compute(&data.series)?;
        Ok(MarketBlock {
            symbol: symbol.to_string(),
            markdown: report::render(symbol, &data.series, &data.profile, &snapshot),
        })
    }

    async fn team(&self) -> Result<&Arc<dyn Agent>> {
        self.team
            .get_or_try_init(|| async { (self.team_factory)() })
            .await
            .map_err(|e| SentimentError::unexpected("Failed to initialize the sentiment team", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::market::{Bar, CompanyProfile, MockMarketDataProvider};
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Team stand-in that records every query
    struct ScriptedTeam {
        reply: agent_core::Result<String>,
        queries: Mutex<Vec<String>>,
    }

    impl ScriptedTeam {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                queries: Mutex::new(Vec::new()),
            })
        }

        fn failing(err: agent_core::Error) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(err),
                queries: Mutex::new(Vec::new()),
            })
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Agent for ScriptedTeam {
        async fn process(&self, input: String, _context: &mut Context) -> agent_core::Result<String> {
            self.queries.lock().unwrap().push(input);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(agent_core::Error::ProcessingFailed(e.to_string())),
            }
        }

        fn name(&self) -> &str {
            "scripted team"
        }
    }

    fn bars() -> Vec<Bar> {
        (1..=5)
            .map(|d| Bar {
                date: NaiveDate::from_ymd_opt(2025, 2, d).unwrap(),
                open: 10.0,
                high: 10.0,
                low: 10.0,
                close: 10.0 + f64::from(d),
                volume: 100,
            })
            .collect()
    }

    fn provider_with(known: &'static [&'static str]) -> MockMarketDataProvider {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_name().return_const("mock".to_string());
        provider.expect_price_history().returning(move |symbol, _| {
            if known.contains(&symbol) {
                Ok(bars())
            } else {
                Err(SentimentError::NoData {
                    symbol: symbol.to_string(),
                    reason: "unknown symbol".to_string(),
                })
            }
        });
        provider
            .expect_company_profile()
            .returning(|_| Ok(CompanyProfile::default()));
        provider
    }

    fn analyzer(provider: MockMarketDataProvider, team: Arc<ScriptedTeam>) -> PortfolioAnalyzer {
        PortfolioAnalyzer::new(
            MarketDataFetcher::new(Arc::new(provider), Duration::from_secs(5)),
            LookbackPeriod::ThreeMonths,
            Box::new(move || Ok(Arc::clone(&team) as Arc<dyn Agent>)),
        )
    }

    #[test]
    fn test_parse_tickers() {
        assert_eq!(parse_tickers("AAPL, msft , ,TSLA"), vec!["AAPL", "MSFT", "TSLA"]);
        assert_eq!(parse_tickers("aapl\nmsft,aapl"), vec!["AAPL", "MSFT", "AAPL"]);
        assert!(parse_tickers(" , \n ").is_empty());
    }

    #[tokio::test]
    async fn test_empty_input() {
        let team = ScriptedTeam::ok("unused");
        let analyzer = analyzer(MockMarketDataProvider::new(), Arc::clone(&team));

        let err = analyzer.analyze(" ,, ").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::EmptyInput);
        assert!(team.queries().is_empty());
    }

    #[tokio::test]
    async fn test_all_tickers_failed_skips_team() {
        let team = ScriptedTeam::ok("unused");
        let analyzer = analyzer(provider_with(&[]), Arc::clone(&team));

        let err = analyzer.analyze("ZZZZ, QQQQX").await.unwrap_err();
        match &err {
            SentimentError::AllTickersFailed { failures } => {
                let symbols: Vec<_> = failures.iter().map(|f| f.symbol.as_str()).collect();
                assert_eq!(symbols, vec!["ZZZZ", "QQQQX"]);
                assert!(failures.iter().all(|f| f.kind == FailureKind::NoData));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let text = err.to_markdown();
        assert!(text.contains("- ZZZZ: unknown symbol"));
        assert!(text.contains("- QQQQX: unknown symbol"));
        assert!(team.queries().is_empty());
    }

    #[tokio::test]
    async fn test_partial_failure_warns_and_calls_team_once() {
        let team = ScriptedTeam::ok("TEAM REPORT");
        let analyzer = analyzer(provider_with(&["AAPL"]), Arc::clone(&team));

        let now = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        let report = analyzer.analyze_at("aapl, zzzz", now).await.unwrap();

        let queries = team.queries();
        assert_eq!(queries.len(), 1);
        assert!(queries[0].contains("DATA: AAPL"));
        assert!(!queries[0].contains("DATA: ZZZZ"));
        assert!(queries[0].contains("unavailable for: ZZZZ"));

        assert_eq!(report.tickers, vec!["AAPL", "ZZZZ"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(
            report.to_markdown(),
            "# 📊 Portfolio Sentiment Analysis\n\n\
             **Stocks:** AAPL, ZZZZ\n\n\
             **Timestamp:** 2025-03-04 05:06:07 UTC\n\n\
             ⚠️ **Warning:** Some tickers failed:\n\
             - ZZZZ: unknown symbol\n\n\
             ---\n\n\
             TEAM REPORT"
        );
    }

    #[tokio::test]
    async fn test_team_failure_is_unexpected() {
        let team = ScriptedTeam::failing(agent_core::Error::MemberFailed {
            member: "News Reliability Analyst".into(),
            reason: "rate limited".into(),
        });
        let analyzer = analyzer(provider_with(&["AAPL"]), Arc::clone(&team));

        let text = analyzer.analyze_markdown("AAPL").await;
        assert!(text.starts_with("❌ **Error:** Sentiment analysis failed"));
        assert!(text.contains("rate limited"));
        assert_eq!(team.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_team_is_built_once_and_lazily() {
        let builds = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&builds);
        let team = ScriptedTeam::ok("ok");
        let shared = Arc::clone(&team);

        let analyzer = PortfolioAnalyzer::new(
            MarketDataFetcher::new(Arc::new(provider_with(&["MSFT"])), Duration::from_secs(5)),
            LookbackPeriod::OneMonth,
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::clone(&shared) as Arc<dyn Agent>)
            }),
        );

        // all-failed requests never build the team
        assert!(analyzer.analyze("NOPE").await.is_err());
        assert_eq!(builds.load(Ordering::SeqCst), 0);

        analyzer.analyze("MSFT").await.unwrap();
        analyzer.analyze("MSFT").await.unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(team.queries().len(), 2);
    }

    #[tokio::test]
    async fn test_team_init_failure_is_unexpected() {
        let analyzer = PortfolioAnalyzer::new(
            MarketDataFetcher::new(Arc::new(provider_with(&["AAPL"])), Duration::from_secs(5)),
            LookbackPeriod::ThreeMonths,
            Box::new(|| {
                Err(agent_core::Error::InitializationFailed(
                    "ANTHROPIC_API_KEY not found".into(),
                ))
            }),
        );

        let err = analyzer.analyze("AAPL").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Unexpected);
        assert!(err.to_markdown().contains("ANTHROPIC_API_KEY"));
    }
}
