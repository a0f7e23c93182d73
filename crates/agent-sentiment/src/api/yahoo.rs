//! Yahoo Finance client
//!
//! Daily history comes from the chart API through `yahoo_finance_api`.
//! Fundamentals come from the quote-summary endpoint, which needs a session
//! cookie and a matching crumb.

use crate::cache::{CacheKey, MarketCache};
use crate::error::{Result, SentimentError};
use crate::market::{Bar, CompanyProfile, LookbackPeriod, MarketDataProvider};
use async_trait::async_trait;
use chrono::DateTime;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use yahoo_finance_api as yahoo;

const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const SUMMARY_MODULES: &str = "assetProfile,summaryDetail,defaultKeyStatistics,financialData,price";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

#[derive(Debug, Clone)]
struct CrumbSession {
    cookie: String,
    crumb: String,
}

/// Yahoo Finance market data provider
#[derive(Clone)]
pub struct YahooClient {
    connector: Arc<yahoo::YahooConnector>,
    http: Client,
    rate_limiter: SharedRateLimiter,
    history_cache: MarketCache<Vec<Bar>>,
    profile_cache: MarketCache<CompanyProfile>,
    session: Arc<Mutex<Option<CrumbSession>>>,
}

impl YahooClient {
    /// Create a client
    ///
    /// # Arguments
    /// * `cache_ttl` - lifetime of cached history and profiles
    /// * `requests_per_minute` - shared limit across all Yahoo endpoints
    /// * `request_timeout` - HTTP timeout for the quote-summary calls
    pub fn new(
        cache_ttl: Duration,
        requests_per_minute: NonZeroU32,
        request_timeout: Duration,
    ) -> Result<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| SentimentError::ConfigError(format!("Yahoo connector: {e}")))?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()
            .map_err(|e| SentimentError::ConfigError(format!("HTTP client: {e}")))?;
        let quota = Quota::per_minute(requests_per_minute);

        Ok(Self {
            connector: Arc::new(connector),
            http,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            history_cache: MarketCache::new(cache_ttl),
            profile_cache: MarketCache::new(cache_ttl),
            session: Arc::new(Mutex::new(None)),
        })
    }

    /// Create a client from the sentiment configuration
    pub fn from_config(config: &crate::config::SentimentConfig) -> Result<Self> {
        let per_minute = NonZeroU32::new(config.rate_limit_per_minute).ok_or_else(|| {
            SentimentError::ConfigError("rate_limit_per_minute must be greater than 0".into())
        })?;
        Self::new(config.cache_ttl, per_minute, config.request_timeout)
    }

    async fn fetch_history(&self, symbol: &str, period: LookbackPeriod) -> Result<Vec<Bar>> {
        self.rate_limiter.until_ready().await;

        let response = self
            .connector
            .get_quote_range(symbol, "1d", period.as_str())
            .await
            .map_err(|e| provider_error(symbol, e))?;
        let quotes = response.quotes().map_err(|e| SentimentError::NoData {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;

        Ok(quotes
            .iter()
            .filter_map(|q| {
                let date = i64::try_from(q.timestamp)
                    .ok()
                    .and_then(|ts| DateTime::from_timestamp(ts, 0))?
                    .date_naive();
                Some(Bar {
                    date,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                })
            })
            .collect())
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile> {
        match self.quote_summary(symbol).await {
            Err(SentimentError::ProviderError { reason, .. }) if reason == SESSION_REJECTED => {
                debug!(symbol, "Crumb rejected, starting a new session");
                *self.session.lock().await = None;
                self.quote_summary(symbol).await
            }
            other => other,
        }
    }

    async fn quote_summary(&self, symbol: &str) -> Result<CompanyProfile> {
        let session = self.session(symbol).await?;
        self.rate_limiter.until_ready().await;

        let url = format!("{QUOTE_SUMMARY_URL}/{symbol}");
        let response = self
            .http
            .get(&url)
            .header(COOKIE, &session.cookie)
            .query(&[("modules", SUMMARY_MODULES), ("crumb", session.crumb.as_str())])
            .send()
            .await
            .map_err(|e| provider_error(symbol, e))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(provider_error(symbol, SESSION_REJECTED));
            }
            StatusCode::NOT_FOUND => {
                return Err(SentimentError::NoData {
                    symbol: symbol.to_string(),
                    reason: "no fundamentals for this symbol".to_string(),
                });
            }
            status if !status.is_success() => {
                return Err(provider_error(symbol, format!("quote summary returned {status}")));
            }
            _ => {}
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| provider_error(symbol, format!("invalid quote summary: {e}")))?;
        parse_quote_summary(&body).map_err(|reason| provider_error(symbol, reason))
    }

    async fn session(&self, symbol: &str) -> Result<CrumbSession> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_ref() {
            return Ok(session.clone());
        }

        self.rate_limiter.until_ready().await;
        // fc.yahoo.com answers 404 but still sets the session cookie
        let response = self
            .http
            .get(COOKIE_URL)
            .send()
            .await
            .map_err(|e| provider_error(symbol, e))?;
        let cookie = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .collect::<Vec<_>>()
            .join("; ");
        if cookie.is_empty() {
            return Err(provider_error(symbol, "no session cookie from Yahoo"));
        }

        self.rate_limiter.until_ready().await;
        let crumb = self
            .http
            .get(CRUMB_URL)
            .header(COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| provider_error(symbol, e))?
            .error_for_status()
            .map_err(|e| provider_error(symbol, e))?
            .text()
            .await
            .map_err(|e| provider_error(symbol, e))?;
        let crumb = crumb.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(provider_error(symbol, "invalid crumb from Yahoo"));
        }

        let session = CrumbSession { cookie, crumb };
        *guard = Some(session.clone());
        Ok(session)
    }
}

const SESSION_REJECTED: &str = "session rejected";

fn provider_error(symbol: &str, reason: impl std::fmt::Display) -> SentimentError {
    SentimentError::ProviderError {
        symbol: symbol.to_string(),
        reason: reason.to_string(),
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    #[instrument(skip(self))]
    async fn price_history(&self, symbol: &str, period: LookbackPeriod) -> Result<Vec<Bar>> {
        self.history_cache
            .get_or_fetch(CacheKey::history(symbol, period), || {
                self.fetch_history(symbol, period)
            })
            .await
    }

    #[instrument(skip(self))]
    async fn company_profile(&self, symbol: &str) -> Result<CompanyProfile> {
        let profile = self
            .profile_cache
            .get_or_fetch(CacheKey::profile(symbol), || self.fetch_profile(symbol))
            .await;
        if let Err(e) = &profile {
            warn!(symbol, error = %e, "Yahoo quote summary failed");
        }
        profile
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

/// Extract the profile from a quote-summary response body
///
/// Yahoo wraps numbers as `{"raw": 1.5, "fmt": "1.50"}`; only `raw` is used.
pub fn parse_quote_summary(body: &Value) -> std::result::Result<CompanyProfile, String> {
    if let Some(err) = body.pointer("/quoteSummary/error").filter(|e| !e.is_null()) {
        let description = err
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(description.to_string());
    }

    let result = body
        .pointer("/quoteSummary/result/0")
        .ok_or_else(|| "empty quote summary".to_string())?;

    let text = |path: &str| {
        result
            .pointer(path)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    };
    let raw = |path: &str| {
        result
            .pointer(path)
            .and_then(|v| v.get("raw").or(Some(v)))
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
    };

    Ok(CompanyProfile {
        long_name: text("/price/longName").or_else(|| text("/price/shortName")),
        sector: text("/assetProfile/sector"),
        industry: text("/assetProfile/industry"),
        fifty_two_week_high: raw("/summaryDetail/fiftyTwoWeekHigh"),
        fifty_two_week_low: raw("/summaryDetail/fiftyTwoWeekLow"),
        fifty_day_average: raw("/summaryDetail/fiftyDayAverage"),
        two_hundred_day_average: raw("/summaryDetail/twoHundredDayAverage"),
        beta: raw("/summaryDetail/beta").or_else(|| raw("/defaultKeyStatistics/beta")),
        market_cap: raw("/summaryDetail/marketCap").or_else(|| raw("/price/marketCap")),
        trailing_pe: raw("/summaryDetail/trailingPE"),
        forward_pe: raw("/summaryDetail/forwardPE")
            .or_else(|| raw("/defaultKeyStatistics/forwardPE")),
        peg_ratio: raw("/defaultKeyStatistics/pegRatio"),
        price_to_book: raw("/defaultKeyStatistics/priceToBook"),
        dividend_yield: raw("/summaryDetail/dividendYield"),
        dividend_rate: raw("/summaryDetail/dividendRate"),
        payout_ratio: raw("/summaryDetail/payoutRatio"),
        recommendation_key: text("/financialData/recommendationKey")
            .filter(|k| k != "none"),
        target_mean_price: raw("/financialData/targetMeanPrice"),
        number_of_analyst_opinions: raw("/financialData/numberOfAnalystOpinions")
            .and_then(|n| u32::try_from(n.round() as i64).ok()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary_fixture() -> Value {
        json!({
            "quoteSummary": {
                "result": [{
                    "assetProfile": {
                        "sector": "Technology",
                        "industry": "Consumer Electronics"
                    },
                    "summaryDetail": {
                        "fiftyTwoWeekHigh": {"raw": 237.23, "fmt": "237.23"},
                        "fiftyTwoWeekLow": {"raw": 164.08, "fmt": "164.08"},
                        "fiftyDayAverage": {"raw": 221.5, "fmt": "221.50"},
                        "twoHundredDayAverage": {"raw": 205.1, "fmt": "205.10"},
                        "beta": {"raw": 1.24, "fmt": "1.24"},
                        "marketCap": {"raw": 3_400_000_000_000_f64, "fmt": "3.4T"},
                        "trailingPE": {"raw": 34.5, "fmt": "34.50"},
                        "forwardPE": {},
                        "dividendYield": {"raw": 0.0044, "fmt": "0.44%"},
                        "dividendRate": {"raw": 1.0, "fmt": "1.00"},
                        "payoutRatio": {"raw": 0.15, "fmt": "15.00%"}
                    },
                    "defaultKeyStatistics": {
                        "pegRatio": {"raw": 2.9, "fmt": "2.90"},
                        "priceToBook": {"raw": 50.2, "fmt": "50.20"},
                        "forwardPE": {"raw": 29.8, "fmt": "29.80"}
                    },
                    "financialData": {
                        "recommendationKey": "buy",
                        "targetMeanPrice": {"raw": 245.0, "fmt": "245.00"},
                        "numberOfAnalystOpinions": {"raw": 38, "fmt": "38"}
                    },
                    "price": {
                        "longName": "Apple Inc.",
                        "shortName": "Apple"
                    }
                }],
                "error": null
            }
        })
    }

    #[test]
    fn test_parse_quote_summary() {
        let profile = parse_quote_summary(&summary_fixture()).unwrap();

        assert_eq!(profile.long_name.as_deref(), Some("Apple Inc."));
        assert_eq!(profile.sector.as_deref(), Some("Technology"));
        assert_eq!(profile.fifty_two_week_high, Some(237.23));
        assert_eq!(profile.market_cap, Some(3_400_000_000_000.0));
        assert_eq!(profile.dividend_yield, Some(0.0044));
        assert_eq!(profile.recommendation_key.as_deref(), Some("buy"));
        assert_eq!(profile.number_of_analyst_opinions, Some(38));
        // empty object in summaryDetail falls through to key statistics
        assert_eq!(profile.forward_pe, Some(29.8));
    }

    #[test]
    fn test_parse_sparse_summary() {
        let body = json!({
            "quoteSummary": {
                "result": [{ "price": { "shortName": "Tiny Corp" } }],
                "error": null
            }
        });
        let profile = parse_quote_summary(&body).unwrap();

        assert_eq!(profile.long_name.as_deref(), Some("Tiny Corp"));
        assert_eq!(profile.sector, None);
        assert_eq!(profile.trailing_pe, None);
        assert_eq!(profile.number_of_analyst_opinions, None);
    }

    #[test]
    fn test_parse_summary_error() {
        let body = json!({
            "quoteSummary": {
                "result": null,
                "error": { "code": "Not Found", "description": "Quote not found for symbol: ZZZZ" }
            }
        });
        let err = parse_quote_summary(&body).unwrap_err();
        assert!(err.contains("ZZZZ"));

        assert!(parse_quote_summary(&json!({})).is_err());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_history() {
        let client = YahooClient::new(
            Duration::from_secs(60),
            NonZeroU32::new(30).unwrap(),
            Duration::from_secs(30),
        )
        .unwrap();
        let bars = client
            .price_history("AAPL", LookbackPeriod::FiveDays)
            .await
            .unwrap();
        assert!(!bars.is_empty());
        assert!(bars.iter().all(|b| b.close > 0.0));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_profile() {
        let client = YahooClient::new(
            Duration::from_secs(60),
            NonZeroU32::new(30).unwrap(),
            Duration::from_secs(30),
        )
        .unwrap();
        let profile = client.company_profile("MSFT").await.unwrap();
        assert!(profile.long_name.is_some());
    }
}
