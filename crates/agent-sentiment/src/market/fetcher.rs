//! Fetching one ticker's market data with failure normalization

use super::{CompanyProfile, LookbackPeriod, MarketDataProvider, PriceSeries};
use crate::error::{Result, SentimentError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// Price history plus fundamentals for one ticker
#[derive(Debug, Clone, PartialEq)]
pub struct MarketData {
    /// Non-empty, chronological history
    pub series: PriceSeries,
    /// Fundamentals; empty when the provider had none
    pub profile: CompanyProfile,
}

/// Wraps a provider so callers only ever see `NoData` or `ProviderError`
///
/// Holds no mutable state; caching belongs to the provider.
#[derive(Clone)]
pub struct MarketDataFetcher {
    provider: Arc<dyn MarketDataProvider>,
    request_timeout: Duration,
}

impl MarketDataFetcher {
    /// Create a fetcher; each provider call is bounded by `request_timeout`
    pub fn new(provider: Arc<dyn MarketDataProvider>, request_timeout: Duration) -> Self {
        Self {
            provider,
            request_timeout,
        }
    }

    /// Fetch history and fundamentals for `symbol`
    ///
    /// A failed profile lookup degrades to an empty profile; the history
    /// alone is enough for the report.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn fetch(&self, symbol: &str, period: LookbackPeriod) -> Result<MarketData> {
        let bars = match timeout(self.request_timeout, self.provider.price_history(symbol, period)).await {
            Ok(Ok(bars)) => bars,
            Ok(Err(e)) => return Err(normalize(symbol, e)),
            Err(_) => {
                return Err(SentimentError::ProviderError {
                    symbol: symbol.to_string(),
                    reason: format!("request timed out after {}s", self.request_timeout.as_secs()),
                });
            }
        };

        let series = PriceSeries::new(symbol, bars);
        if series.is_empty() {
            return Err(SentimentError::NoData {
                symbol: symbol.to_string(),
                reason: "no price history returned, verify the ticker symbol is correct"
                    .to_string(),
            });
        }
        info!(symbol, bars = series.len(), "Fetched price history");

        let profile = match timeout(self.request_timeout, self.provider.company_profile(symbol)).await {
            Ok(Ok(profile)) => profile,
            Ok(Err(e)) => {
                warn!(symbol, error = %e, "Could not fetch company profile, continuing without it");
                CompanyProfile::default()
            }
            Err(_) => {
                warn!(symbol, "Company profile request timed out, continuing without it");
                CompanyProfile::default()
            }
        };
        debug!(symbol, profile_empty = profile.is_empty(), "Fetched company profile");

        Ok(MarketData { series, profile })
    }
}

fn normalize(symbol: &str, err: SentimentError) -> SentimentError {
    match err {
        e @ (SentimentError::NoData { .. } | SentimentError::ProviderError { .. }) => e,
        other => SentimentError::ProviderError {
            symbol: symbol.to_string(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::market::{Bar, MockMarketDataProvider};
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    fn bars(n: u32) -> Vec<Bar> {
        (1..=n)
            .map(|d| Bar {
                date: NaiveDate::from_ymd_opt(2025, 1, d).unwrap(),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: f64::from(d),
                volume: 10,
            })
            .collect()
    }

    fn fetcher(provider: MockMarketDataProvider) -> MarketDataFetcher {
        MarketDataFetcher::new(Arc::new(provider), Duration::from_secs(5))
    }

    fn mock() -> MockMarketDataProvider {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_name().return_const("mock".to_string());
        provider
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mut provider = mock();
        provider
            .expect_price_history()
            .with(eq("AAPL"), eq(LookbackPeriod::ThreeMonths))
            .times(1)
            .returning(|_, _| Ok(bars(3)));
        provider.expect_company_profile().times(1).returning(|_| {
            Ok(CompanyProfile {
                long_name: Some("Apple Inc.".into()),
                ..CompanyProfile::default()
            })
        });

        let data = fetcher(provider)
            .fetch("AAPL", LookbackPeriod::ThreeMonths)
            .await
            .unwrap();
        assert_eq!(data.series.len(), 3);
        assert_eq!(data.profile.long_name.as_deref(), Some("Apple Inc."));
    }

    #[tokio::test]
    async fn test_empty_history_is_no_data() {
        let mut provider = mock();
        provider.expect_price_history().returning(|_, _| Ok(Vec::new()));
        provider.expect_company_profile().never();

        let err = fetcher(provider)
            .fetch("ZZZZ", LookbackPeriod::ThreeMonths)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::NoData);
    }

    #[tokio::test]
    async fn test_foreign_errors_become_provider_errors() {
        let mut provider = mock();
        provider
            .expect_price_history()
            .returning(|_, _| Err(SentimentError::IndicatorError("weird".into())));

        let err = fetcher(provider)
            .fetch("MSFT", LookbackPeriod::OneMonth)
            .await
            .unwrap_err();
        assert!(matches!(err, SentimentError::ProviderError { ref symbol, .. } if symbol == "MSFT"));
    }

    #[tokio::test]
    async fn test_profile_failure_degrades_to_empty() {
        let mut provider = mock();
        provider.expect_price_history().returning(|_, _| Ok(bars(2)));
        provider.expect_company_profile().returning(|s| {
            Err(SentimentError::ProviderError {
                symbol: s.to_string(),
                reason: "401".into(),
            })
        });

        let data = fetcher(provider)
            .fetch("TSLA", LookbackPeriod::ThreeMonths)
            .await
            .unwrap();
        assert!(data.profile.is_empty());
        assert_eq!(data.series.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        struct SlowProvider;

        #[async_trait::async_trait]
        impl MarketDataProvider for SlowProvider {
            async fn price_history(&self, _: &str, _: LookbackPeriod) -> Result<Vec<Bar>> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(Vec::new())
            }

            async fn company_profile(&self, _: &str) -> Result<CompanyProfile> {
                Ok(CompanyProfile::default())
            }

            fn name(&self) -> &str {
                "slow"
            }
        }

        let fetcher = MarketDataFetcher::new(Arc::new(SlowProvider), Duration::from_secs(1));
        let err = fetcher
            .fetch("AAPL", LookbackPeriod::ThreeMonths)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
