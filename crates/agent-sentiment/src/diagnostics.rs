//! Environment self-check: market data, API key, network

use crate::error::SentimentError;
use crate::market::{LookbackPeriod, MarketDataFetcher};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Default reachability probe
pub const NETWORK_PROBE_URL: &str = "https://www.google.com";

const PROBE_SYMBOL: &str = "AAPL";
const NETWORK_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    fn marker(self) -> &'static str {
        match self {
            Self::Pass => "✅",
            Self::Warn => "⚠️",
            Self::Fail => "❌",
        }
    }
}

/// One diagnostic line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticCheck {
    pub status: CheckStatus,
    pub message: String,
}

impl DiagnosticCheck {
    fn new(status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl fmt::Display for DiagnosticCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.marker(), self.message)
    }
}

/// Run every check; never fails, each problem becomes a line
pub async fn run_diagnostics(
    fetcher: &MarketDataFetcher,
    api_key_present: bool,
    probe_url: &str,
) -> Vec<DiagnosticCheck> {
    let mut checks = check_market_data(fetcher).await;
    checks.push(check_api_key(api_key_present));
    checks.push(check_network(probe_url).await);
    checks
}

/// One line per check
pub fn render(checks: &[DiagnosticCheck]) -> String {
    checks
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

async fn check_market_data(fetcher: &MarketDataFetcher) -> Vec<DiagnosticCheck> {
    match fetcher.fetch(PROBE_SYMBOL, LookbackPeriod::FiveDays).await {
        Ok(data) => {
            let mut checks = Vec::with_capacity(2);
            let price = data
                .series
                .last_close()
                .map_or_else(|| "N/A".to_string(), |c| format!("${c:.2}"));
            checks.push(DiagnosticCheck::new(
                CheckStatus::Pass,
                format!("Market data working - {PROBE_SYMBOL} price: {price}"),
            ));
            if data.profile.is_empty() {
                checks.push(DiagnosticCheck::new(
                    CheckStatus::Warn,
                    "Company fundamentals unavailable - reports will show N/A",
                ));
            }
            checks
        }
        Err(SentimentError::NoData { .. }) => vec![DiagnosticCheck::new(
            CheckStatus::Fail,
            "Market data - no data returned",
        )],
        Err(e) => vec![DiagnosticCheck::new(
            CheckStatus::Fail,
            format!("Market data fetch failed: {e}"),
        )],
    }
}

fn check_api_key(present: bool) -> DiagnosticCheck {
    if present {
        DiagnosticCheck::new(CheckStatus::Pass, "ANTHROPIC_API_KEY found")
    } else {
        DiagnosticCheck::new(CheckStatus::Fail, "ANTHROPIC_API_KEY not set")
    }
}

async fn check_network(url: &str) -> DiagnosticCheck {
    let client = match reqwest::Client::builder().timeout(NETWORK_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => return DiagnosticCheck::new(CheckStatus::Fail, format!("Network issue: {e}")),
    };

    match client.get(url).send().await {
        Ok(response) => {
            debug!(status = %response.status(), url, "Network probe answered");
            DiagnosticCheck::new(CheckStatus::Pass, "Network connectivity OK")
        }
        Err(e) => DiagnosticCheck::new(CheckStatus::Fail, format!("Network issue: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{Bar, CompanyProfile, MockMarketDataProvider};
    use chrono::NaiveDate;
    use mockall::predicate::eq;
    use std::sync::Arc;

    fn fetcher(provider: MockMarketDataProvider) -> MarketDataFetcher {
        MarketDataFetcher::new(Arc::new(provider), Duration::from_secs(5))
    }

    fn mock() -> MockMarketDataProvider {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_name().return_const("mock".to_string());
        provider
    }

    #[tokio::test]
    async fn test_market_data_check_reports_last_close() {
        let mut provider = mock();
        provider
            .expect_price_history()
            .with(eq("AAPL"), eq(LookbackPeriod::FiveDays))
            .returning(|_, _| {
                Ok(vec![Bar {
                    date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
                    open: 1.0,
                    high: 1.0,
                    low: 1.0,
                    close: 187.456,
                    volume: 1,
                }])
            });
        provider.expect_company_profile().returning(|_| {
            Ok(CompanyProfile {
                long_name: Some("Apple Inc.".into()),
                ..CompanyProfile::default()
            })
        });

        let checks = check_market_data(&fetcher(provider)).await;
        assert_eq!(checks.len(), 1);
        assert_eq!(
            checks[0].to_string(),
            "✅ Market data working - AAPL price: $187.46"
        );
    }

    #[tokio::test]
    async fn test_market_data_failure() {
        let mut provider = mock();
        provider.expect_price_history().returning(|s, _| {
            Err(SentimentError::ProviderError {
                symbol: s.to_string(),
                reason: "503".into(),
            })
        });

        let checks = check_market_data(&fetcher(provider)).await;
        assert_eq!(checks[0].status, CheckStatus::Fail);
        assert!(checks[0].message.contains("503"));
    }

    #[tokio::test]
    async fn test_unreachable_network_fails() {
        let check = check_network("http://127.0.0.1:9").await;
        assert_eq!(check.status, CheckStatus::Fail);
        assert!(check.to_string().starts_with("❌ Network issue"));
    }

    #[test]
    fn test_render_lines() {
        let checks = vec![
            check_api_key(true),
            DiagnosticCheck::new(CheckStatus::Warn, "partial"),
            check_api_key(false),
        ];
        assert_eq!(
            render(&checks),
            "✅ ANTHROPIC_API_KEY found\n⚠️ partial\n❌ ANTHROPIC_API_KEY not set"
        );
    }
}
