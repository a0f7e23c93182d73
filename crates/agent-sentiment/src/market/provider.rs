//! The market data provider seam

use super::{Bar, CompanyProfile, LookbackPeriod};
use crate::error::Result;
use async_trait::async_trait;

/// Source of daily bars and company fundamentals
///
/// Implementations own any caching and rate limiting. Errors should be
/// `NoData` or `ProviderError`; the fetcher maps anything else to
/// `ProviderError`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars for `symbol` over `period`, in any order
    async fn price_history(&self, symbol: &str, period: LookbackPeriod) -> Result<Vec<Bar>>;

    /// Fundamentals for `symbol`
    async fn company_profile(&self, symbol: &str) -> Result<CompanyProfile>;

    /// Provider name for logs
    fn name(&self) -> &str;
}
