//! Market data: types, the provider seam, and the fetcher that normalizes
//! provider failures

mod fetcher;
mod provider;
mod types;

pub use fetcher::{MarketData, MarketDataFetcher};
pub use provider::MarketDataProvider;
#[cfg(test)]
pub use provider::MockMarketDataProvider;
pub use types::{Bar, CompanyProfile, LookbackPeriod, PriceSeries};
