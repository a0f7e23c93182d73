//! Market data types

use crate::error::SentimentError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lookback window for price history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookbackPeriod {
    /// 1 day
    OneDay,
    /// 5 days
    FiveDays,
    /// 1 month
    OneMonth,
    /// 3 months
    #[default]
    ThreeMonths,
    /// 6 months
    SixMonths,
    /// 1 year
    OneYear,
    /// 2 years
    TwoYears,
    /// 5 years
    FiveYears,
    /// 10 years
    TenYears,
    /// Since January 1st
    YearToDate,
    /// Full history
    Max,
}

impl LookbackPeriod {
    /// All periods, shortest first
    pub const ALL: [LookbackPeriod; 11] = [
        Self::OneDay,
        Self::FiveDays,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::FiveYears,
        Self::TenYears,
        Self::YearToDate,
        Self::Max,
    ];

    /// Range code understood by the provider ("3mo", "1y", ...)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::TenYears => "10y",
            Self::YearToDate => "ytd",
            Self::Max => "max",
        }
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookbackPeriod {
    type Err = SentimentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                SentimentError::ConfigError(format!(
                    "Invalid period '{s}', expected one of: {}",
                    Self::ALL.map(Self::as_str).join(", ")
                ))
            })
    }
}

/// One daily bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading day
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Session high
    pub high: f64,
    /// Session low
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Shares traded
    pub volume: u64,
}

/// Chronological daily bars for one ticker, one bar per date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Sort bars by date; for repeated dates the last bar given wins
    pub fn new(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.date);

        let mut unique: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match unique.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => unique.push(bar),
            }
        }

        Self {
            symbol: symbol.into(),
            bars: unique,
        }
    }

    /// Ticker symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Bars, oldest first
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Number of bars
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// True when there are no bars
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Closing prices, oldest first
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Volumes, oldest first
    pub fn volumes(&self) -> Vec<u64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Most recent close
    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }
}

/// Company fundamentals; every field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub long_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub fifty_day_average: Option<f64>,
    pub two_hundred_day_average: Option<f64>,
    pub beta: Option<f64>,
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub price_to_book: Option<f64>,
    /// Fraction, e.g. 0.0045 for 0.45%
    pub dividend_yield: Option<f64>,
    pub dividend_rate: Option<f64>,
    /// Fraction of earnings paid out
    pub payout_ratio: Option<f64>,
    /// e.g. "buy", "hold"
    pub recommendation_key: Option<String>,
    pub target_mean_price: Option<f64>,
    pub number_of_analyst_opinions: Option<u32>,
}

impl CompanyProfile {
    /// True when no field is known
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 100,
        }
    }

    #[test]
    fn test_series_sorted_and_deduplicated() {
        let series = PriceSeries::new("AAPL", vec![bar(3, 3.0), bar(1, 1.0), bar(3, 30.0), bar(2, 2.0)]);

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![1.0, 2.0, 30.0]);
        assert_eq!(series.last_close(), Some(30.0));
        assert_eq!(series.symbol(), "AAPL");
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("3mo".parse::<LookbackPeriod>().unwrap(), LookbackPeriod::ThreeMonths);
        assert_eq!(" YTD ".parse::<LookbackPeriod>().unwrap(), LookbackPeriod::YearToDate);
        assert_eq!(LookbackPeriod::default().to_string(), "3mo");

        let err = "3 months".parse::<LookbackPeriod>().unwrap_err();
        assert!(err.to_string().contains("1d, 5d, 1mo"));
    }

    #[test]
    fn test_profile_emptiness() {
        assert!(CompanyProfile::default().is_empty());
        let profile = CompanyProfile {
            sector: Some("Technology".into()),
            ..CompanyProfile::default()
        };
        assert!(!profile.is_empty());
    }
}
