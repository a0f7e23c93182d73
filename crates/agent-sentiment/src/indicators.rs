//! Technical indicators computed from a price series

use crate::error::{Result, SentimentError};
use crate::market::PriceSeries;
use serde::{Deserialize, Serialize};
use std::fmt;
use ta::Next;
use ta::indicators::{SimpleMovingAverage, StandardDeviation};

/// Short moving average window, in bars
pub const SMA_SHORT: usize = 10;
/// Medium moving average window, in bars
pub const SMA_MEDIUM: usize = 20;
/// Long moving average window, in bars
pub const SMA_LONG: usize = 50;

/// Bars averaged for the recent volume
pub const RECENT_VOLUME_BARS: usize = 5;

/// Recent/average volume ratio, in percent, at or above which volume is increasing
pub const VOLUME_INCREASING_PCT: u128 = 110;
/// Recent/average volume ratio, in percent, at or below which volume is decreasing
pub const VOLUME_DECREASING_PCT: u128 = 90;

const WEEK_BARS: usize = 7;
const MONTH_BARS: usize = 30;

/// Direction of recent trading volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeTrend {
    Increasing,
    Decreasing,
    Stable,
}

impl fmt::Display for VolumeTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Increasing => "Increasing",
            Self::Decreasing => "Decreasing",
            Self::Stable => "Stable",
        })
    }
}

/// Price trend from the moving average stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    StrongUptrend,
    StrongDowntrend,
    Uptrend,
    Downtrend,
    Sideways,
    /// Fewer bars than the longest moving average
    InsufficientData,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StrongUptrend => "Strong Uptrend",
            Self::StrongDowntrend => "Strong Downtrend",
            Self::Uptrend => "Uptrend",
            Self::Downtrend => "Downtrend",
            Self::Sideways => "Sideways",
            Self::InsufficientData => "Insufficient data",
        })
    }
}

/// Indicators for the latest bar of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    pub current_price: f64,
    pub sma_10: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    /// Standard deviation of daily percent change, in percent
    pub volatility: f64,
    /// Mean daily percent change
    pub avg_daily_return: f64,
    pub change_7d: f64,
    pub change_30d: f64,
    pub avg_volume: f64,
    /// Mean volume of the last five bars
    pub recent_volume: f64,
    pub volume_trend: VolumeTrend,
    pub trend: Trend,
}

/// Compute the snapshot for a non-empty series
pub fn compute(series: &PriceSeries) -> Result<TechnicalSnapshot> {
    let closes = series.closes();
    let Some(&current_price) = closes.last() else {
        return Err(SentimentError::NoData {
            symbol: series.symbol().to_string(),
            reason: "empty price history".to_string(),
        });
    };

    let sma_10 = trailing_sma(&closes, SMA_SHORT)?;
    let sma_20 = trailing_sma(&closes, SMA_MEDIUM)?;
    let sma_50 = trailing_sma(&closes, SMA_LONG)?;

    let returns = daily_returns(&closes);
    let (volatility, avg_daily_return) = return_stats(&returns, closes.len())?;

    let change_7d = if closes.len() >= WEEK_BARS {
        percent_change(closes[closes.len() - WEEK_BARS], current_price)
    } else {
        0.0
    };
    // Short series compare against the first bar instead of 30 bars back
    let change_30d = if closes.len() >= MONTH_BARS {
        percent_change(closes[closes.len() - MONTH_BARS], current_price)
    } else {
        percent_change(closes[0], current_price)
    };

    let volumes = series.volumes();
    let recent = &volumes[volumes.len().saturating_sub(RECENT_VOLUME_BARS)..];

    Ok(TechnicalSnapshot {
        current_price,
        sma_10,
        sma_20,
        sma_50,
        volatility,
        avg_daily_return,
        change_7d,
        change_30d,
        avg_volume: mean_volume(&volumes),
        recent_volume: mean_volume(recent),
        volume_trend: volume_trend(&volumes),
        trend: classify_trend(current_price, sma_10, sma_20, sma_50),
    })
}

fn trailing_sma(closes: &[f64], period: usize) -> Result<Option<f64>> {
    if closes.len() < period {
        return Ok(None);
    }
    let mut sma = SimpleMovingAverage::new(period)
        .map_err(|e| SentimentError::IndicatorError(e.to_string()))?;
    Ok(closes.iter().map(|&c| sma.next(c)).last())
}

/// Day-over-day percent changes; a zero close yields no return for that day
fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0] * 100.0)
        .collect()
}

/// Population standard deviation and mean of the returns
fn return_stats(returns: &[f64], bars: usize) -> Result<(f64, f64)> {
    if returns.is_empty() {
        return Ok((0.0, 0.0));
    }
    let mut sd = StandardDeviation::new(bars.max(2))
        .map_err(|e| SentimentError::IndicatorError(e.to_string()))?;
    let volatility = returns.iter().map(|&r| sd.next(r)).last().unwrap_or(0.0);
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    Ok((finite_or_zero(volatility), finite_or_zero(mean)))
}

fn percent_change(base: f64, current: f64) -> f64 {
    if base == 0.0 {
        return 0.0;
    }
    finite_or_zero((current - base) / base * 100.0)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn mean_volume(volumes: &[u64]) -> f64 {
    if volumes.is_empty() {
        return 0.0;
    }
    volumes.iter().map(|&v| v as f64).sum::<f64>() / volumes.len() as f64
}

/// Compare recent and overall mean volume in exact integer arithmetic
///
/// `recent_sum / n_recent >= 1.10 * all_sum / n_all` is evaluated as
/// `recent_sum * n_all * 100 >= all_sum * n_recent * 110` so the
/// boundaries hold without float rounding.
pub fn volume_trend(volumes: &[u64]) -> VolumeTrend {
    let n_all = volumes.len() as u128;
    let recent = &volumes[volumes.len().saturating_sub(RECENT_VOLUME_BARS)..];
    let n_recent = recent.len() as u128;
    let all_sum: u128 = volumes.iter().map(|&v| u128::from(v)).sum();
    let recent_sum: u128 = recent.iter().map(|&v| u128::from(v)).sum();

    if n_all == 0 || all_sum == 0 {
        return VolumeTrend::Stable;
    }

    let lhs = recent_sum * n_all * 100;
    if lhs >= all_sum * n_recent * VOLUME_INCREASING_PCT {
        VolumeTrend::Increasing
    } else if lhs <= all_sum * n_recent * VOLUME_DECREASING_PCT {
        VolumeTrend::Decreasing
    } else {
        VolumeTrend::Stable
    }
}

/// First matching rule wins; all three averages are required
pub fn classify_trend(
    price: f64,
    sma_10: Option<f64>,
    sma_20: Option<f64>,
    sma_50: Option<f64>,
) -> Trend {
    let (Some(s10), Some(s20), Some(s50)) = (sma_10, sma_20, sma_50) else {
        return Trend::InsufficientData;
    };

    if price > s10 && s10 > s20 && s20 > s50 {
        Trend::StrongUptrend
    } else if price < s10 && s10 < s20 && s20 < s50 {
        Trend::StrongDowntrend
    } else if price > s20 {
        Trend::Uptrend
    } else if price < s20 {
        Trend::Downtrend
    } else {
        Trend::Sideways
    }
}
