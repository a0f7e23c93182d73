//! Markdown rendering of one ticker's market data
//!
//! Rendering never fails: missing values print as `N/A` and values that
//! cannot be formatted as intended fall back to their plain string form.

use crate::indicators::TechnicalSnapshot;
use crate::market::{CompanyProfile, PriceSeries};

/// Placeholder for any missing value
pub const NOT_AVAILABLE: &str = "N/A";

/// Render the market data block for `symbol`
pub fn render(
    symbol: &str,
    series: &PriceSeries,
    profile: &CompanyProfile,
    snapshot: &TechnicalSnapshot,
) -> String {
    let price = snapshot.current_price;

    format!(
        "
## 📈 TECHNICAL & FUNDAMENTAL DATA: {symbol}

### 🏢 COMPANY INFO
- **Name:** {name}
- **Sector:** {sector}
- **Industry:** {industry}
- **Trading Days Analyzed:** {days}

### 💰 CURRENT PRICE METRICS
- **Current Price:** {current}
- **52-Week High:** {high_52}
- **52-Week Low:** {low_52}
- **50-Day Average:** {avg_50}
- **200-Day Average:** {avg_200}

### 📊 PRICE PERFORMANCE
- **7-Day Change:** {change_7d}
- **30-Day Change:** {change_30d}
- **Average Daily Return:** {avg_return}
- **Daily Volatility:** {volatility}

### 📉 TECHNICAL INDICATORS
- **10-Day SMA:** {sma_10}
- **20-Day SMA:** {sma_20}
- **50-Day SMA:** {sma_50}
- **Trend:** {trend}

### 📦 VOLUME ANALYSIS
- **Average Volume:** {avg_volume}
- **Recent Volume (5d avg):** {recent_volume}
- **Volume Trend:** {volume_trend}
- **Beta:** {beta}

### 💼 VALUATION RATIOS
- **Market Cap:** {market_cap}
- **P/E Ratio (Trailing):** {trailing_pe}
- **Forward P/E:** {forward_pe}
- **PEG Ratio:** {peg}
- **Price to Book:** {price_to_book}

### 💵 DIVIDEND INFORMATION
- **Dividend Yield:** {dividend_yield}
- **Dividend Rate:** {dividend_rate}
- **Payout Ratio:** {payout_ratio}

### 🎯 ANALYST CONSENSUS
- **Recommendation:** {recommendation}
- **Target Price:** {target}
- **Number of Analysts:** {analysts}

### 📊 TECHNICAL SUMMARY
**Price Position:** {position} (30-day: {change_30d})
**Momentum:** {momentum}
**Volatility Level:** {volatility_level}
**Overall Technical Signal:** {trend}

---
",
        name = text(profile.long_name.as_deref()),
        sector = text(profile.sector.as_deref()),
        industry = text(profile.industry.as_deref()),
        days = series.len(),
        current = money(Some(price)),
        high_52 = money(profile.fifty_two_week_high),
        low_52 = money(profile.fifty_two_week_low),
        avg_50 = money(profile.fifty_day_average),
        avg_200 = money(profile.two_hundred_day_average),
        change_7d = signed_percent(snapshot.change_7d),
        change_30d = signed_percent(snapshot.change_30d),
        avg_return = signed_percent(snapshot.avg_daily_return),
        volatility = percent(snapshot.volatility),
        sma_10 = sma_line(price, snapshot.sma_10),
        sma_20 = sma_line(price, snapshot.sma_20),
        sma_50 = sma_line(price, snapshot.sma_50),
        trend = snapshot.trend,
        avg_volume = format_thousands(snapshot.avg_volume),
        recent_volume = format_thousands(snapshot.recent_volume),
        volume_trend = snapshot.volume_trend,
        beta = ratio(profile.beta),
        market_cap = profile
            .market_cap
            .map_or_else(|| NOT_AVAILABLE.to_string(), |cap| format!("${}", format_thousands(cap))),
        trailing_pe = ratio(profile.trailing_pe),
        forward_pe = ratio(profile.forward_pe),
        peg = ratio(profile.peg_ratio),
        price_to_book = ratio(profile.price_to_book),
        dividend_yield = fraction_percent(profile.dividend_yield),
        dividend_rate = money(profile.dividend_rate),
        payout_ratio = fraction_percent(profile.payout_ratio),
        recommendation = profile
            .recommendation_key
            .as_deref()
            .map_or_else(|| NOT_AVAILABLE.to_string(), str::to_uppercase),
        target = money(profile.target_mean_price),
        analysts = profile
            .number_of_analyst_opinions
            .map_or_else(|| NOT_AVAILABLE.to_string(), |n| n.to_string()),
        position = price_position(snapshot.change_30d),
        momentum = momentum(snapshot.avg_daily_return),
        volatility_level = volatility_level(snapshot.volatility),
    )
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

fn money(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("${v:.2}"),
        Some(v) => v.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn ratio(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        Some(v) => v.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

fn signed_percent(value: f64) -> String {
    format!("{value:+.2}%")
}

/// Render a fraction such as 0.0044 as "0.44%"
fn fraction_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}%", v * 100.0),
        Some(v) => v.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn sma_line(price: f64, sma: Option<f64>) -> String {
    match sma {
        Some(avg) => {
            let marker = if price > avg { "✅ Above" } else { "⚠️ Below" };
            format!("{} {marker}", money(Some(avg)))
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Round to a whole number and group digits by thousands
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() || value.abs() >= 1e30 {
        return value.to_string();
    }

    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn price_position(change_30d: f64) -> &'static str {
    if change_30d > 5.0 {
        "Bullish"
    } else if change_30d < -5.0 {
        "Bearish"
    } else {
        "Neutral"
    }
}

fn momentum(avg_daily_return: f64) -> &'static str {
    let magnitude = avg_daily_return.abs();
    if magnitude > 1.0 {
        "Strong"
    } else if magnitude > 0.3 {
        "Moderate"
    } else {
        "Weak"
    }
}

fn volatility_level(volatility: f64) -> &'static str {
    if volatility > 3.0 {
        "High"
    } else if volatility > 1.5 {
        "Moderate"
    } else {
        "Low"
    }
}
