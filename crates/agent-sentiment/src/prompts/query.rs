//! The portfolio query handed to the team

use crate::error::Result;
use minijinja::{Environment, context};
use serde::Serialize;

const PORTFOLIO_QUERY: &str = r#"Analyze sentiment for portfolio: {{ tickers | join(", ") }}

# Market Data from Yahoo Finance

{% for block in blocks %}
{{ block.markdown | trim }}

---

{% endfor %}
{% if unavailable %}
Market data was unavailable for: {{ unavailable | join(", ") }}. Flag these stocks as having insufficient data.

{% endif %}
Follow the complete sentiment analysis framework. Use the market data above along with news from reliable sources to provide comprehensive sentiment analysis."#;

/// Rendered market data for one ticker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketBlock {
    pub symbol: String,
    pub markdown: String,
}

/// Build the single query for the team
///
/// `tickers` is the full request in input order; `unavailable` names the
/// tickers with no block.
pub fn portfolio_query(
    tickers: &[String],
    blocks: &[MarketBlock],
    unavailable: &[String],
) -> Result<String> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);

    Ok(env.render_str(
        PORTFOLIO_QUERY,
        context! { tickers => tickers, blocks => blocks, unavailable => unavailable },
    )?)
}
