//! Prompts for the sentiment team
//!
//! - `instructions`: member roles and instruction lists
//! - `query`: the portfolio query handed to the team

mod instructions;
mod query;

pub use instructions::*;
pub use query::{MarketBlock, portfolio_query};
