//! Market data provider clients

pub mod yahoo;

pub use yahoo::YahooClient;
