//! Shared utilities for the sentiment workspace
//!
//! Logging setup and typed access to environment configuration.

pub mod env;
pub mod logging;

pub use env::{EnvError, env_duration_secs, env_parse, env_string};
pub use logging::{LogFormat, init_tracing};
