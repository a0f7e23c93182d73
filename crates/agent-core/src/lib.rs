//! Core abstractions shared by the sentiment workspace
//!
//! Defines the [`Agent`] trait implemented by every LLM-backed worker, the
//! per-run [`Context`] that members of a team pass between each other, and
//! the common [`Error`] type.

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};
