//! Agent runtime for the sentiment team
//!
//! This crate turns an [`agent_llm::LLMProvider`] into runnable agents:
//! the [`AgentExecutor`] drives one request/response exchange (continuing
//! paused turns while hosted tools run), [`MemberAgent`] wraps it with a
//! role and instructions, and [`Team`] runs members in sequence. Members
//! can keep conversation history through a [`HistoryStore`].

pub mod agents;
pub mod executor;
pub mod history;

pub use agents::{MemberAgent, MemberConfig, Team, TeamBuilder};
pub use executor::{AgentExecutor, ExecutionOutcome, ExecutorConfig};
pub use history::{HistoryStore, InMemoryHistory, JsonFileHistory, Turn};
