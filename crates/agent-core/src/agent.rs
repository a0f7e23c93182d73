//! The Agent trait

use crate::{Context, Result};
use async_trait::async_trait;

/// A unit of work that turns a text task into a text answer.
///
/// Both single LLM-backed members and whole teams implement this trait, so
/// callers can hold either behind `Arc<dyn Agent>`.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Run the agent on `input`, reading and recording run state in `context`.
    async fn process(&self, input: String, context: &mut Context) -> Result<String>;

    /// Display name, e.g. "News Reliability Analyst"
    fn name(&self) -> &str;

    /// One-line description of what the agent is responsible for.
    fn role(&self) -> &str {
        ""
    }
}
