//! Per-run state passed between agents
//!
//! A `Context` is created for every analysis run. Team members read the
//! original task from it and record their outputs so later members (and the
//! caller) can see what each one produced.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known context keys
pub mod keys {
    /// Session identifier used to scope conversation history
    pub const SESSION_ID: &str = "session_id";
    /// The task text the run started from
    pub const TASK: &str = "task";
    /// Prefix for member outputs; the member name is appended
    pub const MEMBER_OUTPUT_PREFIX: &str = "member_output:";
}

/// Key-value run state
///
/// # Example
///
/// ```
/// use agent_core::Context;
///
/// let mut ctx = Context::new().with_session_id("portfolio");
/// ctx.record_member_output("News Reliability Analyst", "AAPL: +20");
///
/// assert_eq!(ctx.session_id(), Some("portfolio"));
/// assert_eq!(ctx.member_output("News Reliability Analyst"), Some("AAPL: +20"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    data: HashMap<String, serde_json::Value>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session ID
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.insert(keys::SESSION_ID, serde_json::json!(session_id.into()));
        self
    }

    /// Session ID, if one was set
    pub fn session_id(&self) -> Option<&str> {
        self.get(keys::SESSION_ID).and_then(|v| v.as_str())
    }

    /// Record the task text of this run
    pub fn set_task(&mut self, task: impl Into<String>) {
        self.insert(keys::TASK, serde_json::json!(task.into()));
    }

    /// Task text of this run
    pub fn task(&self) -> Option<&str> {
        self.get(keys::TASK).and_then(|v| v.as_str())
    }

    /// Record what a named member produced
    pub fn record_member_output(&mut self, member: &str, output: impl Into<String>) {
        self.insert(
            format!("{}{member}", keys::MEMBER_OUTPUT_PREFIX),
            serde_json::json!(output.into()),
        );
    }

    /// Output recorded for a named member
    pub fn member_output(&self, member: &str) -> Option<&str> {
        self.get(&format!("{}{member}", keys::MEMBER_OUTPUT_PREFIX))
            .and_then(|v| v.as_str())
    }

    /// Insert a raw JSON value
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a raw JSON value
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Insert a serializable value
    pub fn insert_typed<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> crate::Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| {
            crate::Error::ProcessingFailed(format!("Failed to serialize context value: {e}"))
        })?;
        self.data.insert(key.into(), json_value);
        Ok(())
    }

    /// Get a value and deserialize it
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> crate::Result<Option<T>> {
        self.data
            .get(key)
            .map(|value| {
                serde_json::from_value(value.clone()).map_err(|e| {
                    crate::Error::ProcessingFailed(format!(
                        "Failed to deserialize context value: {e}"
                    ))
                })
            })
            .transpose()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Tickers {
        symbols: Vec<String>,
    }

    #[test]
    fn test_task_and_session() {
        let mut ctx = Context::new().with_session_id("s-1");
        assert_eq!(ctx.task(), None);

        ctx.set_task("Analyze sentiment for portfolio: AAPL");
        assert_eq!(ctx.task(), Some("Analyze sentiment for portfolio: AAPL"));
        assert_eq!(ctx.session_id(), Some("s-1"));
    }

    #[test]
    fn test_member_outputs_are_scoped_by_name() {
        let mut ctx = Context::new();
        ctx.record_member_output("collector", "news");
        ctx.record_member_output("synthesizer", "report");

        assert_eq!(ctx.member_output("collector"), Some("news"));
        assert_eq!(ctx.member_output("synthesizer"), Some("report"));
        assert_eq!(ctx.member_output("unknown"), None);
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_typed_values() {
        let mut ctx = Context::new();
        let tickers = Tickers {
            symbols: vec!["AAPL".to_string(), "MSFT".to_string()],
        };
        ctx.insert_typed("tickers", &tickers).unwrap();

        let back: Tickers = ctx.get_typed("tickers").unwrap().unwrap();
        assert_eq!(back, tickers);

        let missing: Option<Tickers> = ctx.get_typed("missing").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_get_typed_wrong_shape_is_error() {
        let mut ctx = Context::new();
        ctx.insert("tickers", serde_json::json!(42));
        let result: crate::Result<Option<Tickers>> = ctx.get_typed("tickers");
        assert!(result.is_err());
    }
}
