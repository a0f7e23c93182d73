//! Error types for agent-core

use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error raised by an agent run
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// The agent could not be constructed (missing key, bad settings)
    #[error("Agent initialization failed: {0}")]
    InitializationFailed(String),

    /// The agent failed while processing a task
    #[error("Agent processing failed: {0}")]
    ProcessingFailed(String),

    /// A team member failed; carries the member name
    #[error("Team member '{member}' failed: {reason}")]
    MemberFailed {
        /// Name of the failing member
        member: String,
        /// Underlying failure
        reason: String,
    },
}
