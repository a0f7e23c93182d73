//! Conversation history for team members
//!
//! Each member keeps the last few (task, answer) pairs per session so a
//! follow-up run can refer back to earlier analyses. Storage is pluggable;
//! [`JsonFileHistory`] keeps everything in one JSON file on disk.

use agent_core::{Error, Result};
use agent_llm::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Turns kept per session; older ones are dropped on append
const MAX_STORED_TURNS: usize = 50;

/// One completed exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// What the member was asked
    pub user: String,
    /// What it answered
    pub assistant: String,
}

impl Turn {
    /// Create a turn
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }

    /// The turn as a user/assistant message pair
    pub fn to_messages(&self) -> [Message; 2] {
        [
            Message::user(self.user.clone()),
            Message::assistant(self.assistant.clone()),
        ]
    }
}

/// Where member conversations are kept
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Up to `limit` most recent turns of `session`, oldest first
    async fn load(&self, session: &str, limit: usize) -> Result<Vec<Turn>>;

    /// Append a turn to `session`
    async fn append(&self, session: &str, turn: Turn) -> Result<()>;
}

fn tail(turns: &[Turn], limit: usize) -> Vec<Turn> {
    turns[turns.len().saturating_sub(limit)..].to_vec()
}

fn push_bounded(turns: &mut Vec<Turn>, turn: Turn) {
    turns.push(turn);
    if turns.len() > MAX_STORED_TURNS {
        let excess = turns.len() - MAX_STORED_TURNS;
        turns.drain(..excess);
    }
}

/// Process-local history
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    sessions: RwLock<HashMap<String, Vec<Turn>>>,
}

impl InMemoryHistory {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    async fn load(&self, session: &str, limit: usize) -> Result<Vec<Turn>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session)
            .map(|turns| tail(turns, limit))
            .unwrap_or_default())
    }

    async fn append(&self, session: &str, turn: Turn) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        push_bounded(sessions.entry(session.to_string()).or_default(), turn);
        Ok(())
    }
}

/// History persisted as a JSON object of session → turns
///
/// The file is read on every load and rewritten on every append; a missing
/// file reads as empty history.
#[derive(Debug)]
pub struct JsonFileHistory {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileHistory {
    /// Use the file at `path`, created on first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<HashMap<String, Vec<Turn>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                Error::ProcessingFailed(format!(
                    "Corrupt history file {}: {e}",
                    self.path.display()
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(Error::ProcessingFailed(format!(
                "Failed to read history file {}: {e}",
                self.path.display()
            ))),
        }
    }
}

#[async_trait]
impl HistoryStore for JsonFileHistory {
    async fn load(&self, session: &str, limit: usize) -> Result<Vec<Turn>> {
        let sessions = self.read_all().await?;
        Ok(sessions
            .get(session)
            .map(|turns| tail(turns, limit))
            .unwrap_or_default())
    }

    async fn append(&self, session: &str, turn: Turn) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut sessions = self.read_all().await?;
        push_bounded(sessions.entry(session.to_string()).or_default(), turn);

        let bytes = serde_json::to_vec_pretty(&sessions)
            .map_err(|e| Error::ProcessingFailed(format!("Failed to encode history: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::ProcessingFailed(format!("Failed to create {}: {e}", parent.display())))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| Error::ProcessingFailed(format!("Failed to write history: {e}")))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| Error::ProcessingFailed(format!("Failed to replace history: {e}")))?;

        debug!(path = %self.path.display(), session, "History appended");
        Ok(())
    }
}
