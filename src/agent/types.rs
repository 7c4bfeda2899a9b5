//! Run configuration, results and errors of the agent.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::llm::{ChatMessage, LlmError, Role};
use crate::memory::CheckpointError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error("Max iterations ({0}) reached without completion")]
    MaxIterations(usize),

    #[error("LLM returned empty response")]
    EmptyResponse,

    #[error("Invalid structured response: {0}")]
    StructuredResponse(String),
}

/// Per-invocation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Conversation the run belongs to; history is shared per thread.
    pub thread_id: String,

    /// How the assistant addresses the user.
    pub user_name: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            thread_id: "1".to_string(),
            user_name: "User".to_string(),
        }
    }
}

impl RunConfig {
    pub fn new(thread_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            user_name: user_name.into(),
        }
    }
}

/// Kind of execution log entry.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogEntryType {
    ToolCall,
    ToolResult,
    Response,
    StructuredResponse,
}

/// A timestamped step of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunLogEntry {
    pub timestamp: DateTime<Utc>,
    pub entry_type: LogEntryType,
    pub content: String,
}

/// Outcome of [`Agent::invoke`](super::Agent::invoke).
#[derive(Debug, Clone)]
pub struct AgentRun {
    /// Full thread history, including earlier runs on the same thread.
    /// The system prompt is not part of it.
    pub messages: Vec<ChatMessage>,

    /// Parsed structured output, when a response format is configured.
    pub structured_response: Option<Value>,

    /// Number of model calls made by the tool loop.
    pub iterations: usize,

    /// Checkpoint written at the end of the run.
    pub checkpoint_id: Option<Uuid>,

    pub log: Vec<RunLogEntry>,
}

impl AgentRun {
    /// Text of the last assistant message.
    pub fn final_response(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant && m.content.is_some())
            .and_then(|m| m.content.as_deref())
    }

    /// Decode the structured response into `T`.
    pub fn structured<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.structured_response
            .clone()
            .map(serde_json::from_value)
            .transpose()
    }
}
