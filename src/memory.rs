//! Conversation checkpointing.
//!
//! A checkpointer stores the message history of each thread so that a later
//! invocation with the same `thread_id` continues the conversation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::llm::ChatMessage;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("thread_id required")]
    ThreadIdRequired,
}

/// Snapshot of one thread after an agent run.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub id: Uuid,
    pub thread_id: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

#[async_trait]
pub trait Checkpointer: Send + Sync {
    /// Persist the thread's messages. Returns the new checkpoint id.
    async fn put(&self, thread_id: &str, messages: &[ChatMessage]) -> Result<Uuid, CheckpointError>;

    /// Latest checkpoint for the thread, if any.
    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint>, CheckpointError>;

    /// All checkpoints of the thread, oldest first.
    async fn list(&self, thread_id: &str) -> Result<Vec<Checkpoint>, CheckpointError>;
}

/// In-process checkpointer. Not persistent.
#[derive(Debug, Clone, Default)]
pub struct InMemorySaver {
    threads: Arc<RwLock<HashMap<String, Vec<Checkpoint>>>>,
}

impl InMemorySaver {
    pub fn new() -> Self {
        Self::default()
    }
}

fn require_thread(thread_id: &str) -> Result<(), CheckpointError> {
    if thread_id.is_empty() {
        return Err(CheckpointError::ThreadIdRequired);
    }
    Ok(())
}

#[async_trait]
impl Checkpointer for InMemorySaver {
    async fn put(&self, thread_id: &str, messages: &[ChatMessage]) -> Result<Uuid, CheckpointError> {
        require_thread(thread_id)?;
        let checkpoint = Checkpoint {
            id: Uuid::new_v4(),
            thread_id: thread_id.to_string(),
            created_at: Utc::now(),
            messages: messages.to_vec(),
        };
        let id = checkpoint.id;
        self.threads
            .write()
            .await
            .entry(thread_id.to_string())
            .or_default()
            .push(checkpoint);
        tracing::debug!("Saved checkpoint {} for thread {}", id, thread_id);
        Ok(id)
    }

    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint>, CheckpointError> {
        require_thread(thread_id)?;
        Ok(self
            .threads
            .read()
            .await
            .get(thread_id)
            .and_then(|history| history.last().cloned()))
    }

    async fn list(&self, thread_id: &str) -> Result<Vec<Checkpoint>, CheckpointError> {
        require_thread(thread_id)?;
        Ok(self
            .threads
            .read()
            .await
            .get(thread_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn latest_checkpoint_wins() {
        let saver = InMemorySaver::new();
        saver
            .put("1", &[ChatMessage::user("a")])
            .await
            .expect("first put");
        let second = saver
            .put("1", &[ChatMessage::user("a"), ChatMessage::assistant("b")])
            .await
            .expect("second put");

        let latest = saver.get("1").await.expect("get").expect("exists");
        assert_eq!(latest.id, second);
        assert_eq!(latest.messages.len(), 2);
        assert_eq!(saver.list("1").await.expect("list").len(), 2);
    }

    #[tokio::test]
    async fn threads_are_isolated() {
        let saver = InMemorySaver::new();
        saver
            .put("alice", &[ChatMessage::user("hi")])
            .await
            .expect("put");

        assert!(saver.get("bob").await.expect("get").is_none());
        assert!(saver.list("bob").await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn empty_thread_id_rejected() {
        let saver = InMemorySaver::new();
        let err = saver.get("").await.unwrap_err();
        assert!(matches!(err, CheckpointError::ThreadIdRequired));
    }
}
