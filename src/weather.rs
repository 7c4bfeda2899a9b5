//! The weather assistant: an [`Agent`] wired to xAI with the weather tool,
//! an in-memory checkpointer and a structured `WeatherResponse`.

use std::fmt::Write as _;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::agent::{Agent, AgentError, AgentRun, RunConfig};
use crate::config::Config;
use crate::llm::{ChatMessage, LlmClient, OpenAiCompatibleClient, ResponseFormat, Role};
use crate::memory::InMemorySaver;
use crate::tools::ToolRegistry;

/// Response format for weather queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub conditions: String,
}

impl WeatherResponse {
    pub fn response_format() -> ResponseFormat {
        ResponseFormat {
            name: "WeatherResponse".to_string(),
            description: Some("Response format for weather queries.".to_string()),
            schema: json!({
                "type": "object",
                "properties": {
                    "conditions": {"type": "string"}
                },
                "required": ["conditions"],
                "additionalProperties": false
            }),
        }
    }
}

pub struct WeatherAgent {
    agent: Agent,
    checkpointer: Arc<InMemorySaver>,
}

impl WeatherAgent {
    /// Build the agent against the configured xAI endpoint.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        tracing::info!("Initializing Grok model with xAI API");
        let llm = Arc::new(OpenAiCompatibleClient::from_config(config)?);
        Ok(Self::with_client(config, llm))
    }

    /// Build the agent on top of an arbitrary client.
    pub fn with_client(config: &Config, llm: Arc<dyn LlmClient>) -> Self {
        tracing::info!("Creating agent with weather tools");
        let checkpointer = Arc::new(InMemorySaver::new());
        let agent = Agent::new(config, llm, ToolRegistry::with_defaults())
            .with_checkpointer(checkpointer.clone())
            .with_response_format(WeatherResponse::response_format());
        Self {
            agent,
            checkpointer,
        }
    }

    pub fn checkpointer(&self) -> &InMemorySaver {
        &self.checkpointer
    }

    /// Query weather for a specific city.
    pub async fn query_weather(
        &self,
        city: &str,
        thread_id: &str,
        user_name: &str,
    ) -> Result<AgentRun, AgentError> {
        tracing::info!("Running agent to get weather in {}...", city);

        let run = self
            .agent
            .invoke(
                &format!("what is the weather in {}", city),
                &RunConfig::new(thread_id, user_name),
            )
            .await?;

        tracing::info!("Agent execution completed successfully");
        Ok(run)
    }

    /// Run a query for `city` with the default thread and user, and print it.
    pub async fn run_demo(&self, city: &str) -> Result<AgentRun, AgentError> {
        let defaults = RunConfig::default();
        match self
            .query_weather(city, &defaults.thread_id, &defaults.user_name)
            .await
        {
            Ok(run) => {
                print!("{}", format_response(&run));
                for message in &run.messages {
                    tracing::debug!("Message: {} - {}", message_kind(message), message_text(message));
                }
                tracing::info!("Demo execution completed");
                Ok(run)
            }
            Err(e) => {
                tracing::error!("Error during demo execution: {}", e);
                Err(e)
            }
        }
    }
}

/// Render the conversation as `Kind: content` lines under a header.
pub fn format_response(run: &AgentRun) -> String {
    let mut out = String::from("\nAgent response:\n");
    for message in &run.messages {
        let _ = writeln!(out, "{}: {}", message_kind(message), message_text(message));
    }
    out
}

fn message_kind(message: &ChatMessage) -> &'static str {
    match message.role {
        Role::System => "SystemMessage",
        Role::User => "HumanMessage",
        Role::Assistant => "AIMessage",
        Role::Tool => "ToolMessage",
    }
}

/// Text content; assistant turns that only carry tool calls print empty.
fn message_text(message: &ChatMessage) -> &str {
    message.content.as_deref().unwrap_or_default()
}
