//! Core agent loop implementation.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::config::Config;
use crate::llm::{ChatMessage, LlmClient, ResponseFormat, Role, ToolCall};
use crate::memory::Checkpointer;
use crate::tools::ToolRegistry;

use super::prompt::build_system_prompt;
use super::types::{AgentError, AgentRun, LogEntryType, RunConfig, RunLogEntry};

/// Tool-calling agent bound to one model.
pub struct Agent {
    model: String,
    max_iterations: usize,
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    checkpointer: Option<Arc<dyn Checkpointer>>,
    response_format: Option<ResponseFormat>,
}

impl Agent {
    /// Create a new agent with the given configuration, client and tools.
    pub fn new(config: &Config, llm: Arc<dyn LlmClient>, tools: ToolRegistry) -> Self {
        Self {
            model: config.model.clone(),
            max_iterations: config.max_iterations,
            llm,
            tools,
            checkpointer: None,
            response_format: None,
        }
    }

    /// Keep thread history across invocations.
    pub fn with_checkpointer(mut self, checkpointer: Arc<dyn Checkpointer>) -> Self {
        self.checkpointer = Some(checkpointer);
        self
    }

    /// Request a structured response after the tool loop finishes.
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Run one user prompt on the configured thread.
    ///
    /// The thread is checkpointed once the tool loop ends, whether or not it
    /// succeeded, and before any structured response is requested.
    pub async fn invoke(&self, prompt: &str, run: &RunConfig) -> Result<AgentRun, AgentError> {
        let mut log = Vec::new();

        let mut messages = match &self.checkpointer {
            Some(saver) => saver
                .get(&run.thread_id)
                .await?
                .map(|cp| cp.messages)
                .unwrap_or_default(),
            None => Vec::new(),
        };
        if !messages.is_empty() {
            tracing::debug!(
                "Resuming thread {} with {} messages",
                run.thread_id,
                messages.len()
            );
        }
        messages.push(ChatMessage::user(prompt));

        let system = ChatMessage::system(build_system_prompt(&run.user_name));
        let outcome = self.tool_loop(&system, &mut messages, &mut log).await;
        let saved = self.save(&run.thread_id, &messages).await;
        let iterations = outcome?;
        let checkpoint_id = saved?;

        let structured_response = match &self.response_format {
            Some(format) => {
                let value = self.structured_response(&messages, format).await?;
                log.push(log_entry(LogEntryType::StructuredResponse, value.to_string()));
                Some(value)
            }
            None => None,
        };

        Ok(AgentRun {
            messages,
            structured_response,
            iterations,
            checkpoint_id,
            log,
        })
    }

    /// Call the model and run tools until it answers. Returns the number of model calls.
    async fn tool_loop(
        &self,
        system: &ChatMessage,
        messages: &mut Vec<ChatMessage>,
        log: &mut Vec<RunLogEntry>,
    ) -> Result<usize, AgentError> {
        let tool_schemas = self.tools.get_tool_schemas();
        let tools = (!tool_schemas.is_empty()).then_some(tool_schemas.as_slice());

        for iteration in 1..=self.max_iterations {
            tracing::debug!("Agent iteration {}", iteration);

            let response = self
                .llm
                .chat_completion(&self.model, &with_system(system, messages), tools, None)
                .await?;

            let tool_calls = response.tool_calls.unwrap_or_default();
            if !tool_calls.is_empty() {
                messages.push(ChatMessage {
                    role: Role::Assistant,
                    content: response.content,
                    tool_calls: Some(tool_calls.clone()),
                    tool_call_id: None,
                });

                for tool_call in &tool_calls {
                    log.push(log_entry(
                        LogEntryType::ToolCall,
                        format!(
                            "Calling tool: {} with args: {}",
                            tool_call.function.name, tool_call.function.arguments
                        ),
                    ));

                    let result_str = match self.execute_tool_call(tool_call).await {
                        Ok(output) => output,
                        Err(e) => {
                            tracing::warn!("Tool {} failed: {}", tool_call.function.name, e);
                            format!("Error: {}", e)
                        }
                    };

                    log.push(log_entry(
                        LogEntryType::ToolResult,
                        truncate_for_log(&result_str, 1000),
                    ));
                    messages.push(ChatMessage::tool_result(&tool_call.id, result_str));
                }
                continue;
            }

            // No tool calls - this is the final response
            let content = response.content.ok_or(AgentError::EmptyResponse)?;
            log.push(log_entry(
                LogEntryType::Response,
                truncate_for_log(&content, 2000),
            ));
            messages.push(ChatMessage::assistant(content));
            return Ok(iteration);
        }

        Err(AgentError::MaxIterations(self.max_iterations))
    }

    async fn save(
        &self,
        thread_id: &str,
        messages: &[ChatMessage],
    ) -> Result<Option<Uuid>, AgentError> {
        match &self.checkpointer {
            Some(saver) => Ok(Some(saver.put(thread_id, messages).await?)),
            None => Ok(None),
        }
    }

    /// Ask the model to restate the conversation outcome as JSON.
    async fn structured_response(
        &self,
        messages: &[ChatMessage],
        format: &ResponseFormat,
    ) -> Result<serde_json::Value, AgentError> {
        let response = self
            .llm
            .chat_completion(&self.model, messages, None, Some(format))
            .await?;
        let content = response.content.ok_or(AgentError::EmptyResponse)?;
        serde_json::from_str(&content)
            .map_err(|e| AgentError::StructuredResponse(format!("{}: {}", e, content)))
    }

    /// Execute a single tool call.
    async fn execute_tool_call(&self, tool_call: &ToolCall) -> anyhow::Result<String> {
        let args: serde_json::Value = serde_json::from_str(&tool_call.function.arguments)
            .unwrap_or(serde_json::Value::Null);

        self.tools.execute(&tool_call.function.name, args).await
    }
}

fn with_system(system: &ChatMessage, messages: &[ChatMessage]) -> Vec<ChatMessage> {
    std::iter::once(system.clone())
        .chain(messages.iter().cloned())
        .collect()
}

fn log_entry(entry_type: LogEntryType, content: String) -> RunLogEntry {
    RunLogEntry {
        timestamp: Utc::now(),
        entry_type,
        content,
    }
}

/// Truncate a string for logging purposes.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &s[..end])
}
