//! OpenAI-compatible chat-completions client (xAI exposes the same API).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{ChatMessage, ChatResponse, LlmClient, LlmError, ResponseFormat, ToolCall, ToolSchema, Usage};
use crate::config::Config;

/// Client for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiCompatibleClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), api_key, base_url)
    }

    /// Build from configuration, applying the request timeout.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_http_client(
            client,
            config.api_key.clone(),
            config.base_url.clone(),
        ))
    }

    fn with_http_client(
        client: reqwest::Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolSchema]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

fn response_format_json(format: &ResponseFormat) -> Value {
    let mut schema = json!({
        "name": format.name,
        "schema": format.schema,
        "strict": true,
    });
    if let Some(description) = &format.description {
        schema["description"] = json!(description);
    }
    json!({
        "type": "json_schema",
        "json_schema": schema,
    })
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolSchema]>,
        response_format: Option<&ResponseFormat>,
    ) -> Result<ChatResponse, LlmError> {
        let tools = tools.filter(|t| !t.is_empty());
        let body = RequestBody {
            model,
            messages,
            tools,
            tool_choice: tools.map(|_| "auto"),
            response_format: response_format.map(response_format_json),
        };

        tracing::debug!(
            "POST {} model={} messages={} tools={}",
            self.endpoint(),
            model,
            messages.len(),
            tools.map(|t| t.len()).unwrap_or(0)
        );

        let res = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            tracing::warn!("Chat completion failed with status {}", status);
            return Err(LlmError::from_status(status.as_u16(), text));
        }

        let parsed: ResponseBody =
            serde_json::from_str(&text).map_err(|e| LlmError::Parse(format!("{}: {}", e, text)))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;

        if let Some(usage) = &parsed.usage {
            tracing::debug!(
                "Token usage: prompt={} completion={}",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        Ok(ChatResponse {
            content: choice.message.content.filter(|c| !c.is_empty()),
            tool_calls: choice.message.tool_calls.filter(|c| !c.is_empty()),
            finish_reason: choice.finish_reason,
            usage: parsed.usage,
        })
    }
}
