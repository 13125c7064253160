use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::stateless_llm_interface::{ChatMessage, StatelessLLMInterface};
use crate::error::ProviderError;

/// OpenAI compatible LLM implementation
/// Talks to any `/chat/completions` endpoint (Groq, OpenAI, ...) over HTTP
pub struct OpenAICompatibleLLM {
    client: Client,
    model: String,
    base_url: String,
    api_key: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    // Kept loose: providers send null or non-string content on some failures.
    #[serde(default)]
    content: serde_json::Value,
}

impl OpenAICompatibleLLM {
    pub fn new(
        model: String,
        base_url: String,
        api_key: String,
        temperature: f32,
        timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, model, base_url, api_key, temperature))
    }

    pub fn with_client(
        client: Client,
        model: String,
        base_url: String,
        api_key: String,
        temperature: f32,
    ) -> Self {
        info!(
            "Initialized OpenAICompatibleLLM: model={}, base_url={}",
            model, base_url
        );
        Self {
            client,
            model,
            base_url,
            api_key,
            temperature,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl StatelessLLMInterface for OpenAICompatibleLLM {
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<Option<String>, ProviderError> {
        let url = self.completions_url();
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: &messages,
            temperature: self.temperature,
        };

        debug!(url = %url, messages = messages.len(), "sending chat completion");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| match choice.message.content {
                serde_json::Value::String(text) => Some(text),
                _ => None,
            });
        Ok(content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
