//! LLM chat client
//!
//! Talks to any OpenAI-compatible chat completions endpoint. The provider
//! name picks a default base URL; an explicit `base_url` wins.

use crate::config::LlmConfig;
use crate::error::{AdvisorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A chat model the advisor can ask for free-text advice
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one system + user message pair, get the reply text
    async fn chat(&self, system: &str, user: &str) -> Result<String>;

    /// Model name for logging
    fn name(&self) -> &str;
}

/// HTTP-backed chat model
#[derive(Debug)]
pub struct LlmClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl LlmClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let base_url = match config.base_url.as_deref() {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => match config.provider.as_str() {
                "groq" => "https://api.groq.com/openai/v1".to_string(),
                "openai" => "https://api.openai.com/v1".to_string(),
                other => {
                    return Err(AdvisorError::LlmProvider(format!(
                        "unknown provider '{other}' and no base_url configured"
                    )))
                }
            },
        };

        let http = Client::builder().timeout(Duration::from_secs(60)).build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn chat(&self, system: &str, user: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::LlmProvider(format!(
                "chat endpoint returned {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AdvisorError::LlmProvider("response held no choices".to_string()))
    }

    fn name(&self) -> &str {
        &self.model
    }
}
