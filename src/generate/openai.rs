//
//  openai.rs
//  Swagdoc
//
//  Created by hak (tharun)
//

use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompt::build_user_prompt;
use super::{CommentGenerator, GenerationRequest};
use crate::config::GenerationConfig;
use crate::error::{Result, SwagdocError};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Chat-completions client for OpenAI-compatible APIs.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_tokens: u32,
}

impl OpenAiGenerator {
    pub fn new(api_key: impl Into<String>, config: &GenerationConfig) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SwagdocError::MissingApiKey);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SwagdocError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            max_tokens: config.max_tokens,
        })
    }

    /// Build a client from `OPENAI_API_KEY`.
    pub fn from_env(config: &GenerationConfig) -> Result<Self> {
        let key = std::env::var(API_KEY_ENV).map_err(|_| SwagdocError::MissingApiKey)?;
        Self::new(key, config)
    }

    fn request_body<'a>(&self, request: &'a GenerationRequest<'a>) -> ChatRequest<'a> {
        ChatRequest {
            model: request.model,
            max_tokens: self.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_user_prompt(request.source, request.routes),
                },
            ],
        }
    }
}

#[async_trait]
impl CommentGenerator for OpenAiGenerator {
    async fn generate(&self, request: &GenerationRequest<'_>) -> anyhow::Result<String> {
        let body = self.request_body(request);
        debug!(model = request.model, endpoint = %self.endpoint, "sending completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("request failed")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("API returned {status}: {}", text.trim());
        }

        let parsed: ChatResponse = response.json().await.context("malformed response body")?;
        parsed.into_text()
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> anyhow::Result<String> {
        self.choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("response contained no choices"))?
            .message
            .content
            .ok_or_else(|| anyhow!("response choice had no content"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GenerationConfig {
        GenerationConfig {
            base_url: "http://localhost:9999/v1/".to_string(),
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            OpenAiGenerator::new("  ", &config()),
            Err(SwagdocError::MissingApiKey)
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let generator = OpenAiGenerator::new("sk-test", &config()).unwrap();
        assert_eq!(generator.endpoint, "http://localhost:9999/v1/chat/completions");

        let request = GenerationRequest {
            system: "sys",
            source: "func A(c *gin.Context) {}",
            model: "gpt-4o-mini",
            routes: Some("/a [get]"),
        };
        let body = serde_json::to_value(generator.request_body(&request)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "sys");
        let user = body["messages"][1]["content"].as_str().unwrap();
        assert!(user.contains("func A(c *gin.Context) {}"));
        assert!(user.contains("/a [get]"));
    }

    #[test]
    fn test_response_text_extraction() {
        let ok: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"// A godoc"}}]}"#,
        )
        .unwrap();
        assert_eq!(ok.into_text().unwrap(), "// A godoc");

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(empty.into_text().is_err());

        let null: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(null.into_text().is_err());
    }
}
