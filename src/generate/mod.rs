//! Comment generation backends.
//!
//! The pipeline only depends on [`CommentGenerator`]; the OpenAI client is
//! one implementation of it.

pub mod openai;
pub mod prompt;

use anyhow::Result;
use async_trait::async_trait;

pub use openai::OpenAiGenerator;
pub use prompt::{estimate_tokens, SYSTEM_PROMPT};

/// One request for a handler's documentation block.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// System instruction for the model.
    pub system: &'a str,
    /// Exact source text of the handler.
    pub source: &'a str,
    /// Target model identifier.
    pub model: &'a str,
    /// Matched route hint (`/users [get], ...`), if any.
    pub routes: Option<&'a str>,
}

/// A text-generation service that writes Swagger comments.
#[async_trait]
pub trait CommentGenerator: Send + Sync {
    /// Generate the comment block for one handler.
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}
