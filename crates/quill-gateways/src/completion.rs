//! Text-completion implementation of the generation gateway.

use serde::{Deserialize, Serialize};

use crate::traits::{GatewayError, GenerateGateway};

/// Completion-API tuning knobs.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// API base, e.g. `https://api.openai.com/v1`.
    pub base_url: String,

    /// Completion model identifier.
    pub model: String,

    /// Completion length cap.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// API key; read from `OPENAI_API_KEY`. Its absence is reported as a
    /// credential error on first use, before any network call.
    pub api_key: Option<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo-instruct".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            api_key: None,
        }
    }
}

impl CompletionConfig {
    /// Read the API key from the conventional environment variable.
    pub fn key_from_env() -> Option<String> {
        std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty())
    }
}

/// Generation gateway backed by a `/completions` endpoint.
pub struct CompletionClient {
    config: CompletionConfig,
    client: reqwest::Client,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

/// Expand a topic into the full article prompt.
///
/// The labeled `Title:` / `Description:` lines are a convention the
/// response parser relies on, not a guaranteed schema; the parser degrades
/// gracefully when the model ignores them.
fn article_prompt(topic: &str) -> String {
    format!(
        "Write a blog post about: {topic}\n\n\
         Start your answer with a \"Title:\" line, then a \"Description:\" line, \
         then the article body in MDX format. \
         Keep it fun, use emoji and simple analogies, and structure the body \
         with ## headings and bullet lists, with a blank line after each heading.\n\n"
    )
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
}

impl GenerateGateway for CompletionClient {
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingCredential("OPENAI_API_KEY"))?;

        let request = CompletionRequest {
            model: &self.config.model,
            prompt: article_prompt(prompt),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        tracing::debug!(model = %self.config.model, "requesting completion");

        let response = self
            .client
            .post(format!("{}/completions", self.config.base_url))
            .bearer_auth(key)
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            return Err(match status {
                401 | 403 => GatewayError::Auth { status, message },
                404 => GatewayError::NotFound(message),
                _ => GatewayError::Upstream { status, message },
            });
        }

        let body: CompletionResponse = response.json().await?;
        Ok(body.choices.into_iter().next().map(|c| c.text).unwrap_or_default())
    }
}
