//! Model client: sends the prompt to an OpenAI-compatible endpoint
//!
//! The client is constructed once (credential resolution happens up front and
//! fails there, not lazily at call time) and injected into the pipeline.

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};

use crate::error::PipelineError;

/// Primary credential variable; `OPENAI_API_KEY` is accepted as a fallback.
pub const API_KEY_ENV: &str = "NLSQL_API_KEY";
const API_KEY_FALLBACK_ENV: &str = "OPENAI_API_KEY";
const API_BASE_ENV: &str = "NLSQL_API_BASE";
const MODEL_ENV: &str = "NLSQL_MODEL";

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Chat-completion client for the translation step.
#[derive(Debug)]
pub struct ModelClient {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl ModelClient {
    /// Build a client from explicit parts.
    pub fn new(api_key: impl Into<String>, base_url: Option<&str>, model: impl Into<String>) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = base_url {
            config = config.with_api_base(base);
        }
        ModelClient {
            client: Client::with_config(config),
            model: model.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build a client from the environment.
    ///
    /// A missing credential is a constructor-time `Configuration` error; there
    /// is no fallback key.
    pub fn from_env() -> Result<Self, PipelineError> {
        let api_key = std::env::var(API_KEY_ENV)
            .or_else(|_| std::env::var(API_KEY_FALLBACK_ENV))
            .map_err(|_| {
                PipelineError::Configuration(format!(
                    "{} (or {})",
                    API_KEY_ENV, API_KEY_FALLBACK_ENV
                ))
            })?;
        let base_url = std::env::var(API_BASE_ENV).ok();
        let model = std::env::var(MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self::new(api_key, base_url.as_deref(), model))
    }

    /// Override the per-request timeout on the model call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` and return the raw textual reply.
    ///
    /// This is the pipeline's only external-network suspension point. The call
    /// runs under the configured timeout; timing out is an `Upstream` failure
    /// like any other transport error. The reply is the concatenation of every
    /// textual fragment across the response's choices.
    pub async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, PipelineError> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| PipelineError::Upstream(e.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([ChatCompletionRequestMessage::User(message)])
            .temperature(0.0)
            .max_tokens(max_tokens)
            .build()
            .map_err(|e| PipelineError::Upstream(e.to_string()))?;

        tracing::debug!(model = %self.model, max_tokens, "sending completion request");

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| {
                PipelineError::Upstream(format!(
                    "model request timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| PipelineError::Upstream(e.to_string()))?;

        let mut reply = String::new();
        for choice in &response.choices {
            if let Some(content) = &choice.message.content {
                reply.push_str(content);
            }
        }

        tracing::debug!(reply_len = reply.len(), "model reply received");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_requires_credential() {
        std::env::remove_var(API_KEY_ENV);
        std::env::remove_var(API_KEY_FALLBACK_ENV);
        let err = ModelClient::from_env().unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));

        std::env::set_var(API_KEY_ENV, "test-key");
        let client = ModelClient::from_env().unwrap();
        assert_eq!(client.model(), DEFAULT_MODEL);
        std::env::remove_var(API_KEY_ENV);
    }
}
