//! Conversational responder for anything not specifically about Pokémon.

use std::sync::Arc;

use async_trait::async_trait;

use super::config::AgentConfig;
use super::message::Conversation;
use super::provider::LlmProvider;
use super::reply::AgentOutput;
use super::route::Route;
use super::traits::{Agent, Responder};
use crate::error::AgentError;

/// Stateless pass-through to the model with a short system prompt.
///
/// Binds no tools and requests no schema. Unlike the other responders it
/// propagates model errors to the caller.
pub struct DirectResponseAgent {
    provider: Arc<dyn LlmProvider>,
    model: String,
    system_prompt: String,
    max_tokens: u32,
    temperature: f32,
}

impl DirectResponseAgent {
    /// Creates a direct responder with the given system prompt.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, config: &AgentConfig, system_prompt: String) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            system_prompt,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Answers the conversation with free text.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on any provider failure.
    pub async fn respond(&self, conversation: &Conversation) -> Result<String, AgentError> {
        let response = self.execute(self.provider.as_ref(), conversation).await?;
        Ok(response.content)
    }
}

impl std::fmt::Debug for DirectResponseAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectResponseAgent")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Agent for DirectResponseAgent {
    fn name(&self) -> &'static str {
        "direct_response"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

#[async_trait]
impl Responder for DirectResponseAgent {
    fn route(&self) -> Route {
        Route::DirectResponse
    }

    async fn process(&self, conversation: &Conversation) -> Result<AgentOutput, AgentError> {
        self.respond(conversation).await.map(AgentOutput::Text)
    }
}
