//! Fact-lookup responder.
//!
//! Looks up the Pokémon named in the question and returns its base stats.
//! Every failure, including a model that reports a Pokémon the tool could
//! not find, collapses to the `NOT_FOUND` sentinel.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::config::AgentConfig;
use super::executor::ToolExecutor;
use super::message::{Conversation, ResponseSchema};
use super::provider::LlmProvider;
use super::reply::{AgentOutput, PokemonData};
use super::route::Route;
use super::tool::{ToolDefinition, ToolSet};
use super::traits::{Agent, Responder, execute_with_tools, parse_json_response};
use crate::error::AgentError;
use crate::pokeapi::PokeApiClient;

/// Researcher agent: plain lookup tool, `PokemonData` output.
pub struct ResearcherAgent {
    provider: Arc<dyn LlmProvider>,
    client: Arc<PokeApiClient>,
    model: String,
    system_prompt: String,
    max_tokens: u32,
    max_tool_iterations: usize,
}

impl ResearcherAgent {
    /// Creates a researcher.
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        client: Arc<PokeApiClient>,
        config: &AgentConfig,
        system_prompt: String,
    ) -> Self {
        Self {
            provider,
            client,
            model: config.model.clone(),
            system_prompt,
            max_tokens: config.max_tokens,
            max_tool_iterations: config.max_tool_iterations,
        }
    }

    /// Looks up the Pokémon in the conversation. Never fails.
    pub async fn research(&self, conversation: &Conversation) -> PokemonData {
        let executor = ToolExecutor::new(Arc::clone(&self.client));
        match self.try_research(conversation, &executor).await {
            Ok(data) => {
                let data = data.normalized();
                let missed = executor
                    .failed_lookups()
                    .iter()
                    .any(|name| name.trim().eq_ignore_ascii_case(&data.name));
                if missed {
                    debug!(pokemon = %data.name, "model reported a Pokémon the tool could not find");
                    PokemonData::not_found()
                } else {
                    data
                }
            }
            Err(e) => {
                warn!(error = %e, "researcher failed, returning sentinel");
                PokemonData::not_found()
            }
        }
    }

    async fn try_research(
        &self,
        conversation: &Conversation,
        executor: &ToolExecutor,
    ) -> Result<PokemonData, AgentError> {
        let response =
            execute_with_tools(self, self.provider.as_ref(), conversation, executor).await?;
        parse_json_response(&response.content)
    }
}

impl std::fmt::Debug for ResearcherAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearcherAgent")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Agent for ResearcherAgent {
    fn name(&self) -> &'static str {
        "researcher"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn response_schema(&self) -> Option<ResponseSchema> {
        Some(ResponseSchema::of::<PokemonData>("pokemon_data"))
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        ToolSet::pokemon_lookup().into_definitions()
    }

    fn max_tool_iterations(&self) -> usize {
        self.max_tool_iterations
    }
}

#[async_trait]
impl Responder for ResearcherAgent {
    fn route(&self) -> Route {
        Route::Researcher
    }

    async fn process(&self, conversation: &Conversation) -> Result<AgentOutput, AgentError> {
        Ok(AgentOutput::Pokemon(self.research(conversation).await))
    }
}
