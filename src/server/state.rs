//! Shared application state.

use std::sync::Arc;

use crate::agent::{
    AgentConfig, AgentRegistry, LlmProvider, Orchestrator, PokemonExpertAgent, PromptSet,
    create_provider,
};
use crate::error::Error;
use crate::pokeapi::PokeApiClient;

/// Dependencies shared by every request, built once at startup.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Routes `/chat` questions.
    pub orchestrator: Arc<Orchestrator>,
    /// Tool-less expert behind `/battle`.
    pub battle_expert: Arc<PokemonExpertAgent>,
    /// Shared `PokéAPI` client, closed on shutdown.
    pub client: Arc<PokeApiClient>,
}

impl AppState {
    /// Builds the provider, the `PokéAPI` client and the agents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Agent`] for an unsupported provider and
    /// [`Error::Config`] if the HTTP client cannot be built.
    pub fn from_config(config: AgentConfig) -> Result<Self, Error> {
        let provider = create_provider(&config)?;
        let client = PokeApiClient::new(&config.pokeapi)
            .map_err(|e| Error::Config(format!("failed to build PokéAPI client: {e}")))?;
        let prompts = PromptSet::load(config.prompt_dir.as_deref());
        Ok(Self::from_parts(provider, Arc::new(client), config, prompts))
    }

    /// Wires pre-built dependencies together.
    #[must_use]
    pub fn from_parts(
        provider: Arc<dyn LlmProvider>,
        client: Arc<PokeApiClient>,
        config: AgentConfig,
        prompts: PromptSet,
    ) -> Self {
        let registry = Arc::new(AgentRegistry::new(
            provider,
            Arc::clone(&client),
            config,
            prompts,
        ));
        let battle_expert = Arc::new(registry.battle_expert());
        let orchestrator = Arc::new(Orchestrator::new(registry));
        Self {
            orchestrator,
            battle_expert,
            client,
        }
    }
}
