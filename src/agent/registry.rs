//! Agent factory.
//!
//! Owns the shared provider, `PokéAPI` client, configuration and prompts.
//! Default responders are built on first use and reused; custom experts
//! are always built fresh.

use std::sync::{Arc, OnceLock};

use super::config::AgentConfig;
use super::direct::DirectResponseAgent;
use super::expert::{ExpertOptions, ExpertTools, PokemonExpertAgent};
use super::prompt::PromptSet;
use super::provider::LlmProvider;
use super::researcher::ResearcherAgent;
use super::route::Route;
use super::router::SupervisorAgent;
use super::traits::Responder;
use crate::pokeapi::PokeApiClient;

/// Builds and memoises agents.
pub struct AgentRegistry {
    provider: Arc<dyn LlmProvider>,
    client: Arc<PokeApiClient>,
    config: AgentConfig,
    prompts: PromptSet,
    researcher: OnceLock<Arc<ResearcherAgent>>,
    default_expert: OnceLock<Arc<PokemonExpertAgent>>,
    direct: OnceLock<Arc<DirectResponseAgent>>,
}

impl AgentRegistry {
    /// Creates a registry over shared dependencies.
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        client: Arc<PokeApiClient>,
        config: AgentConfig,
        prompts: PromptSet,
    ) -> Self {
        Self {
            provider,
            client,
            config,
            prompts,
            researcher: OnceLock::new(),
            default_expert: OnceLock::new(),
            direct: OnceLock::new(),
        }
    }

    /// The responder serving `route`.
    pub fn responder(&self, route: Route) -> Arc<dyn Responder> {
        match route {
            Route::Researcher => self.researcher(),
            Route::PokemonExpert => self.pokemon_expert(),
            Route::DirectResponse => self.direct_response(),
        }
    }

    /// Memoised researcher.
    pub fn researcher(&self) -> Arc<ResearcherAgent> {
        Arc::clone(self.researcher.get_or_init(|| {
            Arc::new(ResearcherAgent::new(
                Arc::clone(&self.provider),
                Arc::clone(&self.client),
                &self.config,
                self.prompts.researcher.clone(),
            ))
        }))
    }

    /// Memoised default expert: type-enriched lookup, configured shape.
    pub fn pokemon_expert(&self) -> Arc<PokemonExpertAgent> {
        Arc::clone(self.default_expert.get_or_init(|| {
            Arc::new(self.expert(ExpertOptions {
                tools: ExpertTools::LookupWithTypes,
                format: self.config.response_format,
                prompt: None,
            }))
        }))
    }

    /// Memoised direct responder.
    pub fn direct_response(&self) -> Arc<DirectResponseAgent> {
        Arc::clone(self.direct.get_or_init(|| {
            Arc::new(DirectResponseAgent::new(
                Arc::clone(&self.provider),
                &self.config,
                self.prompts.direct.clone(),
            ))
        }))
    }

    /// A fresh expert with custom options.
    pub fn expert(&self, options: ExpertOptions) -> PokemonExpertAgent {
        PokemonExpertAgent::new(
            Arc::clone(&self.provider),
            Arc::clone(&self.client),
            &self.config,
            &self.prompts,
            options,
        )
    }

    /// A fresh tool-less expert for pre-fetched battle data.
    pub fn battle_expert(&self) -> PokemonExpertAgent {
        self.expert(ExpertOptions::battle())
    }

    /// A fresh supervisor.
    pub fn supervisor(&self) -> SupervisorAgent {
        SupervisorAgent::new(Arc::clone(&self.provider), &self.config, &self.prompts)
    }

    /// Shared `PokéAPI` client.
    pub const fn client(&self) -> &Arc<PokeApiClient> {
        &self.client
    }

    /// Active configuration.
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("provider", &self.provider.name())
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::reply::ResponseFormat;
    use crate::testing::{ScriptedProvider, pokedex_client};

    fn registry(format: ResponseFormat) -> AgentRegistry {
        let config = AgentConfig::builder()
            .api_key("test")
            .model("test-model")
            .response_format(format)
            .build()
            .unwrap_or_else(|_| unreachable!());
        AgentRegistry::new(
            Arc::new(ScriptedProvider::new()),
            pokedex_client(),
            config,
            PromptSet::defaults(),
        )
    }

    #[test]
    fn test_responders_match_routes() {
        let registry = registry(ResponseFormat::Detailed);
        for route in Route::ALL {
            assert_eq!(registry.responder(route).route(), route);
        }
    }

    #[test]
    fn test_default_responders_are_memoised() {
        let registry = registry(ResponseFormat::Detailed);
        assert!(Arc::ptr_eq(&registry.researcher(), &registry.researcher()));
        assert!(Arc::ptr_eq(
            &registry.pokemon_expert(),
            &registry.pokemon_expert()
        ));
        assert!(Arc::ptr_eq(
            &registry.direct_response(),
            &registry.direct_response()
        ));
    }

    #[test]
    fn test_default_expert_uses_configured_format() {
        let registry = registry(ResponseFormat::Simplified);
        assert_eq!(registry.pokemon_expert().format(), ResponseFormat::Simplified);
        assert_eq!(registry.battle_expert().format(), ResponseFormat::Simplified);
    }
}
