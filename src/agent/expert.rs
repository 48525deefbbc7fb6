//! Battle-analysis responder.
//!
//! The verdict shape (`answer` or `winner`) and the bound lookup tool are
//! fixed when the agent is built. If any lookup during a run fails, the
//! verdict is forced to `BATTLE_IMPOSSIBLE` regardless of what the model
//! wrote.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::config::AgentConfig;
use super::executor::ToolExecutor;
use super::message::{Conversation, ResponseSchema};
use super::prompt::{PromptSet, render_expert_prompt};
use super::provider::LlmProvider;
use super::reply::{AgentOutput, BattleVerdict, DetailedBattle, ResponseFormat, SimplifiedBattle};
use super::route::Route;
use super::tool::{GET_POKEMON, GET_POKEMON_WITH_TYPES, ToolDefinition, ToolSet};
use super::traits::{Agent, Responder, execute_with_tools, parse_json_response};
use crate::error::AgentError;
use crate::pokeapi::PokeApiClient;

/// Which lookup tool the expert may call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpertTools {
    /// No tools; the question carries the data.
    None,
    /// Plain Pokémon lookup.
    Lookup,
    /// Lookup enriched with type damage relations.
    #[default]
    LookupWithTypes,
}

impl ExpertTools {
    fn tool_set(self) -> ToolSet {
        match self {
            Self::None => ToolSet::none(),
            Self::Lookup => ToolSet::pokemon_lookup(),
            Self::LookupWithTypes => ToolSet::pokemon_lookup_with_types(),
        }
    }

    const fn tool_name(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Lookup => GET_POKEMON,
            Self::LookupWithTypes => GET_POKEMON_WITH_TYPES,
        }
    }
}

/// Construction options for [`PokemonExpertAgent`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpertOptions {
    /// Bound lookup tool.
    pub tools: ExpertTools,
    /// Verdict shape.
    pub format: ResponseFormat,
    /// Template override. When unset, tool-less experts use the battle
    /// template and the others the expert template.
    pub prompt: Option<String>,
}

impl ExpertOptions {
    /// Options for the tool-less expert that judges pre-fetched data.
    #[must_use]
    pub const fn battle() -> Self {
        Self {
            tools: ExpertTools::None,
            format: ResponseFormat::Simplified,
            prompt: None,
        }
    }
}

/// Battle expert agent.
pub struct PokemonExpertAgent {
    provider: Arc<dyn LlmProvider>,
    client: Arc<PokeApiClient>,
    model: String,
    system_prompt: String,
    tools: ExpertTools,
    format: ResponseFormat,
    max_tokens: u32,
    max_tool_iterations: usize,
}

impl PokemonExpertAgent {
    /// Creates an expert, rendering its template for the chosen shape and tool.
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        client: Arc<PokeApiClient>,
        config: &AgentConfig,
        prompts: &PromptSet,
        options: ExpertOptions,
    ) -> Self {
        let template = options.prompt.unwrap_or_else(|| match options.tools {
            ExpertTools::None => prompts.battle.clone(),
            ExpertTools::Lookup | ExpertTools::LookupWithTypes => prompts.expert.clone(),
        });
        let system_prompt =
            render_expert_prompt(&template, options.format, options.tools.tool_name());

        Self {
            provider,
            client,
            model: config.model.clone(),
            system_prompt,
            tools: options.tools,
            format: options.format,
            max_tokens: config.max_tokens,
            max_tool_iterations: config.max_tool_iterations,
        }
    }

    /// Verdict shape this expert produces.
    #[must_use]
    pub const fn format(&self) -> ResponseFormat {
        self.format
    }

    /// Analyses the battle in the conversation. Never fails.
    pub async fn analyze(&self, conversation: &Conversation) -> BattleVerdict {
        let executor = ToolExecutor::new(Arc::clone(&self.client));
        let result = self.try_analyze(conversation, &executor).await;

        if executor.has_failed_lookup() {
            debug!(
                failed = ?executor.failed_lookups(),
                "lookup failed during battle analysis"
            );
            return BattleVerdict::impossible(self.format);
        }

        result.unwrap_or_else(|e| {
            warn!(error = %e, "battle analysis failed, returning impossible verdict");
            BattleVerdict::impossible(self.format)
        })
    }

    async fn try_analyze(
        &self,
        conversation: &Conversation,
        executor: &ToolExecutor,
    ) -> Result<BattleVerdict, AgentError> {
        let response =
            execute_with_tools(self, self.provider.as_ref(), conversation, executor).await?;
        match self.format {
            ResponseFormat::Detailed => {
                parse_json_response::<DetailedBattle>(&response.content).map(Into::into)
            }
            ResponseFormat::Simplified => {
                parse_json_response::<SimplifiedBattle>(&response.content).map(Into::into)
            }
        }
    }
}

impl std::fmt::Debug for PokemonExpertAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PokemonExpertAgent")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("tools", &self.tools)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Agent for PokemonExpertAgent {
    fn name(&self) -> &'static str {
        "pokemon_expert"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn response_schema(&self) -> Option<ResponseSchema> {
        Some(match self.format {
            ResponseFormat::Detailed => ResponseSchema::of::<DetailedBattle>("detailed_battle"),
            ResponseFormat::Simplified => {
                ResponseSchema::of::<SimplifiedBattle>("simplified_battle")
            }
        })
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        self.tools.tool_set().into_definitions()
    }

    fn max_tool_iterations(&self) -> usize {
        self.max_tool_iterations
    }
}

#[async_trait]
impl Responder for PokemonExpertAgent {
    fn route(&self) -> Route {
        Route::PokemonExpert
    }

    async fn process(&self, conversation: &Conversation) -> Result<AgentOutput, AgentError> {
        Ok(AgentOutput::Battle(self.analyze(conversation).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::reply::BATTLE_IMPOSSIBLE;
    use crate::testing::{ScriptedProvider, pokedex_client};
    use serde_json::json;

    fn expert(provider: &Arc<ScriptedProvider>, options: ExpertOptions) -> PokemonExpertAgent {
        let config = AgentConfig::builder()
            .api_key("test")
            .model("test-model")
            .build()
            .unwrap_or_else(|_| unreachable!());
        PokemonExpertAgent::new(
            Arc::clone(provider) as Arc<dyn LlmProvider>,
            pokedex_client(),
            &config,
            &PromptSet::defaults(),
            options,
        )
    }

    #[tokio::test]
    async fn test_detailed_verdict_with_type_lookup() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .tool_calls(&[
                    (GET_POKEMON_WITH_TYPES, r#"{"name":"pikachu"}"#),
                    (GET_POKEMON_WITH_TYPES, r#"{"name":"bulbasaur"}"#),
                ])
                .json(&json!({
                    "reasoning": "Pikachu is faster.",
                    "answer": "Pikachu, thanks to its speed"
                })),
        );
        let verdict = expert(&provider, ExpertOptions::default())
            .analyze(&Conversation::from_question("Pikachu vs Bulbasaur?"))
            .await;

        assert_eq!(verdict.format(), ResponseFormat::Detailed);
        assert_eq!(verdict.outcome(), "Pikachu, thanks to its speed");

        let first = &provider.requests()[0];
        assert_eq!(first.tools[0].name, GET_POKEMON_WITH_TYPES);
        assert!(first.messages[0].content.contains("get_pokemon_with_types tool"));
        assert_eq!(
            first.response_schema.as_ref().map(|s| s.name.as_str()),
            Some("detailed_battle")
        );
    }

    #[tokio::test]
    async fn test_failed_lookup_forces_impossible() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .tool_calls(&[(GET_POKEMON, r#"{"name":"pikachuu"}"#)])
                .json(&json!({"reasoning": "Guessing.", "winner": "Pikachu"})),
        );
        let options = ExpertOptions {
            tools: ExpertTools::Lookup,
            format: ResponseFormat::Simplified,
            prompt: None,
        };
        let verdict = expert(&provider, options)
            .analyze(&Conversation::from_question("Pikachuu vs Charmander?"))
            .await;

        assert_eq!(
            verdict,
            BattleVerdict::impossible(ResponseFormat::Simplified)
        );
        assert_eq!(verdict.outcome(), BATTLE_IMPOSSIBLE);
    }

    #[tokio::test]
    async fn test_model_error_returns_impossible_in_configured_shape() {
        let provider = Arc::new(ScriptedProvider::new().error("boom"));
        let output = expert(&provider, ExpertOptions::default())
            .process(&Conversation::from_question("A vs B?"))
            .await
            .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(
            output,
            AgentOutput::Battle(BattleVerdict::impossible(ResponseFormat::Detailed))
        );
    }

    #[tokio::test]
    async fn test_battle_expert_has_no_tools() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .json(&json!({"reasoning": "Type advantage.", "winner": "Bulbasaur"})),
        );
        let verdict = expert(&provider, ExpertOptions::battle())
            .analyze(&Conversation::from_question("Who would win?"))
            .await;

        assert_eq!(verdict.outcome(), "Bulbasaur");
        let request = &provider.requests()[0];
        assert!(request.tools.is_empty());
        assert!(request.messages[0].content.contains("\"winner\""));
    }

    #[tokio::test]
    async fn test_prompt_override_is_rendered() {
        let provider = Arc::new(
            ScriptedProvider::new().json(&json!({"reasoning": "r", "winner": "w"})),
        );
        let options = ExpertOptions {
            prompt: Some("Reply with {verdict_field}.".to_string()),
            ..ExpertOptions::battle()
        };
        let agent = expert(&provider, options);
        assert_eq!(agent.system_prompt(), "Reply with winner.");
        assert_eq!(agent.format(), ResponseFormat::Simplified);
    }
}
