//! CLI command implementations.
//!
//! Each command returns the text to print; `main` writes it to stdout.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::agent::{AgentConfig, PromptSet, analyze_battle};
use crate::cli::parser::{Cli, Commands};
use crate::error::{Error, Result};
use crate::pokeapi::PokeApiClient;
use crate::server::{AppState, serve};

/// Executes the CLI command.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or the command fails.
pub async fn execute(cli: &Cli) -> Result<String> {
    match &cli.command {
        Commands::Serve { host, port } => {
            let state = AppState::from_config(load_config(cli)?)?;
            info!(version = env!("CARGO_PKG_VERSION"), "starting Pokémon multi-agent API");
            serve(state, host, *port).await?;
            Ok(String::new())
        }
        Commands::Ask { question } => {
            let state = AppState::from_config(load_config(cli)?)?;
            let result = cmd_ask(&state, question).await;
            state.client.close();
            result
        }
        Commands::Battle { pokemon1, pokemon2 } => {
            let state = AppState::from_config(load_config(cli)?)?;
            let output = cmd_battle(&state, pokemon1, pokemon2).await;
            state.client.close();
            output
        }
        Commands::Pokemon { name, types } => {
            let config = AgentConfig::builder().from_env().pokeapi_config();
            let client = PokeApiClient::new(&config)
                .map_err(|e| Error::Config(format!("failed to build PokéAPI client: {e}")))?;
            let result = cmd_pokemon(&client, name, *types).await;
            client.close();
            result
        }
        Commands::InitPrompts { dir } => cmd_init_prompts(dir.as_deref()),
    }
}

/// Resolves agent configuration: CLI flags, then environment.
fn load_config(cli: &Cli) -> Result<AgentConfig> {
    let mut builder = AgentConfig::builder();
    if let Some(dir) = &cli.prompt_dir {
        builder = builder.prompt_dir(dir);
    }
    Ok(builder.from_env().build()?)
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

async fn cmd_ask(state: &AppState, question: &str) -> Result<String> {
    let reply = state.orchestrator.invoke(question).await?;
    to_json(&reply)
}

async fn cmd_battle(state: &AppState, pokemon1: &str, pokemon2: &str) -> Result<String> {
    let verdict = analyze_battle(&state.client, &state.battle_expert, pokemon1, pokemon2).await;
    to_json(&verdict)
}

async fn cmd_pokemon(client: &PokeApiClient, name: &str, types: bool) -> Result<String> {
    let record = client.get_pokemon(name, types).await?;
    to_json(&record)
}

fn cmd_init_prompts(dir: Option<&Path>) -> Result<String> {
    let target_dir = dir
        .map(PathBuf::from)
        .or_else(PromptSet::default_dir)
        .ok_or_else(|| {
            Error::Config("could not determine home directory for default prompt path".to_string())
        })?;

    let written = PromptSet::write_defaults(&target_dir)?;

    if written.is_empty() {
        return Ok(format!(
            "All prompt templates already exist in: {}\n",
            target_dir.display()
        ));
    }

    let mut output = format!(
        "Wrote {} prompt template(s) to: {}\n",
        written.len(),
        target_dir.display()
    );
    for path in &written {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        output.push_str("  ");
        output.push_str(name);
        output.push('\n');
    }
    output.push_str("\nEdit these files to customize agent system prompts.\n");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::agent::LlmProvider;
    use crate::error::FetchError;
    use crate::testing::{ScriptedProvider, pokedex_client};
    use serde_json::{Value, json};
    use tempfile::TempDir;

    fn state(provider: &Arc<ScriptedProvider>) -> AppState {
        let config = AgentConfig::builder()
            .api_key("test")
            .model("test-model")
            .build()
            .unwrap_or_else(|_| unreachable!());
        AppState::from_parts(
            Arc::clone(provider) as Arc<dyn LlmProvider>,
            pokedex_client(),
            config,
            PromptSet::defaults(),
        )
    }

    fn parse(output: &str) -> Value {
        serde_json::from_str(output).unwrap_or_else(|e| unreachable!("{e}"))
    }

    #[tokio::test]
    async fn test_ask_prints_reply_json() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .text("direct_response")
                .text("Hello!"),
        );
        let output = cmd_ask(&state(&provider), "Hi")
            .await
            .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(parse(&output), json!({"answer": "Hello!"}));
        assert!(output.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_ask_propagates_routing_failure() {
        let provider = Arc::new(ScriptedProvider::new().text("?").text("?"));
        let result = cmd_ask(&state(&provider), "Hi").await;
        assert!(matches!(
            result,
            Err(Error::Agent(crate::error::AgentError::RoutingUndecided))
        ));
    }

    #[tokio::test]
    async fn test_battle_prints_verdict() {
        let provider = Arc::new(ScriptedProvider::new());
        let output = cmd_battle(&state(&provider), "pikachu", "missingno")
            .await
            .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(parse(&output)["winner"], "BATTLE_IMPOSSIBLE");
    }

    #[tokio::test]
    async fn test_pokemon_prints_record() {
        let client = pokedex_client();
        let output = cmd_pokemon(&client, "Pikachu", false)
            .await
            .unwrap_or_else(|e| unreachable!("{e}"));
        let value = parse(&output);
        assert_eq!(value["name"], "pikachu");
        assert_eq!(value["stats"]["special_attack"], 50);
    }

    #[tokio::test]
    async fn test_pokemon_not_found() {
        let client = pokedex_client();
        let result = cmd_pokemon(&client, "abc123", false).await;
        assert!(matches!(
            result,
            Err(Error::Fetch(FetchError::PokemonNotFound { .. }))
        ));
    }

    #[test]
    fn test_init_prompts_writes_then_skips() {
        let temp_dir = TempDir::new().unwrap_or_else(|e| unreachable!("{e}"));

        let first =
            cmd_init_prompts(Some(temp_dir.path())).unwrap_or_else(|e| unreachable!("{e}"));
        assert!(first.starts_with("Wrote 8 prompt template(s)"));
        assert!(first.contains("supervisor.md"));
        assert!(temp_dir.path().join("battle.md").exists());

        let second =
            cmd_init_prompts(Some(temp_dir.path())).unwrap_or_else(|e| unreachable!("{e}"));
        assert!(second.starts_with("All prompt templates already exist"));
    }
}
