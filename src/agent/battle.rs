//! Two-Pokémon battle analysis over pre-fetched data.

use tracing::{info, warn};

use super::expert::PokemonExpertAgent;
use super::message::Conversation;
use super::prompt::build_battle_query;
use super::reply::BattleVerdict;
use crate::error::FetchError;
use crate::pokeapi::{PokeApiClient, PokemonRecord};

/// Fetches both Pokémon with type details and asks `expert` for a verdict.
///
/// If either lookup fails the impossible verdict is returned in the
/// expert's shape without calling the model.
pub async fn analyze_battle(
    client: &PokeApiClient,
    expert: &PokemonExpertAgent,
    pokemon1: &str,
    pokemon2: &str,
) -> BattleVerdict {
    let (data1, data2) = match fetch_pair(client, pokemon1, pokemon2).await {
        Ok(pair) => pair,
        Err(e) => {
            warn!(error = %e, reason = e.reason(), "battle lookup failed");
            return BattleVerdict::impossible(expert.format());
        }
    };

    let query = build_battle_query(
        pokemon1,
        &serde_json::to_string(&data1).unwrap_or_default(),
        pokemon2,
        &serde_json::to_string(&data2).unwrap_or_default(),
    );

    let verdict = expert.analyze(&Conversation::from_question(&query)).await;
    info!(
        pokemon1,
        pokemon2,
        outcome = verdict.outcome(),
        "battle analysed"
    );
    verdict
}

async fn fetch_pair(
    client: &PokeApiClient,
    pokemon1: &str,
    pokemon2: &str,
) -> Result<(PokemonRecord, PokemonRecord), FetchError> {
    let data1 = client.get_pokemon(pokemon1, true).await?;
    let data2 = client.get_pokemon(pokemon2, true).await?;
    Ok((data1, data2))
}
