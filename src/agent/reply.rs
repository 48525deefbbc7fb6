//! Structured agent outputs and the uniform reply shape.
//!
//! Responders produce an [`AgentOutput`]; the orchestrator turns it into a
//! [`Reply`], which serialises to exactly one of `{answer}`, a
//! [`PokemonData`] record, or a [`BattleVerdict`].

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::pokeapi::PokemonRecord;

/// Reserved name of the researcher's not-found sentinel.
pub const NOT_FOUND: &str = "NOT_FOUND";
/// Verdict value when a battle cannot be analysed.
pub const BATTLE_IMPOSSIBLE: &str = "BATTLE_IMPOSSIBLE";
/// Reasoning attached to every impossible-battle verdict.
pub const BATTLE_IMPOSSIBLE_REASONING: &str =
    "Could not analyze the battle due to invalid Pokémon. Please check the spelling of Pokémon names.";

/// The six base stats of a Pokémon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BaseStats {
    /// Hit Points of the Pokémon.
    pub hp: i64,
    /// Attack stat of the Pokémon.
    pub attack: i64,
    /// Defense stat of the Pokémon.
    pub defense: i64,
    /// Special Attack stat of the Pokémon.
    pub special_attack: i64,
    /// Special Defense stat of the Pokémon.
    pub special_defense: i64,
    /// Speed stat of the Pokémon.
    pub speed: i64,
}

impl BaseStats {
    /// Returns `true` if every stat is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.hp == 0
            && self.attack == 0
            && self.defense == 0
            && self.special_attack == 0
            && self.special_defense == 0
            && self.speed == 0
    }
}

/// Researcher output: a Pokémon's name and base stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonData {
    /// Name of the Pokémon.
    pub name: String,
    /// Base stats of the Pokémon.
    pub base_stats: BaseStats,
}

impl PokemonData {
    /// The not-found sentinel: reserved name, all stats zero.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            name: NOT_FOUND.to_string(),
            base_stats: BaseStats::default(),
        }
    }

    /// Returns `true` for the sentinel.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.name == NOT_FOUND
    }

    /// Collapses an all-zero record to the sentinel so a real name is never
    /// paired with zero stats.
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.base_stats.is_zero() && !self.is_not_found() {
            Self::not_found()
        } else {
            self
        }
    }
}

impl From<&PokemonRecord> for PokemonData {
    fn from(record: &PokemonRecord) -> Self {
        let stat = |key: &str| record.stats.get(key).copied().unwrap_or(0);
        Self {
            name: record.name.clone(),
            base_stats: BaseStats {
                hp: stat("hp"),
                attack: stat("attack"),
                defense: stat("defense"),
                special_attack: stat("special_attack"),
                special_defense: stat("special_defense"),
                speed: stat("speed"),
            },
        }
    }
}

/// Shape of a battle verdict, fixed when the expert is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// `{reasoning, answer}`.
    #[default]
    Detailed,
    /// `{reasoning, winner}`.
    Simplified,
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Detailed => "detailed",
            Self::Simplified => "simplified",
        })
    }
}

impl FromStr for ResponseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detailed" => Ok(Self::Detailed),
            "simplified" => Ok(Self::Simplified),
            other => Err(format!(
                "unknown response format '{other}' (expected 'detailed' or 'simplified')"
            )),
        }
    }
}

/// Detailed verdict payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DetailedBattle {
    /// A very detailed analysis with your reasoning.
    pub reasoning: String,
    /// A short answer to the battle query.
    pub answer: String,
}

/// Simplified verdict payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SimplifiedBattle {
    /// A very detailed analysis with your reasoning.
    pub reasoning: String,
    /// The winner of the battle.
    pub winner: String,
}

/// Battle analysis result in one of two fixed shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BattleVerdict {
    /// `{reasoning, answer}`.
    Detailed {
        /// Analysis text.
        reasoning: String,
        /// Short answer naming the winner.
        answer: String,
    },
    /// `{reasoning, winner}`.
    Simplified {
        /// Analysis text.
        reasoning: String,
        /// Winner name.
        winner: String,
    },
}

impl BattleVerdict {
    /// The impossible-battle verdict in the given shape.
    #[must_use]
    pub fn impossible(format: ResponseFormat) -> Self {
        let reasoning = BATTLE_IMPOSSIBLE_REASONING.to_string();
        let outcome = BATTLE_IMPOSSIBLE.to_string();
        match format {
            ResponseFormat::Detailed => Self::Detailed {
                reasoning,
                answer: outcome,
            },
            ResponseFormat::Simplified => Self::Simplified {
                reasoning,
                winner: outcome,
            },
        }
    }

    /// Shape of this verdict.
    #[must_use]
    pub const fn format(&self) -> ResponseFormat {
        match self {
            Self::Detailed { .. } => ResponseFormat::Detailed,
            Self::Simplified { .. } => ResponseFormat::Simplified,
        }
    }

    /// The `answer` or `winner` field.
    #[must_use]
    pub fn outcome(&self) -> &str {
        match self {
            Self::Detailed { answer, .. } => answer,
            Self::Simplified { winner, .. } => winner,
        }
    }

    /// The reasoning text.
    #[must_use]
    pub fn reasoning(&self) -> &str {
        match self {
            Self::Detailed { reasoning, .. } | Self::Simplified { reasoning, .. } => reasoning,
        }
    }

    /// Returns `true` for the impossible-battle verdict.
    #[must_use]
    pub fn is_impossible(&self) -> bool {
        self.outcome() == BATTLE_IMPOSSIBLE
    }
}

impl From<DetailedBattle> for BattleVerdict {
    fn from(b: DetailedBattle) -> Self {
        Self::Detailed {
            reasoning: b.reasoning,
            answer: b.answer,
        }
    }
}

impl From<SimplifiedBattle> for BattleVerdict {
    fn from(b: SimplifiedBattle) -> Self {
        Self::Simplified {
            reasoning: b.reasoning,
            winner: b.winner,
        }
    }
}

/// Output of a single responder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentOutput {
    /// Free text.
    Text(String),
    /// Researcher record.
    Pokemon(PokemonData),
    /// Expert verdict.
    Battle(BattleVerdict),
}

/// Final result of one orchestrator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    /// `{"answer": text}`.
    Answer {
        /// Answer text.
        answer: String,
    },
    /// A researcher record, returned as-is.
    Pokemon(PokemonData),
    /// A battle verdict, returned as-is.
    Battle(BattleVerdict),
}

impl Reply {
    /// Wraps free text as `{answer}`.
    #[must_use]
    pub fn answer(text: impl Into<String>) -> Self {
        Self::Answer {
            answer: text.into(),
        }
    }
}

impl From<AgentOutput> for Reply {
    fn from(output: AgentOutput) -> Self {
        match output {
            AgentOutput::Text(text) => Self::answer(text),
            AgentOutput::Pokemon(data) => Self::Pokemon(data),
            AgentOutput::Battle(verdict) => Self::Battle(verdict),
        }
    }
}
