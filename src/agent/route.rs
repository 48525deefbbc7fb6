//! Routing categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the three downstream handlers a question can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Fact lookup about a single Pokémon.
    Researcher,
    /// Battle analysis between Pokémon.
    PokemonExpert,
    /// Anything not specifically about Pokémon.
    DirectResponse,
}

impl Route {
    /// Every route, in prompt order.
    pub const ALL: [Self; 3] = [Self::Researcher, Self::PokemonExpert, Self::DirectResponse];

    /// Wire name used in prompts and schemas.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Researcher => "researcher",
            Self::PokemonExpert => "pokemon_expert",
            Self::DirectResponse => "direct_response",
        }
    }

    /// Parses a model reply: trimmed, lowercased, exact match only.
    #[must_use]
    pub fn parse_reply(reply: &str) -> Option<Self> {
        let normalized = reply.trim().to_lowercase();
        Self::ALL.into_iter().find(|r| r.as_str() == normalized)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_reply(s).ok_or_else(|| format!("unknown route '{s}'"))
    }
}
