//! Request and response bodies.

use serde::{Deserialize, Serialize};

/// Greeting returned by `GET /`.
pub const WELCOME_MESSAGE: &str = "Welcome to the Pokémon Multi-Agent System API";

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatBody {
    /// The user's question.
    pub question: String,
}

/// Query string of `GET /battle`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleParams {
    /// First contender.
    pub pokemon1: String,
    /// Second contender.
    pub pokemon2: String,
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Welcome {
    /// Greeting text.
    pub message: String,
}

impl Default for Welcome {
    fn default() -> Self {
        Self {
            message: WELCOME_MESSAGE.to_string(),
        }
    }
}

/// Error body for HTTP 500 responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error description.
    pub detail: String,
}
