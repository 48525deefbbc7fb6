//! Error types for `pokeagent`.
//!
//! Errors are split by layer: [`FetchError`] for the `PokéAPI` client,
//! [`AgentError`] for providers, agents and orchestration, and the
//! top-level [`Error`] that wraps both for the binary and the server.

use thiserror::Error;

/// Result alias using the crate-level [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Agent, provider or orchestration failure.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// `PokéAPI` lookup failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Invalid or incomplete configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O failure (prompt files, sockets).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the `PokéAPI` client.
///
/// Transport failures, non-success statuses, timeouts and undecodable
/// payloads all fold into the not-found kind for the resource requested.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The Pokémon lookup did not resolve.
    #[error("TOOL ERROR: Pokémon '{name}' not found.")]
    PokemonNotFound {
        /// Name as requested by the caller.
        name: String,
        /// Underlying transport or decode failure.
        reason: String,
    },

    /// The type lookup did not resolve.
    #[error("Error: Type '{name}' not found.")]
    TypeNotFound {
        /// Type name as requested by the caller.
        name: String,
        /// Underlying transport or decode failure.
        reason: String,
    },
}

impl FetchError {
    /// Returns the underlying failure description.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::PokemonNotFound { reason, .. } | Self::TypeNotFound { reason, .. } => reason,
        }
    }
}

/// Errors raised by the agent layer.
#[derive(Debug, Error)]
pub enum AgentError {
    /// No API key configured for the selected provider.
    #[error("API key missing: set OPENAI_API_KEY (or GROQ_API_KEY with LOCAL_DEVELOPMENT=true)")]
    ApiKeyMissing,

    /// No model name configured for the selected provider.
    #[error("{var} must be set for the '{provider}' provider")]
    ModelMissing {
        /// Provider that needs the model.
        provider: String,
        /// Environment variable that was expected.
        var: &'static str,
    },

    /// Unknown provider name.
    #[error("unsupported LLM provider: {name}")]
    UnsupportedProvider {
        /// Provider name that was requested.
        name: String,
    },

    /// The model API call failed.
    #[error("API request failed: {message}")]
    ApiRequest {
        /// Error description.
        message: String,
        /// HTTP status, when known.
        status: Option<u16>,
    },

    /// The model output could not be parsed into the expected shape.
    #[error("failed to parse model response: {message}")]
    ResponseParse {
        /// Parse error description.
        message: String,
        /// Raw content that failed to parse.
        content: String,
    },

    /// A tool call could not be executed.
    #[error("tool '{name}' failed: {message}")]
    ToolExecution {
        /// Tool name.
        name: String,
        /// Error description.
        message: String,
    },

    /// The model kept requesting tools past the iteration limit.
    #[error("tool loop exceeded {max_iterations} iterations")]
    ToolLoopExceeded {
        /// Configured limit.
        max_iterations: usize,
    },

    /// Neither routing approach produced a recognised category.
    #[error("routing failed: no approach produced a recognised category")]
    RoutingUndecided,

    /// Orchestration-level failure (invalid input, unexpected output).
    #[error("{message}")]
    Orchestration {
        /// Error description.
        message: String,
    },

    /// A `PokéAPI` lookup made on the agent's behalf failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pokemon_not_found_message() {
        let err = FetchError::PokemonNotFound {
            name: "abc123".to_string(),
            reason: "status 404".to_string(),
        };
        assert_eq!(err.to_string(), "TOOL ERROR: Pokémon 'abc123' not found.");
        assert_eq!(err.reason(), "status 404");
    }

    #[test]
    fn test_fetch_error_converts_into_agent_error() {
        let err: AgentError = FetchError::TypeNotFound {
            name: "shadow".to_string(),
            reason: "timeout".to_string(),
        }
        .into();
        assert!(matches!(err, AgentError::Fetch(FetchError::TypeNotFound { .. })));
        assert_eq!(err.to_string(), "Error: Type 'shadow' not found.");
    }

    #[test]
    fn test_model_missing_message() {
        let err = AgentError::ModelMissing {
            provider: "groq".to_string(),
            var: "GROQ_MODEL_NAME",
        };
        assert_eq!(
            err.to_string(),
            "GROQ_MODEL_NAME must be set for the 'groq' provider"
        );
    }
}
