//! Provider factory.
//!
//! Maps provider names to concrete [`LlmProvider`] implementations.

use std::sync::Arc;

use tracing::info;

use crate::agent::config::{AgentConfig, PROVIDER_GROQ, PROVIDER_OPENAI};
use crate::agent::provider::LlmProvider;
use crate::agent::providers::OpenAiProvider;
use crate::error::AgentError;

/// Creates an [`LlmProvider`] based on the configured provider name.
///
/// # Supported Providers
///
/// - `"openai"` (default): `OpenAI` or any compatible API via `OPENAI_BASE_URL`
/// - `"groq"`: Groq through its OpenAI-compatible endpoint
///
/// # Errors
///
/// Returns [`AgentError::UnsupportedProvider`] for unknown provider names.
pub fn create_provider(config: &AgentConfig) -> Result<Arc<dyn LlmProvider>, AgentError> {
    let provider: Arc<dyn LlmProvider> = match config.provider.as_str() {
        PROVIDER_OPENAI => Arc::new(OpenAiProvider::new(config, PROVIDER_OPENAI)),
        PROVIDER_GROQ => Arc::new(OpenAiProvider::new(config, PROVIDER_GROQ)),
        other => {
            return Err(AgentError::UnsupportedProvider {
                name: other.to_string(),
            });
        }
    };
    info!(provider = provider.name(), model = %config.model, "LLM provider ready");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn config(provider: &str) -> AgentConfig {
        AgentConfig::builder()
            .api_key("test")
            .model("test-model")
            .provider(provider)
            .build()
            .unwrap_or_else(|_| unreachable!())
    }

    #[test_case("openai" ; "openai")]
    #[test_case("groq" ; "groq")]
    fn test_create_known_provider(name: &str) {
        let provider = create_provider(&config(name)).unwrap_or_else(|_| unreachable!());
        assert_eq!(provider.name(), name);
    }

    #[test]
    fn test_create_unknown_provider() {
        let result = create_provider(&config("unknown"));
        assert!(matches!(
            result,
            Err(AgentError::UnsupportedProvider { ref name }) if name == "unknown"
        ));
    }
}
