//! Agent configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `LOCAL_DEVELOPMENT` | `true` selects the Groq backend |
//! | `OPENAI_API_KEY` / `OPENAI_MODEL_NAME` / `OPENAI_BASE_URL` | `OpenAI` backend |
//! | `GROQ_API_KEY` / `GROQ_MODEL_NAME` | Groq backend |
//! | `POKEAPI_BASE_URL`, `HTTP_TIMEOUT_SECONDS`, `CACHE_SIZE` | `PokéAPI` client |
//! | `POKEAGENT_PROMPT_DIR` | prompt template directory |
//! | `POKEAGENT_RESPONSE_FORMAT` | default expert verdict shape |
//! | `POKEAGENT_MAX_TOOL_ITERATIONS` | tool loop limit |

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AgentError;
use crate::pokeapi::PokeApiConfig;

use super::reply::ResponseFormat;

/// `OpenAI` provider name.
pub const PROVIDER_OPENAI: &str = "openai";
/// Groq provider name.
pub const PROVIDER_GROQ: &str = "groq";
/// Groq's OpenAI-compatible endpoint.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default max tokens per model response.
const DEFAULT_MAX_TOKENS: u32 = 2048;
/// Default maximum tool-calling loop iterations.
const DEFAULT_MAX_TOOL_ITERATIONS: usize = 10;

/// Configuration for the agent system.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// LLM provider name (`"openai"` or `"groq"`).
    pub provider: String,
    /// API key for the provider.
    pub api_key: String,
    /// Optional base URL override (for proxies or compatible APIs).
    pub base_url: Option<String>,
    /// Model used by every agent.
    pub model: String,
    /// Maximum tokens per model response.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tool-calling loop iterations before aborting.
    pub max_tool_iterations: usize,
    /// Verdict shape of the default expert.
    pub response_format: ResponseFormat,
    /// Directory containing prompt template files.
    ///
    /// Missing files fall back to compiled-in defaults.
    pub prompt_dir: Option<PathBuf>,
    /// `PokéAPI` client settings.
    pub pokeapi: PokeApiConfig,
}

impl AgentConfig {
    /// Creates a new builder for `AgentConfig`.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key is found, or
    /// [`AgentError::ModelMissing`] if no model name is set for the
    /// selected provider.
    pub fn from_env() -> Result<Self, AgentError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    provider: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    max_tool_iterations: Option<usize>,
    response_format: Option<ResponseFormat>,
    prompt_dir: Option<PathBuf>,
    pokeapi_base_url: Option<String>,
    http_timeout: Option<Duration>,
    cache_size: Option<usize>,
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_timeout(value: &str) -> Option<Duration> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(Duration::from_secs_f64)
}

impl AgentConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(self) -> Self {
        self.from_vars(|key| std::env::var(key).ok())
    }

    /// Populates unset fields from an arbitrary variable lookup.
    #[must_use]
    pub fn from_vars<F>(mut self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.provider.is_none() {
            let local = var("LOCAL_DEVELOPMENT").is_some_and(|v| parse_flag(&v));
            self.provider = Some(if local { PROVIDER_GROQ } else { PROVIDER_OPENAI }.to_string());
        }

        if self.provider.as_deref() == Some(PROVIDER_GROQ) {
            if self.api_key.is_none() {
                self.api_key = var("GROQ_API_KEY");
            }
            if self.model.is_none() {
                self.model = var("GROQ_MODEL_NAME");
            }
        } else {
            if self.api_key.is_none() {
                self.api_key = var("OPENAI_API_KEY");
            }
            if self.model.is_none() {
                self.model = var("OPENAI_MODEL_NAME");
            }
            if self.base_url.is_none() {
                self.base_url = var("OPENAI_BASE_URL");
            }
        }

        if self.pokeapi_base_url.is_none() {
            self.pokeapi_base_url = var("POKEAPI_BASE_URL");
        }
        if self.http_timeout.is_none() {
            self.http_timeout = var("HTTP_TIMEOUT_SECONDS").and_then(|v| parse_timeout(&v));
        }
        if self.cache_size.is_none() {
            self.cache_size = var("CACHE_SIZE").and_then(|v| v.trim().parse().ok());
        }
        if self.prompt_dir.is_none() {
            self.prompt_dir = var("POKEAGENT_PROMPT_DIR").map(PathBuf::from);
        }
        if self.response_format.is_none() {
            self.response_format =
                var("POKEAGENT_RESPONSE_FORMAT").and_then(|v| v.parse().ok());
        }
        if self.max_tool_iterations.is_none() {
            self.max_tool_iterations =
                var("POKEAGENT_MAX_TOOL_ITERATIONS").and_then(|v| v.trim().parse().ok());
        }
        self
    }

    /// Sets the LLM provider name.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model name.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the max tokens per response.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    /// Sets the maximum tool-calling loop iterations.
    #[must_use]
    pub const fn max_tool_iterations(mut self, n: usize) -> Self {
        self.max_tool_iterations = Some(n);
        self
    }

    /// Sets the default expert's verdict shape.
    #[must_use]
    pub const fn response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Sets the prompt template directory.
    #[must_use]
    pub fn prompt_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prompt_dir = Some(dir.into());
        self
    }

    /// Sets the `PokéAPI` base URL.
    #[must_use]
    pub fn pokeapi_base_url(mut self, url: impl Into<String>) -> Self {
        self.pokeapi_base_url = Some(url.into());
        self
    }

    /// Sets the `PokéAPI` request timeout.
    #[must_use]
    pub const fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Sets the per-cache entry limit.
    #[must_use]
    pub const fn cache_size(mut self, n: usize) -> Self {
        self.cache_size = Some(n);
        self
    }

    /// Builds the [`AgentConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key was set, or
    /// [`AgentError::ModelMissing`] if no model was set.
    pub fn build(self) -> Result<AgentConfig, AgentError> {
        let pokeapi = self.pokeapi_config();
        let provider = self.provider.unwrap_or_else(|| PROVIDER_OPENAI.to_string());
        let model = self.model.ok_or_else(|| AgentError::ModelMissing {
            var: if provider == PROVIDER_GROQ {
                "GROQ_MODEL_NAME"
            } else {
                "OPENAI_MODEL_NAME"
            },
            provider: provider.clone(),
        })?;
        let api_key = self.api_key.ok_or(AgentError::ApiKeyMissing)?;

        let base_url = self
            .base_url
            .or_else(|| (provider == PROVIDER_GROQ).then(|| GROQ_BASE_URL.to_string()));

        Ok(AgentConfig {
            provider,
            api_key,
            base_url,
            model,
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: self.temperature.unwrap_or(0.0),
            max_tool_iterations: self
                .max_tool_iterations
                .unwrap_or(DEFAULT_MAX_TOOL_ITERATIONS),
            response_format: self.response_format.unwrap_or_default(),
            prompt_dir: self.prompt_dir,
            pokeapi,
        })
    }

    /// Resolves the `PokéAPI` settings alone.
    ///
    /// Needs no model credentials, so commands that only query the API
    /// can use it without a full [`AgentConfig`].
    #[must_use]
    pub fn pokeapi_config(&self) -> PokeApiConfig {
        let defaults = PokeApiConfig::default();
        PokeApiConfig {
            base_url: self
                .pokeapi_base_url
                .clone()
                .unwrap_or(defaults.base_url),
            timeout: self.http_timeout.unwrap_or(defaults.timeout),
            cache_size: self.cache_size.unwrap_or(defaults.cache_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(pairs: &[(&str, &str)]) -> AgentConfigBuilder {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AgentConfig::builder().from_vars(move |key| map.get(key).cloned())
    }

    #[test]
    fn test_builder_defaults() {
        let config = AgentConfig::builder()
            .api_key("test-key")
            .model("gpt-4o-mini")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.provider, "openai");
        assert_eq!(config.base_url, None);
        assert_eq!(config.max_tool_iterations, DEFAULT_MAX_TOOL_ITERATIONS);
        assert_eq!(config.response_format, ResponseFormat::Detailed);
        assert_eq!(config.pokeapi.base_url, "https://pokeapi.co/api/v2");
        assert_eq!(config.pokeapi.timeout, Duration::from_secs(10));
        assert_eq!(config.pokeapi.cache_size, 100);
    }

    #[test]
    fn test_builder_missing_api_key() {
        let result = AgentConfig::builder().model("m").build();
        assert!(matches!(result, Err(AgentError::ApiKeyMissing)));
    }

    #[test]
    fn test_openai_env_selection() {
        let config = from_map(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL_NAME", "gpt-4o-mini"),
            ("GROQ_API_KEY", "gsk-ignored"),
        ])
        .build()
        .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(config.provider, PROVIDER_OPENAI);
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[test]
    fn test_local_development_selects_groq() {
        let config = from_map(&[
            ("LOCAL_DEVELOPMENT", "True"),
            ("GROQ_API_KEY", "gsk-test"),
            ("GROQ_MODEL_NAME", "llama-3.3-70b-versatile"),
            ("OPENAI_API_KEY", "sk-ignored"),
        ])
        .build()
        .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(config.provider, PROVIDER_GROQ);
        assert_eq!(config.api_key, "gsk-test");
        assert_eq!(config.base_url.as_deref(), Some(GROQ_BASE_URL));
    }

    #[test]
    fn test_missing_model_names_variable() {
        let result = from_map(&[("LOCAL_DEVELOPMENT", "1"), ("GROQ_API_KEY", "k")]).build();
        assert!(matches!(
            result,
            Err(AgentError::ModelMissing { var: "GROQ_MODEL_NAME", .. })
        ));

        let result = from_map(&[("OPENAI_API_KEY", "k")]).build();
        assert!(matches!(
            result,
            Err(AgentError::ModelMissing { var: "OPENAI_MODEL_NAME", .. })
        ));
    }

    #[test]
    fn test_pokeapi_and_agent_env_overrides() {
        let config = from_map(&[
            ("OPENAI_API_KEY", "k"),
            ("OPENAI_MODEL_NAME", "m"),
            ("POKEAPI_BASE_URL", "http://localhost:9000"),
            ("HTTP_TIMEOUT_SECONDS", "2.5"),
            ("CACHE_SIZE", "7"),
            ("POKEAGENT_RESPONSE_FORMAT", "simplified"),
            ("POKEAGENT_MAX_TOOL_ITERATIONS", "3"),
            ("POKEAGENT_PROMPT_DIR", "/tmp/prompts"),
        ])
        .build()
        .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(config.pokeapi.base_url, "http://localhost:9000");
        assert_eq!(config.pokeapi.timeout, Duration::from_millis(2500));
        assert_eq!(config.pokeapi.cache_size, 7);
        assert_eq!(config.response_format, ResponseFormat::Simplified);
        assert_eq!(config.max_tool_iterations, 3);
        assert_eq!(config.prompt_dir, Some(PathBuf::from("/tmp/prompts")));
    }

    #[test]
    fn test_explicit_values_beat_env() {
        let config = AgentConfig::builder()
            .model("explicit")
            .cache_size(1)
            .from_vars(|key| match key {
                "OPENAI_API_KEY" => Some("k".to_string()),
                "OPENAI_MODEL_NAME" => Some("env".to_string()),
                "CACHE_SIZE" => Some("50".to_string()),
                _ => None,
            })
            .build()
            .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(config.model, "explicit");
        assert_eq!(config.pokeapi.cache_size, 1);
    }

    #[test]
    fn test_invalid_timeout_ignored() {
        assert_eq!(parse_timeout("-1"), None);
        assert_eq!(parse_timeout("abc"), None);
        assert_eq!(parse_timeout("10"), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_pokeapi_config_without_credentials() {
        let pokeapi = from_map(&[("CACHE_SIZE", "5"), ("HTTP_TIMEOUT_SECONDS", "2.5")])
            .pokeapi_config();
        assert_eq!(pokeapi.cache_size, 5);
        assert_eq!(pokeapi.timeout, Duration::from_millis(2500));
        assert_eq!(pokeapi.base_url, "https://pokeapi.co/api/v2");
    }
}
