//! Tool executor that dispatches tool calls to the `PokéAPI` client.
//!
//! Every failed lookup is recorded so callers can enforce verification
//! rules in code rather than trusting the model to follow them.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Deserialize;
use tracing::debug;

use crate::error::AgentError;
use crate::pokeapi::PokeApiClient;

use super::tool::{GET_POKEMON, GET_POKEMON_WITH_TYPES, ToolCall, ToolResult};

/// Maximum raw byte length of tool argument JSON from the model.
const MAX_TOOL_ARGS_LEN: usize = 10_000;
/// Maximum length of a Pokémon name argument.
const MAX_NAME_LEN: usize = 100;

/// Executes tool calls against a shared [`PokeApiClient`].
///
/// One executor is created per agent run; it is cheap and holds the
/// failed-lookup log for that run only.
#[derive(Debug)]
pub struct ToolExecutor {
    client: Arc<PokeApiClient>,
    failed_lookups: Mutex<Vec<String>>,
}

impl ToolExecutor {
    /// Creates an executor backed by `client`.
    #[must_use]
    pub const fn new(client: Arc<PokeApiClient>) -> Self {
        Self {
            client,
            failed_lookups: Mutex::new(Vec::new()),
        }
    }

    /// Dispatches a tool call.
    ///
    /// Validates raw argument size before dispatch. Errors become
    /// `is_error` results fed back to the model, never a failed run.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        if call.arguments.len() > MAX_TOOL_ARGS_LEN {
            return ToolResult {
                tool_call_id: call.id.clone(),
                content: format!(
                    "tool arguments too large ({} bytes, max {MAX_TOOL_ARGS_LEN})",
                    call.arguments.len()
                ),
                is_error: true,
            };
        }

        let result = match call.name.as_str() {
            GET_POKEMON => self.tool_get_pokemon(&call.name, &call.arguments, false).await,
            GET_POKEMON_WITH_TYPES => {
                self.tool_get_pokemon(&call.name, &call.arguments, true)
                    .await
            }
            other => Err(AgentError::ToolExecution {
                name: other.to_string(),
                message: "unknown tool".to_string(),
            }),
        };

        match result {
            Ok(content) => ToolResult {
                tool_call_id: call.id.clone(),
                content,
                is_error: false,
            },
            Err(e) => ToolResult {
                tool_call_id: call.id.clone(),
                content: e.to_string(),
                is_error: true,
            },
        }
    }

    /// Names whose lookup failed during this run, in call order.
    #[must_use]
    pub fn failed_lookups(&self) -> Vec<String> {
        self.failed_lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns `true` if any lookup failed during this run.
    #[must_use]
    pub fn has_failed_lookup(&self) -> bool {
        !self
            .failed_lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    async fn tool_get_pokemon(
        &self,
        tool: &str,
        args: &str,
        with_types: bool,
    ) -> Result<String, AgentError> {
        #[derive(Deserialize)]
        struct Args {
            name: String,
        }
        let args: Args = serde_json::from_str(args).map_err(|e| AgentError::ToolExecution {
            name: tool.to_string(),
            message: format!("invalid arguments: {e}"),
        })?;

        if args.name.len() > MAX_NAME_LEN {
            return Err(AgentError::ToolExecution {
                name: tool.to_string(),
                message: format!("name too long (max {MAX_NAME_LEN} bytes)"),
            });
        }

        match self.client.get_pokemon(&args.name, with_types).await {
            Ok(record) => serde_json::to_string(&record).map_err(|e| AgentError::ToolExecution {
                name: tool.to_string(),
                message: format!("serialization failed: {e}"),
            }),
            Err(e) => {
                debug!(pokemon = %args.name, reason = e.reason(), "tool lookup failed");
                self.failed_lookups
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(args.name);
                Err(e.into())
            }
        }
    }
}
