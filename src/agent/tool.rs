//! Tool types for model function-calling.
//!
//! Tools expose `PokéAPI` lookups to agents. Each agent binds at most one
//! lookup tool: the plain variant returns stats only, the typed variant
//! adds damage relations per type.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Name of the plain Pokémon lookup tool.
pub const GET_POKEMON: &str = "get_pokemon";
/// Name of the Pokémon lookup tool that includes type damage relations.
pub const GET_POKEMON_WITH_TYPES: &str = "get_pokemon_with_types";

/// A tool definition sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (must match the executor's dispatch table).
    pub name: String,
    /// What the tool does.
    pub description: String,
    /// JSON Schema object describing the tool's parameters.
    pub parameters: serde_json::Value,
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this call (assigned by the provider).
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// JSON-encoded arguments for the tool.
    pub arguments: String,
}

/// The result of executing a tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this result corresponds to.
    pub tool_call_id: String,
    /// JSON on success, the error message on failure.
    pub content: String,
    /// Whether this result represents an error.
    pub is_error: bool,
}

/// A set of tool definitions bound to one agent.
#[derive(Debug, Clone, Default)]
pub struct ToolSet {
    definitions: Vec<ToolDefinition>,
}

impl ToolSet {
    /// Returns the tool definitions in this set.
    #[must_use]
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Consumes the set, returning its definitions.
    #[must_use]
    pub fn into_definitions(self) -> Vec<ToolDefinition> {
        self.definitions
    }

    /// Returns `true` if this set contains no tools.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns the number of tools in this set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Plain lookup: name, stats, abilities, types.
    #[must_use]
    pub fn pokemon_lookup() -> Self {
        Self {
            definitions: vec![def_get_pokemon()],
        }
    }

    /// Lookup with damage relations for every type.
    #[must_use]
    pub fn pokemon_lookup_with_types() -> Self {
        Self {
            definitions: vec![def_get_pokemon_with_types()],
        }
    }

    /// Empty tool set (no tools available).
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

fn name_parameter() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "name": {
                "type": "string",
                "description": "Pokémon name, lowercase, exactly as written by the user."
            }
        },
        "required": ["name"],
        "additionalProperties": false
    })
}

fn def_get_pokemon() -> ToolDefinition {
    ToolDefinition {
        name: GET_POKEMON.to_string(),
        description: "Fetch essential Pokémon data from PokéAPI: id, name, height, weight, \
                      abilities, base stats and types. Returns an error message if the \
                      Pokémon does not exist."
            .to_string(),
        parameters: name_parameter(),
    }
}

fn def_get_pokemon_with_types() -> ToolDefinition {
    ToolDefinition {
        name: GET_POKEMON_WITH_TYPES.to_string(),
        description: "Fetch essential Pokémon data from PokéAPI including type damage \
                      relations. Returns an error message if the Pokémon does not exist."
            .to_string(),
        parameters: name_parameter(),
    }
}
