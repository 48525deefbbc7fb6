//! System prompts and template builders for agents.
//!
//! Expert prompts are templates: `{tool}`, `{verdict_field}` and
//! `{verdict_value}` are filled in when an expert is built, so one template
//! serves every tool variant and verdict shape.

use std::path::{Path, PathBuf};

use super::reply::{BATTLE_IMPOSSIBLE, BATTLE_IMPOSSIBLE_REASONING, ResponseFormat};

/// Classification instructions shared by both routing approaches.
pub const SUPERVISOR_SYSTEM_PROMPT: &str = r#"You are a supervisor tasked with classifying user questions.

Given the user's message, classify it into ONE of these categories:

1. researcher: For questions about Pokémon facts or data
   Example: "What are the base stats of Charizard?"

2. pokemon_expert: For questions about Pokémon analysis or battle scenarios
   Example: "Who would win in a battle, Pikachu or Bulbasaur?"

3. direct_response: For ANY basic questions not specifically about Pokémon
   Example: "What's your name?", "Hello", "My name is Vlad", etc.
"#;

/// Appended to the supervisor prompt for the single-word approach.
pub const RAW_CALL_SUFFIX: &str = r#"
IMPORTANT: Respond with ONLY ONE WORD - either "researcher", "pokemon_expert", or "direct_response".
Do not include any other text, explanations, or formatting.
"#;

/// Appended to the supervisor prompt for the JSON approach.
pub const STRUCTURED_CALL_SUFFIX: &str = r#"
You must respond with a valid JSON object containing the key "next" with one of these three values.

For example:
{"next": "direct_response"}

Always use this exact JSON format - nothing else. No explanations, no additional text.
"#;

/// System prompt for the conversational responder.
pub const DIRECT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Provide a clear, direct answer to the user's question.";

/// System prompt for answers produced by the router itself.
pub const DIRECT_ANSWER_PROMPT: &str = "You are a helpful assistant.
Provide a clear, concise response to the user's question or message.
Keep your response friendly but brief.";

/// System prompt for the researcher.
pub const RESEARCHER_SYSTEM_PROMPT: &str = r#"You are a researcher. When asked about Pokémon, use the provided tool to fetch data from the PokéAPI. Provide a clear, comprehensive answer that directly addresses the user's question.

IMPORTANT: You must ONLY return real Pokémon data from the PokéAPI tool.

If the tool returns an error message or any indication that the Pokémon was not found, you MUST ALWAYS return EXACTLY this structure:
{
  "name": "NOT_FOUND",
  "base_stats": {
    "hp": 0,
    "attack": 0,
    "defense": 0,
    "special_attack": 0,
    "special_defense": 0,
    "speed": 0
  }
}

DO NOT correct any misspellings, look for only the exact Pokémon name provided.
DO NOT make up or hallucinate stats for Pokémon that don't exist.
Always convert names to lowercase before using the tool."#;

/// Template for the tool-using battle expert.
pub const EXPERT_SYSTEM_PROMPT: &str = r#"You are a Pokémon expert analyzing battle scenarios.

CRITICAL INSTRUCTION: In ANY battle query, you MUST follow this EXACT procedure:

STEP 1: Extract the exact Pokémon names from the query.
STEP 2: Convert each Pokémon name to lowercase before using the {tool} tool.
STEP 3: Use the {tool} tool to check EACH lowercase Pokémon name.
STEP 4: BEFORE ANY ANALYSIS, explicitly verify if each Pokémon exists.
STEP 5: If ANY Pokémon returns an error or "not found" message from the tool, you MUST STOP and return ONLY this JSON:
{
    "{verdict_field}": "{impossible}",
    "reasoning": "{impossible_reasoning}"
}

STEP 6: If ALL Pokémon exist, proceed with the analysis and return the winner and reasoning in this format:
{
    "{verdict_field}": "{verdict_value}",
    "reasoning": "[Detailed reasoning explaining why this Pokémon wins, mentioning both competitors]"
}

In the reasoning section, you MUST include:
- Comparison of base stats (HP, Attack, Defense, Special Attack, Special Defense, Speed)
- Type advantages and disadvantages between the two Pokémon
- Effectiveness of moves based on type matchups (e.g., super effective, not very effective)
- Any notable strengths or weaknesses that impact the battle outcome
- A clear explanation of why the winning Pokémon has the advantage

Base stats are more valuable in determining the winner, but type matchups and move effectiveness are also crucial.

DO NOT proceed to step 6 if there is at least one non-existent Pokémon or any Pokémon fails the verification.
DO NOT attempt to correct misspellings.
DO always convert names to lowercase before using the tool.

You must FIRST check if ALL Pokémon exist using the tool and ONLY then proceed with analysis.

Make sure to follow these instructions precisely."#;

/// Template for the tool-less expert that receives both records inline.
pub const BATTLE_EXPERT_PROMPT: &str = r#"You are a Pokémon expert analyzing battle scenarios.

Proceed with the analysis and return the winner and reasoning in this format:
{
    "{verdict_field}": "{verdict_value}",
    "reasoning": "[Detailed reasoning explaining why this Pokémon wins, mentioning both competitors]"
}

In the reasoning section, you MUST include:
- Comparison of base stats (HP, Attack, Defense, Special Attack, Special Defense, Speed)
- Type advantages and disadvantages between the two Pokémon
- Effectiveness of moves based on type matchups (e.g., super effective, not very effective)
- Any notable strengths or weaknesses that impact the battle outcome
- A clear explanation of why the winning Pokémon has the advantage

Base stats are more valuable in determining the winner, but type matchups and move effectiveness are also crucial.

Make sure to follow these instructions precisely."#;

/// Default prompt directory under user config.
const DEFAULT_PROMPT_DIR: &str = ".config/pokeagent-rs/prompts";

const SUPERVISOR_FILENAME: &str = "supervisor.md";
const RAW_SUFFIX_FILENAME: &str = "raw_suffix.md";
const STRUCTURED_SUFFIX_FILENAME: &str = "structured_suffix.md";
const DIRECT_FILENAME: &str = "direct.md";
const DIRECT_ANSWER_FILENAME: &str = "direct_answer.md";
const RESEARCHER_FILENAME: &str = "researcher.md";
const EXPERT_FILENAME: &str = "expert.md";
const BATTLE_FILENAME: &str = "battle.md";

const TEMPLATES: [(&str, &str); 8] = [
    (SUPERVISOR_FILENAME, SUPERVISOR_SYSTEM_PROMPT),
    (RAW_SUFFIX_FILENAME, RAW_CALL_SUFFIX),
    (STRUCTURED_SUFFIX_FILENAME, STRUCTURED_CALL_SUFFIX),
    (DIRECT_FILENAME, DIRECT_SYSTEM_PROMPT),
    (DIRECT_ANSWER_FILENAME, DIRECT_ANSWER_PROMPT),
    (RESEARCHER_FILENAME, RESEARCHER_SYSTEM_PROMPT),
    (EXPERT_FILENAME, EXPERT_SYSTEM_PROMPT),
    (BATTLE_FILENAME, BATTLE_EXPERT_PROMPT),
];

/// A set of system prompts for all agents.
///
/// Loaded from external template files when available, falling back to
/// compiled-in defaults. Use [`PromptSet::load`] to resolve the prompt
/// directory from CLI flags, environment variables, or the default path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    /// Supervisor classification instructions.
    pub supervisor: String,
    /// Suffix for the single-word routing approach.
    pub raw_suffix: String,
    /// Suffix for the JSON routing approach.
    pub structured_suffix: String,
    /// Conversational responder prompt.
    pub direct: String,
    /// Prompt for answers produced by the router.
    pub direct_answer: String,
    /// Researcher prompt.
    pub researcher: String,
    /// Tool-using expert template.
    pub expert: String,
    /// Tool-less battle expert template.
    pub battle: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl PromptSet {
    /// Loads prompts from the given directory, falling back to compiled-in defaults.
    ///
    /// Resolution order for `prompt_dir`:
    /// 1. Explicit `prompt_dir` argument
    /// 2. `POKEAGENT_PROMPT_DIR` environment variable
    /// 3. `~/.config/pokeagent-rs/prompts/`
    ///
    /// Each file is loaded independently; a missing file uses its default.
    #[must_use]
    pub fn load(prompt_dir: Option<&Path>) -> Self {
        let resolved_dir = prompt_dir
            .map(PathBuf::from)
            .or_else(|| std::env::var("POKEAGENT_PROMPT_DIR").ok().map(PathBuf::from))
            .or_else(Self::default_dir);

        let load_file = |filename: &str, default: &str| -> String {
            resolved_dir
                .as_ref()
                .map(|dir| dir.join(filename))
                .and_then(|path| std::fs::read_to_string(&path).ok())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            supervisor: load_file(SUPERVISOR_FILENAME, SUPERVISOR_SYSTEM_PROMPT),
            raw_suffix: load_file(RAW_SUFFIX_FILENAME, RAW_CALL_SUFFIX),
            structured_suffix: load_file(STRUCTURED_SUFFIX_FILENAME, STRUCTURED_CALL_SUFFIX),
            direct: load_file(DIRECT_FILENAME, DIRECT_SYSTEM_PROMPT),
            direct_answer: load_file(DIRECT_ANSWER_FILENAME, DIRECT_ANSWER_PROMPT),
            researcher: load_file(RESEARCHER_FILENAME, RESEARCHER_SYSTEM_PROMPT),
            expert: load_file(EXPERT_FILENAME, EXPERT_SYSTEM_PROMPT),
            battle: load_file(BATTLE_FILENAME, BATTLE_EXPERT_PROMPT),
        }
    }

    /// Returns compiled-in defaults without checking the filesystem.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            supervisor: SUPERVISOR_SYSTEM_PROMPT.to_string(),
            raw_suffix: RAW_CALL_SUFFIX.to_string(),
            structured_suffix: STRUCTURED_CALL_SUFFIX.to_string(),
            direct: DIRECT_SYSTEM_PROMPT.to_string(),
            direct_answer: DIRECT_ANSWER_PROMPT.to_string(),
            researcher: RESEARCHER_SYSTEM_PROMPT.to_string(),
            expert: EXPERT_SYSTEM_PROMPT.to_string(),
            battle: BATTLE_EXPERT_PROMPT.to_string(),
        }
    }

    /// Supervisor prompt for the single-word approach.
    #[must_use]
    pub fn supervisor_raw(&self) -> String {
        format!("{}{}", self.supervisor, self.raw_suffix)
    }

    /// Supervisor prompt for the JSON approach.
    #[must_use]
    pub fn supervisor_structured(&self) -> String {
        format!("{}{}", self.supervisor, self.structured_suffix)
    }

    /// Writes the compiled-in default prompts to the given directory.
    ///
    /// Creates the directory if it does not exist. Existing files are
    /// **not** overwritten.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if directory creation or file writing fails.
    pub fn write_defaults(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::new();
        for (filename, content) in &TEMPLATES {
            let path = dir.join(filename);
            if !path.exists() {
                std::fs::write(&path, content)?;
                written.push(path);
            }
        }

        Ok(written)
    }

    /// Returns the default prompt directory under the user's home.
    ///
    /// Returns `None` if the home directory cannot be determined.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR))
    }
}

/// Fills an expert template for a verdict shape and lookup tool.
#[must_use]
pub fn render_expert_prompt(template: &str, format: ResponseFormat, tool: &str) -> String {
    let (field, value) = match format {
        ResponseFormat::Detailed => ("answer", "[Winning Pokémon Name and a short explanation]"),
        ResponseFormat::Simplified => ("winner", "[Winning Pokémon Name]"),
    };
    template
        .replace("{tool}", tool)
        .replace("{verdict_field}", field)
        .replace("{verdict_value}", value)
        .replace("{impossible}", BATTLE_IMPOSSIBLE)
        .replace("{impossible_reasoning}", BATTLE_IMPOSSIBLE_REASONING)
}

/// Builds the user message comparing two fetched Pokémon.
#[must_use]
pub fn build_battle_query(name1: &str, data1: &str, name2: &str, data2: &str) -> String {
    format!("Who would win in a battle, {name1}: {data1}\nor {name2}: {data2}?")
}
