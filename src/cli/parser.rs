//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default bind host for `serve`.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default bind port for `serve`.
pub const DEFAULT_PORT: u16 = 8000;

/// Pokémon multi-agent assistant.
///
/// Routes questions to a researcher, a battle expert, or a direct
/// responder, backed by an OpenAI-compatible model and the `PokéAPI`.
#[derive(Parser, Debug)]
#[command(name = "pokeagent-rs")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory containing prompt template overrides.
    #[arg(long, global = true, env = "POKEAGENT_PROMPT_DIR")]
    pub prompt_dir: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API.
    #[command(after_help = r#"Examples:
  pokeagent-rs serve                           # Listen on 127.0.0.1:8000
  pokeagent-rs serve --host 0.0.0.0 --port 9000
  OPENAI_API_KEY=sk-... OPENAI_MODEL_NAME=gpt-4o-mini pokeagent-rs serve
"#)]
    Serve {
        /// Host to bind to.
        #[arg(long, env = "POKEAGENT_HOST", default_value = DEFAULT_HOST)]
        host: String,

        /// Port to bind to.
        #[arg(long, env = "POKEAGENT_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },

    /// Answer one question and print the reply as JSON.
    #[command(after_help = r#"Examples:
  pokeagent-rs ask "What are the base stats of Pikachu?"
  pokeagent-rs ask "Who would win, Charizard or Blastoise?"
"#)]
    Ask {
        /// The question to answer.
        question: String,
    },

    /// Analyse a battle between two Pokémon.
    Battle {
        /// First contender.
        pokemon1: String,

        /// Second contender.
        pokemon2: String,
    },

    /// Fetch a Pokémon record from the `PokéAPI`.
    Pokemon {
        /// Pokémon name.
        name: String,

        /// Include damage relations for each type.
        #[arg(long)]
        types: bool,
    },

    /// Write the default prompt templates to a directory.
    ///
    /// Existing files are left untouched.
    InitPrompts {
        /// Target directory (defaults to `~/.config/pokeagent-rs/prompts`).
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}
