//! # pokeagent
//!
//! A Pokémon multi-agent assistant. A supervisor model classifies each
//! question and hands it to one of three responders:
//!
//! - **researcher**: looks up a single Pokémon and returns its base stats;
//! - **pokemon_expert**: analyses a battle and returns a verdict;
//! - **direct_response**: answers anything else conversationally.
//!
//! Pokémon data comes from the public `PokéAPI` through a caching client.
//!
//! ## Example
//!
//! ```no_run
//! use pokeagent::agent::AgentConfig;
//! use pokeagent::server::AppState;
//!
//! # async fn run() -> pokeagent::Result<()> {
//! let state = AppState::from_config(AgentConfig::from_env()?)?;
//! let reply = state.orchestrator.invoke("What are Pikachu's stats?").await?;
//! # let _ = reply;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cli;
pub mod error;
pub mod pokeapi;
pub mod server;

#[cfg(test)]
mod testing;

pub use error::{AgentError, Error, FetchError, Result};
