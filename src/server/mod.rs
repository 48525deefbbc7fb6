//! HTTP API.
//!
//! # Routes
//!
//! ```text
//! GET  /                              → welcome message
//! POST /chat     {question}           → {answer} | PokemonData | BattleVerdict
//! GET  /battle?pokemon1=..&pokemon2=  → BattleVerdict
//! ```
//!
//! Errors render as HTTP 500 with a `{detail}` body.

pub mod handlers;
pub mod params;
pub mod state;
pub mod transport;

pub use handlers::{ApiError, router};
pub use params::{BattleParams, ChatBody, ErrorBody, Welcome};
pub use state::AppState;
pub use transport::{serve, serve_until};
