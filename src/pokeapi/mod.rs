//! Caching client for the public `PokéAPI`.
//!
//! The client exposes two lookups, Pokémon and types, each fronted by a
//! bounded FIFO cache. Every failure surfaces as the not-found kind for the
//! resource requested; see [`crate::error::FetchError`].

mod cache;
mod client;
mod model;
mod transport;

pub use cache::{DEFAULT_CACHE_SIZE, FifoCache};
pub use client::{DEFAULT_BASE_URL, PokeApiClient, PokeApiConfig, PokemonKey};
pub use model::{DamageRelations, PokemonRecord, TypeRecord};
pub use transport::{HttpTransport, PokeApiTransport, TransportError};
