//! Caching `PokéAPI` client.
//!
//! Fronts the remote API with two bounded FIFO caches: one for Pokémon
//! records (keyed by lowercased name and whether type data was requested)
//! and one for type records. Only successful fetches are cached.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::cache::{DEFAULT_CACHE_SIZE, FifoCache};
use super::model::{PokemonRecord, RawPokemon, RawType, TypeRecord};
use super::transport::{HttpTransport, PokeApiTransport, TransportError};
use crate::error::FetchError;

/// Default `PokéAPI` base URL.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection and cache settings for [`PokeApiClient`].
#[derive(Debug, Clone)]
pub struct PokeApiConfig {
    /// API base URL, without trailing slash.
    pub base_url: String,
    /// Timeout applied to every outbound request.
    pub timeout: Duration,
    /// Maximum entries per cache.
    pub cache_size: usize,
}

impl Default for PokeApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_size: DEFAULT_CACHE_SIZE,
        }
    }
}

/// Cache key for Pokémon records: lowercased name plus the type-data flag.
pub type PokemonKey = (String, bool);

/// Caching client for the `PokéAPI`.
///
/// Safe to share across tasks behind an [`Arc`]. Concurrent misses on the
/// same key each hit the network; the last insert wins.
pub struct PokeApiClient {
    transport: Arc<dyn PokeApiTransport>,
    pokemon_cache: FifoCache<PokemonKey, PokemonRecord>,
    type_cache: FifoCache<String, TypeRecord>,
}

impl PokeApiClient {
    /// Creates a client with an HTTP transport built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the HTTP client cannot be built.
    pub fn new(config: &PokeApiConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(&config.base_url, config.timeout)?;
        Ok(Self::with_transport(Arc::new(transport), config.cache_size))
    }

    /// Creates a client over an arbitrary transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn PokeApiTransport>, cache_size: usize) -> Self {
        Self {
            transport,
            pokemon_cache: FifoCache::new(cache_size),
            type_cache: FifoCache::new(cache_size),
        }
    }

    /// Fetches essential data for a Pokémon.
    ///
    /// With `with_types`, every distinct type is enriched with its damage
    /// relations. A type that fails to load, or whose payload carries no
    /// relations, is left out of `type_details` without failing the fetch.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::PokemonNotFound`] if the lookup does not
    /// resolve for any reason (status, transport, timeout, bad payload).
    pub async fn get_pokemon(
        &self,
        name: &str,
        with_types: bool,
    ) -> Result<PokemonRecord, FetchError> {
        let normalized = name.trim().to_lowercase();
        let key = (normalized.clone(), with_types);

        if let Some(cached) = self.pokemon_cache.get(&key) {
            debug!(pokemon = %normalized, with_types, "pokemon cache hit");
            return Ok(cached);
        }

        let not_found = |reason: String| FetchError::PokemonNotFound {
            name: name.to_string(),
            reason,
        };

        if let Some(reason) = invalid_name(&normalized) {
            return Err(not_found(reason.to_string()));
        }

        let payload = self
            .transport
            .get_json("pokemon", &normalized)
            .await
            .map_err(|e| not_found(e.to_string()))?;
        let raw: RawPokemon =
            serde_json::from_value(payload).map_err(|e| not_found(e.to_string()))?;
        let mut record = PokemonRecord::from(raw);

        if with_types {
            self.attach_type_details(&mut record).await;
        }

        if let Some((evicted, evicted_with_types)) = self.pokemon_cache.insert(key, record.clone())
        {
            debug!(
                evicted = %evicted,
                evicted_with_types,
                "pokemon cache full, evicted oldest entry"
            );
        }
        Ok(record)
    }

    /// Fetches a type and its damage relations.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::TypeNotFound`] if the lookup does not resolve.
    pub async fn get_type(&self, name: &str) -> Result<TypeRecord, FetchError> {
        let normalized = name.trim().to_lowercase();

        if let Some(cached) = self.type_cache.get(&normalized) {
            debug!(type_name = %normalized, "type cache hit");
            return Ok(cached);
        }

        let not_found = |reason: String| FetchError::TypeNotFound {
            name: name.to_string(),
            reason,
        };

        if let Some(reason) = invalid_name(&normalized) {
            return Err(not_found(reason.to_string()));
        }

        let payload = self
            .transport
            .get_json("type", &normalized)
            .await
            .map_err(|e| not_found(e.to_string()))?;
        let raw: RawType = serde_json::from_value(payload).map_err(|e| not_found(e.to_string()))?;
        let record = TypeRecord::from(raw);

        self.type_cache.insert(normalized, record.clone());
        Ok(record)
    }

    /// Returns `true` if the Pokémon resolves. Never fails.
    pub async fn pokemon_exists(&self, name: &str) -> bool {
        self.get_pokemon(name, false).await.is_ok()
    }

    /// Releases the HTTP connection pool.
    ///
    /// Idempotent: calling it on a closed client is a no-op. Fetches made
    /// after closing fail with the not-found kind; cached entries are still
    /// served.
    pub fn close(&self) {
        if self.transport.close() {
            info!("pokeapi client closed");
        } else {
            debug!("pokeapi client already closed");
        }
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }

    /// Cache of Pokémon records.
    #[must_use]
    pub const fn pokemon_cache(&self) -> &FifoCache<PokemonKey, PokemonRecord> {
        &self.pokemon_cache
    }

    /// Cache of type records.
    #[must_use]
    pub const fn type_cache(&self) -> &FifoCache<String, TypeRecord> {
        &self.type_cache
    }

    async fn attach_type_details(&self, record: &mut PokemonRecord) {
        let mut seen: Vec<&str> = Vec::with_capacity(record.types.len());
        for type_name in &record.types {
            if seen.contains(&type_name.as_str()) {
                continue;
            }
            seen.push(type_name);

            match self.get_type(type_name).await {
                Ok(TypeRecord {
                    damage_relations: Some(relations),
                    ..
                }) => {
                    record.type_details.insert(type_name.clone(), relations);
                }
                Ok(_) => {
                    debug!(type_name = %type_name, "type payload has no damage relations");
                }
                Err(e) => {
                    warn!(type_name = %type_name, error = %e, "skipping type details");
                }
            }
        }
    }
}

/// Names that can never address a single resource.
fn invalid_name(normalized: &str) -> Option<&'static str> {
    match normalized {
        "" => Some("empty name"),
        "." | ".." => Some("not a resource name"),
        _ => None,
    }
}

impl std::fmt::Debug for PokeApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PokeApiClient")
            .field("pokemon_cache", &self.pokemon_cache.len())
            .field("type_cache", &self.type_cache.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}
