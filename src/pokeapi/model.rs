//! `PokéAPI` records and payload normalisation.
//!
//! Only the fields the agents consume are kept. Raw payload types mirror
//! the API's JSON and are converted into the public records on fetch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Essential Pokémon data normalised from `GET /pokemon/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonRecord {
    /// National dex number.
    pub id: u32,
    /// Canonical (lowercase) name.
    pub name: String,
    /// Base experience yield; absent for some forms.
    pub base_experience: Option<u32>,
    /// Height in decimetres.
    pub height: u32,
    /// Weight in hectograms.
    pub weight: u32,
    /// Ability names, deduplicated, in payload order.
    pub abilities: Vec<String>,
    /// Base stats keyed by stat name, with hyphens folded to underscores
    /// (`special-attack` becomes `special_attack`).
    pub stats: BTreeMap<String, i64>,
    /// Type names in slot order.
    pub types: Vec<String>,
    /// Damage relations per type, present only when requested.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub type_details: BTreeMap<String, DamageRelations>,
    /// Always `true` for a fetched record.
    #[serde(default = "default_exists")]
    pub exists: bool,
}

const fn default_exists() -> bool {
    true
}

/// Type data normalised from `GET /type/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRecord {
    /// Type id.
    pub id: u32,
    /// Type name.
    pub name: String,
    /// Damage relations; `None` when the payload lacked them.
    pub damage_relations: Option<DamageRelations>,
}

/// How a type deals and receives damage, as lists of type names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRelations {
    /// Types that deal double damage to this type.
    pub double_damage_from: Vec<String>,
    /// Types this type deals double damage to.
    pub double_damage_to: Vec<String>,
    /// Types that deal half damage to this type.
    pub half_damage_from: Vec<String>,
    /// Types this type deals half damage to.
    pub half_damage_to: Vec<String>,
    /// Types that deal no damage to this type.
    pub no_damage_from: Vec<String>,
    /// Types this type deals no damage to.
    pub no_damage_to: Vec<String>,
}

// ---------------------------------------------------------------------------
// Raw payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AbilitySlot {
    ability: NamedResource,
}

#[derive(Debug, Deserialize)]
struct StatSlot {
    base_stat: i64,
    stat: NamedResource,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    #[serde(rename = "type")]
    kind: NamedResource,
}

/// Raw `/pokemon/{name}` payload (subset).
#[derive(Debug, Deserialize)]
pub(crate) struct RawPokemon {
    #[serde(default)]
    id: u32,
    name: String,
    #[serde(default)]
    base_experience: Option<u32>,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    weight: u32,
    #[serde(default)]
    abilities: Vec<AbilitySlot>,
    #[serde(default)]
    stats: Vec<StatSlot>,
    #[serde(default)]
    types: Vec<TypeSlot>,
}

impl From<RawPokemon> for PokemonRecord {
    fn from(raw: RawPokemon) -> Self {
        let mut abilities: Vec<String> = Vec::with_capacity(raw.abilities.len());
        for slot in raw.abilities {
            if !abilities.contains(&slot.ability.name) {
                abilities.push(slot.ability.name);
            }
        }

        Self {
            id: raw.id,
            name: raw.name,
            base_experience: raw.base_experience,
            height: raw.height,
            weight: raw.weight,
            abilities,
            stats: raw
                .stats
                .into_iter()
                .map(|s| (s.stat.name.replace('-', "_"), s.base_stat))
                .collect(),
            types: raw.types.into_iter().map(|t| t.kind.name).collect(),
            type_details: BTreeMap::new(),
            exists: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawDamageRelations {
    #[serde(default)]
    double_damage_from: Vec<NamedResource>,
    #[serde(default)]
    double_damage_to: Vec<NamedResource>,
    #[serde(default)]
    half_damage_from: Vec<NamedResource>,
    #[serde(default)]
    half_damage_to: Vec<NamedResource>,
    #[serde(default)]
    no_damage_from: Vec<NamedResource>,
    #[serde(default)]
    no_damage_to: Vec<NamedResource>,
}

fn names(resources: Vec<NamedResource>) -> Vec<String> {
    resources.into_iter().map(|r| r.name).collect()
}

impl From<RawDamageRelations> for DamageRelations {
    fn from(raw: RawDamageRelations) -> Self {
        Self {
            double_damage_from: names(raw.double_damage_from),
            double_damage_to: names(raw.double_damage_to),
            half_damage_from: names(raw.half_damage_from),
            half_damage_to: names(raw.half_damage_to),
            no_damage_from: names(raw.no_damage_from),
            no_damage_to: names(raw.no_damage_to),
        }
    }
}

/// Raw `/type/{name}` payload (subset).
#[derive(Debug, Deserialize)]
pub(crate) struct RawType {
    #[serde(default)]
    id: u32,
    name: String,
    #[serde(default)]
    damage_relations: Option<RawDamageRelations>,
}

impl From<RawType> for TypeRecord {
    fn from(raw: RawType) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            damage_relations: raw.damage_relations.map(DamageRelations::from),
        }
    }
}
