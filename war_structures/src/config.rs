// Data-driven structure configuration.
//
// The materials every structure is built from live here in
// `StructureConfig`, loaded from JSON by the host at startup. Layout
// geometry (lobby depth, gate offsets, proximity radius) is not
// configurable: it is the contract players and the game-state layer rely
// on, and lives as named constants next to the code that uses it.
//
// A lobby floor or outline material of `Air` means "leave the terrain as
// it is" and skips that fill.
//
// See also: `materialize.rs` which reads `LobbyMaterials`, `monument.rs`
// which reads `ZoneMaterials`, `zone.rs` which owns a `StructureConfig`.

use crate::types::{BlockState, Material};
use serde::{Deserialize, Serialize};

/// Blocks used when materializing a lobby.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyMaterials {
    pub floor: BlockState,
    pub outline: BlockState,
    /// Frame of the war-hub link gate.
    pub gate: BlockState,
    /// Under every gate, and the two lobby lights.
    pub light: BlockState,
}

impl Default for LobbyMaterials {
    fn default() -> Self {
        Self {
            floor: BlockState::plain(Material::Glass),
            outline: BlockState::plain(Material::Glass),
            gate: BlockState::plain(Material::Glass),
            light: BlockState::plain(Material::Glowstone),
        }
    }
}

/// Blocks used for in-zone structures (monuments).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneMaterials {
    pub main: BlockState,
    /// Corner accents.
    pub light: BlockState,
}

impl Default for ZoneMaterials {
    fn default() -> Self {
        Self {
            main: BlockState::plain(Material::Obsidian),
            light: BlockState::plain(Material::Glowstone),
        }
    }
}

/// Top-level structure configuration. Loaded from JSON, never mutated by
/// the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureConfig {
    #[serde(default)]
    pub lobby_materials: LobbyMaterials,
    #[serde(default)]
    pub zone_materials: ZoneMaterials,
    /// Whether a war hub exists to link back to. Controls the link gate
    /// frame and its sign.
    #[serde(default)]
    pub war_hub_present: bool,
}

impl StructureConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
