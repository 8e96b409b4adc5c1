// Narrative output of structure commands.
//
// `Warzone::apply()` returns the events a command produced, in the order
// they happened. The game layer uses them to message operators and to
// track the zone teleport; tests use them to assert what a command did.
//
// See also: `command.rs` for the inputs, `zone.rs` for where these are
// emitted.

use crate::direction::Wall;
use crate::materialize::Teleport;
use crate::types::VoxelCoord;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StructureEvent {
    /// The lobby was (re)computed and materialized.
    LobbyPlaced { wall: Wall, half_width: i32 },
    /// Materialization was skipped because lobby geometry is missing.
    LobbyMaterializeSkipped,
    /// The zone's default teleport moved.
    TeleportSet { teleport: Teleport },
    /// A team gate sign was rewritten.
    TeamSignRefreshed { team: String },
    MonumentPlaced { name: String, center: VoxelCoord },
    MonumentRemoved { name: String },
    MonumentCaptured { name: String, team: String },
    MonumentUncaptured { name: String, previous: Option<String> },
    /// The command changed nothing.
    CommandIgnored { reason: String },
}
