// Commands that change a zone's structures.
//
// All operator and game-layer mutations of lobbies and monuments go through
// `StructureCommand`, applied by `Warzone::apply()` in `zone.rs`. The zone
// answers with `StructureEvent`s (see `event.rs`). A command that cannot be
// applied (unknown monument, unregistered team, no lobby yet) changes
// nothing and yields `StructureEvent::CommandIgnored`.
//
// Current commands:
// - `AttachLobbyToWall` / `PlaceLobbyAt`: anchor (or re-anchor) the lobby
//   and materialize it.
// - `RefreshLobby`: recompute the lobby from its anchor after the team
//   roster, auto-assign flag or bounds changed, and materialize it.
// - `RefreshTeamSign`: rewrite one team's gate sign.
// - `PlaceMonument` / `RemoveMonument`: create, move or tear down a
//   monument by name.
// - `CaptureMonument` / `UncaptureMonument`: ownership transitions driven
//   by the game layer.
//
// See also: `zone.rs` for the dispatch, `event.rs` for the outputs.

use crate::direction::Wall;
use crate::types::Location;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StructureCommand {
    AttachLobbyToWall { wall: Wall },
    /// Place the lobby in front of a player at `at`, looking along `yaw`.
    PlaceLobbyAt { at: Location, yaw: f32 },
    RefreshLobby,
    RefreshTeamSign { team: String },
    /// Create the monument, or move it if the name is taken.
    PlaceMonument { name: String, at: Location },
    RemoveMonument { name: String },
    CaptureMonument { name: String, team: String },
    UncaptureMonument { name: String },
}
